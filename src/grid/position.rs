//! Single-agent navigation problems over a [`Layout`].

use std::{cell::Cell, collections::BTreeSet};

use super::layout::Layout;
use crate::{
    Result,
    search::{SearchProblem, Successor},
    types::{Direction, Position, manhattan},
};

/// Cost returned for an action sequence that walks into a wall.
pub const ILLEGAL_PATH_COST: f64 = 999_999.0;

type CostFn<'a> = Box<dyn Fn(Position) -> f64 + 'a>;

/// Movement shared by the position-valued problems: neighbours, step costs
/// and an expansion counter.
struct Walk<'a> {
    layout: &'a Layout,
    start: Position,
    cost: CostFn<'a>,
    expanded: Cell<usize>,
}

impl<'a> Walk<'a> {
    fn new(layout: &'a Layout, start: Position) -> Self {
        Self {
            layout,
            start,
            cost: Box::new(|_| 1.0),
            expanded: Cell::new(0),
        }
    }

    fn successors(&self, position: Position) -> Vec<Successor<Position, Direction>> {
        self.expanded.set(self.expanded.get() + 1);
        self.layout
            .neighbors(position)
            .into_iter()
            .map(|(direction, next)| Successor::new(next, direction, (self.cost)(next)))
            .collect()
    }

    fn actions_cost(&self, actions: &[Direction]) -> f64 {
        let mut position = self.start;
        let mut total = 0.0;
        for &action in actions {
            match position.step(action).filter(|next| !self.layout.is_wall(*next)) {
                Some(next) => {
                    position = next;
                    total += (self.cost)(next);
                }
                None => return ILLEGAL_PATH_COST,
            }
        }
        total
    }
}

/// Walk from the agent start to a single goal cell.
pub struct PositionSearchProblem<'a> {
    walk: Walk<'a>,
    goal: Position,
}

impl<'a> PositionSearchProblem<'a> {
    /// Reach `goal` from the layout's agent start, one unit per step.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidLayout`] when the layout has no agent start.
    pub fn to_goal(layout: &'a Layout, goal: Position) -> Result<Self> {
        let start = layout.require_agent_start()?;
        Ok(Self::between(layout, start, goal))
    }

    pub fn between(layout: &'a Layout, start: Position, goal: Position) -> Self {
        Self {
            walk: Walk::new(layout, start),
            goal,
        }
    }

    /// Replace the unit step cost with `cost(next_position)`.
    pub fn with_cost(mut self, cost: impl Fn(Position) -> f64 + 'a) -> Self {
        self.walk.cost = Box::new(cost);
        self
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn layout(&self) -> &'a Layout {
        self.walk.layout
    }
}

impl SearchProblem for PositionSearchProblem<'_> {
    type State = Position;
    type Action = Direction;

    fn starting_state(&self) -> Position {
        self.walk.start
    }

    fn is_goal(&self, state: &Position) -> bool {
        *state == self.goal
    }

    fn successor_states(&self, state: &Position) -> Vec<Successor<Position, Direction>> {
        self.walk.successors(*state)
    }

    fn actions_cost(&self, actions: &[Direction]) -> f64 {
        self.walk.actions_cost(actions)
    }

    fn expanded(&self) -> usize {
        self.walk.expanded.get()
    }
}

/// Walk from a start cell to whichever food pellet is reached first.
pub struct AnyFoodSearchProblem<'a> {
    walk: Walk<'a>,
    food: BTreeSet<Position>,
}

impl<'a> AnyFoodSearchProblem<'a> {
    pub fn new(layout: &'a Layout, start: Position, food: BTreeSet<Position>) -> Self {
        Self {
            walk: Walk::new(layout, start),
            food,
        }
    }

    /// Start and food taken from the layout.
    pub fn from_layout(layout: &'a Layout) -> Result<Self> {
        let start = layout.require_agent_start()?;
        Ok(Self::new(layout, start, layout.food().clone()))
    }
}

impl SearchProblem for AnyFoodSearchProblem<'_> {
    type State = Position;
    type Action = Direction;

    fn starting_state(&self) -> Position {
        self.walk.start
    }

    fn is_goal(&self, state: &Position) -> bool {
        self.food.contains(state)
    }

    fn successor_states(&self, state: &Position) -> Vec<Successor<Position, Direction>> {
        self.walk.successors(*state)
    }

    fn actions_cost(&self, actions: &[Direction]) -> f64 {
        self.walk.actions_cost(actions)
    }

    fn expanded(&self) -> usize {
        self.walk.expanded.get()
    }
}

/// Manhattan distance to the goal cell.
pub fn manhattan_heuristic(state: &Position, problem: &PositionSearchProblem<'_>) -> f64 {
    manhattan(*state, problem.goal()) as f64
}

/// Straight-line distance to the goal cell.
pub fn euclidean_heuristic(state: &Position, problem: &PositionSearchProblem<'_>) -> f64 {
    let dx = state.x.abs_diff(problem.goal().x) as f64;
    let dy = state.y.abs_diff(problem.goal().y) as f64;
    dx.hypot(dy)
}
