//! Eat every food pellet on a layout.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeSet, HashMap, VecDeque},
};

use tracing::{debug, info};

use super::{
    layout::Layout,
    position::{AnyFoodSearchProblem, ILLEGAL_PATH_COST, PositionSearchProblem},
};
use crate::{
    Result,
    search::{SearchProblem, Successor, breadth_first_search, uniform_cost_search},
    types::{Direction, Position, manhattan},
};

/// Search state: the agent's cell and the food still on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoodState {
    pub position: Position,
    pub food: BTreeSet<Position>,
}

pub struct FoodSearchProblem<'a> {
    layout: &'a Layout,
    start: FoodState,
    expanded: Cell<usize>,
    distances: RefCell<HashMap<Position, HashMap<Position, usize>>>,
}

impl<'a> FoodSearchProblem<'a> {
    pub fn new(layout: &'a Layout) -> Result<Self> {
        let position = layout.require_agent_start()?;
        let mut food = layout.food().clone();
        food.remove(&position);
        Ok(Self {
            layout,
            start: FoodState { position, food },
            expanded: Cell::new(0),
            distances: RefCell::new(HashMap::new()),
        })
    }

    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    /// Maze distance between two cells, or `None` if `to` is unreachable.
    ///
    /// Distance tables are computed once per source cell and cached.
    pub fn maze_distance(&self, from: Position, to: Position) -> Option<usize> {
        let mut cache = self.distances.borrow_mut();
        let table = cache
            .entry(from)
            .or_insert_with(|| distances_from(self.layout, from));
        table.get(&to).copied()
    }
}

impl SearchProblem for FoodSearchProblem<'_> {
    type State = FoodState;
    type Action = Direction;

    fn starting_state(&self) -> FoodState {
        self.start.clone()
    }

    fn is_goal(&self, state: &FoodState) -> bool {
        state.food.is_empty()
    }

    fn successor_states(&self, state: &FoodState) -> Vec<Successor<FoodState, Direction>> {
        self.expanded.set(self.expanded.get() + 1);
        self.layout
            .neighbors(state.position)
            .into_iter()
            .map(|(direction, next)| {
                let mut food = state.food.clone();
                food.remove(&next);
                Successor::new(
                    FoodState {
                        position: next,
                        food,
                    },
                    direction,
                    1.0,
                )
            })
            .collect()
    }

    fn actions_cost(&self, actions: &[Direction]) -> f64 {
        let mut position = self.start.position;
        for &action in actions {
            match position.step(action) {
                Some(next) if !self.layout.is_wall(next) => position = next,
                _ => return ILLEGAL_PATH_COST,
            }
        }
        actions.len() as f64
    }

    fn expanded(&self) -> usize {
        self.expanded.get()
    }
}

/// Maze distance from the agent to the farthest remaining pellet.
///
/// Every pellet must still be reached, so the farthest one bounds the
/// remaining path from below. Zero once the board is clear.
pub fn food_heuristic(state: &FoodState, problem: &FoodSearchProblem<'_>) -> f64 {
    state
        .food
        .iter()
        .map(|&pellet| {
            problem
                .maze_distance(state.position, pellet)
                .unwrap_or_else(|| manhattan(state.position, pellet))
        })
        .max()
        .unwrap_or(0) as f64
}

/// Maze distance between two cells of `layout`, found by breadth-first search.
pub fn maze_distance(layout: &Layout, from: Position, to: Position) -> Result<usize> {
    let problem = PositionSearchProblem::between(layout, from, to);
    Ok(breadth_first_search(&problem)?.len())
}

/// Clear the board greedily: repeatedly walk to the nearest pellet.
///
/// Not optimal in general, but each leg is a shortest path.
pub fn closest_dot_path(layout: &Layout) -> Result<Vec<Direction>> {
    let mut position = layout.require_agent_start()?;
    let mut food = layout.food().clone();
    food.remove(&position);
    let mut actions = Vec::new();

    while !food.is_empty() {
        let problem = AnyFoodSearchProblem::new(layout, position, food.clone());
        let segment = uniform_cost_search(&problem)?;
        for &action in &segment {
            if let Some(next) = position.step(action) {
                position = next;
                food.remove(&position);
            }
        }
        debug!(
            steps = segment.len(),
            remaining = food.len(),
            "reached pellet"
        );
        actions.extend(segment);
    }
    info!(cost = actions.len(), "path found");
    Ok(actions)
}

fn distances_from(layout: &Layout, source: Position) -> HashMap<Position, usize> {
    let mut distances = HashMap::from([(source, 0)]);
    let mut queue = VecDeque::from([source]);
    while let Some(position) = queue.pop_front() {
        let distance = distances[&position];
        for (_, next) in layout.neighbors(position) {
            if !distances.contains_key(&next) {
                distances.insert(next, distance + 1);
                queue.push_back(next);
            }
        }
    }
    distances
}
