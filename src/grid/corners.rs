//! Visit all four inner corners of a layout.

use std::cell::Cell;

use tracing::warn;

use super::{layout::Layout, position::ILLEGAL_PATH_COST};
use crate::{
    Result,
    search::{SearchProblem, Successor},
    types::{Direction, Position, manhattan},
};

/// Search state: where the agent stands and which corners it has touched.
///
/// Bit `i` of `visited` is set once corner `i` of [`Layout::corners`] has
/// been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornersState {
    pub position: Position,
    pub visited: u8,
}

const ALL_CORNERS: u8 = 0b1111;

pub struct CornersProblem<'a> {
    layout: &'a Layout,
    start: Position,
    corners: [Position; 4],
    expanded: Cell<usize>,
}

impl<'a> CornersProblem<'a> {
    pub fn new(layout: &'a Layout) -> Result<Self> {
        let start = layout.require_agent_start()?;
        let corners = layout.corners();
        for corner in corners {
            if !layout.food().contains(&corner) {
                warn!(%corner, "no food in corner");
            }
        }
        Ok(Self {
            layout,
            start,
            corners,
            expanded: Cell::new(0),
        })
    }

    pub fn corners(&self) -> &[Position; 4] {
        &self.corners
    }

    fn mark(&self, position: Position, visited: u8) -> u8 {
        self.corners
            .iter()
            .enumerate()
            .filter(|(_, corner)| **corner == position)
            .fold(visited, |mask, (index, _)| mask | (1 << index))
    }

    /// Corners not yet covered by `visited`.
    pub fn unvisited(&self, visited: u8) -> Vec<Position> {
        self.corners
            .iter()
            .enumerate()
            .filter(|(index, _)| visited & (1 << *index) == 0)
            .map(|(_, corner)| *corner)
            .collect()
    }
}

impl SearchProblem for CornersProblem<'_> {
    type State = CornersState;
    type Action = Direction;

    fn starting_state(&self) -> CornersState {
        CornersState {
            position: self.start,
            visited: self.mark(self.start, 0),
        }
    }

    fn is_goal(&self, state: &CornersState) -> bool {
        state.visited == ALL_CORNERS
    }

    fn successor_states(&self, state: &CornersState) -> Vec<Successor<CornersState, Direction>> {
        self.expanded.set(self.expanded.get() + 1);
        self.layout
            .neighbors(state.position)
            .into_iter()
            .map(|(direction, next)| {
                let next_state = CornersState {
                    position: next,
                    visited: self.mark(next, state.visited),
                };
                Successor::new(next_state, direction, 1.0)
            })
            .collect()
    }

    fn actions_cost(&self, actions: &[Direction]) -> f64 {
        let mut position = self.start;
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

/// Length of the shortest Manhattan tour from the agent through every
/// unvisited corner.
///
/// Manhattan distance never exceeds maze distance, so the tour never
/// exceeds the true remaining path and the bound is consistent.
pub fn corners_heuristic(state: &CornersState, problem: &CornersProblem<'_>) -> f64 {
    let mut remaining = problem.unvisited(state.visited);
    shortest_tour(state.position, &mut remaining, 0) as f64
}

/// Exhaustive tour over at most four points.
fn shortest_tour(from: Position, remaining: &mut Vec<Position>, start: usize) -> usize {
    if start == remaining.len() {
        return 0;
    }
    let mut best = usize::MAX;
    for index in start..remaining.len() {
        remaining.swap(start, index);
        let next = remaining[start];
        let length = manhattan(from, next) + shortest_tour(next, remaining, start + 1);
        best = best.min(length);
        remaining.swap(start, index);
    }
    best
}
