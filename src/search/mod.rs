//! Generic graph search over a [`SearchProblem`].
//!
//! ## Algorithms
//!
//! - **DFS** and **BFS**: uninformed, unit priority
//! - **UCS**: ordered by path cost, optimal for non-negative step costs
//! - **A\***: ordered by path cost plus heuristic, optimal for admissible heuristics
//!
//! All four return the action sequence from the starting state to the first
//! goal popped, or [`crate::Error::SearchExhausted`].
//!
//! ```
//! use gridmind::grid::{Layout, PositionSearchProblem};
//! use gridmind::search::{a_star_search, manhattan_heuristic};
//!
//! let layout = Layout::parse("%%%%%\n%P .%\n%%%%%")?;
//! let problem = PositionSearchProblem::to_goal(&layout, (3, 1).into())?;
//! let path = a_star_search(&problem, &manhattan_heuristic)?;
//! assert_eq!(path.len(), 2);
//! # Ok::<(), gridmind::Error>(())
//! ```

pub mod engine;
pub mod frontier;
pub mod heuristic;
pub mod problem;

pub use engine::{
    Algorithm, SearchOutcome, SearchStats, a_star_search, breadth_first_search,
    depth_first_search, search_with_stats, uniform_cost_search,
};
pub use frontier::{Frontier, PriorityQueue, Queue, Stack};
pub use heuristic::null_heuristic;
pub use problem::{SearchProblem, Successor};

pub use crate::grid::position::manhattan_heuristic;
