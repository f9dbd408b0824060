//! Grid domains built on the search, tree-search and MDP cores.
//!
//! | Module | Core it drives |
//! |--------|----------------|
//! | [`layout`] | ASCII mazes shared by the other domains |
//! | [`position`], [`corners`], [`food`] | graph search |
//! | [`pursuit`] | adversarial tree search |
//! | [`gridworld`] | value iteration and Q-learning |

pub mod corners;
pub mod food;
pub mod gridworld;
pub mod layout;
pub mod position;
pub mod pursuit;

pub use corners::{CornersProblem, CornersState, corners_heuristic};
pub use food::{FoodSearchProblem, FoodState, closest_dot_path, food_heuristic, maze_distance};
pub use gridworld::{
    GridAction, GridCell, GridState, GridWorld, GridWorldEnv, POLICY_SETTINGS, PolicySetting,
};
pub use layout::{Layout, presets};
pub use position::{
    AnyFoodSearchProblem, ILLEGAL_PATH_COST, PositionSearchProblem, euclidean_heuristic,
    manhattan_heuristic,
};
pub use pursuit::{
    GameSummary, PursuitPolicy, PursuitState, ReflexAgent, better_evaluation, play_game,
    reflex_evaluation, score_evaluation,
};
