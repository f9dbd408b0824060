//! Adversarial game-tree search
//!
//! This module implements depth-limited tree search for turn-based games
//! with one maximizing agent (index 0) and any number of opponents.
//!
//! ## Variants
//!
//! | Variant | Opponent nodes | Terminal test |
//! |---------|----------------|---------------|
//! | Minimax | minimum of children | no actions, depth limit, win or lose |
//! | Alpha-beta | minimum with cutoffs | no actions, depth limit |
//! | Expectimax | uniform mean of children | no actions, depth limit, win or lose |

pub mod evaluator;
pub mod game;

pub use evaluator::{Decision, MultiAgentSearchAgent, TreeSearch};
pub use game::GameState;
