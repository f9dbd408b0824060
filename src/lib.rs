//! Search, game-tree, MDP and Q-learning agents for grid worlds
//!
//! This crate provides:
//! - Generic graph search (DFS, BFS, UCS, A*) over any [`search::SearchProblem`]
//! - Minimax, alpha-beta and expectimax tree search over any [`adversarial::GameState`]
//! - Value iteration over any finite [`mdp::MarkovDecisionProcess`]
//! - Tabular and approximate Q-learning agents trained online
//! - Grid domains exercising all four: mazes, corners, food, pursuit and gridworld
//! - An episodic training pipeline with pluggable observers

pub mod adversarial;
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod mdp;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod search;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use types::{Direction, Position};
