//! CLI infrastructure for the gridmind toolkit
//!
//! This module provides the command-line interface for path search, value
//! iteration, Q-learning and game-tree play on grid worlds.

pub mod commands;
pub mod config;
pub mod output;
