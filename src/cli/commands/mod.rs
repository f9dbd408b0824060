//! Subcommands of the `gridmind` binary

pub mod learn;
pub mod play;
pub mod search;
pub mod solve;
