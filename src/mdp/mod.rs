//! Markov Decision Processes and exact dynamic-programming solvers
//!
//! [`ValueIterationAgent`] runs synchronous Bellman backups over every state
//! of a [`MarkovDecisionProcess`]:
//!
//! ```text
//! V'(s) = max_a Σ_s' P(s'|s,a) [R(s,a,s') + γ V(s')]
//! ```
//!
//! Each sweep reads only the previous sweep's table, so results do not
//! depend on the order in which states are enumerated.

pub mod process;
pub mod value_iteration;

pub use process::MarkovDecisionProcess;
pub use value_iteration::ValueIterationAgent;
