//! Q-learning: tabular and linear-approximate temporal difference control
//!
//! Both agents learn off-policy from single transitions and choose actions
//! ε-greedily. They share episode bookkeeping: once the configured number
//! of training episodes has completed, ε and α drop to zero and the agent
//! plays its learned greedy policy.
//!
//! ## Agents
//!
//! | Agent | Q(s, a) | Update |
//! |-------|---------|--------|
//! | [`QLearningAgent`] | table lookup, 0.0 if unseen | `Q ← (1-α)Q + α(r + γV(s'))` |
//! | [`ApproximateQAgent`] | `Σ w_f · f(s, a)` | `w_f += α · correction · f(s, a)` |
//!
//! ## Usage Example
//!
//! ```
//! use gridmind::{
//!     config::AgentParams,
//!     q_learning::{ApproximateQAgent, IdentityExtractor},
//! };
//!
//! let params = AgentParams::default().with_epsilon(0.0).with_seed(1);
//! let agent = ApproximateQAgent::new(params, IdentityExtractor, |s: &u32| {
//!     if *s < 3 { vec![1u32, 2] } else { vec![] }
//! })
//! .unwrap();
//! assert_eq!(agent.policy(&0), Some(1));
//! ```

pub mod agent;
pub mod approximate;
pub mod episode;
pub mod features;
pub mod q_table;

pub use agent::{ActionFn, QLearningAgent};
pub use approximate::ApproximateQAgent;
pub use episode::EpisodeTracker;
pub use features::{FeatureExtractor, Features, IdentityExtractor};
pub use q_table::QTable;
