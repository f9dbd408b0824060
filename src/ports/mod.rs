//! Ports (trait boundaries) between the learning core and its collaborators.
//!
//! Environments, training observers and value-based agents meet at these
//! traits, so the training pipeline and the reporting code never depend on
//! a concrete grid or agent type.

pub mod environment;
pub mod estimator;
pub mod learner;
pub mod observer;

pub use environment::Environment;
pub use estimator::ValueEstimator;
pub use learner::LearningAgent;
pub use observer::Observer;
