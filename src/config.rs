//! Configuration types for agents and solvers.
//!
//! Each section has builder-style setters and a `validate` method. A whole
//! [`GridmindConfig`] can be read from a TOML file; sections missing from
//! the file keep their defaults.
//!
//! ```toml
//! [learning]
//! alpha = 0.2
//! discount = 0.8
//! epsilon = 0.05
//! num_training = 100
//!
//! [solver]
//! discount = 0.9
//! iterations = 100
//!
//! [tree]
//! depth = 2
//! variant = "alphabeta"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result, adversarial::TreeSearch, search::Algorithm};

/// Parameters shared by the reinforcement-learning agents.
///
/// # Examples
///
/// ```
/// use gridmind::config::AgentParams;
///
/// let params = AgentParams::default()
///     .with_alpha(0.2)
///     .with_discount(0.8)
///     .with_epsilon(0.05)
///     .with_num_training(10);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub discount: f64,
    /// Exploration probability ε
    pub epsilon: f64,
    /// Episodes of training before learning and exploration switch off
    pub num_training: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            discount: 0.9,
            epsilon: 0.05,
            num_training: 0,
            seed: None,
        }
    }
}

impl AgentParams {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_num_training(mut self, episodes: usize) -> Self {
        self.num_training = episodes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that α, γ and ε are probabilities.
    pub fn validate(&self) -> Result<()> {
        check_unit("alpha", self.alpha)?;
        check_unit("discount", self.discount)?;
        check_unit("epsilon", self.epsilon)
    }
}

/// Value-iteration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub discount: f64,
    pub iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            discount: 0.9,
            iterations: 100,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit("discount", self.discount)
    }
}

/// Adversarial tree-search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Full rounds searched below the root
    pub depth: usize,
    pub variant: TreeSearch,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            variant: TreeSearch::Minimax,
        }
    }
}

/// Graph-search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::AStar,
        }
    }
}

/// All configurable sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridmindConfig {
    pub search: SearchConfig,
    pub tree: TreeConfig,
    pub solver: SolverConfig,
    pub learning: AgentParams,
}

impl GridmindConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GridmindConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.solver.validate()?;
        self.learning.validate()
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_config(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GridmindConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_epsilon() {
        let params = AgentParams::default().with_epsilon(1.5);
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GridmindConfig::from_toml(
            r#"
            [tree]
            depth = 3
            variant = "expectimax"

            [learning]
            alpha = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(config.tree.depth, 3);
        assert_eq!(config.tree.variant, TreeSearch::Expectimax);
        assert_eq!(config.learning.alpha, 0.25);
        assert_eq!(config.learning.discount, 0.9);
        assert_eq!(config.solver, SolverConfig::default());
        assert_eq!(config.search.algorithm, Algorithm::AStar);
    }

    #[test]
    fn invalid_toml_is_reported() {
        assert!(matches!(
            GridmindConfig::from_toml("[solver]\ndiscount = \"high\""),
            Err(Error::Toml(_))
        ));
        assert!(GridmindConfig::from_toml("[solver]\ndiscount = 2.0").is_err());
    }
}
