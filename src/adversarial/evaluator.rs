//! Depth-limited minimax, alpha-beta and expectimax tree search.
//!
//! The walk visits `(state, agent, depth)` nodes. After the last agent moves
//! the turn returns to agent 0 and `depth` increments, so the depth limit
//! counts full rounds rather than single moves.
//!
//! ## Tie-breaking
//!
//! Max nodes keep the last action whose value is `>=` the running best, min
//! nodes keep the last action whose value is `<=` the running best. Among
//! equal-valued moves the one enumerated last wins.

use std::{cell::Cell, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::game::GameState;
use crate::{Error, Result};

/// Which backup rule the non-maximizing agents follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeSearch {
    /// Adversaries minimize
    #[default]
    Minimax,
    /// Adversaries minimize, with alpha-beta cutoffs
    AlphaBeta,
    /// Adversaries pick uniformly at random
    Expectimax,
}

impl TreeSearch {
    pub fn name(self) -> &'static str {
        match self {
            TreeSearch::Minimax => "minimax",
            TreeSearch::AlphaBeta => "alphabeta",
            TreeSearch::Expectimax => "expectimax",
        }
    }
}

impl fmt::Display for TreeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TreeSearch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(TreeSearch::Minimax),
            "alphabeta" | "alpha-beta" => Ok(TreeSearch::AlphaBeta),
            "expectimax" => Ok(TreeSearch::Expectimax),
            other => Err(Error::UnknownName {
                kind: "tree search",
                name: other.to_string(),
                expected: "minimax, alphabeta, expectimax".to_string(),
            }),
        }
    }
}

/// Backed-up value of a node and the action that achieves it.
///
/// `action` is `None` at terminal nodes. At expectimax chance nodes it is
/// also `None`: only the value propagates upward.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<A> {
    pub value: f64,
    pub action: Option<A>,
}

impl<A> Decision<A> {
    fn leaf(value: f64) -> Self {
        Self {
            value,
            action: None,
        }
    }
}

/// Tree-search agent controlling agent 0.
///
/// # Examples
///
/// ```
/// use gridmind::adversarial::{MultiAgentSearchAgent, TreeSearch};
/// use gridmind::grid::{Layout, PursuitState, score_evaluation};
///
/// let layout = Layout::parse("%%%%%\n%P.G%\n%%%%%")?;
/// let state = PursuitState::from_layout(&layout)?;
/// let agent = MultiAgentSearchAgent::new(score_evaluation, 2, TreeSearch::AlphaBeta);
/// assert!(agent.action(&state).is_some());
/// # Ok::<(), gridmind::Error>(())
/// ```
pub struct MultiAgentSearchAgent<F> {
    evaluation: F,
    depth: usize,
    variant: TreeSearch,
    nodes_visited: Cell<usize>,
}

impl<F> MultiAgentSearchAgent<F> {
    /// Create an agent searching `depth` full rounds with `variant`.
    pub fn new(evaluation: F, depth: usize, variant: TreeSearch) -> Self {
        Self {
            evaluation,
            depth,
            variant,
            nodes_visited: Cell::new(0),
        }
    }

    pub fn tree_depth(&self) -> usize {
        self.depth
    }

    pub fn variant(&self) -> TreeSearch {
        self.variant
    }

    /// Nodes visited by the most recent [`MultiAgentSearchAgent::evaluate`].
    pub fn nodes_visited(&self) -> usize {
        self.nodes_visited.get()
    }

    /// Best action for agent 0, or `None` if the root is terminal.
    pub fn action<S>(&self, state: &S) -> Option<S::Action>
    where
        S: GameState,
        F: Fn(&S) -> f64,
    {
        self.evaluate(state).action
    }

    /// Root value and action for agent 0.
    pub fn evaluate<S>(&self, state: &S) -> Decision<S::Action>
    where
        S: GameState,
        F: Fn(&S) -> f64,
    {
        self.nodes_visited.set(0);
        let decision = match self.variant {
            TreeSearch::AlphaBeta => {
                self.alpha_beta_value(state, 0, 0, f64::NEG_INFINITY, f64::INFINITY)
            }
            TreeSearch::Minimax | TreeSearch::Expectimax => self.value(state, 0, 0),
        };
        debug!(
            variant = %self.variant,
            depth = self.depth,
            value = decision.value,
            nodes = self.nodes_visited.get(),
            "tree search finished"
        );
        decision
    }

    fn next_turn(agent: usize, depth: usize, num_agents: usize) -> (usize, usize) {
        if agent + 1 >= num_agents {
            (0, depth + 1)
        } else {
            (agent + 1, depth)
        }
    }

    fn value<S>(&self, state: &S, agent: usize, depth: usize) -> Decision<S::Action>
    where
        S: GameState,
        F: Fn(&S) -> f64,
    {
        self.nodes_visited.set(self.nodes_visited.get() + 1);

        let actions = state.legal_actions(agent);
        if actions.is_empty() || depth == self.depth || state.is_win() || state.is_lose() {
            return Decision::leaf((self.evaluation)(state));
        }

        let (next_agent, next_depth) = Self::next_turn(agent, depth, state.num_agents());
        if agent == 0 {
            let mut best = Decision::leaf(f64::NEG_INFINITY);
            for action in actions {
                let successor = state.generate_successor(agent, &action);
                let child = self.value(&successor, next_agent, next_depth).value;
                if child >= best.value {
                    best = Decision {
                        value: child,
                        action: Some(action),
                    };
                }
            }
            best
        } else if self.variant == TreeSearch::Expectimax {
            let probability = 1.0 / actions.len() as f64;
            let mut expected = 0.0;
            for action in actions {
                let successor = state.generate_successor(agent, &action);
                expected += probability * self.value(&successor, next_agent, next_depth).value;
            }
            Decision::leaf(expected)
        } else {
            let mut best = Decision::leaf(f64::INFINITY);
            for action in actions {
                let successor = state.generate_successor(agent, &action);
                let child = self.value(&successor, next_agent, next_depth).value;
                if child <= best.value {
                    best = Decision {
                        value: child,
                        action: Some(action),
                    };
                }
            }
            best
        }
    }

    // Only depth and empty action lists end a branch here, not win/lose.
    fn alpha_beta_value<S>(
        &self,
        state: &S,
        agent: usize,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
    ) -> Decision<S::Action>
    where
        S: GameState,
        F: Fn(&S) -> f64,
    {
        self.nodes_visited.set(self.nodes_visited.get() + 1);

        let actions = state.legal_actions(agent);
        if actions.is_empty() || depth == self.depth {
            return Decision::leaf((self.evaluation)(state));
        }

        let (next_agent, next_depth) = Self::next_turn(agent, depth, state.num_agents());
        if agent == 0 {
            let mut best = Decision::leaf(f64::NEG_INFINITY);
            for action in actions {
                let successor = state.generate_successor(agent, &action);
                let child = self
                    .alpha_beta_value(&successor, next_agent, next_depth, alpha, beta)
                    .value;
                if child >= best.value {
                    best = Decision {
                        value: child,
                        action: Some(action),
                    };
                }
                if best.value > beta {
                    return best;
                }
                if best.value >= alpha {
                    alpha = best.value;
                }
            }
            best
        } else {
            let mut best = Decision::leaf(f64::INFINITY);
            for action in actions {
                let successor = state.generate_successor(agent, &action);
                let child = self
                    .alpha_beta_value(&successor, next_agent, next_depth, alpha, beta)
                    .value;
                if child <= best.value {
                    best = Decision {
                        value: child,
                        action: Some(action),
                    };
                }
                if best.value < alpha {
                    return best;
                }
                if best.value <= beta {
                    beta = best.value;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Explicit game tree: agent turns alternate 0, 1, 0, 1, ...
    #[derive(Debug, Clone)]
    enum Tree {
        Leaf(f64),
        Node(Vec<(&'static str, Tree)>),
    }

    #[derive(Debug, Clone)]
    struct TreeState {
        tree: Tree,
        agents: usize,
    }

    impl GameState for TreeState {
        type Action = &'static str;

        fn num_agents(&self) -> usize {
            self.agents
        }

        fn legal_actions(&self, _agent: usize) -> Vec<&'static str> {
            match &self.tree {
                Tree::Leaf(_) => Vec::new(),
                Tree::Node(children) => children.iter().map(|(label, _)| *label).collect(),
            }
        }

        fn generate_successor(&self, _agent: usize, action: &&'static str) -> Self {
            match &self.tree {
                Tree::Node(children) => {
                    let (_, child) = children
                        .iter()
                        .find(|(label, _)| label == action)
                        .expect("action is legal");
                    TreeState {
                        tree: child.clone(),
                        agents: self.agents,
                    }
                }
                Tree::Leaf(_) => panic!("no successors of a leaf"),
            }
        }

        fn is_win(&self) -> bool {
            false
        }

        fn is_lose(&self) -> bool {
            false
        }
    }

    fn leaf_value(state: &TreeState) -> f64 {
        match state.tree {
            Tree::Leaf(value) => value,
            Tree::Node(_) => 0.0,
        }
    }

    fn two_ply(values: &[&[f64]]) -> TreeState {
        const LABELS: [&str; 4] = ["a", "b", "c", "d"];
        let children = values
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let leaves = row
                    .iter()
                    .enumerate()
                    .map(|(j, &v)| (LABELS[j], Tree::Leaf(v)))
                    .collect();
                (LABELS[i], Tree::Node(leaves))
            })
            .collect();
        TreeState {
            tree: Tree::Node(children),
            agents: 2,
        }
    }

    #[test]
    fn minimax_picks_best_worst_case() {
        let state = two_ply(&[&[3.0, 12.0, 8.0], &[2.0, 4.0, 6.0], &[14.0, 5.0, 2.0]]);
        let agent = MultiAgentSearchAgent::new(leaf_value, 1, TreeSearch::Minimax);
        let decision = agent.evaluate(&state);
        assert_eq!(decision.value, 3.0);
        assert_eq!(decision.action, Some("a"));
    }

    #[test]
    fn alpha_beta_matches_minimax_and_prunes() {
        let state = two_ply(&[&[3.0, 12.0, 8.0], &[2.0, 4.0, 6.0], &[14.0, 5.0, 2.0]]);
        let minimax = MultiAgentSearchAgent::new(leaf_value, 1, TreeSearch::Minimax);
        let alpha_beta = MultiAgentSearchAgent::new(leaf_value, 1, TreeSearch::AlphaBeta);
        assert_eq!(minimax.evaluate(&state), alpha_beta.evaluate(&state));
        assert!(alpha_beta.nodes_visited() < minimax.nodes_visited());
    }

    #[test]
    fn ties_keep_last_enumerated_action() {
        let state = two_ply(&[&[5.0], &[5.0], &[1.0]]);
        let agent = MultiAgentSearchAgent::new(leaf_value, 1, TreeSearch::Minimax);
        assert_eq!(agent.action(&state), Some("b"));
    }

    #[test]
    fn expectimax_averages_chance_children() {
        let state = two_ply(&[&[4.0, 10.0], &[6.0, 6.0]]);
        let agent = MultiAgentSearchAgent::new(leaf_value, 1, TreeSearch::Expectimax);
        let decision = agent.evaluate(&state);
        assert_eq!(decision.value, 7.0);
        assert_eq!(decision.action, Some("a"));
    }

    #[test]
    fn zero_depth_evaluates_root() {
        let state = two_ply(&[&[1.0]]);
        let agent = MultiAgentSearchAgent::new(|_: &TreeState| 42.0, 0, TreeSearch::Minimax);
        let decision = agent.evaluate(&state);
        assert_eq!(decision.value, 42.0);
        assert_eq!(decision.action, None);
        assert_eq!(agent.nodes_visited(), 1);
    }

    #[test]
    fn root_without_actions_is_terminal() {
        let state = TreeState {
            tree: Tree::Leaf(-3.0),
            agents: 2,
        };
        for variant in [
            TreeSearch::Minimax,
            TreeSearch::AlphaBeta,
            TreeSearch::Expectimax,
        ] {
            let agent = MultiAgentSearchAgent::new(leaf_value, 3, variant);
            assert_eq!(agent.evaluate(&state), Decision::leaf(-3.0));
        }
    }

    #[test]
    fn parses_variants() {
        assert_eq!(
            "alpha-beta".parse::<TreeSearch>().unwrap(),
            TreeSearch::AlphaBeta
        );
        assert!("mcts".parse::<TreeSearch>().is_err());
    }
}
