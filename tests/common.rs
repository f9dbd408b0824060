//! Common fixtures for the gridmind test suite.
//!
//! Explicit graphs, explicit game trees and a tiny MDP, each paired with a
//! brute-force reference answer the library results are checked against.

#![allow(dead_code)]

use std::rc::Rc;

use gridmind::{
    adversarial::GameState,
    mdp::MarkovDecisionProcess,
    search::{SearchProblem, Successor},
};

/// Directed weighted graph; actions are edge indices.
#[derive(Debug, Clone)]
pub struct GraphProblem {
    pub nodes: usize,
    pub edges: Vec<(usize, usize, f64)>,
    pub start: usize,
    pub goal: usize,
}

impl GraphProblem {
    pub fn new(nodes: usize, edges: Vec<(usize, usize, f64)>, start: usize, goal: usize) -> Self {
        Self {
            nodes,
            edges,
            start,
            goal,
        }
    }

    /// Node reached by following `actions` from the start.
    pub fn follow(&self, actions: &[usize]) -> usize {
        actions.iter().fold(self.start, |node, &edge| {
            let (from, to, _) = self.edges[edge];
            assert_eq!(from, node, "edge {edge} does not leave node {node}");
            to
        })
    }

    /// Cheapest start-to-goal cost by Bellman-Ford, `None` if unreachable.
    pub fn shortest_cost(&self) -> Option<f64> {
        let mut distance = vec![f64::INFINITY; self.nodes];
        distance[self.start] = 0.0;
        for _ in 0..self.nodes {
            for &(from, to, cost) in &self.edges {
                if distance[from] + cost < distance[to] {
                    distance[to] = distance[from] + cost;
                }
            }
        }
        distance[self.goal].is_finite().then_some(distance[self.goal])
    }

    /// Fewest edges from start to goal, `None` if unreachable.
    pub fn fewest_edges(&self) -> Option<usize> {
        let unit = GraphProblem {
            edges: self.edges.iter().map(|&(f, t, _)| (f, t, 1.0)).collect(),
            ..self.clone()
        };
        unit.shortest_cost().map(|cost| cost as usize)
    }
}

impl SearchProblem for GraphProblem {
    type State = usize;
    type Action = usize;

    fn starting_state(&self) -> usize {
        self.start
    }

    fn is_goal(&self, state: &usize) -> bool {
        *state == self.goal
    }

    fn successor_states(&self, state: &usize) -> Vec<Successor<usize, usize>> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, (from, _, _))| from == state)
            .map(|(index, &(_, to, cost))| Successor::new(to, index, cost))
            .collect()
    }

    fn actions_cost(&self, actions: &[usize]) -> f64 {
        actions.iter().map(|&edge| self.edges[edge].2).sum()
    }
}

/// Node of an explicit game tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub value: f64,
    pub children: Vec<usize>,
}

/// Position in an explicit game tree; actions are child indices.
#[derive(Debug, Clone)]
pub struct TreeGame {
    pub nodes: Rc<Vec<TreeNode>>,
    pub node: usize,
    pub agents: usize,
}

impl TreeGame {
    /// Complete tree `plies` deep where node `i` has `branching[i % len]`
    /// children and leaves take values from `leaf_values` in order.
    pub fn build(agents: usize, plies: usize, branching: &[usize], leaf_values: &[f64]) -> Self {
        let mut nodes = vec![TreeNode {
            value: 0.0,
            children: Vec::new(),
        }];
        let mut frontier = vec![0];
        let mut next_leaf = 0;
        for ply in 0..plies {
            let mut next = Vec::new();
            for parent in frontier {
                let count = branching[(parent + ply) % branching.len()].max(1);
                for _ in 0..count {
                    nodes.push(TreeNode {
                        value: 0.0,
                        children: Vec::new(),
                    });
                    let child = nodes.len() - 1;
                    nodes[parent].children.push(child);
                    next.push(child);
                }
            }
            frontier = next;
        }
        for leaf in frontier {
            nodes[leaf].value = leaf_values[next_leaf % leaf_values.len()];
            next_leaf += 1;
        }
        Self {
            nodes: Rc::new(nodes),
            node: 0,
            agents,
        }
    }

    pub fn value(&self) -> f64 {
        self.nodes[self.node].value
    }

    /// Minimax value by exhaustive recursion: agent 0 maximizes, the rest
    /// minimize, agents alternate every ply.
    pub fn minimax(&self, ply: usize) -> f64 {
        let children = &self.nodes[self.node].children;
        if children.is_empty() {
            return self.value();
        }
        let values = children.iter().map(|&child| {
            TreeGame {
                node: child,
                ..self.clone()
            }
            .minimax(ply + 1)
        });
        if ply % self.agents == 0 {
            values.fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.fold(f64::INFINITY, f64::min)
        }
    }

    /// Expectimax value by exhaustive recursion.
    pub fn expectimax(&self, ply: usize) -> f64 {
        let children = &self.nodes[self.node].children;
        if children.is_empty() {
            return self.value();
        }
        let values: Vec<f64> = children
            .iter()
            .map(|&child| {
                TreeGame {
                    node: child,
                    ..self.clone()
                }
                .expectimax(ply + 1)
            })
            .collect();
        if ply % self.agents == 0 {
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}

impl GameState for TreeGame {
    type Action = usize;

    fn num_agents(&self) -> usize {
        self.agents
    }

    fn legal_actions(&self, _agent: usize) -> Vec<usize> {
        (0..self.nodes[self.node].children.len()).collect()
    }

    fn generate_successor(&self, _agent: usize, action: &usize) -> Self {
        TreeGame {
            node: self.nodes[self.node].children[*action],
            ..self.clone()
        }
    }

    fn is_win(&self) -> bool {
        false
    }

    fn is_lose(&self) -> bool {
        false
    }
}

/// Leaf evaluation for [`TreeGame`].
pub fn tree_value(state: &TreeGame) -> f64 {
    state.value()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinState {
    Playing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinAction {
    /// Collect 1 and keep playing
    Stay,
    /// Collect 5 and stop
    Quit,
}

/// Two-state MDP: stay forever for 1 per step, or quit once for 5.
///
/// With γ = 0.9 staying is worth 10, so the optimal policy flips from quit
/// to stay once the values have propagated far enough.
pub struct CoinMdp;

impl MarkovDecisionProcess for CoinMdp {
    type State = CoinState;
    type Action = CoinAction;

    fn states(&self) -> Vec<CoinState> {
        vec![CoinState::Playing, CoinState::Done]
    }

    fn start_state(&self) -> CoinState {
        CoinState::Playing
    }

    fn possible_actions(&self, state: &CoinState) -> Vec<CoinAction> {
        match state {
            CoinState::Playing => vec![CoinAction::Stay, CoinAction::Quit],
            CoinState::Done => Vec::new(),
        }
    }

    fn transition_states_and_probs(
        &self,
        _state: &CoinState,
        action: &CoinAction,
    ) -> Vec<(CoinState, f64)> {
        match action {
            CoinAction::Stay => vec![(CoinState::Playing, 1.0)],
            CoinAction::Quit => vec![(CoinState::Done, 1.0)],
        }
    }

    fn reward(&self, _state: &CoinState, action: &CoinAction, _next: &CoinState) -> f64 {
        match action {
            CoinAction::Stay => 1.0,
            CoinAction::Quit => 5.0,
        }
    }

    fn is_terminal(&self, state: &CoinState) -> bool {
        *state == CoinState::Done
    }
}
