//! Frontier-driven graph search: DFS, BFS, uniform-cost and A*.
//!
//! Every algorithm runs the same loop and differs only in the frontier and
//! the priority assigned to a new node:
//!
//! | Algorithm | Frontier | Priority |
//! |-----------|----------|----------|
//! | DFS | [`Stack`] | ignored |
//! | BFS | [`Queue`] | ignored |
//! | UCS | [`PriorityQueue`] | `actions_cost(path)` |
//! | A* | [`PriorityQueue`] | `actions_cost(path) + h(state)` |
//!
//! The visited check happens when a node is popped, never when it is pushed,
//! so a state may sit in the frontier several times with different paths and
//! only its first pop is expanded.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{
    frontier::{Frontier, PriorityQueue, Queue, Stack},
    heuristic::null_heuristic,
    problem::SearchProblem,
};
use crate::{Error, Result};

/// Counters collected during one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// States popped for the first time and expanded (goal state included)
    pub expanded: usize,
    /// Nodes pushed onto the frontier, start node included
    pub pushed: usize,
    /// Largest frontier size observed
    pub max_frontier: usize,
}

/// A successful search: the action path plus counters.
#[derive(Debug, Clone)]
pub struct SearchOutcome<A> {
    pub actions: Vec<A>,
    pub stats: SearchStats,
}

/// Selectable search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Dfs,
    Bfs,
    Ucs,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dfs,
        Algorithm::Bfs,
        Algorithm::Ucs,
        Algorithm::AStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Dfs => "dfs",
            Algorithm::Bfs => "bfs",
            Algorithm::Ucs => "ucs",
            Algorithm::AStar => "astar",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" | "depth-first" => Ok(Algorithm::Dfs),
            "bfs" | "breadth-first" => Ok(Algorithm::Bfs),
            "ucs" | "uniform-cost" => Ok(Algorithm::Ucs),
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar),
            other => Err(Error::UnknownName {
                kind: "search algorithm",
                name: other.to_string(),
                expected: "dfs, bfs, ucs, astar".to_string(),
            }),
        }
    }
}

struct Node<S, A> {
    state: S,
    actions: Vec<A>,
}

/// Shared graph-search loop.
///
/// `priority` maps a freshly generated node (its state and full action path)
/// to the frontier key; `start_priority` is the key of the start node.
fn graph_search<P, F, K>(
    problem: &P,
    mut frontier: F,
    start_priority: f64,
    priority: K,
) -> Result<SearchOutcome<P::Action>>
where
    P: SearchProblem,
    F: Frontier<Node<P::State, P::Action>>,
    K: Fn(&P::State, &[P::Action]) -> f64,
{
    let mut stats = SearchStats::default();
    let mut visited: HashSet<P::State> = HashSet::new();

    frontier.push(
        Node {
            state: problem.starting_state(),
            actions: Vec::new(),
        },
        start_priority,
    );
    stats.pushed += 1;
    stats.max_frontier = 1;

    while let Some(node) = frontier.pop() {
        if visited.contains(&node.state) {
            continue;
        }
        visited.insert(node.state.clone());
        stats.expanded += 1;

        if problem.is_goal(&node.state) {
            return Ok(SearchOutcome {
                actions: node.actions,
                stats,
            });
        }

        let successors = problem.successor_states(&node.state);
        trace!(
            depth = node.actions.len(),
            successors = successors.len(),
            "expanding state"
        );
        for successor in successors {
            let mut actions = node.actions.clone();
            actions.push(successor.action);
            let key = priority(&successor.state, &actions);
            frontier.push(
                Node {
                    state: successor.state,
                    actions,
                },
                key,
            );
            stats.pushed += 1;
        }
        stats.max_frontier = stats.max_frontier.max(frontier.len());
    }

    Err(Error::SearchExhausted {
        expanded: stats.expanded,
    })
}

/// Search the deepest nodes first.
pub fn depth_first_search<P: SearchProblem>(problem: &P) -> Result<Vec<P::Action>> {
    search_with_stats(Algorithm::Dfs, problem, &null_heuristic::<P::State, P>)
        .map(|outcome| outcome.actions)
}

/// Search the shallowest nodes first. Returns a fewest-actions path.
pub fn breadth_first_search<P: SearchProblem>(problem: &P) -> Result<Vec<P::Action>> {
    search_with_stats(Algorithm::Bfs, problem, &null_heuristic::<P::State, P>)
        .map(|outcome| outcome.actions)
}

/// Search the node of least total path cost first.
pub fn uniform_cost_search<P: SearchProblem>(problem: &P) -> Result<Vec<P::Action>> {
    search_with_stats(Algorithm::Ucs, problem, &null_heuristic::<P::State, P>)
        .map(|outcome| outcome.actions)
}

/// Search the node with the lowest path cost plus heuristic first.
pub fn a_star_search<P, H>(problem: &P, heuristic: &H) -> Result<Vec<P::Action>>
where
    P: SearchProblem,
    H: Fn(&P::State, &P) -> f64,
{
    search_with_stats(Algorithm::AStar, problem, heuristic).map(|outcome| outcome.actions)
}

/// Run `algorithm` on `problem`, returning the path and search counters.
///
/// `heuristic` is consulted by A* only.
pub fn search_with_stats<P, H>(
    algorithm: Algorithm,
    problem: &P,
    heuristic: &H,
) -> Result<SearchOutcome<P::Action>>
where
    P: SearchProblem,
    H: Fn(&P::State, &P) -> f64,
{
    debug!(%algorithm, "starting search");
    let result = match algorithm {
        Algorithm::Dfs => graph_search(problem, Stack::new(), 0.0, |_, _| 0.0),
        Algorithm::Bfs => graph_search(problem, Queue::new(), 0.0, |_, _| 0.0),
        Algorithm::Ucs => graph_search(problem, PriorityQueue::new(), 0.0, |_, actions| {
            problem.actions_cost(actions)
        }),
        Algorithm::AStar => {
            let start = heuristic(&problem.starting_state(), problem);
            graph_search(problem, PriorityQueue::new(), start, |state, actions| {
                problem.actions_cost(actions) + heuristic(state, problem)
            })
        }
    };

    match &result {
        Ok(outcome) => debug!(
            %algorithm,
            expanded = outcome.stats.expanded,
            path_len = outcome.actions.len(),
            "search found goal"
        ),
        Err(err) => debug!(%algorithm, error = %err, "search failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Successor;

    /// Directed graph over integer nodes with labelled, weighted edges.
    struct Graph {
        start: u32,
        goals: Vec<u32>,
        edges: Vec<(u32, u32, &'static str, f64)>,
    }

    impl SearchProblem for Graph {
        type State = u32;
        type Action = &'static str;

        fn starting_state(&self) -> u32 {
            self.start
        }

        fn is_goal(&self, state: &u32) -> bool {
            self.goals.contains(state)
        }

        fn successor_states(&self, state: &u32) -> Vec<Successor<u32, &'static str>> {
            self.edges
                .iter()
                .filter(|(from, ..)| from == state)
                .map(|&(_, to, label, cost)| Successor::new(to, label, cost))
                .collect()
        }

        fn actions_cost(&self, actions: &[&'static str]) -> f64 {
            actions
                .iter()
                .map(|label| {
                    self.edges
                        .iter()
                        .find(|(.., l, _)| l == label)
                        .map(|e| e.3)
                        .unwrap_or(f64::INFINITY)
                })
                .sum()
        }
    }

    // S -a-> A -c-> G (cost 1 + 1), S -b-> G (cost 5), A -d-> B -e-> G (1 + 1)
    fn diamond() -> Graph {
        Graph {
            start: 0,
            goals: vec![9],
            edges: vec![
                (0, 1, "a", 1.0),
                (0, 9, "b", 5.0),
                (1, 9, "c", 1.0),
                (1, 2, "d", 1.0),
                (2, 9, "e", 1.0),
            ],
        }
    }

    #[test]
    fn bfs_returns_fewest_actions() {
        assert_eq!(breadth_first_search(&diamond()).unwrap(), vec!["b"]);
    }

    #[test]
    fn ucs_returns_cheapest_path() {
        assert_eq!(uniform_cost_search(&diamond()).unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn dfs_follows_last_pushed_successor() {
        // Successors of S are pushed a then b, so b is popped first.
        assert_eq!(depth_first_search(&diamond()).unwrap(), vec!["b"]);
    }

    #[test]
    fn a_star_with_null_heuristic_matches_ucs() {
        let graph = diamond();
        let ucs = uniform_cost_search(&graph).unwrap();
        let astar = a_star_search(&graph, &null_heuristic::<u32, Graph>).unwrap();
        assert_eq!(ucs, astar);
    }

    #[test]
    fn start_goal_returns_empty_path() {
        let graph = Graph {
            start: 9,
            goals: vec![9],
            edges: vec![],
        };
        for algorithm in Algorithm::ALL {
            let outcome =
                search_with_stats(algorithm, &graph, &null_heuristic::<u32, Graph>).unwrap();
            assert!(outcome.actions.is_empty());
            assert_eq!(outcome.stats.expanded, 1);
        }
    }

    #[test]
    fn unreachable_goal_is_search_exhausted() {
        let graph = Graph {
            start: 0,
            goals: vec![7],
            edges: vec![(0, 1, "a", 1.0), (1, 0, "b", 1.0)],
        };
        for algorithm in Algorithm::ALL {
            let err = search_with_stats(algorithm, &graph, &null_heuristic::<u32, Graph>)
                .unwrap_err();
            assert!(matches!(err, Error::SearchExhausted { expanded: 2 }));
        }
    }

    #[test]
    fn duplicates_are_expanded_once() {
        // Both routes reach node 2; it must be expanded a single time.
        let graph = Graph {
            start: 0,
            goals: vec![9],
            edges: vec![
                (0, 1, "a", 1.0),
                (0, 2, "b", 3.0),
                (1, 2, "c", 1.0),
                (2, 9, "d", 1.0),
            ],
        };
        let outcome =
            search_with_stats(Algorithm::Ucs, &graph, &null_heuristic::<u32, Graph>).unwrap();
        assert_eq!(outcome.actions, vec!["a", "c", "d"]);
        assert_eq!(outcome.stats.expanded, 4);
        assert!(outcome.stats.pushed > outcome.stats.expanded);
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("A*".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert_eq!("bfs".parse::<Algorithm>().unwrap(), Algorithm::Bfs);
        assert!("greedy".parse::<Algorithm>().is_err());
    }
}
