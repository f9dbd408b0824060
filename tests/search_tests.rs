//! Graph search on explicit graphs and grid layouts

mod common;

use common::GraphProblem;
use gridmind::{
    Error,
    grid::{
        CornersProblem, FoodSearchProblem, Layout, PositionSearchProblem, closest_dot_path,
        corners_heuristic, food_heuristic, manhattan_heuristic, presets,
    },
    search::{
        Algorithm, SearchProblem, a_star_search, breadth_first_search, depth_first_search,
        null_heuristic, search_with_stats, uniform_cost_search,
    },
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Random graph with 2-7 nodes, integer edge costs and start 0, goal n-1
fn arb_graph() -> impl Strategy<Value = GraphProblem> {
    (2usize..8).prop_flat_map(|nodes| {
        prop::collection::vec((0..nodes, 0..nodes, 0u8..10), 0..20).prop_map(move |edges| {
            let edges = edges
                .into_iter()
                .map(|(from, to, cost)| (from, to, f64::from(cost)))
                .collect();
            GraphProblem::new(nodes, edges, 0, nodes - 1)
        })
    })
}

proptest! {
    #[test]
    fn prop_ucs_and_astar_find_the_cheapest_path(graph in arb_graph()) {
        let ucs = uniform_cost_search(&graph);
        let astar = a_star_search(&graph, &null_heuristic::<usize, GraphProblem>);
        match graph.shortest_cost() {
            Some(best) => {
                let ucs = ucs.unwrap();
                let astar = astar.unwrap();
                prop_assert_eq!(graph.follow(&ucs), graph.goal);
                prop_assert_eq!(graph.follow(&astar), graph.goal);
                prop_assert_eq!(graph.actions_cost(&ucs), best);
                prop_assert_eq!(graph.actions_cost(&astar), best);
            }
            None => {
                let exhausted = matches!(ucs, Err(Error::SearchExhausted { .. }));
                prop_assert!(exhausted);
                let exhausted = matches!(astar, Err(Error::SearchExhausted { .. }));
                prop_assert!(exhausted);
            }
        }
    }

    #[test]
    fn prop_bfs_uses_fewest_edges(graph in arb_graph()) {
        match (breadth_first_search(&graph), graph.fewest_edges()) {
            (Ok(path), Some(fewest)) => {
                prop_assert_eq!(graph.follow(&path), graph.goal);
                prop_assert_eq!(path.len(), fewest);
            }
            (Err(Error::SearchExhausted { .. }), None) => {}
            (result, fewest) => prop_assert!(false, "bfs {:?} vs reference {:?}", result, fewest),
        }
    }

    #[test]
    fn prop_dfs_path_reaches_the_goal(graph in arb_graph()) {
        if let Ok(path) = depth_first_search(&graph) {
            prop_assert_eq!(graph.follow(&path), graph.goal);
        } else {
            prop_assert!(graph.shortest_cost().is_none());
        }
    }

    #[test]
    fn prop_each_state_expanded_at_most_once(graph in arb_graph()) {
        for algorithm in Algorithm::ALL {
            let heuristic = null_heuristic::<usize, GraphProblem>;
            if let Ok(outcome) = search_with_stats(algorithm, &graph, &heuristic) {
                prop_assert!(outcome.stats.expanded <= graph.nodes);
            }
        }
    }
}

#[test]
fn start_that_is_the_goal_needs_no_actions() {
    let graph = GraphProblem::new(2, vec![(0, 1, 1.0)], 0, 0);
    for algorithm in Algorithm::ALL {
        let outcome = search_with_stats(algorithm, &graph, &null_heuristic::<usize, _>).unwrap();
        assert!(outcome.actions.is_empty(), "{algorithm}");
    }
}

#[test]
fn ucs_prefers_cheap_detours() {
    // 0 -> 2 directly costs 10, via 1 costs 2
    let graph = GraphProblem::new(3, vec![(0, 2, 10.0), (0, 1, 1.0), (1, 2, 1.0)], 0, 2);
    assert_eq!(breadth_first_search(&graph).unwrap(), vec![0]);
    assert_eq!(uniform_cost_search(&graph).unwrap(), vec![1, 2]);
}

#[test]
fn astar_matches_ucs_on_preset_mazes() {
    for name in ["tinyMaze", "tinySearch", "smallClassic"] {
        let layout = Layout::parse(presets::by_name(name).unwrap()).unwrap();
        let problem = PositionSearchProblem::to_goal(&layout, (1, 1).into()).unwrap();
        let ucs = uniform_cost_search(&problem).unwrap();
        let astar = a_star_search(&problem, &manhattan_heuristic).unwrap();
        assert_eq!(problem.actions_cost(&ucs), problem.actions_cost(&astar), "{name}");
    }
}

#[test]
fn corners_heuristic_keeps_astar_optimal() {
    let layout = Layout::parse(presets::TINY_CORNERS).unwrap();
    let problem = CornersProblem::new(&layout).unwrap();
    let bfs = breadth_first_search(&problem).unwrap();

    let problem = CornersProblem::new(&layout).unwrap();
    let astar = a_star_search(&problem, &corners_heuristic).unwrap();
    assert_eq!(astar.len(), bfs.len());
}

#[test]
fn food_heuristic_keeps_astar_optimal() {
    let layout = Layout::parse("%%%%%%%\n%. P .%\n% %%% %\n%.   .%\n%%%%%%%").unwrap();
    let problem = FoodSearchProblem::new(&layout).unwrap();
    let ucs = uniform_cost_search(&problem).unwrap();

    let problem = FoodSearchProblem::new(&layout).unwrap();
    let astar = a_star_search(&problem, &food_heuristic).unwrap();
    assert_eq!(problem.actions_cost(&astar), problem.actions_cost(&ucs));
    assert!(problem.expanded() > 0);
}

#[test]
fn closest_dot_eats_every_pellet() {
    let layout = Layout::parse(presets::TINY_SEARCH).unwrap();
    let path = closest_dot_path(&layout).unwrap();

    let mut position = layout.require_agent_start().unwrap();
    let mut food = layout.food().clone();
    for direction in path {
        position = position.step(direction).unwrap();
        assert!(!layout.is_wall(position));
        food.remove(&position);
    }
    assert!(food.is_empty());
}
