//! Tree search on explicit game trees and the pursuit game

mod common;

use common::{TreeGame, tree_value};
use gridmind::{
    adversarial::{MultiAgentSearchAgent, TreeSearch},
    grid::{Layout, PursuitState, better_evaluation, play_game, presets},
    utils::build_rng,
};
use proptest::prelude::*;

/// Random complete tree: agents, depth in full rounds, branching pattern and
/// integer leaf values (so ties are common)
fn arb_tree() -> impl Strategy<Value = (TreeGame, usize)> {
    (1usize..4, 1usize..3).prop_flat_map(|(agents, depth)| {
        (
            prop::collection::vec(1usize..4, 1..6),
            prop::collection::vec(-5i8..6, 1..24),
        )
            .prop_map(move |(branching, leaves)| {
                let leaves: Vec<f64> = leaves.into_iter().map(f64::from).collect();
                let plies = (agents * depth).min(6);
                (TreeGame::build(agents, plies, &branching, &leaves), depth)
            })
    })
}

proptest! {
    #[test]
    fn prop_minimax_matches_brute_force((game, depth) in arb_tree()) {
        let agent = MultiAgentSearchAgent::new(tree_value, depth, TreeSearch::Minimax);
        prop_assert_eq!(agent.evaluate(&game).value, game.minimax(0));
    }

    #[test]
    fn prop_alpha_beta_agrees_with_minimax((game, depth) in arb_tree()) {
        let minimax = MultiAgentSearchAgent::new(tree_value, depth, TreeSearch::Minimax);
        let alpha_beta = MultiAgentSearchAgent::new(tree_value, depth, TreeSearch::AlphaBeta);

        let full = minimax.evaluate(&game);
        let pruned = alpha_beta.evaluate(&game);
        prop_assert_eq!(&pruned, &full);
        prop_assert!(alpha_beta.nodes_visited() <= minimax.nodes_visited());
    }

    #[test]
    fn prop_expectimax_matches_brute_force((game, depth) in arb_tree()) {
        let agent = MultiAgentSearchAgent::new(tree_value, depth, TreeSearch::Expectimax);
        let value = agent.evaluate(&game).value;
        prop_assert!((value - game.expectimax(0)).abs() < 1e-9);
    }
}

#[test]
fn root_without_moves_has_no_action() {
    let leaf = TreeGame::build(2, 0, &[1], &[7.0]);
    for variant in [
        TreeSearch::Minimax,
        TreeSearch::AlphaBeta,
        TreeSearch::Expectimax,
    ] {
        let decision = MultiAgentSearchAgent::new(tree_value, 3, variant).evaluate(&leaf);
        assert_eq!(decision.value, 7.0);
        assert_eq!(decision.action, None);
    }
}

#[test]
fn max_keeps_the_last_tied_action() {
    // Single-agent tree: three children worth 1, 3, 3.
    let game = TreeGame::build(1, 1, &[3], &[1.0, 3.0, 3.0]);
    let agent = MultiAgentSearchAgent::new(tree_value, 1, TreeSearch::Minimax);
    assert_eq!(agent.action(&game), Some(2));
}

#[test]
fn expectimax_takes_risks_minimax_avoids() {
    // Root max over two chance/min nodes:
    //   action 0 -> {0, 0}       min 0, mean 0
    //   action 1 -> {-1, 9}      min -1, mean 4
    let game = TreeGame::build(2, 2, &[2], &[0.0, 0.0, -1.0, 9.0]);
    let minimax = MultiAgentSearchAgent::new(tree_value, 1, TreeSearch::Minimax);
    let expectimax = MultiAgentSearchAgent::new(tree_value, 1, TreeSearch::Expectimax);
    assert_eq!(minimax.action(&game), Some(0));
    assert_eq!(expectimax.action(&game), Some(1));
    assert_eq!(expectimax.evaluate(&game).value, 4.0);
}

#[test]
fn pursuit_agents_play_small_classic() {
    let layout = Layout::parse(presets::SMALL_CLASSIC).unwrap();
    let start = PursuitState::from_layout(&layout).unwrap();
    assert_eq!(start.ghost_positions().len(), 2);

    let agent = MultiAgentSearchAgent::new(better_evaluation, 1, TreeSearch::AlphaBeta);
    let mut rng = build_rng(Some(3));
    let summary = play_game(&start, &agent, &mut rng, 40);
    assert!(summary.moves <= 40);
    assert!(summary.moves > 0);
}
