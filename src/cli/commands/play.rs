//! Play command - Tree search or reflex play on a pursuit layout

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::{
    adversarial::{MultiAgentSearchAgent, TreeSearch},
    cli::{
        config::load_layout,
        output::{format_number, print_kv, print_section},
    },
    config::GridmindConfig,
    grid::{
        GameSummary, PursuitState, ReflexAgent, better_evaluation, play_game, reflex_evaluation,
        score_evaluation,
    },
    utils::build_rng,
};

/// Evaluation function applied at the search horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Evaluation {
    /// The game score alone
    Score,
    /// Score adjusted for food and ghost distances
    Better,
}

#[derive(Parser, Debug)]
#[command(about = "Choose moves in a pursuit game with tree search or a reflex agent")]
pub struct PlayArgs {
    /// Preset layout name or path to a layout file
    #[arg(long, short = 'l', default_value = "smallClassic")]
    pub layout: String,

    /// Tree search: minimax, alphabeta or expectimax (defaults to the config file)
    #[arg(long, short = 'a')]
    pub agent: Option<TreeSearch>,

    /// Use a one-ply reflex agent instead of tree search
    #[arg(long, conflicts_with_all = ["agent", "depth", "evaluation"])]
    pub reflex: bool,

    /// Full rounds searched below the root (defaults to the config file)
    #[arg(long, short = 'd')]
    pub depth: Option<usize>,

    /// Evaluation function at the horizon
    #[arg(long, value_enum, default_value_t = Evaluation::Better)]
    pub evaluation: Evaluation,

    /// Play a whole game against randomly moving ghosts
    #[arg(long)]
    pub game: bool,

    /// Move limit for `--game`
    #[arg(long, default_value_t = 500)]
    pub max_moves: usize,

    /// Random seed for the ghosts
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs, config: &GridmindConfig) -> Result<()> {
    let layout = load_layout(&args.layout)?;
    let start = PursuitState::from_layout(&layout)?;
    if args.reflex {
        return play_reflex(&args, &start, config);
    }
    let variant = args.agent.unwrap_or(config.tree.variant);
    let depth = args.depth.unwrap_or(config.tree.depth);
    let evaluation: fn(&PursuitState) -> f64 = match args.evaluation {
        Evaluation::Score => score_evaluation,
        Evaluation::Better => better_evaluation,
    };
    let agent = MultiAgentSearchAgent::new(evaluation, depth, variant);

    print_section("Tree Search");
    print_kv("Layout", &args.layout);
    print_kv("Agent", variant.name());
    print_kv("Depth", &depth.to_string());
    println!("\n{start}");

    if args.game {
        let mut rng = build_rng(args.seed.or(config.learning.seed));
        print_summary(&play_game(&start, &agent, &mut rng, args.max_moves));
        return Ok(());
    }

    let decision = agent.evaluate(&start);
    println!();
    match &decision.action {
        Some(action) => print_kv("Action", &action.to_string()),
        None => print_kv("Action", "none (terminal)"),
    }
    print_kv("Value", &decision.value.to_string());
    print_kv("Nodes visited", &format_number(agent.nodes_visited()));
    Ok(())
}

fn play_reflex(args: &PlayArgs, start: &PursuitState, config: &GridmindConfig) -> Result<()> {
    let agent = ReflexAgent::new(reflex_evaluation);
    let mut rng = build_rng(args.seed.or(config.learning.seed));

    print_section("Reflex Agent");
    print_kv("Layout", &args.layout);
    println!("\n{start}");

    if args.game {
        print_summary(&play_game(start, &agent, &mut rng, args.max_moves));
        return Ok(());
    }

    println!();
    let best = agent.best_actions(start);
    let best: Vec<String> = best.iter().map(ToString::to_string).collect();
    if best.is_empty() {
        print_kv("Best actions", "none (terminal)");
    } else {
        print_kv("Best actions", &best.join(", "));
    }
    Ok(())
}

fn print_summary(summary: &GameSummary) {
    println!();
    print_kv("Outcome", if summary.won { "win" } else { "no win" });
    print_kv("Score", &summary.score.to_string());
    print_kv("Moves", &summary.moves.to_string());
}
