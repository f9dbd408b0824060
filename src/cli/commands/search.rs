//! Search command - Find paths through maze layouts

use std::fmt;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    cli::{
        config::{load_layout, parse_position},
        output::{format_number, print_json, print_kv, print_section},
    },
    config::GridmindConfig,
    grid::{
        AnyFoodSearchProblem, CornersProblem, CornersState, FoodSearchProblem, FoodState,
        PositionSearchProblem, closest_dot_path, corners_heuristic, food_heuristic,
        manhattan_heuristic,
    },
    search::{Algorithm, SearchProblem, SearchStats, null_heuristic, search_with_stats},
    types::Position,
};

/// Which search problem to pose on the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProblemKind {
    /// Reach the `--goal` cell
    Position,
    /// Touch all four corners
    Corners,
    /// Eat every pellet
    Food,
    /// Reach the nearest pellet
    AnyFood,
    /// Eat every pellet by always heading to the closest one
    ClosestDot,
}

impl ProblemKind {
    fn name(self) -> &'static str {
        match self {
            ProblemKind::Position => "position",
            ProblemKind::Corners => "corners",
            ProblemKind::Food => "food",
            ProblemKind::AnyFood => "any-food",
            ProblemKind::ClosestDot => "closest-dot",
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Find a path through a maze layout")]
pub struct SearchArgs {
    /// Preset layout name or path to a layout file
    #[arg(long, short = 'l', default_value = "tinyMaze")]
    pub layout: String,

    /// Problem to solve on the layout
    #[arg(long, short = 'p', value_enum, default_value_t = ProblemKind::Position)]
    pub problem: ProblemKind,

    /// Search algorithm: dfs, bfs, ucs or astar (defaults to the config file)
    #[arg(long, short = 'a')]
    pub algorithm: Option<Algorithm>,

    /// Goal cell of the position problem, as `x,y`
    #[arg(long, value_parser = parse_position, default_value = "1,1")]
    pub goal: Position,

    /// Run A* with the null heuristic instead of the problem's own
    #[arg(long)]
    pub no_heuristic: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SearchReport {
    layout: String,
    problem: &'static str,
    algorithm: Option<Algorithm>,
    path_length: usize,
    cost: f64,
    stats: Option<SearchStats>,
    actions: Vec<String>,
}

struct Found {
    actions: Vec<String>,
    cost: f64,
    stats: SearchStats,
}

fn solve<P, H>(problem: &P, algorithm: Algorithm, heuristic: &H) -> Result<Found>
where
    P: SearchProblem,
    P::Action: fmt::Display,
    H: Fn(&P::State, &P) -> f64,
{
    let outcome = search_with_stats(algorithm, problem, heuristic)
        .with_context(|| format!("{algorithm} found no path"))?;
    Ok(Found {
        cost: problem.actions_cost(&outcome.actions),
        actions: outcome.actions.iter().map(ToString::to_string).collect(),
        stats: outcome.stats,
    })
}

pub fn execute(args: SearchArgs, config: &GridmindConfig) -> Result<()> {
    let layout = load_layout(&args.layout)?;
    let algorithm = args.algorithm.unwrap_or(config.search.algorithm);

    let found = match args.problem {
        ProblemKind::Position => {
            let problem = PositionSearchProblem::to_goal(&layout, args.goal)?;
            if args.no_heuristic {
                solve(&problem, algorithm, &null_heuristic::<Position, _>)?
            } else {
                solve(&problem, algorithm, &manhattan_heuristic)?
            }
        }
        ProblemKind::Corners => {
            let problem = CornersProblem::new(&layout)?;
            if args.no_heuristic {
                solve(&problem, algorithm, &null_heuristic::<CornersState, _>)?
            } else {
                solve(&problem, algorithm, &corners_heuristic)?
            }
        }
        ProblemKind::Food => {
            let problem = FoodSearchProblem::new(&layout)?;
            if args.no_heuristic {
                solve(&problem, algorithm, &null_heuristic::<FoodState, _>)?
            } else {
                solve(&problem, algorithm, &food_heuristic)?
            }
        }
        ProblemKind::AnyFood => {
            let problem = AnyFoodSearchProblem::from_layout(&layout)?;
            solve(&problem, algorithm, &null_heuristic::<Position, _>)?
        }
        ProblemKind::ClosestDot => {
            let path = closest_dot_path(&layout)?;
            return report(
                &args,
                SearchReport {
                    layout: args.layout.clone(),
                    problem: args.problem.name(),
                    algorithm: None,
                    path_length: path.len(),
                    cost: path.len() as f64,
                    stats: None,
                    actions: path.iter().map(ToString::to_string).collect(),
                },
            );
        }
    };

    report(
        &args,
        SearchReport {
            layout: args.layout.clone(),
            problem: args.problem.name(),
            algorithm: Some(algorithm),
            path_length: found.actions.len(),
            cost: found.cost,
            stats: Some(found.stats),
            actions: found.actions,
        },
    )
}

fn report(args: &SearchArgs, report: SearchReport) -> Result<()> {
    if args.json {
        return print_json(&report);
    }

    print_section("Search Result");
    print_kv("Layout", &report.layout);
    print_kv("Problem", report.problem);
    if let Some(algorithm) = report.algorithm {
        print_kv("Algorithm", algorithm.name());
    }
    print_kv("Path length", &report.path_length.to_string());
    print_kv("Cost", &report.cost.to_string());
    if let Some(stats) = report.stats {
        print_kv("Expanded", &format_number(stats.expanded));
        print_kv("Pushed", &format_number(stats.pushed));
        print_kv("Max frontier", &format_number(stats.max_frontier));
    }
    println!("\n{}", report.actions.join(" "));
    Ok(())
}
