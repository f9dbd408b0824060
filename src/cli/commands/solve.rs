//! Solve command - Value iteration on a gridworld

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::output::{print_json, print_kv, print_section, print_subsection},
    config::{GridmindConfig, SolverConfig},
    grid::{GridWorld, PolicySetting},
    mdp::{MarkovDecisionProcess, ValueIterationAgent},
};

#[derive(Parser, Debug)]
#[command(about = "Solve a gridworld with value iteration", allow_negative_numbers = true)]
pub struct SolveArgs {
    /// Gridworld preset: book, bridge, cliff or discount
    #[arg(long, short = 'g', default_value = "book")]
    pub grid: String,

    /// Named grid and parameter choice, e.g. close-risky or far-safe
    #[arg(
        long,
        short = 's',
        conflicts_with_all = ["grid", "discount", "noise", "living_reward"]
    )]
    pub setting: Option<String>,

    /// Discount factor (defaults to the config file)
    #[arg(long, short = 'd')]
    pub discount: Option<f64>,

    /// Probability of slipping to a perpendicular direction
    #[arg(long, short = 'n', default_value_t = GridWorld::DEFAULT_NOISE)]
    pub noise: f64,

    /// Reward of every non-exit step
    #[arg(long, short = 'r', default_value_t = 0.0)]
    pub living_reward: f64,

    /// Number of sweeps (defaults to the config file)
    #[arg(long, short = 'i')]
    pub iterations: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    grid: String,
    discount: f64,
    iterations: usize,
    start_value: f64,
    values: BTreeMap<String, f64>,
    policy: BTreeMap<String, String>,
}

pub fn execute(args: SolveArgs, config: &GridmindConfig) -> Result<()> {
    let iterations = args.iterations.unwrap_or(config.solver.iterations);
    let (grid, solver, world) = match &args.setting {
        Some(name) => {
            let setting = PolicySetting::by_name(name)?;
            let solver = SolverConfig {
                discount: setting.discount,
                iterations,
            };
            (setting.grid.to_string(), solver, setting.world()?)
        }
        None => {
            let solver = SolverConfig {
                discount: args.discount.unwrap_or(config.solver.discount),
                iterations,
            };
            let world = GridWorld::preset(&args.grid)?
                .with_noise(args.noise)?
                .with_living_reward(args.living_reward);
            (args.grid, solver, world)
        }
    };
    let agent = ValueIterationAgent::from_config(world, &solver)
        .context("invalid value iteration settings")?;
    let world = agent.mdp();
    let start = world.start_state();

    if args.json {
        let states = world.states();
        let report = SolveReport {
            grid,
            discount: solver.discount,
            iterations: agent.iterations_run(),
            start_value: agent.value(&start),
            values: states
                .iter()
                .map(|state| (state.to_string(), agent.value(state)))
                .collect(),
            policy: states
                .iter()
                .filter_map(|state| {
                    let action = agent.policy(state)?;
                    Some((state.to_string(), action.to_string()))
                })
                .collect(),
        };
        return print_json(&report);
    }

    print_section("Value Iteration");
    print_kv("Grid", &grid);
    if let Some(name) = &args.setting {
        print_kv("Setting", name);
    }
    print_kv("Discount", &solver.discount.to_string());
    print_kv("Noise", &world.noise().to_string());
    print_kv("Living reward", &world.living_reward().to_string());
    print_kv("Iterations", &agent.iterations_run().to_string());
    print_kv("Start value", &format!("{:.4}", agent.value(&start)));

    print_subsection("Values");
    print!("{}", world.render_values(|state| agent.value(state)));
    print_subsection("Policy");
    print!("{}", world.render_policy(|state| agent.policy(state)));
    Ok(())
}
