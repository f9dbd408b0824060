//! Learn command - Train a Q-learning agent on a gridworld

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_section, print_subsection},
    config::{AgentParams, GridmindConfig},
    grid::{GridAction, GridState, GridWorld, GridWorldEnv},
    mdp::MarkovDecisionProcess,
    pipeline::{
        JsonlObserver, LearningAgent, MetricsObserver, ProgressObserver, TrainingConfig,
        TrainingPipeline,
    },
    q_learning::{ApproximateQAgent, IdentityExtractor, QLearningAgent},
};

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent on a gridworld", allow_negative_numbers = true)]
pub struct LearnArgs {
    /// Gridworld preset: book, bridge, cliff or discount
    #[arg(long, short = 'g', default_value = "book")]
    pub grid: String,

    /// Probability of slipping to a perpendicular direction
    #[arg(long, short = 'n', default_value_t = GridWorld::DEFAULT_NOISE)]
    pub noise: f64,

    /// Reward of every non-exit step
    #[arg(long, short = 'r', default_value_t = 0.0)]
    pub living_reward: f64,

    /// Number of episodes to run
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Episodes spent learning before the agent only exploits
    /// (defaults to the config file, then to every episode)
    #[arg(long)]
    pub training: Option<usize>,

    /// Learning rate (defaults to the config file)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Exploration probability (defaults to the config file)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Discount factor (defaults to the config file)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Step cap per episode
    #[arg(long, default_value_t = 1000)]
    pub max_steps: usize,

    /// Learn a linear function over one-hot state-action features
    #[arg(long)]
    pub approximate: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Write per-episode rewards as JSON Lines
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Save the training result as JSON
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,
}

impl LearnArgs {
    fn agent_params(&self, config: &GridmindConfig) -> Result<AgentParams> {
        let defaults = &config.learning;
        let configured_training = (defaults.num_training > 0).then_some(defaults.num_training);
        let params = AgentParams {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            discount: self.discount.unwrap_or(defaults.discount),
            epsilon: self.epsilon.unwrap_or(defaults.epsilon),
            num_training: self
                .training
                .or(configured_training)
                .unwrap_or(self.episodes),
            seed: self.seed.or(defaults.seed),
        };
        params.validate().context("invalid learning parameters")?;
        Ok(params)
    }
}

type GridAgent = Box<dyn LearningAgent<GridState, GridAction>>;

fn build_agent(world: &GridWorld, params: AgentParams, approximate: bool) -> Result<GridAgent> {
    let actions = world.clone();
    let legal = move |state: &GridState| actions.possible_actions(state);
    let agent: GridAgent = if approximate {
        Box::new(ApproximateQAgent::new(params, IdentityExtractor, legal)?)
    } else {
        Box::new(QLearningAgent::new(params, legal)?)
    };
    Ok(agent)
}

pub fn execute(args: LearnArgs, config: &GridmindConfig) -> Result<()> {
    let params = args.agent_params(config)?;
    let world = GridWorld::preset(&args.grid)?
        .with_noise(args.noise)?
        .with_living_reward(args.living_reward);
    let mut agent = build_agent(&world, params.clone(), args.approximate)?;
    let mut env = GridWorldEnv::new(world.clone(), params.seed);

    print_section("Q-Learning");
    print_kv("Agent", agent.name());
    print_kv("Grid", &args.grid);
    print_kv("Episodes", &args.episodes.to_string());
    print_kv("Training episodes", &params.num_training.to_string());
    print_kv("Alpha", &params.alpha.to_string());
    print_kv("Epsilon", &params.epsilon.to_string());
    print_kv("Discount", &params.discount.to_string());
    if let Some(seed) = params.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut metrics = MetricsObserver::new();
    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        episodes: args.episodes,
        max_steps: args.max_steps,
    });
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.trace {
        pipeline = pipeline.with_observer(Box::new(JsonlObserver::new(path)?));
    }
    pipeline = pipeline.with_observer(Box::new(&mut metrics));
    let result = pipeline.run(&mut env, agent.as_mut())?;
    drop(pipeline);

    let summary = metrics.summary();
    print_subsection("Results");
    print_kv("Episodes run", &result.episodes.to_string());
    print_kv("Avg training return", &format!("{:.4}", result.average_training_return()));
    print_kv("Avg test return", &format!("{:.4}", result.average_test_return()));
    print_kv("Avg episode length", &format!("{:.2}", summary.avg_episode_length));
    if result.truncated > 0 {
        print_kv("Truncated episodes", &result.truncated.to_string());
    }

    print_subsection("Learned values");
    print!("{}", world.render_values(|state| agent.value(state)));
    print_subsection("Greedy policy");
    print!("{}", world.render_policy(|state| agent.policy(state)));

    if let Some(path) = &args.output {
        result
            .save(path)
            .with_context(|| format!("failed to save result to {}", path.display()))?;
        println!("\nResult saved to: {}", path.display());
    }
    Ok(())
}
