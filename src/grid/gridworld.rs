//! The gridworld MDP and an environment that samples it.
//!
//! Cells are open floor, walls, the start cell, or exits carrying a reward.
//! From an exit cell the only action is [`GridAction::Exit`], which pays the
//! exit reward and moves to the absorbing [`GridState::Terminal`]. A move
//! succeeds with probability `1 - noise`; otherwise it slips to one of the
//! two perpendicular directions with `noise / 2` each. Moves into a wall or
//! off the grid leave the agent in place.
//!
//! Text form, top row first, cells separated by whitespace:
//!
//! ```text
//! _ _ _ 1
//! _ # _ -1
//! S _ _ _
//! ```

use std::fmt::{self, Write as _};

use rand::rngs::StdRng;
use tracing::trace;

use crate::{
    Error, Result,
    mdp::MarkovDecisionProcess,
    ports::Environment,
    types::{Direction, Position},
    utils::{build_rng, weighted_sample},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridCell {
    Open,
    Wall,
    Start,
    Exit(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridState {
    Cell(Position),
    Terminal,
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridState::Cell(position) => write!(f, "{position}"),
            GridState::Terminal => f.write_str("TERMINAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridAction {
    Move(Direction),
    Exit,
}

impl fmt::Display for GridAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAction::Move(direction) => write!(f, "{direction}"),
            GridAction::Exit => f.write_str("Exit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    width: usize,
    height: usize,
    cells: Vec<GridCell>,
    start: Position,
    noise: f64,
    living_reward: f64,
}

impl GridWorld {
    pub const DEFAULT_NOISE: f64 = 0.2;

    pub const PRESETS: [&'static str; 4] = ["book", "bridge", "cliff", "discount"];

    /// Parse the text form. Tokens: `_` open, `#` wall, `S` start, a number
    /// for an exit with that reward.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<(usize, Vec<&str>)> = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.split_whitespace().collect::<Vec<_>>()))
            .filter(|(_, tokens)| !tokens.is_empty())
            .collect();
        let Some((_, first)) = rows.first() else {
            return Err(grid_error(1, "grid is empty"));
        };
        let width = first.len();
        let height = rows.len();
        let mut cells = vec![GridCell::Open; width * height];
        let mut start = None;

        for (row, (line, tokens)) in rows.iter().enumerate() {
            if tokens.len() != width {
                return Err(grid_error(
                    *line,
                    format!("expected {width} cells, found {}", tokens.len()),
                ));
            }
            let y = height - 1 - row;
            for (x, token) in tokens.iter().enumerate() {
                let cell = match *token {
                    "_" => GridCell::Open,
                    "#" => GridCell::Wall,
                    "S" => {
                        if start.replace(Position::new(x, y)).is_some() {
                            return Err(grid_error(*line, "more than one start cell"));
                        }
                        GridCell::Start
                    }
                    number => number
                        .parse::<f64>()
                        .map(GridCell::Exit)
                        .map_err(|_| grid_error(*line, format!("unknown cell '{number}'")))?,
                };
                cells[y * width + x] = cell;
            }
        }

        let start = start.ok_or_else(|| grid_error(1, "grid has no start cell 'S'"))?;
        Ok(Self {
            width,
            height,
            cells,
            start,
            noise: Self::DEFAULT_NOISE,
            living_reward: 0.0,
        })
    }

    /// The three-by-four grid from the textbook.
    pub fn book_grid() -> Self {
        Self::from_preset("_ _ _ 1\n_ # _ -1\nS _ _ _")
    }

    /// A narrow bridge between a small and a large exit, flanked by cliffs.
    pub fn bridge_grid() -> Self {
        Self::from_preset(
            "# -100 -100 -100 -100 -100 #\n\
             1 S _ _ _ _ 10\n\
             # -100 -100 -100 -100 -100 #",
        )
    }

    /// A large exit reachable along a cliff edge or by a safer detour.
    pub fn cliff_grid() -> Self {
        Self::from_preset("_ _ _ _ _\nS _ _ _ 10\n-100 -100 -100 -100 -100")
    }

    /// A close +1 exit and a distant +10 exit above a row of -10 cliff
    /// exits. Which one a solver heads for, and whether it hugs the cliff,
    /// depends on the discount, noise and living reward.
    pub fn discount_grid() -> Self {
        Self::from_preset(
            "_ _ _ _ _\n\
             _ # _ _ _\n\
             _ # 1 # 10\n\
             S _ _ _ _\n\
             -10 -10 -10 -10 -10",
        )
    }

    fn from_preset(text: &str) -> Self {
        match Self::parse(text) {
            Ok(grid) => grid,
            Err(err) => unreachable!("built-in grid is malformed: {err}"),
        }
    }

    /// Look up a built-in grid by name.
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "book" => Ok(Self::book_grid()),
            "bridge" => Ok(Self::bridge_grid()),
            "cliff" => Ok(Self::cliff_grid()),
            "discount" => Ok(Self::discount_grid()),
            _ => Err(Error::UnknownName {
                kind: "grid",
                name: name.to_string(),
                expected: Self::PRESETS.join(", "),
            }),
        }
    }

    /// Set the slip probability.
    pub fn with_noise(mut self, noise: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise) {
            return Err(Error::invalid_config(format!(
                "noise must be in [0, 1], got {noise}"
            )));
        }
        self.noise = noise;
        Ok(self)
    }

    /// Reward paid on every non-exit transition.
    pub fn with_living_reward(mut self, living_reward: f64) -> Self {
        self.living_reward = living_reward;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn living_reward(&self) -> f64 {
        self.living_reward
    }

    pub fn cell(&self, position: Position) -> GridCell {
        if position.x >= self.width || position.y >= self.height {
            return GridCell::Wall;
        }
        self.cells[position.y * self.width + position.x]
    }

    fn moved(&self, position: Position, direction: Direction) -> Position {
        match position.step(direction) {
            Some(next) if self.cell(next) != GridCell::Wall => next,
            _ => position,
        }
    }

    /// Render one value per cell, top row first.
    pub fn render_values(&self, value: impl Fn(&GridState) -> f64) -> String {
        self.render(|state| format!("{:>8.2}", value(state)))
    }

    /// Render the chosen action per cell as an arrow, `x` for exits.
    pub fn render_policy(&self, policy: impl Fn(&GridState) -> Option<GridAction>) -> String {
        self.render(|state| {
            let glyph = match policy(state) {
                Some(GridAction::Move(direction)) => direction.arrow(),
                Some(GridAction::Exit) => 'x',
                None => ' ',
            };
            format!("{glyph:>3}")
        })
    }

    fn render(&self, cell_text: impl Fn(&GridState) -> String) -> String {
        let mut out = String::new();
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let position = Position::new(x, y);
                if self.cell(position) == GridCell::Wall {
                    let width = cell_text(&GridState::Cell(position)).len();
                    let _ = write!(out, "{:>width$}", "#");
                } else {
                    out.push_str(&cell_text(&GridState::Cell(position)));
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Solver parameters that steer a preset grid towards one kind of policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicySetting {
    pub name: &'static str,
    pub grid: &'static str,
    pub summary: &'static str,
    pub discount: f64,
    pub noise: f64,
    pub living_reward: f64,
}

pub const POLICY_SETTINGS: [PolicySetting; 6] = [
    PolicySetting {
        name: "bridge-crossing",
        grid: "bridge",
        summary: "cross the bridge to the +10 exit",
        discount: 0.9,
        noise: 0.01,
        living_reward: 0.0,
    },
    PolicySetting {
        name: "close-risky",
        grid: "discount",
        summary: "take the close +1 exit along the cliff",
        discount: 0.9,
        noise: 0.2,
        living_reward: -4.0,
    },
    PolicySetting {
        name: "close-safe",
        grid: "discount",
        summary: "take the close +1 exit around the top",
        discount: 0.7,
        noise: 0.5,
        living_reward: -1.2,
    },
    PolicySetting {
        name: "far-risky",
        grid: "discount",
        summary: "take the distant +10 exit along the cliff",
        discount: 0.9,
        noise: 0.05,
        living_reward: 0.0,
    },
    PolicySetting {
        name: "far-safe",
        grid: "discount",
        summary: "take the distant +10 exit around the top",
        discount: 0.9,
        noise: 0.5,
        living_reward: 0.0,
    },
    PolicySetting {
        name: "avoid-exits",
        grid: "discount",
        summary: "stay away from every exit",
        discount: 0.9,
        noise: 0.2,
        living_reward: 1.0,
    },
];

impl PolicySetting {
    pub fn by_name(name: &str) -> Result<Self> {
        POLICY_SETTINGS
            .iter()
            .find(|setting| setting.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| Error::UnknownName {
                kind: "policy setting",
                name: name.to_string(),
                expected: POLICY_SETTINGS
                    .iter()
                    .map(|setting| setting.name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// The preset grid with this setting's noise and living reward.
    pub fn world(&self) -> Result<GridWorld> {
        Ok(GridWorld::preset(self.grid)?
            .with_noise(self.noise)?
            .with_living_reward(self.living_reward))
    }
}

impl MarkovDecisionProcess for GridWorld {
    type State = GridState;
    type Action = GridAction;

    /// The terminal state, then every non-wall cell bottom row first.
    fn states(&self) -> Vec<GridState> {
        let mut states = vec![GridState::Terminal];
        for y in 0..self.height {
            for x in 0..self.width {
                let position = Position::new(x, y);
                if self.cell(position) != GridCell::Wall {
                    states.push(GridState::Cell(position));
                }
            }
        }
        states
    }

    fn start_state(&self) -> GridState {
        GridState::Cell(self.start)
    }

    fn possible_actions(&self, state: &GridState) -> Vec<GridAction> {
        match state {
            GridState::Terminal => Vec::new(),
            GridState::Cell(position) => match self.cell(*position) {
                GridCell::Exit(_) => vec![GridAction::Exit],
                GridCell::Wall => Vec::new(),
                GridCell::Open | GridCell::Start => Direction::CARDINAL
                    .iter()
                    .map(|&direction| GridAction::Move(direction))
                    .collect(),
            },
        }
    }

    fn transition_states_and_probs(
        &self,
        state: &GridState,
        action: &GridAction,
    ) -> Vec<(GridState, f64)> {
        let GridState::Cell(position) = *state else {
            return Vec::new();
        };
        let direction = match *action {
            GridAction::Exit => return vec![(GridState::Terminal, 1.0)],
            GridAction::Move(direction) => direction,
        };

        let [left, right] = direction.perpendicular();
        let outcomes = [
            (direction, 1.0 - self.noise),
            (left, self.noise / 2.0),
            (right, self.noise / 2.0),
        ];
        let mut transitions: Vec<(GridState, f64)> = Vec::with_capacity(3);
        for (heading, probability) in outcomes {
            if probability <= 0.0 {
                continue;
            }
            let next = GridState::Cell(self.moved(position, heading));
            match transitions.iter_mut().find(|(state, _)| *state == next) {
                Some((_, total)) => *total += probability,
                None => transitions.push((next, probability)),
            }
        }
        transitions
    }

    fn reward(&self, state: &GridState, _action: &GridAction, _next_state: &GridState) -> f64 {
        match state {
            GridState::Terminal => 0.0,
            GridState::Cell(position) => match self.cell(*position) {
                GridCell::Exit(reward) => reward,
                _ => self.living_reward,
            },
        }
    }

    fn is_terminal(&self, state: &GridState) -> bool {
        *state == GridState::Terminal
    }
}

/// Episodic environment sampling transitions of a [`GridWorld`].
pub struct GridWorldEnv {
    world: GridWorld,
    state: GridState,
    rng: StdRng,
}

impl GridWorldEnv {
    pub fn new(world: GridWorld, seed: Option<u64>) -> Self {
        let state = world.start_state();
        Self {
            world,
            state,
            rng: build_rng(seed),
        }
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }
}

impl Environment for GridWorldEnv {
    type State = GridState;
    type Action = GridAction;

    fn reset(&mut self) {
        self.state = self.world.start_state();
    }

    fn current_state(&self) -> GridState {
        self.state
    }

    fn legal_actions(&self, state: &GridState) -> Vec<GridAction> {
        self.world.possible_actions(state)
    }

    fn step(&mut self, action: &GridAction) -> Result<(GridState, f64)> {
        let transitions = self.world.transition_states_and_probs(&self.state, action);
        let next = weighted_sample(&mut self.rng, &transitions).ok_or_else(|| {
            Error::NoLegalActions {
                state: self.state.to_string(),
            }
        })?;
        let reward = self.world.reward(&self.state, action, &next);
        trace!(from = %self.state, %action, to = %next, reward, "gridworld step");
        self.state = next;
        Ok((next, reward))
    }

    fn is_terminal(&self) -> bool {
        self.world.is_terminal(&self.state)
    }
}

fn grid_error(line: usize, message: impl Into<String>) -> Error {
    Error::InvalidLayout {
        line,
        message: message.into(),
    }
}
