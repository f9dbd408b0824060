//! A small turn-based chase on a maze layout.
//!
//! Agent 0 eats food; every other agent is a ghost. Each move of agent 0
//! costs a point, food is worth [`FOOD_POINTS`], clearing the board adds
//! [`WIN_POINTS`] and being caught subtracts [`LOSE_PENALTY`].

use std::{collections::BTreeSet, fmt, rc::Rc};

use rand::{Rng, seq::IndexedRandom};
use tracing::{debug, info};

use super::layout::Layout;
use crate::{
    Result,
    adversarial::{GameState, MultiAgentSearchAgent},
    types::{Direction, Position, manhattan},
};

pub const TIME_PENALTY: f64 = 1.0;
pub const FOOD_POINTS: f64 = 10.0;
pub const WIN_POINTS: f64 = 500.0;
pub const LOSE_PENALTY: f64 = 500.0;
/// Deducted by [`reflex_evaluation`] from standing still.
pub const STOP_PENALTY: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Lose,
}

/// Immutable game snapshot; successors share the maze.
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitState {
    maze: Rc<Layout>,
    agent: Position,
    ghosts: Vec<Position>,
    food: BTreeSet<Position>,
    score: f64,
    outcome: Option<Outcome>,
}

impl PursuitState {
    /// Initial state with agents and food where the layout puts them.
    pub fn from_layout(layout: &Layout) -> Result<Self> {
        let agent = layout.require_agent_start()?;
        Ok(Self {
            maze: Rc::new(layout.clone()),
            agent,
            ghosts: layout.ghost_starts().to_vec(),
            food: layout.food().clone(),
            score: 0.0,
            outcome: None,
        })
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn agent_position(&self) -> Position {
        self.agent
    }

    pub fn ghost_positions(&self) -> &[Position] {
        &self.ghosts
    }

    pub fn food(&self) -> &BTreeSet<Position> {
        &self.food
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    fn caught(&self) -> bool {
        self.ghosts.contains(&self.agent)
    }

    fn lose(&mut self) {
        self.score -= LOSE_PENALTY;
        self.outcome = Some(Outcome::Lose);
    }
}

impl GameState for PursuitState {
    type Action = Direction;

    fn num_agents(&self) -> usize {
        1 + self.ghosts.len()
    }

    /// Open directions for `agent`; agent 0 may also stop. Ghosts that are
    /// boxed in can only stop. Empty once the game is over.
    fn legal_actions(&self, agent: usize) -> Vec<Direction> {
        if self.is_over() {
            return Vec::new();
        }
        let position = if agent == 0 {
            self.agent
        } else {
            match self.ghosts.get(agent - 1) {
                Some(ghost) => *ghost,
                None => return Vec::new(),
            }
        };
        let mut actions: Vec<Direction> = self
            .maze
            .neighbors(position)
            .into_iter()
            .map(|(direction, _)| direction)
            .collect();
        if agent == 0 || actions.is_empty() {
            actions.push(Direction::Stop);
        }
        actions
    }

    fn generate_successor(&self, agent: usize, action: &Direction) -> Self {
        let mut next = self.clone();
        if next.is_over() {
            return next;
        }
        let step = |from: Position| {
            from.step(*action)
                .filter(|cell| !self.maze.is_wall(*cell))
                .unwrap_or(from)
        };

        if agent == 0 {
            next.score -= TIME_PENALTY;
            next.agent = step(self.agent);
            if next.caught() {
                next.lose();
                return next;
            }
            if next.food.remove(&next.agent) {
                next.score += FOOD_POINTS;
                if next.food.is_empty() {
                    next.score += WIN_POINTS;
                    next.outcome = Some(Outcome::Win);
                }
            }
        } else if let Some(ghost) = next.ghosts.get_mut(agent - 1) {
            *ghost = step(*ghost);
            if next.caught() {
                next.lose();
            }
        }
        next
    }

    fn is_win(&self) -> bool {
        self.outcome == Some(Outcome::Win)
    }

    fn is_lose(&self) -> bool {
        self.outcome == Some(Outcome::Lose)
    }
}

impl fmt::Display for PursuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.maze.height()).rev() {
            for x in 0..self.maze.width() {
                let position = Position::new(x, y);
                let glyph = if self.maze.is_wall(position) {
                    '%'
                } else if self.ghosts.contains(&position) {
                    'G'
                } else if self.agent == position {
                    'P'
                } else if self.food.contains(&position) {
                    '.'
                } else {
                    ' '
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        write!(f, "score: {}", self.score)
    }
}

/// The game score alone.
pub fn score_evaluation(state: &PursuitState) -> f64 {
    state.score()
}

/// Score adjusted for the remaining food, the nearest pellet and the
/// nearest ghost.
///
/// A ghost on the agent's cell is the worst outcome and a cleared board the
/// best; both are decided before any distance appears in a denominator.
pub fn better_evaluation(state: &PursuitState) -> f64 {
    let agent = state.agent_position();
    let nearest_ghost = state
        .ghost_positions()
        .iter()
        .map(|&ghost| manhattan(agent, ghost))
        .min();
    if nearest_ghost == Some(0) {
        return f64::NEG_INFINITY;
    }
    let Some(nearest_food) = state.food().iter().map(|&food| manhattan(agent, food)).min() else {
        return f64::INFINITY;
    };

    let ghost_term = nearest_ghost.map_or(0.0, |distance| 7.8 / distance as f64);
    state.score() - 3.9 * state.food().len() as f64 - ghost_term - 1.3 * nearest_food as f64
}

/// Scores one move of agent 0 by the state it leads to.
///
/// Stepping next to a ghost is the worst move and clearing the board the
/// best. Otherwise the score rewards a close nearest pellet, a ghost far from
/// that pellet, and movement over standing still.
pub fn reflex_evaluation(state: &PursuitState, action: Direction) -> f64 {
    let next = state.generate_successor(0, &action);
    let agent = next.agent_position();
    if next
        .ghost_positions()
        .iter()
        .any(|&ghost| manhattan(agent, ghost) < 2)
    {
        return f64::NEG_INFINITY;
    }
    let Some(&nearest_food) = next.food().iter().min_by_key(|&&food| manhattan(agent, food)) else {
        return f64::INFINITY;
    };

    let ghost_to_food = next
        .ghost_positions()
        .iter()
        .map(|&ghost| manhattan(nearest_food, ghost))
        .min()
        .map_or(0.0, |distance| distance as f64);
    let stop = if action == Direction::Stop {
        STOP_PENALTY
    } else {
        0.0
    };
    next.score() + ghost_to_food + 1.0 / manhattan(agent, nearest_food) as f64 - stop
}

/// Chooses agent 0's moves in [`play_game`].
pub trait PursuitPolicy {
    fn choose<R: Rng>(&self, state: &PursuitState, rng: &mut R) -> Option<Direction>;
}

impl<F> PursuitPolicy for MultiAgentSearchAgent<F>
where
    F: Fn(&PursuitState) -> f64,
{
    fn choose<R: Rng>(&self, state: &PursuitState, _rng: &mut R) -> Option<Direction> {
        self.action(state)
    }
}

/// One-ply agent: scores every legal move with `evaluation` and picks
/// uniformly among the best.
pub struct ReflexAgent<F> {
    evaluation: F,
}

impl<F> ReflexAgent<F>
where
    F: Fn(&PursuitState, Direction) -> f64,
{
    pub fn new(evaluation: F) -> Self {
        Self { evaluation }
    }

    /// Legal moves of agent 0 sharing the highest score, in legal order.
    pub fn best_actions(&self, state: &PursuitState) -> Vec<Direction> {
        let scored: Vec<(Direction, f64)> = state
            .legal_actions(0)
            .into_iter()
            .map(|action| (action, (self.evaluation)(state, action)))
            .collect();
        let best = scored
            .iter()
            .map(|&(_, score)| score)
            .fold(f64::NEG_INFINITY, f64::max);
        scored
            .into_iter()
            .filter(|&(_, score)| score == best)
            .map(|(action, _)| action)
            .collect()
    }
}

impl<F> PursuitPolicy for ReflexAgent<F>
where
    F: Fn(&PursuitState, Direction) -> f64,
{
    fn choose<R: Rng>(&self, state: &PursuitState, rng: &mut R) -> Option<Direction> {
        self.best_actions(state).choose(rng).copied()
    }
}

/// Result of one game played by [`play_game`].
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub score: f64,
    pub won: bool,
    pub moves: usize,
}

/// Play one game: agent 0 follows `policy`, ghosts move uniformly at random.
///
/// Stops when the game ends or after `max_moves` moves of agent 0.
pub fn play_game<P, R>(
    start: &PursuitState,
    policy: &P,
    rng: &mut R,
    max_moves: usize,
) -> GameSummary
where
    P: PursuitPolicy,
    R: Rng,
{
    let mut state = start.clone();
    let mut moves = 0;
    'game: while moves < max_moves && !state.is_over() {
        let action = policy.choose(&state, rng).unwrap_or(Direction::Stop);
        state = state.generate_successor(0, &action);
        moves += 1;
        debug!(moves, %action, score = state.score(), "agent moved");

        for ghost in 1..state.num_agents() {
            if state.is_over() {
                break 'game;
            }
            let legal = state.legal_actions(ghost);
            if let Some(action) = legal.choose(rng) {
                state = state.generate_successor(ghost, action);
            }
        }
    }

    let summary = GameSummary {
        score: state.score(),
        won: state.is_win(),
        moves,
    };
    info!(
        score = summary.score,
        won = summary.won,
        moves = summary.moves,
        "game over"
    );
    summary
}
