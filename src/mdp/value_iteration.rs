//! Value iteration over a finite MDP.

use std::collections::HashMap;

use tracing::debug;

use super::process::MarkovDecisionProcess;
use crate::{Error, Result, config::SolverConfig, ports::ValueEstimator};

/// Agent whose values come from a fixed number of value-iteration sweeps.
///
/// All sweeps run in the constructor; afterwards the value table is frozen
/// and [`ValueIterationAgent::q_value`] and [`ValueIterationAgent::policy`]
/// are recomputed from it on demand.
pub struct ValueIterationAgent<M: MarkovDecisionProcess> {
    mdp: M,
    discount: f64,
    values: HashMap<M::State, f64>,
    iterations_run: usize,
}

impl<M: MarkovDecisionProcess> ValueIterationAgent<M> {
    /// Run `iterations` sweeps of value iteration on `mdp`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `discount` is outside `[0, 1]`.
    pub fn new(mdp: M, discount: f64, iterations: usize) -> Result<Self> {
        let mut agent = Self::unsolved(mdp, discount)?;
        for _ in 0..iterations {
            agent.sweep();
        }
        Ok(agent)
    }

    /// Solve with the discount and iteration count from `config`.
    pub fn from_config(mdp: M, config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        Self::new(mdp, config.discount, config.iterations)
    }

    /// Sweep until the largest per-state change drops below `tolerance`, or
    /// `max_iterations` sweeps have run.
    pub fn until_converged(
        mdp: M,
        discount: f64,
        tolerance: f64,
        max_iterations: usize,
    ) -> Result<Self> {
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(Error::invalid_config(format!(
                "tolerance must be positive, got {tolerance}"
            )));
        }
        let mut agent = Self::unsolved(mdp, discount)?;
        while agent.iterations_run < max_iterations {
            if agent.sweep() < tolerance {
                break;
            }
        }
        Ok(agent)
    }

    fn unsolved(mdp: M, discount: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&discount) {
            return Err(Error::invalid_config(format!(
                "discount must be in [0, 1], got {discount}"
            )));
        }
        let values = mdp
            .states()
            .into_iter()
            .filter(|state| mdp.is_terminal(state))
            .map(|state| (state, 0.0))
            .collect();
        Ok(Self {
            mdp,
            discount,
            values,
            iterations_run: 0,
        })
    }

    /// One synchronous Bellman backup. Returns the largest change of any state.
    fn sweep(&mut self) -> f64 {
        let mut next_values = HashMap::with_capacity(self.values.len());
        let mut max_delta: f64 = 0.0;

        for state in self.mdp.states() {
            let new_value = if self.mdp.is_terminal(&state) {
                0.0
            } else {
                self.mdp
                    .possible_actions(&state)
                    .iter()
                    .map(|action| self.q_value(&state, action))
                    .reduce(f64::max)
                    .unwrap_or(0.0)
            };
            max_delta = max_delta.max((new_value - self.value(&state)).abs());
            next_values.insert(state, new_value);
        }

        self.values = next_values;
        self.iterations_run += 1;
        debug!(
            iteration = self.iterations_run,
            max_delta, "value iteration sweep"
        );
        max_delta
    }

    /// Value of `state` after the sweeps run so far; 0 for unknown states.
    pub fn value(&self, state: &M::State) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    /// Expected discounted return of taking `action` in `state` and then
    /// following the frozen values.
    pub fn q_value(&self, state: &M::State, action: &M::Action) -> f64 {
        self.mdp
            .transition_states_and_probs(state, action)
            .iter()
            .map(|(next_state, probability)| {
                probability
                    * (self.mdp.reward(state, action, next_state)
                        + self.discount * self.value(next_state))
            })
            .sum()
    }

    /// First action attaining the maximum Q-value, or `None` without actions.
    pub fn policy(&self, state: &M::State) -> Option<M::Action> {
        let mut best: Option<(M::Action, f64)> = None;
        for action in self.mdp.possible_actions(state) {
            let q = self.q_value(state, &action);
            if best.as_ref().is_none_or(|(_, best_q)| q > *best_q) {
                best = Some((action, q));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Same as [`ValueIterationAgent::policy`]; value iteration never explores.
    pub fn action(&self, state: &M::State) -> Option<M::Action> {
        self.policy(state)
    }

    pub fn values(&self) -> &HashMap<M::State, f64> {
        &self.values
    }

    pub fn iterations_run(&self) -> usize {
        self.iterations_run
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn mdp(&self) -> &M {
        &self.mdp
    }
}

impl<M: MarkovDecisionProcess> ValueEstimator<M::State, M::Action> for ValueIterationAgent<M> {
    fn value(&self, state: &M::State) -> f64 {
        ValueIterationAgent::value(self, state)
    }

    fn q_value(&self, state: &M::State, action: &M::Action) -> f64 {
        ValueIterationAgent::q_value(self, state, action)
    }

    fn policy(&self, state: &M::State) -> Option<M::Action> {
        ValueIterationAgent::policy(self, state)
    }
}
