//! Q-table implementation for temporal difference learning

use std::{collections::HashMap, hash::Hash};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Unseen pairs read as 0.0.
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    /// Q-values: state -> action -> Q-value
    q_values: HashMap<S, HashMap<A, f64>>,
}

impl<S, A> Default for QTable<S, A> {
    fn default() -> Self {
        Self {
            q_values: HashMap::new(),
        }
    }
}

impl<S: Eq + Hash, A: Eq + Hash + Clone> QTable<S, A> {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &S, action: &A) -> f64 {
        self.q_values
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: S, action: A, value: f64) {
        self.q_values.entry(state).or_default().insert(action, value);
    }

    /// Maximum Q-value over legal actions, 0.0 when there are none
    pub fn max_q(&self, state: &S, legal_actions: &[A]) -> f64 {
        max_value(legal_actions, |action| self.get(state, action))
    }

    /// First legal action with the strictly highest Q-value
    pub fn greedy_action(&self, state: &S, legal_actions: &[A]) -> Option<A> {
        argmax_first(legal_actions, |action| self.get(state, action))
    }

    /// Reset all Q-values
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Get total number of Q-values stored
    pub fn len(&self) -> usize {
        self.q_values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `max` of `q` over `actions`, or 0.0 for an empty slice.
pub(crate) fn max_value<A>(actions: &[A], q: impl Fn(&A) -> f64) -> f64 {
    actions.iter().map(q).reduce(f64::max).unwrap_or(0.0)
}

/// First action attaining the strict maximum of `q`.
pub(crate) fn argmax_first<A: Clone>(actions: &[A], q: impl Fn(&A) -> f64) -> Option<A> {
    let mut best: Option<(&A, f64)> = None;
    for action in actions {
        let value = q(action);
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((action, value));
        }
    }
    best.map(|(action, _)| action.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable: QTable<&str, usize> = QTable::new();
        assert_eq!(qtable.get(&"s0", &0), 0.0);
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        qtable.set("s0", 4, 1.5);
        assert_eq!(qtable.get(&"s0", &4), 1.5);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new();
        qtable.set("s0", 0, 0.5);
        qtable.set("s0", 1, 1.5);
        qtable.set("s0", 2, 0.8);

        assert_eq!(qtable.max_q(&"s0", &[0, 1, 2]), 1.5);
        assert_eq!(qtable.max_q(&"s0", &[]), 0.0);
    }

    #[test]
    fn test_max_q_all_negative() {
        let mut qtable = QTable::new();
        qtable.set("s0", 0, -2.0);
        qtable.set("s0", 1, -1.0);
        assert_eq!(qtable.max_q(&"s0", &[0, 1]), -1.0);
    }

    #[test]
    fn test_greedy_action_keeps_first_tie() {
        let mut qtable = QTable::new();
        qtable.set("s0", 0, 0.5);
        qtable.set("s0", 1, 1.5);
        qtable.set("s0", 2, 1.5);

        assert_eq!(qtable.greedy_action(&"s0", &[0, 1, 2]), Some(1));
        assert_eq!(qtable.greedy_action(&"s1", &[3, 4]), Some(3));
        assert_eq!(qtable.greedy_action(&"s0", &[]), None);
    }

    #[test]
    fn test_reset() {
        let mut qtable = QTable::new();
        qtable.set("s0", 0, 1.0);
        qtable.reset();
        assert_eq!(qtable.len(), 0);
    }
}
