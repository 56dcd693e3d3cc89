//! State-value table for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tictactoe::State;

/// Value returned for states the table has never written
pub const DEFAULT_VALUE: f64 = 0.0;

/// Which end of the value range a policy is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Max,
    Min,
}

/// Value table mapping board states to expected return for the owning agent
///
/// Entries are created lazily by [`td_update`](Self::td_update) or
/// [`set`](Self::set); reads of unseen states return [`DEFAULT_VALUE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<State, f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl ValueTable {
    /// Create an empty value table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Get the value of a state
    pub fn get(&self, state: &State) -> f64 {
        self.values.get(state).copied().unwrap_or(DEFAULT_VALUE)
    }

    /// Set the value of a state
    pub fn set(&mut self, state: State, value: f64) {
        self.values.insert(state, value);
    }

    /// One-step TD backup
    ///
    /// V(s) ← V(s) + α[r + γ V(s') - V(s)]
    ///
    /// Returns the new value of `prior`.
    pub fn td_update(&mut self, prior: State, reward: f64, next: &State) -> f64 {
        let current = self.get(&prior);
        let next_value = self.get(next);
        let td_target = reward + self.discount_factor * next_value;
        let td_error = td_target - current;
        let updated = current + self.learning_rate * td_error;
        self.set(prior, updated);
        updated
    }

    /// Candidates sharing the extreme value, in their original order
    pub fn best_candidates(&self, candidates: &[State], extremum: Extremum) -> Vec<State> {
        let values: Vec<f64> = candidates.iter().map(|s| self.get(s)).collect();
        let target = match extremum {
            Extremum::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Extremum::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        };
        candidates
            .iter()
            .zip(values)
            .filter(|&(_, value)| value == target)
            .map(|(&state, _)| state)
            .collect()
    }

    /// Drop every learned value
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of states with a stored value
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, &f64)> {
        self.values.iter()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(s: &str) -> State {
        s.parse().unwrap()
    }

    #[test]
    fn test_unseen_state_defaults_to_zero() {
        let table = ValueTable::new(0.5, 0.9);
        assert_eq!(table.get(&State::EMPTY), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_get() {
        let mut table = ValueTable::new(0.5, 0.9);
        table.set(state("X        "), 0.75);
        assert_eq!(table.get(&state("X        ")), 0.75);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_td_update() {
        let mut table = ValueTable::new(0.5, 0.9);
        let prior = state("X   O    ");
        let next = state("XX  O    ");
        table.set(prior, 0.2);
        table.set(next, 0.6);

        // 0.2 + 0.5 * (0.0 + 0.9 * 0.6 - 0.2) = 0.37
        let updated = table.td_update(prior, 0.0, &next);
        assert!((updated - 0.37).abs() < 1e-12);
        assert!((table.get(&prior) - 0.37).abs() < 1e-12);
        assert_eq!(table.get(&next), 0.6);
    }

    #[test]
    fn test_td_update_creates_entry_lazily() {
        let mut table = ValueTable::new(0.5, 0.9);
        let prior = state("XX OO    ");
        let next = state("XXXOO    ");
        table.td_update(prior, 1.0, &next);
        assert_eq!(table.get(&prior), 0.5);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_best_candidates_max_and_min() {
        let mut table = ValueTable::new(0.5, 0.9);
        let a = state("X        ");
        let b = state(" X       ");
        let c = state("  X      ");
        table.set(a, 0.5);
        table.set(b, -0.25);
        table.set(c, 0.5);

        assert_eq!(table.best_candidates(&[a, b, c], Extremum::Max), vec![a, c]);
        assert_eq!(table.best_candidates(&[a, b, c], Extremum::Min), vec![b]);
    }

    #[test]
    fn test_clear() {
        let mut table = ValueTable::new(0.5, 0.9);
        table.set(State::EMPTY, 1.0);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.learning_rate(), 0.5);
        assert_eq!(table.discount_factor(), 0.9);
    }
}
