//! Epsilon-greedy TD(0) agent over board states
//!
//! The agent values *states*, not state-action pairs: every candidate move is
//! the successor state it would produce, and the policy compares those
//! successors through the agent's private [`ValueTable`].

use std::{fmt, str::FromStr};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    td::value_table::{Extremum, ValueTable},
    tictactoe::{Board, Player, State},
};

/// How the policy reads the value table when it is not the agent's turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Always pick the highest-valued candidate
    #[default]
    Maximize,
    /// Pick the highest value on the agent's own turn and the lowest on the
    /// opponent's turn
    Minimax,
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyMode::Maximize => write!(f, "maximize"),
            PolicyMode::Minimax => write!(f, "minimax"),
        }
    }
}

impl FromStr for PolicyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maximize" | "max" => Ok(PolicyMode::Maximize),
            "minimax" => Ok(PolicyMode::Minimax),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown policy mode '{other}' (expected maximize or minimax)"),
            }),
        }
    }
}

/// Hyperparameters fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α in (0, 1]
    pub alpha: f64,
    /// Discount factor γ in (0, 1]
    pub gamma: f64,
    /// Exploration rate ε in [0, 1]
    pub epsilon: f64,
    #[serde(default)]
    pub policy: PolicyMode,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.1,
            policy: PolicyMode::Maximize,
        }
    }
}

impl AgentConfig {
    /// Check every hyperparameter against its admissible range
    pub fn validate(&self) -> Result<()> {
        let in_half_open = |v: f64| v > 0.0 && v <= 1.0;
        if !in_half_open(self.alpha) {
            return Err(Error::InvalidHyperparameter {
                name: "alpha",
                value: self.alpha,
                range: "(0, 1]",
            });
        }
        if !in_half_open(self.gamma) {
            return Err(Error::InvalidHyperparameter {
                name: "gamma",
                value: self.gamma,
                range: "(0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidHyperparameter {
                name: "epsilon",
                value: self.epsilon,
                range: "[0, 1]",
            });
        }
        Ok(())
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Learning agent playing one sign
#[derive(Debug, Clone)]
pub struct Agent {
    table: ValueTable,
    sign: Player,
    config: AgentConfig,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl Agent {
    /// Create a new agent with an empty table
    ///
    /// # Arguments
    ///
    /// * `alpha` - learning rate in (0, 1]
    /// * `gamma` - discount factor in (0, 1]
    /// * `epsilon` - exploration rate in [0, 1], used by [`train_play`](Self::train_play)
    /// * `sign` - the mark this agent plays and is rewarded for
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] if any rate is out of range.
    pub fn new(alpha: f64, gamma: f64, epsilon: f64, sign: Player) -> Result<Self> {
        let config = AgentConfig {
            alpha,
            gamma,
            epsilon,
            policy: PolicyMode::default(),
        };
        Self::from_config(config, sign)
    }

    /// Create an agent from a validated config
    pub fn from_config(config: AgentConfig, sign: Player) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, sign))
    }

    fn build(config: AgentConfig, sign: Player) -> Self {
        Self {
            table: ValueTable::new(config.alpha, config.gamma),
            sign,
            config,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    /// Replace the random source used for tie-breaking and exploration
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self.rng_seed = None;
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn sign(&self) -> Player {
        self.sign
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Mutable table access, for seeding known values
    pub fn table_mut(&mut self) -> &mut ValueTable {
        &mut self.table
    }

    pub(crate) fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Current estimate for a state
    pub fn value(&self, state: &State) -> f64 {
        self.table.get(state)
    }

    /// Immediate reward for a winner as seen by this agent
    pub fn reward(&self, winner: Option<Player>) -> f64 {
        match winner {
            Some(player) if player == self.sign => 1.0,
            None => 0.0,
            Some(_) => -1.0,
        }
    }

    /// ε-greedy policy over the board's candidate states
    ///
    /// Returns `(greedy_action, chosen_action)`. Ties at the extreme value are
    /// broken uniformly at random; with probability ε the chosen action is a
    /// uniformly random candidate instead of the greedy one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if the board is not playable.
    pub fn policy(&mut self, board: &Board) -> Result<(State, State)> {
        let (candidates, _) = board.legal_moves();
        if candidates.is_empty() {
            return Err(Error::NoValidMoves);
        }

        let extremum = match self.config.policy {
            PolicyMode::Maximize => Extremum::Max,
            PolicyMode::Minimax if board.player() == Some(self.sign) => Extremum::Max,
            PolicyMode::Minimax => Extremum::Min,
        };

        let best = self.table.best_candidates(&candidates, extremum);
        let greedy = *best.choose(&mut self.rng).ok_or(Error::NoValidMoves)?;

        let chosen = if self.rng.random::<f64>() < self.config.epsilon {
            *candidates.choose(&mut self.rng).ok_or(Error::NoValidMoves)?
        } else {
            greedy
        };

        Ok((greedy, chosen))
    }

    /// Apply the greedy action, without exploration
    pub fn play(&mut self, board: &mut Board) -> Result<State> {
        let (greedy, _) = self.policy(board)?;
        board.apply_move(greedy)?;
        Ok(board.state())
    }

    /// Apply the ε-greedy action
    pub fn train_play(&mut self, board: &mut Board) -> Result<State> {
        let (_, chosen) = self.policy(board)?;
        board.apply_move(chosen)?;
        Ok(board.state())
    }

    /// TD(0) backup of `prior_state` toward the state now on the board.
    ///
    /// Call once per half-move, right after the move is applied, with the
    /// state captured before the move. The reward comes from the board's
    /// winner, so a draw and a game in progress both contribute zero.
    pub fn learn_from_move(&mut self, prior_state: State, board: &Board) {
        let reward = self.reward(board.winner());
        let updated = self.table.td_update(prior_state, reward, &board.state());
        log::trace!("V('{prior_state}') <- {updated:.4} (r = {reward})");
    }

    /// Forget every learned value, keeping sign and hyperparameters
    pub fn reset(&mut self) {
        self.table.clear();
    }

    pub(crate) fn from_parts(
        table: ValueTable,
        sign: Player,
        config: AgentConfig,
        rng_seed: Option<u64>,
    ) -> Self {
        Self {
            table,
            sign,
            config,
            rng: build_rng(rng_seed),
            rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(s: &str) -> State {
        s.parse().unwrap()
    }

    #[test]
    fn test_reward_mapping() {
        let agent = Agent::new(0.5, 0.9, 0.1, Player::O).unwrap();
        assert_eq!(agent.reward(Some(Player::O)), 1.0);
        assert_eq!(agent.reward(Some(Player::X)), -1.0);
        assert_eq!(agent.reward(None), 0.0);
    }

    #[test]
    fn test_policy_prefers_highest_value() {
        let mut agent = Agent::new(0.5, 0.9, 0.0, Player::X).unwrap().with_seed(1);
        let board = Board::new(Player::X);
        agent.table_mut().set(state("    X    "), 0.8);
        agent.table_mut().set(state("X        "), 0.3);

        for _ in 0..20 {
            let (greedy, chosen) = agent.policy(&board).unwrap();
            assert_eq!(greedy, state("    X    "));
            assert_eq!(chosen, greedy);
        }
    }

    #[test]
    fn test_policy_errors_on_terminal_board() {
        let mut agent = Agent::new(0.5, 0.9, 0.1, Player::X).unwrap();
        let board = Board::from_state(state("XXXOO    "), Player::O);
        assert!(matches!(agent.policy(&board), Err(Error::NoValidMoves)));
    }

    #[test]
    fn test_minimax_policy_minimizes_on_opponent_turn() {
        let mut agent = Agent::new(0.5, 0.9, 0.0, Player::X).unwrap()
            .with_policy(PolicyMode::Minimax)
            .with_seed(3);
        let board = Board::new(Player::O);
        agent.table_mut().set(state("O        "), -0.7);
        agent.table_mut().set(state("    O    "), 0.4);

        let (greedy, _) = agent.policy(&board).unwrap();
        assert_eq!(greedy, state("O        "));

        let mut maximizer = Agent::new(0.5, 0.9, 0.0, Player::X).unwrap().with_seed(3);
        maximizer.table_mut().set(state("O        "), -0.7);
        maximizer.table_mut().set(state("    O    "), 0.4);
        let (greedy, _) = maximizer.policy(&board).unwrap();
        assert_eq!(greedy, state("    O    "));
    }

    #[test]
    fn test_full_exploration_stays_legal() {
        let mut agent = Agent::new(0.5, 0.9, 1.0, Player::X).unwrap().with_seed(9);
        let mut board = Board::new(Player::X);
        board.apply_index(4).unwrap();
        let (candidates, _) = board.legal_moves();
        for _ in 0..50 {
            let (_, chosen) = agent.policy(&board).unwrap();
            assert!(candidates.contains(&chosen));
        }
    }

    #[test]
    fn test_play_applies_greedy_move() {
        let mut agent = Agent::new(0.5, 0.9, 1.0, Player::X).unwrap().with_seed(5);
        agent.table_mut().set(state("        X"), 2.0);
        let mut board = Board::new(Player::X);
        let next = agent.play(&mut board).unwrap();
        assert_eq!(next, state("        X"));
        assert_eq!(board.player(), Some(Player::O));
    }

    #[test]
    fn test_learn_from_winning_move() {
        let mut agent = Agent::new(0.5, 0.9, 0.1, Player::X).unwrap();
        let mut board = Board::from_state(state("XX OO    "), Player::X);
        let prior = board.state();
        board.apply_index(2).unwrap();
        agent.learn_from_move(prior, &board);
        // 0 + 0.5 * (1 + 0.9 * 0 - 0)
        assert_eq!(agent.value(&prior), 0.5);
    }

    #[test]
    fn test_learn_from_losing_move() {
        let mut agent = Agent::new(0.5, 0.9, 0.1, Player::X).unwrap();
        let mut board = Board::from_state(state("XX OO X  "), Player::O);
        let prior = board.state();
        board.apply_index(5).unwrap();
        agent.learn_from_move(prior, &board);
        assert_eq!(agent.value(&prior), -0.5);
    }

    #[test]
    fn test_learn_bootstraps_from_successor() {
        let mut agent = Agent::new(0.25, 0.5, 0.1, Player::X).unwrap();
        let mut board = Board::new(Player::X);
        let prior = board.state();
        board.apply_index(4).unwrap();
        agent.table_mut().set(board.state(), 0.8);
        agent.learn_from_move(prior, &board);
        // 0 + 0.25 * (0 + 0.5 * 0.8 - 0)
        assert!((agent.value(&prior) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_table_only() {
        let mut agent = Agent::new(0.5, 0.9, 0.2, Player::O).unwrap();
        agent.table_mut().set(State::EMPTY, 1.0);
        agent.reset();
        assert!(agent.table().is_empty());
        assert_eq!(agent.sign(), Player::O);
        assert_eq!(agent.config().epsilon, 0.2);
    }

    #[test]
    fn test_config_validation() {
        assert!(AgentConfig::default().validate().is_ok());
        let bad_alpha = AgentConfig {
            alpha: 0.0,
            ..AgentConfig::default()
        };
        assert!(matches!(
            bad_alpha.validate(),
            Err(Error::InvalidHyperparameter { name: "alpha", .. })
        ));
        let bad_gamma = AgentConfig {
            gamma: 1.5,
            ..AgentConfig::default()
        };
        assert!(Agent::from_config(bad_gamma, Player::X).is_err());
        let bad_epsilon = AgentConfig {
            epsilon: -0.1,
            ..AgentConfig::default()
        };
        assert!(bad_epsilon.validate().is_err());
    }

    #[test]
    fn test_new_rejects_out_of_range_rates() {
        let cases = [
            (0.0, 0.9, 0.1, "alpha"),
            (1.2, 0.9, 0.1, "alpha"),
            (0.5, 0.0, 0.1, "gamma"),
            (0.5, 1.5, 0.1, "gamma"),
            (0.5, 0.9, -1.0, "epsilon"),
            (0.5, 0.9, 1.01, "epsilon"),
        ];
        for (alpha, gamma, epsilon, expected) in cases {
            match Agent::new(alpha, gamma, epsilon, Player::X) {
                Err(Error::InvalidHyperparameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected {expected} rejection, got {other:?}"),
            }
        }

        // bounds that are inclusive
        assert!(Agent::new(1.0, 1.0, 0.0, Player::X).is_ok());
        assert!(Agent::new(0.5, 0.9, 1.0, Player::O).is_ok());
    }

    #[test]
    fn test_policy_mode_parsing() {
        assert_eq!("Minimax".parse::<PolicyMode>().unwrap(), PolicyMode::Minimax);
        assert_eq!("max".parse::<PolicyMode>().unwrap(), PolicyMode::Maximize);
        assert!("greedy".parse::<PolicyMode>().is_err());
    }
}
