//! Trainer configuration shared by the CLI commands

use std::{fmt, fs::File, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    td::AgentConfig,
    tictactoe::Player,
};

/// How agents are seated during training
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingMode {
    /// One agent plays both marks
    #[default]
    SelfPlay,
    /// An X agent and an O agent, each with its own table
    Duel,
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingMode::SelfPlay => write!(f, "self-play"),
            TrainingMode::Duel => write!(f, "duel"),
        }
    }
}

impl FromStr for TrainingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self-play" | "selfplay" | "single" => Ok(TrainingMode::SelfPlay),
            "duel" | "dual" | "pair" => Ok(TrainingMode::Duel),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown training mode '{other}' (expected self-play or duel)"),
            }),
        }
    }
}

/// Everything a training session needs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Hyperparameters shared by every agent in the session
    pub agent: AgentConfig,

    /// Sign of the main agent
    pub sign: Player,

    pub mode: TrainingMode,

    /// Number of train-then-evaluate rounds
    pub rounds: usize,

    /// Training episodes per round
    pub episodes_per_round: usize,

    /// Greedy evaluation games before training and after every round
    pub eval_games: usize,

    /// Opening player of training episodes
    pub train_first: Player,

    /// Opening player of evaluation games
    pub eval_first: Player,

    /// Random seed for reproducibility
    pub seed: Option<u64>,

    /// Whether to show progress bars
    pub progress: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            sign: Player::X,
            mode: TrainingMode::SelfPlay,
            rounds: 10,
            episodes_per_round: 3000,
            eval_games: 3000,
            train_first: Player::O,
            eval_first: Player::X,
            seed: None,
            progress: false,
        }
    }
}

impl TrainerConfig {
    /// Load a config from JSON; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("open config {}", path.as_ref().display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create config {}", path.as_ref().display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        if self.rounds > 0 && self.episodes_per_round == 0 {
            return Err(Error::InvalidConfiguration {
                message: "episodes_per_round must be positive when rounds > 0".to_string(),
            });
        }
        Ok(())
    }
}
