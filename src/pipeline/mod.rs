//! Episode loop, training/evaluation runs and outcome statistics
//!
//! This module provides:
//! - Single-episode drivers for self-play, duels and greedy demo games
//! - A pipeline that runs many episodes and notifies observers
//! - Time-stamped outcome logs with CSV export of the win curve

pub mod episode;
pub mod observers;
pub mod stats;
pub mod training;

pub use episode::{
    Episode, Seats, Step, demo_episode, train_duel_episode, train_self_play_episode,
};
pub use observers::{OutcomeRecorder, ProgressObserver};
pub use stats::{CurvePoint, OutcomeLog};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
