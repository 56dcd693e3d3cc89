//! Observer implementations for training and evaluation runs

use std::sync::{Arc, Mutex};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Result,
    pipeline::stats::OutcomeLog,
    ports::Observer,
    tictactoe::{GameOutcome, Player},
};

/// Progress bar observer - shows X/O/draw tallies while games run
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    fn tally(&self) -> String {
        format!("X:{} O:{} D:{}", self.x_wins, self.o_wins, self.draws)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, outcome: GameOutcome) -> Result<()> {
        match outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(self.tally());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally());
        }
        Ok(())
    }
}

/// Records every outcome into a shared [`OutcomeLog`]
pub struct OutcomeRecorder {
    log: Arc<Mutex<OutcomeLog>>,
}

impl OutcomeRecorder {
    pub fn new(log: Arc<Mutex<OutcomeLog>>) -> Self {
        Self { log }
    }

    /// Recorder with a fresh log, plus the handle to read it back
    pub fn shared() -> (Self, Arc<Mutex<OutcomeLog>>) {
        let log = Arc::new(Mutex::new(OutcomeLog::new()));
        (Self::new(Arc::clone(&log)), log)
    }
}

impl Observer for OutcomeRecorder {
    fn on_training_start(&mut self, _total_games: usize) -> Result<()> {
        *self.log.lock().unwrap_or_else(|e| e.into_inner()) = OutcomeLog::new();
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, outcome: GameOutcome) -> Result<()> {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .record(outcome);
        Ok(())
    }
}
