//! Win/draw bookkeeping over a run of games

use std::{path::Path, time::Instant};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    tictactoe::{GameOutcome, Player},
};

/// One finished game with the time it ended, relative to the log's start
#[derive(Debug, Clone, Copy)]
struct OutcomeEntry {
    elapsed_nanos: u64,
    outcome: GameOutcome,
}

/// Row of the cumulative win curve written by [`OutcomeLog::write_csv`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub game: usize,
    pub elapsed_nanos: u64,
    pub result: String,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

/// Time-stamped outcomes of a run of games
#[derive(Debug, Clone)]
pub struct OutcomeLog {
    started: Instant,
    entries: Vec<OutcomeEntry>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: Vec::new(),
        }
    }

    /// Record an outcome stamped with the time since the log was created
    pub fn record(&mut self, outcome: GameOutcome) {
        let elapsed = self.started.elapsed().as_nanos();
        self.record_at(u64::try_from(elapsed).unwrap_or(u64::MAX), outcome);
    }

    pub fn record_at(&mut self, elapsed_nanos: u64, outcome: GameOutcome) {
        self.entries.push(OutcomeEntry {
            elapsed_nanos,
            outcome,
        });
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn wins(&self, player: Player) -> usize {
        self.count(GameOutcome::Win(player))
    }

    pub fn x_wins(&self) -> usize {
        self.wins(Player::X)
    }

    pub fn o_wins(&self) -> usize {
        self.wins(Player::O)
    }

    pub fn draws(&self) -> usize {
        self.count(GameOutcome::Draw)
    }

    fn count(&self, outcome: GameOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// Share of games with `outcome`, in percent (0 for an empty log)
    pub fn percent(&self, outcome: GameOutcome) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.count(outcome) as f64 / self.entries.len() as f64 * 100.0
    }

    /// Running totals after every game
    pub fn curve(&self) -> Vec<CurvePoint> {
        let (mut x_wins, mut o_wins, mut draws) = (0, 0, 0);
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let result = match entry.outcome {
                    GameOutcome::Win(Player::X) => {
                        x_wins += 1;
                        "X"
                    }
                    GameOutcome::Win(Player::O) => {
                        o_wins += 1;
                        "O"
                    }
                    GameOutcome::Draw => {
                        draws += 1;
                        "Draw"
                    }
                };
                CurvePoint {
                    game: i + 1,
                    elapsed_nanos: entry.elapsed_nanos,
                    result: result.to_string(),
                    x_wins,
                    o_wins,
                    draws,
                }
            })
            .collect()
    }

    /// Write the cumulative curve as CSV for an external plotter
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        for point in self.curve() {
            writer.serialize(point)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for OutcomeLog {
    fn default() -> Self {
        Self::new()
    }
}
