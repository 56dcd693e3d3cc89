//! Multi-episode training and evaluation runs

use serde::{Deserialize, Serialize};

use super::episode::{
    Episode, Seats, demo_episode, train_duel_episode, train_self_play_episode,
};
use crate::{
    Result,
    ports::Observer,
    tictactoe::{GameOutcome, Player},
};

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of games to play
    pub episodes: usize,

    /// Which player opens the first game
    pub first_player: Player,

    /// Swap the opening player after every game
    pub alternate_first: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 3000,
            first_player: Player::O,
            alternate_first: false,
        }
    }
}

/// Tally of a run, counted by mark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub draw_rate: f64,
}

impl TrainingResult {
    pub fn new(total_games: usize, x_wins: usize, o_wins: usize, draws: usize) -> Self {
        let rate = |count: usize| {
            if total_games > 0 {
                count as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            x_wins,
            o_wins,
            draws,
            x_win_rate: rate(x_wins),
            o_win_rate: rate(o_wins),
            draw_rate: rate(draws),
        }
    }

    /// Wins for `player`
    pub fn wins(&self, player: Player) -> usize {
        match player {
            Player::X => self.x_wins,
            Player::O => self.o_wins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Train,
    Evaluate,
}

/// Drives many episodes and reports them to observers
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Train with exploration and TD updates.
    ///
    /// A single seat trains by self-play; a pair trains as a duel.
    pub fn train(&mut self, seats: &mut Seats<'_>) -> Result<TrainingResult> {
        self.run(seats, Phase::Train)
    }

    /// Greedy play only; no table is modified
    pub fn evaluate(&mut self, seats: &mut Seats<'_>) -> Result<TrainingResult> {
        self.run(seats, Phase::Evaluate)
    }

    fn run(&mut self, seats: &mut Seats<'_>, phase: Phase) -> Result<TrainingResult> {
        let total = self.config.episodes;
        log::info!(
            "{:?} run: {} games, {} first{}",
            phase,
            total,
            self.config.first_player,
            if self.config.alternate_first { ", alternating" } else { "" }
        );

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let (mut x_wins, mut o_wins, mut draws) = (0, 0, 0);
        let mut first = self.config.first_player;

        for game_num in 0..total {
            for observer in &mut self.observers {
                observer.on_game_start(game_num)?;
            }

            let episode = Self::play(seats, phase, first)?;
            log::debug!(
                "game {game_num}: {:?} after {} moves, final '{}'",
                episode.outcome,
                episode.steps.len(),
                episode.final_state()
            );

            self.notify_episode(game_num, &episode)?;

            match episode.outcome {
                GameOutcome::Win(Player::X) => x_wins += 1,
                GameOutcome::Win(Player::O) => o_wins += 1,
                GameOutcome::Draw => draws += 1,
            }

            if self.config.alternate_first {
                first = first.opponent();
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::new(total, x_wins, o_wins, draws);
        log::info!(
            "{:?} done: X {} / O {} / draw {}",
            phase,
            result.x_wins,
            result.o_wins,
            result.draws
        );
        Ok(result)
    }

    fn play(seats: &mut Seats<'_>, phase: Phase, first: Player) -> Result<Episode> {
        match (phase, seats) {
            (Phase::Evaluate, seats) => demo_episode(seats, first),
            (Phase::Train, Seats::Single(agent)) => train_self_play_episode(agent, first),
            (Phase::Train, Seats::Pair { x, o }) => train_duel_episode(x, o, first),
        }
    }

    fn notify_episode(&mut self, game_num: usize, episode: &Episode) -> Result<()> {
        for observer in &mut self.observers {
            for (step_num, step) in episode.steps.iter().enumerate() {
                observer.on_move(game_num, step_num, &step.prior, &step.next, step.player)?;
            }
            observer.on_game_end(game_num, episode.outcome)?;
        }
        Ok(())
    }
}
