//! Observer port - hooks for watching episodes without coupling the loop to
//! any particular report format.

use crate::{
    Result,
    tictactoe::{GameOutcome, Player, State},
};

/// Observer trait for monitoring training and evaluation runs
///
/// # Event Sequence
///
/// 1. `on_training_start(total_games)` - once
/// 2. For each game:
///    - `on_game_start(game_num)`
///    - `on_move(...)` - once per half-move
///    - `on_game_end(game_num, outcome)`
/// 3. `on_training_end()` - once
///
/// # Examples
///
/// ```no_run
/// use tdttt::{ports::Observer, tictactoe::GameOutcome};
///
/// struct Counter {
///     games: usize,
/// }
///
/// impl Observer for Counter {
///     fn on_game_end(&mut self, _game_num: usize, _outcome: GameOutcome) -> tdttt::Result<()> {
///         self.games += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each half-move has been applied to the board.
    ///
    /// `prior` is the state before the move, `next` the state after it and
    /// `player` the mark that was placed.
    fn on_move(
        &mut self,
        _game_num: usize,
        _step_num: usize,
        _prior: &State,
        _next: &State,
        _player: Player,
    ) -> Result<()> {
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, _outcome: GameOutcome) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
