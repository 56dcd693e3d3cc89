//! Temporal difference learning over board states
//!
//! Each [`Agent`] owns a private [`ValueTable`] mapping a [`State`] to the
//! agent's estimate of its return from that state, and updates it with the
//! one-step backup
//!
//! ```text
//! V(s) ← V(s) + α [r + γ V(s') − V(s)]
//! ```
//!
//! where `s` is the state before a half-move, `s'` the state after it and
//! `r` is +1 / 0 / −1 for a win / no winner / loss.
//!
//! ## Usage Example
//!
//! ```no_run
//! use tdttt::{
//!     td::Agent,
//!     tictactoe::{Board, Player},
//! };
//!
//! let mut agent = Agent::new(0.5, 0.9, 0.1, Player::X).unwrap().with_seed(42);
//! let mut board = Board::new(Player::X);
//! while board.is_playable() {
//!     let prior = board.state();
//!     agent.train_play(&mut board).unwrap();
//!     agent.learn_from_move(prior, &board);
//! }
//! ```
//!
//! [`State`]: crate::tictactoe::State

pub mod agent;
pub mod serialization;
pub mod value_table;

pub use agent::{Agent, AgentConfig, PolicyMode};
pub use serialization::{SavedAgent, TrainingMetadata};
pub use value_table::{DEFAULT_VALUE, Extremum, ValueTable};
