//! Tic-Tac-Toe rules as a strict per-episode state machine

pub mod board;
pub mod lines;

pub use board::{Board, Cell, GameOutcome, Player, State};
pub use lines::{LineAnalyzer, WINNING_LINES};
