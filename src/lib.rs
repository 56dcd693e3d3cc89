//! Temporal-difference self-play for Tic-Tac-Toe
//!
//! This crate provides:
//! - A strict Tic-Tac-Toe board state machine (legal moves, move application,
//!   win detection)
//! - An ε-greedy agent that learns a state-value table with TD(0) updates
//! - Self-play, duel and evaluation episode loops with outcome statistics
//! - A CLI for training, saving, inspecting and playing against agents

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod td;
pub mod tictactoe;

pub use error::{Error, Result};
pub use td::{Agent, AgentConfig, PolicyMode, ValueTable};
pub use tictactoe::{Board, Cell, GameOutcome, Player, State};
