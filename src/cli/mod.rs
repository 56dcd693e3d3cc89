//! Command-line front end: training runs, interactive play and inspection

pub mod commands;
pub mod config;
pub mod human;
pub mod output;
