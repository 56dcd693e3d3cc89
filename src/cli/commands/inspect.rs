//! Inspect command - summarize a saved agent's value table

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_section},
    td::{Agent, SavedAgent},
    tictactoe::{Board, Player, State},
};

#[derive(Parser, Debug)]
#[command(about = "Show what a saved agent has learned")]
pub struct InspectArgs {
    /// Saved agent file
    pub agent: PathBuf,

    /// How many of the highest- and lowest-valued states to show
    #[arg(long, short = 'n', default_value_t = 5)]
    pub top: usize,
}

/// States sorted by value, highest first
pub fn ranked_states(agent: &Agent) -> Vec<(State, f64)> {
    let mut ranked: Vec<(State, f64)> = agent.table().iter().map(|(s, v)| (*s, *v)).collect();
    ranked.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
    });
    ranked
}

fn print_states(states: &[(State, f64)]) {
    for (state, value) in states {
        println!("\nvalue {value:+.4}  '{state}'");
        print!("{}", Board::from_state(*state, Player::X));
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;
    let agent = saved.to_agent()?;

    print_section("Agent");
    print_kv("Sign", &agent.sign().to_string());
    print_kv("Alpha", &agent.config().alpha.to_string());
    print_kv("Gamma", &agent.config().gamma.to_string());
    print_kv("Epsilon", &agent.config().epsilon.to_string());
    print_kv("Policy", &agent.config().policy.to_string());
    print_kv("Episodes trained", &format_number(saved.metadata.episodes));
    if let Some(mode) = &saved.metadata.mode {
        print_kv("Mode", mode);
    }
    print_kv("States valued", &format_number(agent.table().len()));

    let ranked = ranked_states(&agent);
    let n = args.top.min(ranked.len());
    print_section(&format!("Top {n} states"));
    print_states(&ranked[..n]);
    print_section(&format!("Bottom {n} states"));
    print_states(&ranked[ranked.len() - n..]);
    Ok(())
}
