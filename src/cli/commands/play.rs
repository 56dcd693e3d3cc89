//! Play command - interactive games against an agent

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        commands::train::parse_player_token,
        human::play_session,
        output::{print_kv, print_section},
    },
    td::{Agent, AgentConfig, SavedAgent},
};

#[derive(Parser, Debug)]
#[command(about = "Play against an agent in the terminal")]
pub struct PlayArgs {
    /// Saved agent file; an untrained agent is used when omitted
    #[arg(long, short = 'a')]
    pub agent: Option<PathBuf>,

    /// Sign of the untrained agent (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub sign: String,

    /// Stop after this many games (default: until end of input)
    #[arg(long, short = 'g')]
    pub games: Option<usize>,

    /// Random seed for the agent's tie-breaking
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut agent = match &args.agent {
        Some(path) => {
            println!("Loading trained agent from: {}", path.display());
            SavedAgent::load_from_file(path)?.to_agent()?
        }
        None => {
            let sign = parse_player_token(&args.sign, "--sign")?;
            Agent::from_config(AgentConfig::default(), sign)?
        }
    };
    if let Some(seed) = args.seed {
        agent.set_rng_seed(seed);
    }

    let stdin = io::stdin();
    let summary = play_session(&mut agent, stdin.lock(), io::stdout(), args.games)?;

    print_section("Session");
    print_kv("Games", &summary.games.to_string());
    print_kv("Agent wins", &summary.agent_wins.to_string());
    print_kv("Your wins", &summary.human_wins.to_string());
    print_kv("Draws", &summary.draws.to_string());
    Ok(())
}
