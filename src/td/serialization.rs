//! Save and load trained agents as MessagePack files.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    td::{
        agent::{Agent, AgentConfig},
        value_table::ValueTable,
    },
    tictactoe::Player,
};

/// Training history stored next to the table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Episodes the table has been trained on
    pub episodes: usize,
    /// Self-play or duel
    pub mode: Option<String>,
    /// RFC 3339 timestamp of the save, if the caller supplied one
    pub saved_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub sign: Player,
    pub config: AgentConfig,
    table: ValueTable,
    rng_seed: Option<u64>,
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &Agent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            sign: agent.sign(),
            config: *agent.config(),
            table: agent.table().clone(),
            rng_seed: agent.rng_seed(),
            metadata,
        }
    }

    /// Rebuild the agent from the saved table and hyperparameters.
    ///
    /// The random generator is not persisted, only the seed it was created
    /// from. A seeded agent therefore restarts its stream from that seed and
    /// replays the tie-breaks and explorations of a freshly seeded agent; an
    /// unseeded one draws a new generator from the thread RNG.
    pub fn to_agent(&self) -> Result<Agent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported agent save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        self.config
            .validate()
            .context("Saved agent has invalid hyperparameters")?;

        Ok(Agent::from_parts(
            self.table.clone(),
            self.sign,
            self.config,
            self.rng_seed,
        ))
    }

    pub fn table_size(&self) -> usize {
        self.table.len()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agent")?;
        log::info!("saved agent ({} states) to {}", self.table.len(), path.as_ref().display());

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agent")
    }
}
