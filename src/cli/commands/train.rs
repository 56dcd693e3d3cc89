//! Train command - self-play or duel training with periodic evaluation

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::{
        config::{TrainerConfig, TrainingMode},
        output::{format_number, print_kv, print_outcomes, print_section},
    },
    pipeline::{
        OutcomeRecorder, ProgressObserver, Seats, TrainingConfig, TrainingPipeline,
        TrainingResult,
    },
    td::{Agent, PolicyMode, SavedAgent, TrainingMetadata},
    tictactoe::Player,
};

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" => Ok(Player::X),
        "o" | "second" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a TD agent")]
pub struct TrainArgs {
    /// JSON trainer config; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Learning rate α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// `maximize` or `minimax`
    #[arg(long)]
    pub policy: Option<String>,

    /// `self-play` or `duel`
    #[arg(long, short = 'm')]
    pub mode: Option<String>,

    /// Sign of the main agent (`x` or `o`)
    #[arg(long)]
    pub sign: Option<String>,

    /// Number of train-then-evaluate rounds
    #[arg(long, short = 'r')]
    pub rounds: Option<usize>,

    /// Training episodes per round
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Evaluation games before training and after each round
    #[arg(long)]
    pub eval_games: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show progress bars
    #[arg(long)]
    pub progress: bool,

    /// Write the trained main agent here
    #[arg(long, short = 'o')]
    pub save: Option<PathBuf>,

    /// Write the opponent agent here (duel mode)
    #[arg(long)]
    pub save_opponent: Option<PathBuf>,

    /// CSV of the cumulative outcomes of the final evaluation
    #[arg(long)]
    pub curve: Option<PathBuf>,

    /// JSON summary of every evaluation
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl TrainArgs {
    /// Resolve the effective configuration
    pub fn resolve(&self) -> Result<TrainerConfig> {
        let mut config = match &self.config {
            Some(path) => TrainerConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => TrainerConfig::default(),
        };

        if let Some(alpha) = self.alpha {
            config.agent.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.agent.gamma = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            config.agent.epsilon = epsilon;
        }
        if let Some(policy) = &self.policy {
            config.agent.policy = policy.parse::<PolicyMode>()?;
        }
        if let Some(mode) = &self.mode {
            config.mode = mode.parse::<TrainingMode>()?;
        }
        if let Some(sign) = &self.sign {
            config.sign = parse_player_token(sign, "--sign")?;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(episodes) = self.episodes {
            config.episodes_per_round = episodes;
        }
        if let Some(eval_games) = self.eval_games {
            config.eval_games = eval_games;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.progress {
            config.progress = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct EvaluationRecord {
    /// Training episodes completed before this evaluation
    episodes_trained: usize,
    #[serde(flatten)]
    result: TrainingResult,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    config: &'a TrainerConfig,
    evaluations: Vec<EvaluationRecord>,
    table_size: usize,
    opponent_table_size: Option<usize>,
}

fn build_pipeline(config: TrainingConfig, progress: bool) -> TrainingPipeline {
    let pipeline = TrainingPipeline::new(config);
    if progress {
        pipeline.with_observer(Box::new(ProgressObserver::new()))
    } else {
        pipeline
    }
}

fn save_agent(agent: &Agent, path: &Path, episodes: usize, mode: TrainingMode) -> Result<()> {
    let metadata = TrainingMetadata {
        episodes,
        mode: Some(mode.to_string()),
        saved_at: None,
    };
    SavedAgent::from_agent(agent, metadata).save_to_file(path)?;
    println!("\n✓ Agent ({}) saved to: {}", agent.sign(), path.display());
    Ok(())
}

/// Summaries are JSON; a bare stem gets the `.json` extension
fn summary_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("json")
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.resolve()?;

    let mut agent = Agent::from_config(config.agent, config.sign)?;
    let mut opponent = match config.mode {
        TrainingMode::SelfPlay => None,
        TrainingMode::Duel => Some(Agent::from_config(config.agent, config.sign.opponent())?),
    };
    if let Some(seed) = config.seed {
        agent.set_rng_seed(seed);
        if let Some(opponent) = opponent.as_mut() {
            opponent.set_rng_seed(seed.wrapping_add(1));
        }
    }

    print_section("Training Configuration");
    print_kv("Mode", &config.mode.to_string());
    print_kv("Agent sign", &config.sign.to_string());
    print_kv(
        "Hyperparameters",
        &format!(
            "alpha={} gamma={} epsilon={}",
            config.agent.alpha, config.agent.gamma, config.agent.epsilon
        ),
    );
    print_kv("Policy", &config.agent.policy.to_string());
    print_kv(
        "Schedule",
        &format!(
            "{} rounds x {} episodes",
            config.rounds,
            format_number(config.episodes_per_round)
        ),
    );
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut trainer = build_pipeline(
        TrainingConfig {
            episodes: config.episodes_per_round,
            first_player: config.train_first,
            alternate_first: false,
        },
        config.progress,
    );
    let (recorder, eval_log) = OutcomeRecorder::shared();
    let mut evaluator = build_pipeline(
        TrainingConfig {
            episodes: config.eval_games,
            first_player: config.eval_first,
            alternate_first: false,
        },
        config.progress,
    )
    .with_observer(Box::new(recorder));

    let mut evaluations = Vec::with_capacity(config.rounds + 1);
    let mut episodes_trained = 0;
    {
        let mut seats = match opponent.as_mut() {
            Some(opponent) => Seats::pair(&mut agent, opponent)?,
            None => Seats::Single(&mut agent),
        };

        print_section("Before learning");
        let result = evaluator.evaluate(&mut seats)?;
        print_outcomes(&result);
        evaluations.push(EvaluationRecord {
            episodes_trained,
            result,
        });

        for _ in 0..config.rounds {
            trainer.train(&mut seats)?;
            episodes_trained += config.episodes_per_round;

            print_section(&format!(
                "After learning {} times",
                format_number(episodes_trained)
            ));
            let result = evaluator.evaluate(&mut seats)?;
            print_outcomes(&result);
            evaluations.push(EvaluationRecord {
                episodes_trained,
                result,
            });
        }
    }

    if let Some(path) = &args.curve {
        eval_log
            .lock()
            .map_err(|_| anyhow!("Outcome log lock poisoned"))?
            .write_csv(path)
            .with_context(|| format!("Failed to write curve {}", path.display()))?;
        println!("\n✓ Outcome curve written to: {}", path.display());
    }

    if let Some(path) = &args.save {
        save_agent(&agent, path, episodes_trained, config.mode)?;
    }
    if let Some(path) = &args.save_opponent {
        let opponent = opponent
            .as_ref()
            .ok_or_else(|| anyhow!("--save-opponent needs --mode duel"))?;
        save_agent(opponent, path, episodes_trained, config.mode)?;
    }

    if let Some(path) = &args.summary {
        let path = summary_path(path);
        let summary = TrainingSummaryFile {
            config: &config,
            evaluations,
            table_size: agent.table().len(),
            opponent_table_size: opponent.as_ref().map(|o| o.table().len()),
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        to_writer_pretty(file, &summary).context("Failed to write summary")?;
        println!("\n✓ Summary written to: {}", path.display());
    }

    Ok(())
}
