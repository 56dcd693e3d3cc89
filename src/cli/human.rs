//! Text-mode games between a person and an agent

use std::io::{BufRead, Write};

use serde::Serialize;

use crate::{
    Error, Result,
    td::Agent,
    tictactoe::{Board, GameOutcome, Player},
};

/// Results of an interactive session, from the agent's point of view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub games: usize,
    pub agent_wins: usize,
    pub human_wins: usize,
    pub draws: usize,
}

fn io_err(operation: &str) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        operation: operation.to_string(),
        source,
    }
}

enum HumanInput {
    Cell(usize),
    Rejected(String),
    Eof,
}

fn read_choice<R: BufRead, W: Write>(
    board: &Board,
    input: &mut R,
    output: &mut W,
) -> Result<HumanInput> {
    let (_, indices) = board.legal_moves();
    let options: Vec<usize> = indices.iter().map(|i| i + 1).collect();
    write!(output, "Please select one {options:?} ").map_err(io_err("write prompt"))?;
    output.flush().map_err(io_err("flush prompt"))?;

    let mut line = String::new();
    if input.read_line(&mut line).map_err(io_err("read move"))? == 0 {
        return Ok(HumanInput::Eof);
    }

    match line.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(HumanInput::Cell(n - 1)),
        Ok(n) => Ok(HumanInput::Rejected(format!("{n} is not a cell number"))),
        Err(e) => Ok(HumanInput::Rejected(format!("'{}': {e}", line.trim()))),
    }
}

/// Play games until `max_games` is reached or the input ends.
///
/// The opening mark alternates between X and O from one game to the next.
/// The person enters 1-indexed cell numbers; input that does not name a legal
/// cell is reported and asked for again.
pub fn play_session<R: BufRead, W: Write>(
    agent: &mut Agent,
    mut input: R,
    mut output: W,
    max_games: Option<usize>,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();
    let human = agent.sign().opponent();
    writeln!(output, "You play {human}.").map_err(io_err("write greeting"))?;

    while max_games.is_none_or(|max| summary.games < max) {
        let first = if summary.games.is_multiple_of(2) {
            Player::X
        } else {
            Player::O
        };
        let mut board = Board::new(first);
        let mut round = 0;

        while board.is_playable() {
            writeln!(output, "Round {round}\n{board}").map_err(io_err("write board"))?;
            round += 1;

            if board.player() == Some(agent.sign()) {
                agent.play(&mut board)?;
                continue;
            }

            loop {
                match read_choice(&board, &mut input, &mut output)? {
                    HumanInput::Eof => {
                        writeln!(output).map_err(io_err("write newline"))?;
                        return Ok(summary);
                    }
                    HumanInput::Rejected(reason) => {
                        log::warn!("rejected input: {reason}");
                        writeln!(output, "{reason}").map_err(io_err("write rejection"))?;
                    }
                    HumanInput::Cell(pos) => match board.apply_index(pos) {
                        Ok(_) => break,
                        Err(
                            e @ (Error::IllegalCell { .. } | Error::InvalidMove { .. }),
                        ) => {
                            log::warn!("rejected move: {e}");
                            writeln!(output, "{e}").map_err(io_err("write rejection"))?;
                        }
                        Err(e) => return Err(e),
                    },
                }
            }
        }

        writeln!(output, "{board}").map_err(io_err("write board"))?;
        summary.games += 1;
        match board.outcome() {
            Some(GameOutcome::Win(winner)) => {
                if winner == agent.sign() {
                    summary.agent_wins += 1;
                } else {
                    summary.human_wins += 1;
                }
                writeln!(output, "{winner} Win this game").map_err(io_err("write result"))?;
            }
            _ => {
                summary.draws += 1;
                writeln!(output, "Draw").map_err(io_err("write result"))?;
            }
        }
    }

    Ok(summary)
}
