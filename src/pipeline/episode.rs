//! Single-episode drivers
//!
//! Each driver builds a fresh [`Board`], alternates moves until the board is
//! no longer playable, and returns the finished [`Episode`]. Only the driver
//! calls `apply_move` (through the agents' `play`/`train_play`); every agent
//! writes only to its own value table.

use crate::{
    Error, Result,
    td::Agent,
    tictactoe::{Board, GameOutcome, Player, State},
};

/// One applied half-move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub prior: State,
    pub next: State,
    pub player: Player,
}

/// A finished game
#[derive(Debug, Clone)]
pub struct Episode {
    pub first_player: Player,
    pub steps: Vec<Step>,
    pub outcome: GameOutcome,
}

impl Episode {
    fn finish(board: &Board, first_player: Player, steps: Vec<Step>) -> Self {
        Self {
            first_player,
            steps,
            // the drivers only stop on a non-playable board, which always has an outcome
            outcome: board.outcome().unwrap_or(GameOutcome::Draw),
        }
    }

    pub fn final_state(&self) -> State {
        self.steps.last().map_or(State::EMPTY, |step| step.next)
    }
}

/// Who sits at the board
pub enum Seats<'a> {
    /// One agent moves for both marks
    Single(&'a mut Agent),
    /// One agent per mark
    Pair { x: &'a mut Agent, o: &'a mut Agent },
}

impl<'a> Seats<'a> {
    /// Seat two agents by their signs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if both agents play the same sign.
    pub fn pair(first: &'a mut Agent, second: &'a mut Agent) -> Result<Self> {
        match (first.sign(), second.sign()) {
            (Player::X, Player::O) => Ok(Seats::Pair { x: first, o: second }),
            (Player::O, Player::X) => Ok(Seats::Pair { x: second, o: first }),
            (sign, _) => Err(Error::InvalidConfiguration {
                message: format!("both agents play {sign}; a duel needs one X and one O"),
            }),
        }
    }

    pub fn agent_for(&mut self, player: Player) -> &mut Agent {
        match self {
            Seats::Single(agent) => &mut **agent,
            Seats::Pair { x, .. } if player == Player::X => &mut **x,
            Seats::Pair { o, .. } => &mut **o,
        }
    }
}

fn mover(board: &Board) -> Result<Player> {
    board.player().ok_or(Error::GameAlreadyTerminal)
}

/// Self-play training: one agent plays every half-move with exploration and
/// learns after each of them.
pub fn train_self_play_episode(agent: &mut Agent, first_player: Player) -> Result<Episode> {
    let mut board = Board::new(first_player);
    let mut steps = Vec::with_capacity(9);

    while board.is_playable() {
        let prior = board.state();
        let player = mover(&board)?;
        agent.train_play(&mut board)?;
        agent.learn_from_move(prior, &board);
        steps.push(Step {
            prior,
            next: board.state(),
            player,
        });
    }

    Ok(Episode::finish(&board, first_player, steps))
}

/// Two-agent training.
///
/// The mover learns right after its own move. When the game ends, the agent
/// that did not make the final move backs up its last prior state once more
/// against the terminal board, so a loss or draw reaches its table too.
pub fn train_duel_episode(
    x_agent: &mut Agent,
    o_agent: &mut Agent,
    first_player: Player,
) -> Result<Episode> {
    let mut seats = Seats::pair(x_agent, o_agent)?;
    let mut board = Board::new(first_player);
    let mut steps = Vec::with_capacity(9);
    let mut last_prior_x = None;
    let mut last_prior_o = None;

    while board.is_playable() {
        let prior = board.state();
        let player = mover(&board)?;
        let agent = seats.agent_for(player);
        agent.train_play(&mut board)?;
        agent.learn_from_move(prior, &board);

        match player {
            Player::X => last_prior_x = Some(prior),
            Player::O => last_prior_o = Some(prior),
        }
        steps.push(Step {
            prior,
            next: board.state(),
            player,
        });
    }

    if let Some(last) = steps.last() {
        let waiting = last.player.opponent();
        let prior = match waiting {
            Player::X => last_prior_x,
            Player::O => last_prior_o,
        };
        if let Some(prior) = prior {
            seats.agent_for(waiting).learn_from_move(prior, &board);
        }
    }

    Ok(Episode::finish(&board, first_player, steps))
}

/// Greedy play with no exploration and no learning
pub fn demo_episode(seats: &mut Seats<'_>, first_player: Player) -> Result<Episode> {
    let mut board = Board::new(first_player);
    let mut steps = Vec::with_capacity(9);

    while board.is_playable() {
        let prior = board.state();
        let player = mover(&board)?;
        seats.agent_for(player).play(&mut board)?;
        steps.push(Step {
            prior,
            next: board.state(),
            player,
        });
    }

    Ok(Episode::finish(&board, first_player, steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_alternation(episode: &Episode) {
        let mut expected = episode.first_player;
        let mut prior = State::EMPTY;
        for step in &episode.steps {
            assert_eq!(step.player, expected);
            assert_eq!(step.prior, prior);
            let pos = step.prior.changed_position(&step.next).unwrap();
            assert_eq!(step.next.get(pos), step.player.to_cell());
            expected = expected.opponent();
            prior = step.next;
        }
    }

    #[test]
    fn test_self_play_episode_runs_to_completion() {
        let mut agent = Agent::new(0.5, 0.9, 0.1, Player::X).unwrap().with_seed(21);
        let episode = train_self_play_episode(&mut agent, Player::O).unwrap();
        assert!((5..=9).contains(&episode.steps.len()));
        check_alternation(&episode);
        assert!(!agent.table().is_empty());
        assert_eq!(
            agent.table().len(),
            episode.steps.len(),
            "one entry per distinct prior state"
        );
    }

    #[test]
    fn test_duel_episode_updates_both_tables() {
        let mut x = Agent::new(0.5, 0.9, 0.3, Player::X).unwrap().with_seed(1);
        let mut o = Agent::new(0.5, 0.9, 0.3, Player::O).unwrap().with_seed(2);
        let episode = train_duel_episode(&mut x, &mut o, Player::X).unwrap();
        check_alternation(&episode);
        assert!(!x.table().is_empty());
        assert!(!o.table().is_empty());
    }

    #[test]
    fn test_duel_loser_learns_from_terminal_board() {
        // X opens; whoever loses must end up with a negative value somewhere
        for seed in 0..20 {
            let mut x = Agent::new(0.5, 0.9, 1.0, Player::X).unwrap().with_seed(seed);
            let mut o = Agent::new(0.5, 0.9, 1.0, Player::O).unwrap().with_seed(seed + 100);
            let episode = train_duel_episode(&mut x, &mut o, Player::X).unwrap();
            let loser = match episode.outcome {
                GameOutcome::Win(Player::X) => &o,
                GameOutcome::Win(Player::O) => &x,
                GameOutcome::Draw => continue,
            };
            assert!(loser.table().iter().any(|(_, &v)| v < 0.0));
        }
    }

    #[test]
    fn test_duel_rejects_same_sign() {
        let mut a = Agent::new(0.5, 0.9, 0.1, Player::X).unwrap();
        let mut b = Agent::new(0.5, 0.9, 0.1, Player::X).unwrap();
        assert!(matches!(
            train_duel_episode(&mut a, &mut b, Player::X),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_demo_episode_does_not_learn() {
        let mut agent = Agent::new(0.5, 0.9, 0.1, Player::X).unwrap().with_seed(4);
        let mut seats = Seats::Single(&mut agent);
        let episode = demo_episode(&mut seats, Player::X).unwrap();
        check_alternation(&episode);
        assert!(agent.table().is_empty());
    }
}
