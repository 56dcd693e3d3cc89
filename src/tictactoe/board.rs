//! Board state representation and the per-episode state machine

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            ' ' | '.' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game, also the sign an agent plays with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

/// Snapshot of the nine cells, row-major.
///
/// Doubles as the value-table key: two snapshots with the same symbols are the
/// same key no matter which player opened the game that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct State(pub [Cell; 9]);

impl State {
    /// The all-empty board
    pub const EMPTY: State = State([Cell::Empty; 9]);

    pub fn cells(&self) -> &[Cell; 9] {
        &self.0
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.0[pos]
    }

    /// Copy of this state with one cell replaced
    #[must_use = "with_cell returns a new state; the original is unchanged"]
    pub fn with_cell(&self, pos: usize, cell: Cell) -> State {
        let mut next = *self;
        next.0[pos] = cell;
        next
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        !self.0.contains(&Cell::Empty)
    }

    /// Position of the first cell that differs between two states
    pub fn changed_position(&self, other: &State) -> Option<usize> {
        self.0
            .iter()
            .zip(other.0.iter())
            .position(|(a, b)| a != b)
    }
}

impl Default for State {
    fn default() -> Self {
        State::EMPTY
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.0 {
            write!(f, "{}", cell.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for State {
    type Err = crate::Error;

    /// Parse exactly nine cell characters; `' '` and `'.'` are both empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }
        Ok(State(cells))
    }
}

impl TryFrom<String> for State {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        state.to_string()
    }
}

/// One game's mutable state: the cells, the player to move and the winner.
///
/// `player` is `None` once a winner is decided. A board filled without a
/// winner keeps toggling `player`, so fullness is what separates a draw from
/// a game still in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    state: State,
    player: Option<Player>,
    winner: Option<Player>,
}

impl Board {
    /// Create an empty board with `first_player` to move
    pub fn new(first_player: Player) -> Self {
        Self {
            state: State::EMPTY,
            player: Some(first_player),
            winner: None,
        }
    }

    /// Build a board from an arbitrary position.
    ///
    /// No reachability check is made; if the position already contains a
    /// completed line the board starts terminal.
    pub fn from_state(state: State, to_move: Player) -> Self {
        let winner = LineAnalyzer::predict_winner(state.cells());
        Self {
            state,
            player: if winner.is_some() { None } else { Some(to_move) },
            winner,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Player to move, `None` after a win
    pub fn player(&self) -> Option<Player> {
        self.player
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_full(&self) -> bool {
        self.state.is_full()
    }

    pub fn is_playable(&self) -> bool {
        !self.is_full() && self.winner.is_none()
    }

    /// Final outcome, `None` while the game is still playable
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.winner {
            Some(player) => Some(GameOutcome::Win(player)),
            None if self.is_full() => Some(GameOutcome::Draw),
            None => None,
        }
    }

    /// Candidate next states and the cell each one fills, in ascending cell order
    pub fn legal_moves(&self) -> (Vec<State>, Vec<usize>) {
        let Some(player) = self.player.filter(|_| self.is_playable()) else {
            return (Vec::new(), Vec::new());
        };

        let indices = self.state.empty_positions();
        let states = indices
            .iter()
            .map(|&pos| self.state.with_cell(pos, player.to_cell()))
            .collect();
        (states, indices)
    }

    /// Three-in-a-row owner of the current state
    pub fn predict_winner(&self) -> Option<Player> {
        LineAnalyzer::predict_winner(self.state.cells())
    }

    /// Commit `next_state`, which must be one of the current legal candidates.
    ///
    /// # Errors
    ///
    /// - [`Error::GameAlreadyTerminal`](crate::Error::GameAlreadyTerminal) if
    ///   the board is won or full
    /// - [`Error::InvalidMove`](crate::Error::InvalidMove) if `next_state` is
    ///   not an exact legal candidate
    pub fn apply_move(&mut self, next_state: State) -> crate::Result<()> {
        if !self.is_playable() {
            return Err(crate::Error::GameAlreadyTerminal);
        }

        let (candidates, _) = self.legal_moves();
        if !candidates.contains(&next_state) {
            return Err(crate::Error::InvalidMove {
                from: self.state,
                to: next_state,
                player: self.player,
            });
        }

        self.state = next_state;
        self.winner = self.predict_winner();
        self.player = match self.winner {
            Some(_) => None,
            None => self.player.map(Player::opponent),
        };
        Ok(())
    }

    /// Play the current player's mark into cell `pos` (0-8).
    ///
    /// # Errors
    ///
    /// Same as [`apply_move`](Self::apply_move), plus
    /// [`Error::IllegalCell`](crate::Error::IllegalCell) when `pos` is
    /// occupied or out of range.
    pub fn apply_index(&mut self, pos: usize) -> crate::Result<State> {
        if !self.is_playable() {
            return Err(crate::Error::GameAlreadyTerminal);
        }

        let (candidates, indices) = self.legal_moves();
        let next = indices
            .iter()
            .position(|&idx| idx == pos)
            .map(|i| candidates[i])
            .ok_or(crate::Error::IllegalCell {
                position: pos,
                state: self.state,
            })?;
        self.apply_move(next)?;
        Ok(next)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c: Vec<char> = self.state.cells().iter().map(|c| c.to_char()).collect();
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            writeln!(f, " {} | {} | {}", c[row * 3], c[row * 3 + 1], c[row * 3 + 2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(s: &str) -> State {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_board() {
        let board = Board::new(Player::X);
        assert_eq!(board.state(), State::EMPTY);
        assert_eq!(board.player(), Some(Player::X));
        assert_eq!(board.winner(), None);
        assert!(board.is_playable());
        assert_eq!(board.outcome(), None);
    }

    #[test]
    fn test_legal_moves_on_empty_board() {
        let board = Board::new(Player::O);
        let (states, indices) = board.legal_moves();
        assert_eq!(indices, (0..9).collect::<Vec<_>>());
        for (next, &idx) in states.iter().zip(&indices) {
            assert_eq!(next.get(idx), Cell::O);
            assert_eq!(next.changed_position(&State::EMPTY), Some(idx));
        }
    }

    #[test]
    fn test_legal_moves_skip_occupied_cells() {
        let mut board = Board::new(Player::X);
        board.apply_index(4).unwrap();
        let (states, indices) = board.legal_moves();
        assert_eq!(indices, vec![0, 1, 2, 3, 5, 6, 7, 8]);
        assert!(states.iter().all(|s| s.get(4) == Cell::X));
        assert_eq!(states[0], state("O   X    "));
    }

    #[test]
    fn test_apply_move_toggles_player() {
        let mut board = Board::new(Player::X);
        board.apply_move(state("X        ")).unwrap();
        assert_eq!(board.player(), Some(Player::O));
        board.apply_move(state("X   O    ")).unwrap();
        assert_eq!(board.player(), Some(Player::X));
    }

    #[test]
    fn test_apply_move_rejects_non_candidate() {
        let mut board = Board::new(Player::X);
        // Wrong sign for the player to move
        let err = board.apply_move(state("O        ")).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidMove { .. }));
        // Two marks at once
        let err = board.apply_move(state("XX       ")).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidMove { .. }));
        // Unchanged state
        let err = board.apply_move(State::EMPTY).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidMove { .. }));
        assert_eq!(board.state(), State::EMPTY);
        assert_eq!(board.player(), Some(Player::X));
    }

    #[test]
    fn test_win_sets_terminal_sentinel() {
        let mut board = Board::new(Player::X);
        for pos in [0, 4, 1, 5, 2] {
            board.apply_index(pos).unwrap();
        }
        assert_eq!(board.state(), state("XXX OO   "));
        assert_eq!(board.winner(), Some(Player::X));
        assert_eq!(board.player(), None);
        assert_eq!(board.outcome(), Some(GameOutcome::Win(Player::X)));
        assert!(board.legal_moves().0.is_empty());
    }

    #[test]
    fn test_apply_index_rejects_occupied_cell() {
        let mut board = Board::new(Player::X);
        board.apply_index(0).unwrap();
        let err = board.apply_index(0).unwrap_err();
        assert!(matches!(err, crate::Error::IllegalCell { position: 0, .. }));
        let err = board.apply_index(9).unwrap_err();
        assert!(matches!(err, crate::Error::IllegalCell { position: 9, .. }));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut board = Board::new(Player::X);
        for pos in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            board.apply_index(pos).unwrap();
        }
        assert_eq!(board.state(), state("XOXXOOOXX"));
        assert_eq!(board.winner(), None);
        assert!(board.is_full());
        assert!(!board.is_playable());
        assert_eq!(board.outcome(), Some(GameOutcome::Draw));
        assert!(matches!(
            board.apply_move(state("XOXXOOOXX")),
            Err(crate::Error::GameAlreadyTerminal)
        ));
    }

    #[test]
    fn test_from_state_detects_existing_win() {
        let board = Board::from_state(state("OOO XX X "), Player::X);
        assert_eq!(board.winner(), Some(Player::O));
        assert_eq!(board.player(), None);
        assert!(!board.is_playable());
    }

    #[test]
    fn test_state_parse_and_display() {
        let s = state("X.O......");
        assert_eq!(s.to_string(), "X O      ");
        assert!(matches!(
            "XO".parse::<State>(),
            Err(crate::Error::InvalidBoardLength { got: 2, .. })
        ));
        assert!(matches!(
            "XOZ      ".parse::<State>(),
            Err(crate::Error::InvalidCellCharacter { character: 'Z', position: 2, .. })
        ));
    }

    #[test]
    fn test_state_serde_uses_string_form() {
        let s = state("XO       ");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"XO       \"");
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_display_grid() {
        let board = Board::from_state(state("XOX O X  "), Player::O);
        let display = board.to_string();
        assert!(display.contains(" X | O | X"));
        assert!(display.contains("-----------"));
    }
}
