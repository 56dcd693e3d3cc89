//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Owner of a completed line, if all three cells hold the same mark
    pub fn line_owner(cells: &[Cell; 9], line: &[usize; 3]) -> Option<Player> {
        let first = cells[line[0]].to_player()?;
        line[1..]
            .iter()
            .all(|&idx| cells[idx] == first.to_cell())
            .then_some(first)
    }

    /// Scan every line and report the three-in-a-row owner.
    ///
    /// Lines are scanned in [`WINNING_LINES`] order and a later completed line
    /// overrides an earlier one. Under alternating play only one player can
    /// complete a line, so this only matters for hand-built positions.
    pub fn predict_winner(cells: &[Cell; 9]) -> Option<Player> {
        WINNING_LINES
            .iter()
            .filter_map(|line| Self::line_owner(cells, line))
            .last()
    }
}
