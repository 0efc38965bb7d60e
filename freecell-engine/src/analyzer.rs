use crate::table::Table;
use crate::validator::tableau_sequence_is_valid;

/// Move counter and win check.
#[derive(Debug, Clone, Default)]
pub struct GameAnalyzer {
    moves: u32,
}

impl GameAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Adjusts the counter by `delta`, never going below zero.
    pub fn inc_moves(&mut self, delta: i32) {
        self.moves = self.moves.saturating_add_signed(delta);
    }

    pub fn reset(&mut self) {
        self.moves = 0;
    }

    /// True when every tableau pile is one descending alternating-color run.
    ///
    /// Foundations are not consulted: a table whose piles are all sorted
    /// counts as won.
    pub fn has_won(&self, table: &Table) -> bool {
        table
            .tableaus()
            .iter()
            .all(|pile| tableau_sequence_is_valid(pile.cards()))
    }
}
