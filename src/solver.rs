//! A shallow game tree search for the engine's replies

use crate::{bitboard::*, WIDTH};

/// The depth the engine searches to by default, counted in plies after its own move
pub const DEFAULT_DEPTH: u32 = 3;

/// Base of the depth-dependent win score
const WIN_BASE: f32 = 10.0;

/// A depth-limited negamax evaluator
///
/// # Position Scoring
/// A position is scored for the side that has just moved. A win found with `d` plies of
/// search left scores `10^d`, so quicker wins weigh more. Instead of keeping the best
/// child, every node sums the negated scores of all of its children: moves with many
/// non-losing continuations score higher than moves that hinge on a single reply.
/// There is no pruning and no transposition table.
#[derive(Clone, Debug)]
pub struct Solver {
    depth: u32,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    /// Creates a new `Solver` searching to [`DEFAULT_DEPTH`]
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }

    /// Creates a new `Solver` searching to the given depth
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            node_count: 0,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Scores the position for the side owning `other_pieces`, which has just moved.
    /// `pieces` belong to the side to move.
    pub fn negamax(&mut self, pieces: u64, other_pieces: u64, depth: u32) -> f32 {
        self.node_count += 1;
        let occupancy = pieces | other_pieces;

        if BitBoard::is_win(other_pieces) {
            return WIN_BASE.powi(depth as i32);
        }
        // unreachable through play, the mover would have ended the game already
        if BitBoard::is_win(pieces) {
            return 0.0;
        }
        if depth == 0 || BitBoard::is_full(occupancy) {
            return 0.0;
        }

        let mut value = 0.0;
        for column in 0..WIDTH {
            if !BitBoard::is_legal(column, occupancy) {
                continue;
            }
            let child_pieces = BitBoard::play(column, occupancy, other_pieces);
            value -= self.negamax(other_pieces, child_pieces, depth - 1);
        }
        value
    }

    /// Scores every opponent reply in `board`, `None` for full columns
    ///
    /// Lower is better for the opponent.
    pub fn evaluate(&mut self, board: &BitBoard) -> [Option<f32>; WIDTH] {
        let mut values = [None; WIDTH];
        let occupancy = board.occupancy();
        for (column, value) in values.iter_mut().enumerate() {
            if !BitBoard::is_legal(column, occupancy) {
                continue;
            }
            let child_pieces = BitBoard::play(column, occupancy, board.player_pieces());
            *value = Some(-self.negamax(board.player_pieces(), child_pieces, self.depth));
        }
        values
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}
