//! Choosing the opponent's column

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{bitboard::BitBoard, opening_book::OpeningBook, solver::Solver, Observation, WIDTH};

/// Anything that can pick the opponent's column in a position
///
/// Closures over the observation vector qualify, so a learned policy can stand in
/// for the search:
///
/// ```
/// use connect4_engine::{game::Game, Observation};
///
/// let game = Game::with_policy(|_observation: &Observation| 0_usize);
/// assert!(!game.outcome().is_terminal());
/// ```
pub trait OpponentPolicy {
    /// Returns a column for the opponent. Out of range or full columns forfeit the game.
    fn select_column(&mut self, board: &BitBoard) -> usize;
}

impl<F> OpponentPolicy for F
where
    F: FnMut(&Observation) -> usize,
{
    fn select_column(&mut self, board: &BitBoard) -> usize {
        self(&board.observation())
    }
}

/// The built-in opponent: opening book, then one-move wins, then negamax
///
/// Equally scored columns are broken uniformly at random.
#[derive(Clone, Debug)]
pub struct NegamaxSelector {
    solver: Solver,
    opening_book: OpeningBook,
    rng: StdRng,
}

impl NegamaxSelector {
    /// Creates a selector with the default depth and the built-in book, seeded from entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates a selector whose tie-breaks are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            solver: Solver::new(),
            opening_book: OpeningBook::new(),
            rng,
        }
    }

    /// Replaces the search depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.solver = Solver::with_depth(depth);
        self
    }

    /// Replaces the opening book
    pub fn with_opening_book(mut self, opening_book: OpeningBook) -> Self {
        self.opening_book = opening_book;
        self
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Picks the opponent's reply in `board`
    ///
    /// Returns `WIDTH`, which is never playable, when the board has no free column.
    pub fn choose(&mut self, board: &BitBoard) -> usize {
        if let Some(column) = self.opening_book.get(board) {
            if board.playable(column) {
                debug!("opening book reply {} for key {}", column, board.book_key());
                return column;
            }
        }

        let occupancy = board.occupancy();
        // the summed search does not reliably rank a one-move win first
        for column in 0..WIDTH {
            if BitBoard::is_legal(column, occupancy)
                && BitBoard::is_win(BitBoard::play(column, occupancy, board.player_pieces()))
            {
                debug!("immediate win in column {}", column);
                return column;
            }
        }

        let values = self.solver.evaluate(board);
        let best_value = values
            .iter()
            .flatten()
            .fold(f32::INFINITY, |best, &value| best.min(value));
        let ties: Vec<usize> = (0..WIDTH)
            .filter(|&column| values[column] == Some(best_value))
            .collect();
        debug!("search values {:?}, best {:?}", values, ties);

        if ties.is_empty() {
            return WIDTH;
        }
        ties[self.rng.gen_range(0..ties.len())]
    }
}

impl Default for NegamaxSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl OpponentPolicy for NegamaxSelector {
    fn select_column(&mut self, board: &BitBoard) -> usize {
        self.choose(board)
    }
}
