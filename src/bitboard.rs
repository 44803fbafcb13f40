use anyhow::{anyhow, Result};

use crate::{Observation, HEIGHT, OBSERVATION_SIZE, WIDTH};

mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn bottom_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }
    pub const fn full_board_mask() -> u64 {
        bottom_mask() * ((1 << HEIGHT as u64) - 1)
    }
    // bottom cell of the last column, keeps opening book keys unique
    pub const fn book_key_offset() -> u64 {
        1 << ((WIDTH - 1) * (HEIGHT + 1))
    }
}

/// The line directions as (column step, row step)
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (1, -1), (1, 1), (0, 1)];

/// A Connect 4 position from the point of view of the player
///
/// Each side owns a mask with one bit per cell at `column * (HEIGHT + 1) + row`,
/// row 0 being the bottom. The extra bit on top of each column never holds a piece.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBoard {
    // mask of the player's tiles
    player_pieces: u64,
    // mask of the opponent's tiles
    opponent_pieces: u64,
}

impl BitBoard {
    pub fn new() -> Self {
        Self {
            player_pieces: 0,
            opponent_pieces: 0,
        }
    }

    /// Builds a position from a string of 1-indexed columns, the player moving first
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for (ply, column_char) in moves.as_ref().chars().enumerate() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    let column = column - 1;
                    if !board.playable(column) {
                        return Err(anyhow!("Invalid move, column {} full", column + 1));
                    }
                    if ply % 2 == 0 {
                        board.play_player(column);
                    } else {
                        board.play_opponent(column);
                    }
                    // abort if the position is won at any point
                    if Self::is_win(board.player_pieces) || Self::is_win(board.opponent_pieces) {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    /// Builds a position from raw masks, rejecting shared cells and tiles outside the board
    pub fn from_masks(player_pieces: u64, opponent_pieces: u64) -> Result<Self> {
        if player_pieces & opponent_pieces != 0 {
            return Err(anyhow!(
                "Invalid position, cells {:#x} held by both sides",
                player_pieces & opponent_pieces
            ));
        }
        let outside = (player_pieces | opponent_pieces) & !static_masks::full_board_mask();
        if outside != 0 {
            return Err(anyhow!("Invalid position, tiles {:#x} outside the board", outside));
        }
        Ok(Self {
            player_pieces,
            opponent_pieces,
        })
    }

    pub fn player_pieces(&self) -> u64 {
        self.player_pieces
    }

    pub fn opponent_pieces(&self) -> u64 {
        self.opponent_pieces
    }

    /// Mask of all occupied cells
    pub fn occupancy(&self) -> u64 {
        self.player_pieces | self.opponent_pieces
    }

    /// The same position with the two sides exchanged
    pub fn swapped(&self) -> Self {
        Self {
            player_pieces: self.opponent_pieces,
            opponent_pieces: self.player_pieces,
        }
    }

    pub fn num_moves(&self) -> usize {
        self.occupancy().count_ones() as usize
    }

    pub fn top_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
    }

    pub fn bottom_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1))
    }

    /// Whether `column` still has room, given the mask of all tiles
    pub fn is_legal(column: usize, occupancy: u64) -> bool {
        occupancy & Self::top_mask(column) == 0
    }

    /// Drops a tile into `column` and returns the mover's new mask
    ///
    /// `other_pieces` are the tiles of the side that is *not* moving. Adding the
    /// column's bottom bit to the occupancy carries into the lowest empty cell, so
    /// `occupancy | (occupancy + bottom)` is the occupancy after the move and
    /// XOR-ing out the other side leaves exactly the mover's tiles.
    pub fn play(column: usize, occupancy: u64, other_pieces: u64) -> u64 {
        let occupancy = occupancy | (occupancy + Self::bottom_mask(column));
        other_pieces ^ occupancy
    }

    /// Whether `pieces` contains at least one alignment of four
    pub fn is_win(pieces: u64) -> bool {
        // check horizontal alignment
        // mark all horizontal runs of 2
        let mut m = pieces & (pieces >> (HEIGHT + 1));
        // check for runs of 2 * (runs of 2)
        if m & (m >> (2 * (HEIGHT + 1))) != 0 {
            return true;
        }

        // check diagonal alignment 1
        m = pieces & (pieces >> HEIGHT);
        if m & (m >> (2 * HEIGHT)) != 0 {
            return true;
        }

        // check diagonal alignment 2
        m = pieces & (pieces >> (HEIGHT + 2));
        if m & (m >> (2 * (HEIGHT + 2))) != 0 {
            return true;
        }

        // check vertical alignment
        m = pieces & (pieces >> 1);
        if m & (m >> 2) != 0 {
            return true;
        }

        // no alignments
        false
    }

    pub fn is_full(occupancy: u64) -> bool {
        occupancy == static_masks::full_board_mask()
    }

    pub fn playable(&self, column: usize) -> bool {
        column < WIDTH && Self::is_legal(column, self.occupancy())
    }

    pub fn play_player(&mut self, column: usize) {
        self.player_pieces = Self::play(column, self.occupancy(), self.opponent_pieces);
    }

    pub fn play_opponent(&mut self, column: usize) {
        self.opponent_pieces = Self::play(column, self.occupancy(), self.player_pieces);
    }

    pub fn full(&self) -> bool {
        Self::is_full(self.occupancy())
    }

    // key for the opening book
    pub fn book_key(&self) -> u64 {
        self.player_pieces + self.occupancy() + static_masks::book_key_offset()
    }

    /// Flattens the position column by column, bottom to top, skipping the sentinel row
    pub fn observation(&self) -> Observation {
        let mut observation = [0.0; OBSERVATION_SIZE];
        let mut index = 0;
        for bit in 0..WIDTH * (HEIGHT + 1) {
            if (bit + 1) % (HEIGHT + 1) == 0 {
                continue;
            }
            if (self.player_pieces >> bit) & 1 == 1 {
                observation[index] = 1.0;
            } else if (self.opponent_pieces >> bit) & 1 == 1 {
                observation[index] = -1.0;
            }
            index += 1;
        }
        observation
    }

    /// Finds the cells of one alignment of four in `pieces`, as (column, row) pairs
    pub fn winning_line(pieces: u64) -> Option<[(usize, usize); 4]> {
        let occupied = |column: i32, row: i32| {
            column >= 0
                && column < WIDTH as i32
                && row >= 0
                && row < HEIGHT as i32
                && pieces & (1 << (column as usize * (HEIGHT + 1) + row as usize)) != 0
        };

        for &(dc, dr) in DIRECTIONS.iter() {
            for column in 0..WIDTH as i32 {
                for row in 0..HEIGHT as i32 {
                    if (0..4).all(|i| occupied(column + i * dc, row + i * dr)) {
                        let mut line = [(0, 0); 4];
                        for (i, cell) in line.iter_mut().enumerate() {
                            let i = i as i32;
                            *cell = ((column + i * dc) as usize, (row + i * dr) as usize);
                        }
                        return Some(line);
                    }
                }
            }
        }
        None
    }
}
