//! The turn controller: one game played as alternating player and opponent half-moves

use log::{info, warn};

use crate::{
    bitboard::BitBoard,
    error::GameError,
    move_selector::{NegamaxSelector, OpponentPolicy},
    stats::EpisodeStats,
    Observation, OBSERVATION_SIZE, WIDTH,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    PlayerWin,
    OpponentWin,
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        *self != Outcome::Ongoing
    }

    /// The episode reward from the player's point of view, `None` while playing
    pub fn reward(&self) -> Option<f32> {
        match self {
            Outcome::Ongoing => None,
            Outcome::PlayerWin => Some(1.0),
            Outcome::OpponentWin => Some(-1.0),
            Outcome::Draw => Some(0.0),
        }
    }
}

/// Which half-move the game accepts next
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for the player
    Idle,
    /// The player has moved, the opponent has not replied yet
    AwaitingOpponentHalf,
    /// The outcome is decided, only a reset continues
    Done,
}

/// A game against a pluggable opponent
///
/// A full turn is split into [`Game::submit_player_move`] and [`Game::submit_opponent_half`]
/// so the caller can take as long as it likes between the two, e.g. to show the
/// opponent thinking. [`Game::submit_full_turn`] runs both at once.
///
/// Playing into a full column is not refused: it loses the game for whoever tried.
pub struct Game {
    board: BitBoard,
    outcome: Outcome,
    state: TurnState,
    observation: Observation,
    // half-moves in the current episode
    episode_length: u32,
    stats: EpisodeStats,
    policy: Box<dyn OpponentPolicy + Send>,
}

impl Game {
    /// Creates a new game against the built-in negamax opponent
    pub fn new() -> Self {
        Self::with_policy(NegamaxSelector::new())
    }

    /// Creates a new game against the given opponent
    pub fn with_policy<P: OpponentPolicy + Send + 'static>(policy: P) -> Self {
        Self::from_board(BitBoard::new(), policy)
    }

    /// Creates a game continuing from `board`, with the player to move
    ///
    /// A board that is already won or full starts out `Done`.
    pub fn from_board<P: OpponentPolicy + Send + 'static>(board: BitBoard, policy: P) -> Self {
        let outcome = if BitBoard::is_win(board.player_pieces()) {
            Outcome::PlayerWin
        } else if BitBoard::is_win(board.opponent_pieces()) {
            Outcome::OpponentWin
        } else if board.full() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        };
        Self {
            board,
            outcome,
            state: if outcome.is_terminal() {
                TurnState::Done
            } else {
                TurnState::Idle
            },
            observation: board.observation(),
            episode_length: 0,
            stats: EpisodeStats::new(),
            policy: Box::new(policy),
        }
    }

    /// Swaps the opponent, e.g. for a learned policy. The position is kept.
    pub fn set_policy<P: OpponentPolicy + Send + 'static>(&mut self, policy: P) {
        self.policy = Box::new(policy);
    }

    /// Starts a new episode on an empty board. Statistics are kept.
    pub fn reset(&mut self) {
        self.board = BitBoard::new();
        self.outcome = Outcome::Ongoing;
        self.state = TurnState::Idle;
        self.observation = [0.0; OBSERVATION_SIZE];
        self.episode_length = 0;
    }

    /// Plays the player's half of the turn
    ///
    /// A full column, or any move once the game is over, counts as a loss
    /// for the player and is reported as [`Outcome::OpponentWin`].
    pub fn submit_player_move(&mut self, column: usize) -> Result<Outcome, GameError> {
        if column >= WIDTH {
            return Err(GameError::InvalidColumn(column));
        }
        match self.state {
            TurnState::Idle => {}
            TurnState::Done => {
                warn!("player moved in column {} after the game ended", column);
                return Ok(Outcome::OpponentWin);
            }
            TurnState::AwaitingOpponentHalf => {
                return Err(GameError::OutOfTurn { state: self.state });
            }
        }

        if !self.board.playable(column) {
            warn!("player played into full column {}", column);
            return Ok(self.finish(Outcome::OpponentWin));
        }

        self.board.play_player(column);
        self.episode_length += 1;
        if BitBoard::is_win(self.board.player_pieces()) {
            return Ok(self.finish(Outcome::PlayerWin));
        }
        if self.board.full() {
            return Ok(self.finish(Outcome::Draw));
        }

        self.state = TurnState::AwaitingOpponentHalf;
        self.observation = self.board.observation();
        Ok(Outcome::Ongoing)
    }

    /// Plays the opponent's half of the turn, as chosen by the policy
    ///
    /// An unplayable choice loses the game for the opponent.
    pub fn submit_opponent_half(&mut self) -> Result<Outcome, GameError> {
        match self.state {
            TurnState::AwaitingOpponentHalf => {}
            TurnState::Done => return Ok(self.outcome),
            TurnState::Idle => return Err(GameError::OutOfTurn { state: self.state }),
        }

        let column = self.policy.select_column(&self.board);
        if !self.board.playable(column) {
            warn!("opponent chose unplayable column {}", column);
            return Ok(self.finish(Outcome::PlayerWin));
        }

        self.board.play_opponent(column);
        self.episode_length += 1;
        if BitBoard::is_win(self.board.opponent_pieces()) {
            return Ok(self.finish(Outcome::OpponentWin));
        }
        if self.board.full() {
            return Ok(self.finish(Outcome::Draw));
        }

        self.state = TurnState::Idle;
        self.observation = self.board.observation();
        Ok(Outcome::Ongoing)
    }

    /// Plays the player's half and, if the game goes on, the opponent's half
    pub fn submit_full_turn(&mut self, column: usize) -> Result<Outcome, GameError> {
        let outcome = self.submit_player_move(column)?;
        if self.state == TurnState::AwaitingOpponentHalf {
            return self.submit_opponent_half();
        }
        Ok(outcome)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.outcome = outcome;
        self.state = TurnState::Done;
        self.observation = self.board.observation();
        let reward = outcome.reward().unwrap_or(0.0);
        self.stats.record(reward, self.episode_length);
        info!(
            "episode finished: {:?} after {} half-moves",
            outcome, self.episode_length
        );
        outcome
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn turn_state(&self) -> TurnState {
        self.state
    }

    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    /// The four cells that decided a won game, as (column, row) pairs
    pub fn winning_line(&self) -> Option<[(usize, usize); 4]> {
        match self.outcome {
            Outcome::PlayerWin => BitBoard::winning_line(self.board.player_pieces()),
            Outcome::OpponentWin => BitBoard::winning_line(self.board.opponent_pieces()),
            _ => None,
        }
    }

    pub fn stats(&self) -> EpisodeStats {
        self.stats
    }

    /// Returns the statistics gathered so far and starts counting afresh
    pub fn flush_stats(&mut self) -> EpisodeStats {
        std::mem::take(&mut self.stats)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
