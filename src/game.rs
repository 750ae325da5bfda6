use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::board::{Board, PIECES_PER_SIDE, ParseSquareError, Square};
use crate::rules::{self, MoveError};

/// A side wins once the opponent has this many pieces captured,
/// leaving one or none on the board.
pub const WIN_THRESHOLD: u8 = (PIECES_PER_SIDE - 1) as u8;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black,
    Red,
}

impl Player {
    pub fn opponent(&self) -> Player {
        match self {
            Player::Black => Player::Red,
            Player::Red => Player::Black,
        }
    }

    fn index(self) -> usize {
        match self {
            Player::Black => 0,
            Player::Red => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "Black"),
            Player::Red => write!(f, "Red"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown color: {0:?}")]
pub struct ParsePlayerError(pub String);

impl FromStr for Player {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "black" => Ok(Player::Black),
            "red" => Ok(Player::Red),
            _ => Err(ParsePlayerError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    BlackWon,
    RedWon,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    UnknownSquare(#[from] ParseSquareError),
    #[error("Invalid move: {0}")]
    Rejected(#[from] MoveError),
}

/// Outcome of a successful move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub mv: Move,
    pub mover: Player,
    pub captured: Vec<Square>,
    pub state: GameState,
}

/// Serializable view of a game for front ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub board: Vec<String>,
    pub active_player: Player,
    pub state: GameState,
    pub black_captured: u8,
    pub red_captured: u8,
    pub move_count: usize,
}

/// A Hasami Shogi game in progress.
///
/// The only way to change the position is [`Game::apply_move`] (or its
/// string wrappers), which validates, moves, resolves captures, updates the
/// result and hands the turn over in one step. A rejected move leaves the
/// game exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    active_player: Player,
    state: GameState,
    /// Pieces of each color removed from the board, indexed by `Player::index`
    captured: [u8; 2],
    move_count: usize,
}

impl Game {
    /// Standard starting position with Black to move
    pub fn new() -> Self {
        Game {
            board: Board::standard(),
            active_player: Player::Black,
            state: GameState::InProgress,
            captured: [0; 2],
            move_count: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn active_player(&self) -> Player {
        self.active_player
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn is_game_over(&self) -> bool {
        self.state != GameState::InProgress
    }

    pub fn winner(&self) -> Option<Player> {
        match self.state {
            GameState::InProgress => None,
            GameState::BlackWon => Some(Player::Black),
            GameState::RedWon => Some(Player::Red),
        }
    }

    /// Number of `color` pieces that have been captured
    pub fn captured_count(&self, color: Player) -> u8 {
        self.captured[color.index()]
    }

    /// Same as [`Game::captured_count`] keyed by a color name such as
    /// `"BLACK"`. Returns `None` for anything that is not a color.
    pub fn captured_count_by_name(&self, color: &str) -> Option<u8> {
        color
            .parse::<Player>()
            .ok()
            .map(|player| self.captured_count(player))
    }

    pub fn pieces_remaining(&self, color: Player) -> usize {
        PIECES_PER_SIDE - self.captured_count(color) as usize
    }

    pub fn occupant_at(&self, sq: Square) -> Option<Player> {
        self.board.occupant_at(sq)
    }

    /// Occupant of the square named by `coord`, `None` when empty.
    pub fn square_occupant(&self, coord: &str) -> Result<Option<Player>, ParseSquareError> {
        Ok(self.board.occupant_at(coord.parse()?))
    }

    /// Every legal move for the side to play
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }

        Board::squares()
            .filter(|&sq| self.board.occupant_at(sq) == Some(self.active_player))
            .flat_map(|sq| rules::legal_moves_from(&self.board, sq))
            .collect()
    }

    /// Move between two algebraic coordinates, reporting why on failure
    pub fn play(&mut self, from: &str, to: &str) -> Result<MoveReport, GameError> {
        let mv = Move::new(from.parse()?, to.parse()?);
        self.apply_move(mv)
    }

    /// Returns `true` if the move was applied
    pub fn make_move(&mut self, from: &str, to: &str) -> bool {
        self.play(from, to).is_ok()
    }

    pub fn apply_move(&mut self, mv: Move) -> Result<MoveReport, GameError> {
        rules::validate_move(&self.board, self.state, self.active_player, mv)?;

        let mover = self.active_player;
        let mut next = self.board.clone();
        next.set_occupant(mv.from, None);
        next.set_occupant(mv.to, Some(mover));

        let captured = rules::plan_captures(&next, mv.to, mover);
        for &sq in &captured {
            next.set_occupant(sq, None);
        }

        self.board = next;
        self.captured[mover.opponent().index()] += captured.len() as u8;
        self.update_state();

        // The turn passes even on the winning move
        self.active_player = mover.opponent();
        self.move_count += 1;

        Ok(MoveReport {
            mv,
            mover,
            captured,
            state: self.state,
        })
    }

    fn update_state(&mut self) {
        if self.captured_count(Player::Black) >= WIN_THRESHOLD {
            self.state = GameState::RedWon;
        } else if self.captured_count(Player::Red) >= WIN_THRESHOLD {
            self.state = GameState::BlackWon;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.rows(),
            active_player: self.active_player,
            state: self.state,
            black_captured: self.captured_count(Player::Black),
            red_captured: self.captured_count(Player::Red),
            move_count: self.move_count,
        }
    }

    /// Get a string representation of the board
    pub fn render(&self) -> String {
        self.board.to_string()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
