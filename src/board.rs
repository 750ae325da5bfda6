use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::game::Player;

/// Number of rows and columns on the board
pub const BOARD_SIZE: usize = 9;

/// Pieces each side starts with (one full back row)
pub const PIECES_PER_SIDE: usize = BOARD_SIZE;

const ROW_LABELS: [char; BOARD_SIZE] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i'];

/// A square on the board, zero-based. Row 0 is rank `a` (Red's home row),
/// row 8 is rank `i` (Black's home row). Column 0 is file `1`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    /// Callers must keep `row` and `col` below `BOARD_SIZE`; use
    /// [`Square::try_new`] for unchecked input.
    pub const fn new(row: usize, col: usize) -> Self {
        Square { row, col }
    }

    pub fn try_new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// The neighbouring square one step in `dir`, or `None` off the edge.
    pub fn step(self, dir: Direction) -> Option<Square> {
        let (dr, dc) = dir.delta();
        let r = self.row as i32 + dr;
        let c = self.col as i32 + dc;
        if r < 0 || r >= BOARD_SIZE as i32 || c < 0 || c >= BOARD_SIZE as i32 {
            return None;
        }
        Some(Square::new(r as usize, c as usize))
    }

    /// Row letter of the algebraic name
    pub fn rank(&self) -> char {
        ROW_LABELS[self.row]
    }

    /// Column number of the algebraic name (1-based)
    pub fn file(&self) -> usize {
        self.col + 1
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.file())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown square: {0:?}")]
pub struct ParseSquareError(pub String);

impl FromStr for Square {
    type Err = ParseSquareError;

    /// Resolves an algebraic coordinate such as `e5`. Only the 81 names
    /// `a1`..`i9` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSquareError(s.to_string());
        let mut chars = s.chars();
        let (Some(rank), Some(file), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };

        let row = ROW_LABELS.iter().position(|&l| l == rank).ok_or_else(err)?;
        let col = file
            .to_digit(10)
            .filter(|&d| d >= 1 && (d as usize) <= BOARD_SIZE)
            .ok_or_else(err)? as usize
            - 1;

        Ok(Square::new(row, col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// The 9x9 grid. Each cell is empty (`None`) or holds one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Player>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Starting layout: rank `a` all Red, rank `i` all Black.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for col in 0..BOARD_SIZE {
            board.cells[0][col] = Some(Player::Red);
            board.cells[BOARD_SIZE - 1][col] = Some(Player::Black);
        }
        board
    }

    pub fn occupant_at(&self, sq: Square) -> Option<Player> {
        self.cells[sq.row][sq.col]
    }

    /// Unconditional write. Only the move pipeline should call this.
    pub(crate) fn set_occupant(&mut self, sq: Square, occupant: Option<Player>) {
        self.cells[sq.row][sq.col] = occupant;
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.occupant_at(sq).is_none()
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Some(player))
            .count()
    }

    /// All squares in row-major order
    pub fn squares() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
    }

    /// One string per rank, `R`/`B`/`.` per cell
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|&cell| cell_char(cell)).collect())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

fn cell_char(cell: Option<Player>) -> char {
    match cell {
        Some(Player::Black) => 'B',
        Some(Player::Red) => 'R',
        None => '.',
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col + 1)?;
        }
        writeln!(f)?;

        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{}", ROW_LABELS[row])?;
            for &cell in cells {
                write!(f, " {}", cell_char(cell))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
