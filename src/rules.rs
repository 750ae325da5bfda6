//! Movement and capture rules.
//!
//! Everything here is a pure function over a borrowed [`Board`]. The engine
//! in [`crate::game`] decides when to call these and applies the results.

use thiserror::Error;

use crate::board::{BOARD_SIZE, Board, Direction, Square};
use crate::game::{GameState, Move, Player};

const LAST: usize = BOARD_SIZE - 1;

/// Why a move was refused. Variants are listed in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Game already over")]
    GameOver,
    #[error("No piece on {0}")]
    EmptySquare(Square),
    #[error("Piece on {0} belongs to the other player")]
    WrongTurn(Square),
    #[error("Piece must move at least one square")]
    NoOp,
    #[error("Pieces move only along a rank or a file")]
    IllegalAxis,
    #[error("Path blocked at {0}")]
    PathBlocked(Square),
}

/// A board corner together with the two orthogonal squares that trap it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerPattern {
    pub corner: Square,
    pub anchors: [Square; 2],
}

impl CornerPattern {
    /// If `sq` is one of the anchors, returns the other one.
    pub fn partner_of(&self, sq: Square) -> Option<Square> {
        match self.anchors {
            [a, b] if a == sq => Some(b),
            [a, b] if b == sq => Some(a),
            _ => None,
        }
    }
}

pub const CORNER_PATTERNS: [CornerPattern; 4] = [
    // a1
    CornerPattern {
        corner: Square::new(0, 0),
        anchors: [Square::new(1, 0), Square::new(0, 1)],
    },
    // a9
    CornerPattern {
        corner: Square::new(0, LAST),
        anchors: [Square::new(1, LAST), Square::new(0, LAST - 1)],
    },
    // i1
    CornerPattern {
        corner: Square::new(LAST, 0),
        anchors: [Square::new(LAST - 1, 0), Square::new(LAST, 1)],
    },
    // i9
    CornerPattern {
        corner: Square::new(LAST, LAST),
        anchors: [Square::new(LAST - 1, LAST), Square::new(LAST, LAST - 1)],
    },
];

/// Check `mv` for `active` without touching the board.
pub fn validate_move(
    board: &Board,
    state: GameState,
    active: Player,
    mv: Move,
) -> Result<(), MoveError> {
    if state != GameState::InProgress {
        return Err(MoveError::GameOver);
    }

    match board.occupant_at(mv.from) {
        None => return Err(MoveError::EmptySquare(mv.from)),
        Some(owner) if owner != active => return Err(MoveError::WrongTurn(mv.from)),
        Some(_) => {}
    }

    let dir = direction_between(mv.from, mv.to)?;

    // Walk every square after `from` up to and including `to`
    let mut current = mv.from;
    while current != mv.to {
        current = current.step(dir).ok_or(MoveError::IllegalAxis)?;
        if !board.is_empty(current) {
            return Err(MoveError::PathBlocked(current));
        }
    }

    Ok(())
}

fn direction_between(from: Square, to: Square) -> Result<Direction, MoveError> {
    if from == to {
        return Err(MoveError::NoOp);
    }
    if from.row == to.row {
        Ok(if to.col > from.col {
            Direction::Right
        } else {
            Direction::Left
        })
    } else if from.col == to.col {
        Ok(if to.row > from.row {
            Direction::Down
        } else {
            Direction::Up
        })
    } else {
        Err(MoveError::IllegalAxis)
    }
}

/// All squares a piece on `from` could slide to.
pub fn legal_moves_from(board: &Board, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();

    for dir in Direction::ALL {
        let mut current = from;
        while let Some(next) = current.step(dir) {
            if !board.is_empty(next) {
                break;
            }
            moves.push(Move::new(from, next));
            current = next;
        }
    }

    moves
}

/// Corner piece trapped by a piece arriving on `to`, if any.
///
/// `board` must already show the mover on `to`.
pub fn corner_capture(board: &Board, to: Square, mover: Player) -> Option<Square> {
    CORNER_PATTERNS.iter().find_map(|pattern| {
        let partner = pattern.partner_of(to)?;
        let trapped = board.occupant_at(partner) == Some(mover)
            && board.occupant_at(pattern.corner) == Some(mover.opponent());
        trapped.then_some(pattern.corner)
    })
}

/// Enemy run starting next to `to` in `dir` that is closed off by a friendly
/// piece. Empty if the run is empty, or ends at an empty square or the edge.
pub fn custodian_run(board: &Board, to: Square, mover: Player, dir: Direction) -> Vec<Square> {
    let enemy = Some(mover.opponent());
    let mut run = Vec::new();
    let mut current = to.step(dir);

    loop {
        match current {
            Some(sq) if board.occupant_at(sq) == enemy => {
                run.push(sq);
                current = sq.step(dir);
            }
            Some(sq) if board.occupant_at(sq) == Some(mover) => return run,
            _ => return Vec::new(),
        }
    }
}

/// Every square emptied by a piece of `mover` arriving on `to`.
///
/// `board` must already show the mover on `to`.
pub fn plan_captures(board: &Board, to: Square, mover: Player) -> Vec<Square> {
    let mut captured: Vec<Square> = corner_capture(board, to, mover).into_iter().collect();

    for dir in Direction::ALL {
        for sq in custodian_run(board, to, mover, dir) {
            if !captured.contains(&sq) {
                captured.push(sq);
            }
        }
    }

    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn mv(from: &str, to: &str) -> Move {
        Move::new(sq(from), sq(to))
    }

    fn board_with(pieces: &[(&str, Player)]) -> Board {
        let mut board = Board::empty();
        for &(name, player) in pieces {
            board.set_occupant(sq(name), Some(player));
        }
        board
    }

    #[test]
    fn test_corner_table_matches_board_corners() {
        let names: Vec<(String, [String; 2])> = CORNER_PATTERNS
            .iter()
            .map(|p| (p.corner.to_string(), p.anchors.map(|a| a.to_string())))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a1".to_string(), ["b1".to_string(), "a2".to_string()]),
                ("a9".to_string(), ["b9".to_string(), "a8".to_string()]),
                ("i1".to_string(), ["h1".to_string(), "i2".to_string()]),
                ("i9".to_string(), ["h9".to_string(), "i8".to_string()]),
            ]
        );
    }

    #[test]
    fn test_partner_of() {
        let pattern = CORNER_PATTERNS[0];
        assert_eq!(pattern.partner_of(sq("b1")), Some(sq("a2")));
        assert_eq!(pattern.partner_of(sq("a2")), Some(sq("b1")));
        assert_eq!(pattern.partner_of(sq("a1")), None);
        assert_eq!(pattern.partner_of(sq("b2")), None);
    }

    #[test]
    fn test_validate_precedence_game_over_first() {
        let board = Board::standard();
        // Even a malformed move reports the finished game
        assert_eq!(
            validate_move(&board, GameState::BlackWon, Player::Black, mv("e5", "d4")),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_validate_ownership() {
        let board = Board::standard();
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("e5", "e6")),
            Err(MoveError::EmptySquare(sq("e5")))
        );
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("a1", "b1")),
            Err(MoveError::WrongTurn(sq("a1")))
        );
    }

    #[test]
    fn test_validate_axis() {
        let board = Board::standard();
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("i5", "i5")),
            Err(MoveError::NoOp)
        );
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("i5", "h4")),
            Err(MoveError::IllegalAxis)
        );
    }

    #[test]
    fn test_validate_path() {
        let board = board_with(&[("e1", Player::Black), ("e5", Player::Red)]);
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("e1", "e9")),
            Err(MoveError::PathBlocked(sq("e5")))
        );
        // Destination itself occupied
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("e1", "e5")),
            Err(MoveError::PathBlocked(sq("e5")))
        );
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("e1", "e4")),
            Ok(())
        );
        // Both vertical directions
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("e1", "a1")),
            Ok(())
        );
        assert_eq!(
            validate_move(&board, GameState::InProgress, Player::Black, mv("e1", "i1")),
            Ok(())
        );
    }

    #[test]
    fn test_legal_moves_from_open_center() {
        let board = board_with(&[("e5", Player::Black)]);
        let moves = legal_moves_from(&board, sq("e5"));
        // 8 squares along the rank plus 8 along the file
        assert_eq!(moves.len(), 16);
        assert!(moves.iter().all(|m| m.to.row == 4 || m.to.col == 4));
    }

    #[test]
    fn test_legal_moves_from_start_position() {
        let board = Board::standard();
        // Only straight up the file, seven empty ranks
        let moves = legal_moves_from(&board, sq("i5"));
        assert_eq!(moves.len(), 7);
        assert!(moves.contains(&mv("i5", "b5")));
        assert!(!moves.contains(&mv("i5", "a5")));
    }

    #[test]
    fn test_custodian_single() {
        let board = board_with(&[
            ("e3", Player::Black),
            ("e4", Player::Red),
            ("e5", Player::Black),
        ]);
        assert_eq!(
            custodian_run(&board, sq("e5"), Player::Black, Direction::Left),
            vec![sq("e4")]
        );
        assert!(custodian_run(&board, sq("e5"), Player::Black, Direction::Right).is_empty());
    }

    #[test]
    fn test_custodian_run_open_ended() {
        // Ends at the edge
        let board = board_with(&[
            ("e1", Player::Red),
            ("e2", Player::Red),
            ("e3", Player::Black),
        ]);
        assert!(custodian_run(&board, sq("e3"), Player::Black, Direction::Left).is_empty());

        // Ends at an empty square
        let board = board_with(&[
            ("e2", Player::Red),
            ("e3", Player::Red),
            ("e4", Player::Black),
        ]);
        assert!(custodian_run(&board, sq("e4"), Player::Black, Direction::Left).is_empty());
    }

    #[test]
    fn test_corner_capture_needs_partner() {
        let board = board_with(&[("a1", Player::Red), ("b1", Player::Black)]);
        assert_eq!(corner_capture(&board, sq("b1"), Player::Black), None);

        let board = board_with(&[
            ("a1", Player::Red),
            ("b1", Player::Black),
            ("a2", Player::Black),
        ]);
        assert_eq!(corner_capture(&board, sq("b1"), Player::Black), Some(sq("a1")));
        assert_eq!(corner_capture(&board, sq("a2"), Player::Black), Some(sq("a1")));
    }

    #[test]
    fn test_corner_capture_ignores_friendly_corner() {
        let board = board_with(&[
            ("i9", Player::Black),
            ("h9", Player::Black),
            ("i8", Player::Black),
        ]);
        assert_eq!(corner_capture(&board, sq("h9"), Player::Black), None);
    }

    #[test]
    fn test_plan_captures_combines_directions() {
        //   d5 R
        // e4 R e5 B e6 R
        //   f5 R
        let board = board_with(&[
            ("e5", Player::Black),
            ("e4", Player::Red),
            ("e3", Player::Black),
            ("e6", Player::Red),
            ("e7", Player::Red),
            ("e8", Player::Black),
            ("d5", Player::Red),
            ("f5", Player::Red),
            ("g5", Player::Black),
        ]);
        let mut captured = plan_captures(&board, sq("e5"), Player::Black);
        captured.sort_by_key(|s| (s.row, s.col));
        assert_eq!(captured, vec![sq("e4"), sq("e6"), sq("e7"), sq("f5")]);
    }
}
