use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::game::{Game, GameError, MoveReport, Player};

/// A move as typed by a player: two algebraic coordinates, not yet checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
}

impl MoveRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        MoveRequest {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Accepts `e9 e5`, `e9-e5` and `e9 -> e5`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line
            .split(|c: char| c.is_whitespace() || c == '-' || c == '>')
            .filter(|part| !part.is_empty());

        match (parts.next(), parts.next(), parts.next()) {
            (Some(from), Some(to), None) => Some(MoveRequest::new(from, to)),
            _ => None,
        }
    }
}

/// Anything that can supply moves for one or both sides
pub trait MoveSource {
    fn name(&self) -> &str;

    /// The next move for `game.active_player()`, or `None` to abandon the game
    fn next_move(&mut self, game: &Game) -> Option<MoveRequest>;

    /// Notified when the game starts
    fn game_start(&mut self, _player: Player) {}

    /// Notified after every applied move (by either player)
    fn notify_move(&mut self, _report: &MoveReport) {}

    /// Notified when the last move from this source was refused
    fn move_rejected(&mut self, _error: &GameError) {}

    /// Notified when the game ends
    fn game_end(&mut self, _game: &Game) {}
}

/// Plays a fixed list of moves, then gives up
pub struct ScriptedSource {
    name: String,
    moves: VecDeque<MoveRequest>,
}

impl ScriptedSource {
    pub fn new(name: String, moves: Vec<MoveRequest>) -> Self {
        ScriptedSource {
            name,
            moves: moves.into(),
        }
    }

    /// Build from lines such as `"i5 e5"`; unparseable lines are skipped.
    pub fn from_lines(name: String, lines: &[&str]) -> Self {
        Self::new(name, lines.iter().filter_map(|l| MoveRequest::parse(l)).collect())
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_move(&mut self, _game: &Game) -> Option<MoveRequest> {
        self.moves.pop_front()
    }
}

const HELP: &str = "\
Enter a move as two squares, e.g. `i5 e5` or `i5-e5`.
Other commands:
  board     show the board
  json      show the game as JSON
  moves     count legal moves for the side to play
  captured  show capture counts
  quit      abandon the game
";

/// Reads moves line by line, e.g. from stdin, prompting on `output`.
/// One instance can serve both sides of a hot-seat game.
pub struct LineSource<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineSource<R, W> {
    pub fn new(name: String, input: R, output: W) -> Self {
        LineSource {
            name,
            input,
            output,
        }
    }

    /// Handle a non-move command. Returns `false` if the line is unknown.
    fn run_command(&mut self, command: &str, game: &Game) -> std::io::Result<bool> {
        match command {
            "help" | "?" => write!(self.output, "{}", HELP)?,
            "board" => write!(self.output, "{}", game.render())?,
            "json" => match serde_json::to_string_pretty(&game.snapshot()) {
                Ok(json) => writeln!(self.output, "{}", json)?,
                Err(e) => writeln!(self.output, "Could not encode game: {}", e)?,
            },
            "moves" => writeln!(
                self.output,
                "{} has {} legal moves",
                game.active_player(),
                game.legal_moves().len()
            )?,
            "captured" => writeln!(
                self.output,
                "Black lost {}, Red lost {}",
                game.captured_count(Player::Black),
                game.captured_count(Player::Red)
            )?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn read_move(&mut self, game: &Game) -> std::io::Result<Option<MoveRequest>> {
        let mut line = String::new();

        loop {
            write!(self.output, "{}> ", game.active_player())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let command = line.trim().to_lowercase();
            if command.is_empty() {
                continue;
            }
            if command == "quit" || command == "resign" {
                return Ok(None);
            }
            if self.run_command(&command, game)? {
                continue;
            }

            match MoveRequest::parse(&command) {
                Some(request) => return Ok(Some(request)),
                None => writeln!(self.output, "Unrecognised input, type `help`")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> MoveSource for LineSource<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_move(&mut self, game: &Game) -> Option<MoveRequest> {
        // A broken terminal ends the game the same way EOF does
        self.read_move(game).ok().flatten()
    }

    fn move_rejected(&mut self, error: &GameError) {
        let _ = writeln!(self.output, "{}", error);
    }

    fn notify_move(&mut self, report: &MoveReport) {
        if !report.captured.is_empty() {
            let squares: Vec<String> = report.captured.iter().map(|sq| sq.to_string()).collect();
            let _ = writeln!(self.output, "Captured: {}", squares.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_move_request_forms() {
        let expected = Some(MoveRequest::new("i5", "e5"));
        assert_eq!(MoveRequest::parse("i5 e5"), expected);
        assert_eq!(MoveRequest::parse("i5-e5"), expected);
        assert_eq!(MoveRequest::parse("  i5 -> e5  "), expected);
        assert_eq!(MoveRequest::parse("i5"), None);
        assert_eq!(MoveRequest::parse("i5 e5 e4"), None);
        assert_eq!(MoveRequest::parse(""), None);
    }

    #[test]
    fn test_scripted_source_runs_out() {
        let game = Game::new();
        let mut source = ScriptedSource::from_lines("script".to_string(), &["i5 e5", "junk", "a5-d5"]);

        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_move(&game), Some(MoveRequest::new("i5", "e5")));
        assert_eq!(source.next_move(&game), Some(MoveRequest::new("a5", "d5")));
        assert_eq!(source.next_move(&game), None);
    }

    #[test]
    fn test_line_source_skips_commands() {
        let game = Game::new();
        let input = Cursor::new("\nboard\nmoves\nwhat\nI5 E5\n");
        let mut output = Vec::new();

        let request = {
            let mut source = LineSource::new("console".to_string(), input, &mut output);
            source.next_move(&game)
        };

        // Input is lower-cased before parsing
        assert_eq!(request, Some(MoveRequest::new("i5", "e5")));
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("a R R R R R R R R R"));
        assert!(text.contains("Black has 63 legal moves"));
        assert!(text.contains("Unrecognised input"));
        assert!(text.starts_with("Black> "));
    }

    #[test]
    fn test_line_source_quit_and_eof() {
        let game = Game::new();

        let mut source = LineSource::new("console".to_string(), Cursor::new("quit\ni5 e5\n"), Vec::new());
        assert_eq!(source.next_move(&game), None);

        let mut source = LineSource::new("console".to_string(), Cursor::new(""), Vec::new());
        assert_eq!(source.next_move(&game), None);
    }

    #[test]
    fn test_line_source_json_command() {
        let game = Game::new();
        let mut output = Vec::new();
        {
            let mut source = LineSource::new("console".to_string(), Cursor::new("json\n"), &mut output);
            assert_eq!(source.next_move(&game), None);
        }

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"active_player\": \"Black\""));
        assert!(text.contains("\"state\": \"InProgress\""));
    }
}
