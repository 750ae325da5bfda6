use crate::game::{Game, GameState, Player};
use crate::source::MoveSource;

pub struct SessionConfig {
    pub max_moves: usize,
    /// Ask the same source again after a refused move instead of forfeiting
    pub retry_illegal: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_moves: 500,
            retry_illegal: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    BlackWins { moves: usize },
    RedWins { moves: usize },
    Abandoned { by: Player, moves: usize },
    IllegalMove { violator: Player, winner: Player },
    MoveLimit { moves: usize },
}

impl SessionResult {
    pub fn winner(&self) -> Option<Player> {
        match self {
            SessionResult::BlackWins { .. } => Some(Player::Black),
            SessionResult::RedWins { .. } => Some(Player::Red),
            SessionResult::IllegalMove { winner, .. } => Some(*winner),
            SessionResult::Abandoned { by, .. } => Some(by.opponent()),
            SessionResult::MoveLimit { .. } => None,
        }
    }
}

enum Seats {
    Split {
        black: Box<dyn MoveSource>,
        red: Box<dyn MoveSource>,
    },
    Shared(Box<dyn MoveSource>),
}

impl Seats {
    fn get(&mut self, player: Player) -> &mut dyn MoveSource {
        match self {
            Seats::Split { black, .. } if player == Player::Black => black.as_mut(),
            Seats::Split { red, .. } => red.as_mut(),
            Seats::Shared(source) => source.as_mut(),
        }
    }

    fn for_each(&mut self, mut f: impl FnMut(&mut dyn MoveSource)) {
        match self {
            Seats::Split { black, red } => {
                f(black.as_mut());
                f(red.as_mut());
            }
            Seats::Shared(source) => f(source.as_mut()),
        }
    }
}

/// Drives one game between two move sources
pub struct Session {
    config: SessionConfig,
    game: Game,
    seats: Seats,
    verbose: bool,
}

impl Session {
    pub fn new(
        black: Box<dyn MoveSource>,
        red: Box<dyn MoveSource>,
        config: SessionConfig,
        verbose: bool,
    ) -> Self {
        Session {
            config,
            game: Game::new(),
            seats: Seats::Split { black, red },
            verbose,
        }
    }

    /// Both sides take their moves from the same source
    pub fn hot_seat(source: Box<dyn MoveSource>, config: SessionConfig, verbose: bool) -> Self {
        Session {
            config,
            game: Game::new(),
            seats: Seats::Shared(source),
            verbose,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn play(&mut self) -> SessionResult {
        match &mut self.seats {
            Seats::Split { black, red } => {
                black.game_start(Player::Black);
                red.game_start(Player::Red);
            }
            Seats::Shared(source) => {
                source.game_start(Player::Black);
                source.game_start(Player::Red);
            }
        }

        if self.verbose {
            println!("Game starting:");
            println!("  Black: {}", self.seats.get(Player::Black).name());
            println!("  Red:   {}", self.seats.get(Player::Red).name());
            println!("\nInitial board:");
            println!("{}", self.game.render());
        }

        while !self.game.is_game_over() && self.game.move_count() < self.config.max_moves {
            if let Some(result) = self.play_turn(self.game.active_player()) {
                self.finish();
                return result;
            }
        }

        self.finish();

        let moves = self.game.move_count();
        let result = match self.game.state() {
            GameState::BlackWon => SessionResult::BlackWins { moves },
            GameState::RedWon => SessionResult::RedWins { moves },
            GameState::InProgress => {
                if self.verbose {
                    println!("\nMax moves ({}) reached", self.config.max_moves);
                }
                return SessionResult::MoveLimit { moves };
            }
        };

        if self.verbose {
            if let Some(winner) = result.winner() {
                println!("\n{} wins after {} moves!", winner, moves);
            }
        }
        result
    }

    /// Ask `player`'s source until a move is applied. Returns a result only
    /// when the turn ends the session early.
    fn play_turn(&mut self, player: Player) -> Option<SessionResult> {
        loop {
            let source = self.seats.get(player);

            if self.verbose {
                println!(
                    "\nMove {}: {} ({}) to play",
                    self.game.move_count() + 1,
                    player,
                    source.name()
                );
            }

            let Some(request) = source.next_move(&self.game) else {
                if self.verbose {
                    println!("{} abandoned the game", player);
                }
                return Some(SessionResult::Abandoned {
                    by: player,
                    moves: self.game.move_count(),
                });
            };

            match self.game.play(&request.from, &request.to) {
                Ok(report) => {
                    if self.verbose {
                        println!("{} plays: {}", player, report.mv);
                        if !report.captured.is_empty() {
                            let squares: Vec<String> =
                                report.captured.iter().map(|sq| sq.to_string()).collect();
                            println!("  captures {}", squares.join(", "));
                        }
                        println!("{}", self.game.render());
                    }
                    self.seats.for_each(|s| s.notify_move(&report));
                    return None;
                }
                Err(e) => {
                    if self.verbose {
                        println!(
                            "ILLEGAL MOVE: {} {} -> {}: {}",
                            player, request.from, request.to, e
                        );
                    }
                    source.move_rejected(&e);

                    if !self.config.retry_illegal {
                        return Some(SessionResult::IllegalMove {
                            violator: player,
                            winner: player.opponent(),
                        });
                    }
                }
            }
        }
    }

    fn finish(&mut self) {
        let game = &self.game;
        self.seats.for_each(|s| s.game_end(game));
    }
}
