use hasami_shogi::*;
use std::env;
use std::io;

struct Options {
    verbose: bool,
    json: bool,
    config: SessionConfig,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        verbose: true,
        json: false,
        config: SessionConfig::default(),
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--quiet" | "-q" => options.verbose = false,
            "--json" => options.json = true,
            "--strict" => options.config.retry_illegal = false,
            "--max-moves" => {
                let value = args.next().ok_or("--max-moves needs a number")?;
                options.config.max_moves = value
                    .parse()
                    .map_err(|_| format!("Invalid move limit: {}", value))?;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args()?;

    println!("Hasami Shogi");
    println!("============\n");
    println!("Black moves first. Type `help` for commands.\n");

    let console = LineSource::new("Console".to_string(), io::stdin().lock(), io::stdout());
    let mut session = Session::hot_seat(Box::new(console), options.config, options.verbose);
    let result = session.play();

    println!("\n============");
    match result {
        SessionResult::BlackWins { moves } => println!("Black wins in {} moves!", moves),
        SessionResult::RedWins { moves } => println!("Red wins in {} moves!", moves),
        SessionResult::Abandoned { by, moves } => {
            println!("{} left the game after {} moves", by, moves)
        }
        SessionResult::IllegalMove { violator, winner } => {
            println!("{} wins by illegal move (opponent: {})", winner, violator)
        }
        SessionResult::MoveLimit { moves } => println!("Stopped after {} moves", moves),
    }
    println!(
        "Black lost {}, Red lost {}",
        session.game().captured_count(Player::Black),
        session.game().captured_count(Player::Red)
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&session.game().snapshot())?);
    }

    Ok(())
}
