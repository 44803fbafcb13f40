use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use connect4_engine::{
    config::Config,
    game::{Game, Outcome, TurnState},
    move_selector::NegamaxSelector,
    opening_book::OpeningBook,
    stats::EpisodeStats,
    WIDTH,
};

mod display;
use display::*;

const DEFAULT_CONFIG_PATH: &str = "connect4.toml";

fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load_or_default(&config_path)?;
    info!("using {:?}", config);

    println!("Welcome to Connect 4\n");

    // extra opening book replies are optional
    let opening_book = match &config.opening_book {
        Some(path) => match OpeningBook::load(path) {
            Ok(book) => {
                println!("Loaded opening book with {} replies", book.len());
                book
            }
            Err(err) => {
                println!(
                    "Error reading opening book: {}, using built-in replies",
                    err.root_cause()
                );
                OpeningBook::new()
            }
        },
        None => OpeningBook::new(),
    };

    loop {
        let answer =
            prompt("Play (p), watch engine vs engine (w), batch self-play (s) or quit (q)? ")?;
        match answer.chars().next() {
            Some('p') => play(&config, &opening_book)?,
            Some('w') => watch(&config, &opening_book)?,
            Some('s') => self_play(&config, &opening_book),
            Some('q') => break,
            _ => println!("Unknown answer given"),
        }
    }
    Ok(())
}

/// An engine for one side; `stream` keeps seeded engines apart
fn engine(config: &Config, opening_book: &OpeningBook, stream: u64) -> NegamaxSelector {
    let selector = match config.seed {
        Some(seed) => NegamaxSelector::with_seed(seed.wrapping_add(stream)),
        None => NegamaxSelector::new(),
    };
    selector
        .with_depth(config.search_depth)
        .with_opening_book(opening_book.clone())
}

/// Human player against the engine, pausing before each reply
fn play(config: &Config, opening_book: &OpeningBook) -> Result<()> {
    let mut game = Game::with_policy(engine(config, opening_book, 0));
    let delay = Duration::from_millis(config.opponent_delay_ms);

    loop {
        draw_board(game.board(), game.winning_line())?;

        match game.turn_state() {
            TurnState::Idle => {
                let input = prompt("Move input > ")?;
                let column = match input.parse::<usize>() {
                    Ok(column @ 1..=WIDTH) => column - 1,
                    _ => {
                        println!(
                            "Invalid move, columns must be between 1 and {}: {}",
                            WIDTH, input
                        );
                        continue;
                    }
                };
                // a full column is not refused, it loses the game
                game.submit_player_move(column)?;
            }
            TurnState::AwaitingOpponentHalf => {
                println!("Opponent is thinking...");
                stdout().flush()?;
                thread::sleep(delay);
                game.submit_opponent_half()?;
            }
            TurnState::Done => {
                print_outcome(game.outcome());
                if !ask_yes_no("Play again? y/n: ")? {
                    break;
                }
                game.reset();
            }
        }
    }

    print_stats(&game.flush_stats());
    Ok(())
}

/// Engine against engine, one full turn at a time
fn watch(config: &Config, opening_book: &OpeningBook) -> Result<()> {
    let mut game = Game::with_policy(engine(config, opening_book, 0));
    let mut player = engine(config, opening_book, 1);
    let delay = Duration::from_millis(config.opponent_delay_ms);

    while !game.outcome().is_terminal() {
        draw_board(game.board(), None)?;
        let column = player.choose(&game.board().swapped());
        println!("Player plays column {}", column + 1);
        thread::sleep(delay);
        game.submit_full_turn(column)?;
    }

    draw_board(game.board(), game.winning_line())?;
    print_outcome(game.outcome());
    Ok(())
}

/// Plays `self_play_episodes` engine games in parallel and reports the totals
fn self_play(config: &Config, opening_book: &OpeningBook) {
    let episodes = config.self_play_episodes;

    let progress = ProgressBar::new(episodes as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Self-play: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let stats = (0..episodes)
        .into_par_iter()
        .map(|episode| {
            let stream = 2 * episode as u64;
            let mut game = Game::with_policy(engine(config, opening_book, stream));
            let mut player = engine(config, opening_book, stream + 1);

            while !game.outcome().is_terminal() {
                let column = player.choose(&game.board().swapped());
                if let Err(err) = game.submit_full_turn(column) {
                    warn!("episode {} aborted: {}", episode, err);
                    break;
                }
            }
            progress.inc(1);
            game.stats()
        })
        .reduce(EpisodeStats::new, |a, b| a + b);

    progress.finish();
    print_stats(&stats);
}

fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::PlayerWin => println!("Player wins!"),
        Outcome::OpponentWin => println!("Opponent wins!"),
        Outcome::Draw => println!("Draw!"),
        Outcome::Ongoing => {}
    }
}

fn print_stats(stats: &EpisodeStats) {
    println!(
        "Episodes: {}, player win rate: {:.1}%, mean reward: {:.3}, mean length: {:.1} half-moves",
        stats.episodes,
        stats.win_rate() * 100.0,
        stats.mean_reward(),
        stats.mean_length()
    );
}

fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    stdout().flush()?;

    let mut buffer = String::new();
    if stdin().read_line(&mut buffer)? == 0 {
        return Err(anyhow!("stdin closed"));
    }
    Ok(buffer.trim().to_lowercase())
}

fn ask_yes_no(question: &str) -> Result<bool> {
    loop {
        match prompt(question)?.chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}
