mod files;
mod import;
mod player;
mod render;
mod sinks;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use coople_game::constants::{MSG_SHARE_COPIED, SEARCH_MAX_MATCHES};
use coople_game::{
    DailySession, DateKey, GuessError, GuessOutcome, Playback, PuzzleEngine, SessionError,
    ShareError, ShareSink,
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use files::{DataPaths, FileStorage};
use player::SimulatedPlayer;
use sinks::{ClipboardSink, WriterSink};

const TICK_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "coople", version)]
#[command(about = "Guess the song from a few seconds of audio, one puzzle a day")]
struct Args {
    /// Directory holding songdb.json and solutions.json
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// File that keeps progress and lifetime stats
    #[arg(long, global = true, default_value = "coople-state.json")]
    state: PathBuf,

    /// Optional puzzle configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Puzzle date (YYYYMMDD or YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    date: Option<DateKey>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show today's guesses and how much audio is unlocked
    Status,
    /// Submit a guess by exact song name
    Guess {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Suggest song names matching a partial query
    Search {
        #[arg(num_args = 0..)]
        query: Vec<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Play the unlocked part of today's clip
    Listen {
        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },
    /// Copy the result summary to the clipboard
    Share {
        /// Print the summary instead
        #[arg(long)]
        stdout: bool,
    },
    /// Lifetime results
    Stats,
    /// Merge catalog files or playlist CSV exports into the song database
    AddSongs {
        #[arg(long)]
        songdb: PathBuf,
        #[arg(long = "in", value_name = "FILE", num_args = 1..)]
        inputs: Vec<PathBuf>,
        /// Song ids to leave out
        #[arg(long, num_args = 1..)]
        exclude: Vec<String>,
        /// Playlist import filter: min_popularity, include, exclude
        #[arg(long, value_name = "JSON")]
        import_config: Option<PathBuf>,
    },
    /// Choose the answer for a date
    SelectSolution {
        #[arg(value_name = "DATE")]
        day: DateKey,
        name: String,
        #[arg(long)]
        songdb: Option<PathBuf>,
        #[arg(long)]
        solutions: Option<PathBuf>,
        /// 1-based choice among several matches
        #[arg(long)]
        pick: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match &args.command {
        Command::AddSongs {
            songdb,
            inputs,
            exclude,
            import_config,
        } => {
            let config = import::ImportConfig::load(import_config.as_deref())?;
            println!("{}", tools::add_songs(songdb, inputs, exclude, &config)?);
            return Ok(());
        }
        Command::SelectSolution {
            day,
            name,
            songdb,
            solutions,
            pick,
        } => {
            let paths = DataPaths::in_dir(&args.data_dir);
            let report = tools::select_solution(
                songdb.as_deref().unwrap_or(&paths.songdb),
                solutions.as_deref().unwrap_or(&paths.solutions),
                *day,
                name,
                *pick,
                SEARCH_MAX_MATCHES,
            )?;
            println!("{report}");
            return Ok(());
        }
        _ => {}
    }

    let engine = open_engine(&args).await?;
    let date = args.date.unwrap_or_else(DateKey::today);
    match &args.command {
        Command::Status => {
            println!("{}", render::banner());
            if let Some(session) = open_session(&engine, date)? {
                println!("{}", render::session(&session));
            }
        }
        Command::Guess { text } => {
            if let Some(mut session) = open_session(&engine, date)? {
                submit(&mut session, &text.join(" "))?;
            }
        }
        Command::Search { query, limit } => {
            let query = query.join(" ");
            let hits = match limit {
                Some(limit) => coople_game::search(&query, &engine.data().catalog, *limit),
                None => engine.search(&query),
            };
            println!("{}", render::suggestions(&hits));
        }
        Command::Listen { speed } => {
            if let Some(session) = open_session(&engine, date)? {
                listen(&session, *speed).await;
            }
        }
        Command::Share { stdout: to_stdout } => {
            if let Some(session) = open_session(&engine, date)? {
                share(&session, *to_stdout);
            }
        }
        Command::Stats => {
            println!("{}", render::stats(&engine.stats()?));
        }
        Command::AddSongs { .. } | Command::SelectSolution { .. } => {}
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

async fn open_engine(args: &Args) -> Result<PuzzleEngine<FileStorage>> {
    let config = files::load_config(args.config.as_deref())?;
    let data = files::load_puzzle_data(&DataPaths::in_dir(&args.data_dir)).await?;
    Ok(PuzzleEngine::new(data, FileStorage::new(&args.state), config))
}

/// Open the day's session, printing the reason when there is none to play.
fn open_session(
    engine: &PuzzleEngine<FileStorage>,
    date: DateKey,
) -> Result<Option<DailySession<'_, FileStorage>>> {
    match engine.session(date) {
        Ok(session) => Ok(Some(session)),
        Err(SessionError::Unavailable(reason)) => {
            println!("{}", render::unavailable(&reason));
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn submit(session: &mut DailySession<'_, FileStorage>, guess: &str) -> Result<()> {
    match session.submit_guess(guess) {
        Ok(GuessOutcome::Continue { remaining }) => {
            println!("{} {remaining} guess(es) left.", "Nope.".red().bold());
        }
        Ok(GuessOutcome::Won { .. } | GuessOutcome::Lost) => {}
        Err(SessionError::Guess(err @ GuessError::NotFound { .. })) => {
            println!("{}", err.to_string().red());
            return Ok(());
        }
        Err(SessionError::Guess(GuessError::AlreadyComplete { completion })) => {
            println!("{}", format!("Already finished ({completion}).").yellow());
        }
        Err(e) => return Err(e.into()),
    }
    println!("{}", render::session(session));
    if let Ok(text) = session.share_text() {
        println!("{text}");
    }
    Ok(())
}

async fn listen(session: &DailySession<'_, FileStorage>, speed: f64) {
    let sprite = session.current_sprite();
    let window = session.reveal_window();
    println!("▶ {} from {}", sprite.name.bold(), session.audio_path());
    let mut playback = Playback::new(SimulatedPlayer::new(speed));
    let last = player::listen(&mut playback, &sprite, window, TICK_PERIOD, |tick| {
        print!("\r{}", render::meter(&tick.progress));
        let _ = std::io::Write::flush(&mut stdout());
    })
    .await;
    println!();
    log::debug!("stopped at {} ms", last.progress.position_ms);
}

fn share(session: &DailySession<'_, FileStorage>, to_stdout: bool) {
    let text = match session.share_text() {
        Ok(text) => text,
        Err(ShareError::InProgress) => {
            println!("{}", ShareError::InProgress.to_string().yellow());
            return;
        }
    };
    if to_stdout {
        if let Err(e) = WriterSink(stdout()).write_text(&text) {
            log::warn!("stdout share failed: {}", e.reason);
        }
        return;
    }
    match ClipboardSink.write_text(&text) {
        Ok(()) => println!("{}", MSG_SHARE_COPIED.green()),
        Err(e) => eprintln!("{}", e.to_string().red()),
    }
}
