use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use env_logger::{Env, Target};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arena_shooter::config::{GameConfig, LoggingConfig};
use arena_shooter::display::TerminalRenderer;
use arena_shooter::error::ShooterError;
use arena_shooter::game::{run, Game};
use arena_shooter::input::{ChannelInput, InputTracker};
use arena_shooter::render::DisplayMode;

const DEFAULT_CONFIG: &str = "shooter.toml";

// ── Start-up ──────────────────────────────────────────────────────────────────

/// First CLI argument, else `shooter.toml` if present, else built-in defaults.
fn load_config() -> Result<GameConfig, ShooterError> {
    let path = match std::env::args_os().nth(1) {
        Some(arg) => Some(PathBuf::from(arg)),
        None if Path::new(DEFAULT_CONFIG).exists() => Some(PathBuf::from(DEFAULT_CONFIG)),
        None => None,
    };
    match path {
        Some(path) => Ok(GameConfig::load(&path)?),
        None => Ok(GameConfig::default()),
    }
}

/// The terminal belongs to the game, so log lines go to a file.
fn init_logging(config: &LoggingConfig) -> Result<(), ShooterError> {
    let file = File::create(&config.file)?;
    env_logger::Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), ShooterError> {
    let config = load_config()?;
    init_logging(&config.logging)?;
    info!("starting with {:?}", config);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = play(&mut out, config, rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("exiting with error: {}", e);
    }
    result
}

fn play<W: std::io::Write>(
    out: &mut W,
    config: GameConfig,
    rx: mpsc::Receiver<Event>,
) -> Result<(), ShooterError> {
    let mode = if config.display.start_fullscreen {
        DisplayMode::Fullscreen
    } else {
        DisplayMode::Windowed
    };
    let mut renderer = TerminalRenderer::new(
        out,
        mode,
        terminal::size()?,
        (config.display.windowed_cols, config.display.windowed_rows),
        config.arena_size(),
    );
    let mut input = ChannelInput::new(
        rx,
        InputTracker::new(config.keys.clone(), config.arena_center()),
    );
    let mut game = Game::new(config, StdRng::from_entropy());

    run(&mut game, &mut renderer, &mut input)
}
