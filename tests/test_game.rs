use std::io;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use arena_shooter::config::GameConfig;
use arena_shooter::entities::GameStatus;
use arena_shooter::game::{run, Game};
use arena_shooter::geometry::Vec2;
use arena_shooter::input::{Command, Controls, FrameInput, InputSource};
use arena_shooter::render::{DisplayMode, DrawCall, Renderer, Viewport};

fn new_game() -> Game<StdRng> {
    Game::new(GameConfig::default(), StdRng::seed_from_u64(7))
}

/// Plays back a fixed list of frames, then asks to quit.
struct Script {
    frames: Vec<FrameInput>,
    polled: usize,
}

impl InputSource for Script {
    fn poll(&mut self, _viewport: &Viewport) -> FrameInput {
        self.polled += 1;
        if self.frames.is_empty() {
            return FrameInput {
                controls: Controls::default(),
                commands: vec![Command::Quit],
            };
        }
        self.frames.remove(0)
    }
}

#[derive(Default)]
struct Recorder {
    frames: Vec<Vec<DrawCall>>,
    mode_changes: Vec<DisplayMode>,
    size: Option<(u16, u16)>,
}

impl Renderer for Recorder {
    fn draw(&mut self, frame: &[DrawCall]) -> io::Result<()> {
        self.frames.push(frame.to_vec());
        Ok(())
    }

    fn display_mode(&self) -> DisplayMode {
        self.mode_changes.last().copied().unwrap_or(DisplayMode::Fullscreen)
    }

    fn set_display_mode(&mut self, mode: DisplayMode) -> io::Result<()> {
        self.mode_changes.push(mode);
        Ok(())
    }

    fn resize(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.size = Some((cols, rows));
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            left: 0,
            top: 0,
            cols: 80,
            rows: 30,
            world: Vec2::new(800.0, 600.0),
        }
    }
}

// ── Game::frame ──────────────────────────────────────────────────────────────

#[test]
fn frame_advances_simulation_while_playing() {
    let mut game = new_game();
    for i in 0..30 {
        game.frame(&Controls::default(), Duration::from_millis(i * 16));
    }
    assert_eq!(game.state().frame, 30);
    assert_eq!(game.state().enemies.len(), 1);
}

#[test]
fn game_over_waits_for_restart_then_resets() {
    // Standing still, the chasing enemies eventually win.
    let mut game = new_game();
    for _ in 0..10_000 {
        if game.state().status == GameStatus::GameOver {
            break;
        }
        game.frame(&Controls::default(), Duration::ZERO);
    }
    assert_eq!(game.state().status, GameStatus::GameOver);
    assert_eq!(game.state().player.health, 0);
    let frozen_frame = game.state().frame;

    game.frame(&Controls::default(), Duration::ZERO);
    assert_eq!(game.state().frame, frozen_frame);
    assert_eq!(game.state().status, GameStatus::GameOver);

    let restart = Controls {
        restart: true,
        ..Controls::default()
    };
    game.frame(&restart, Duration::ZERO);
    let s = game.state();
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.player.health, 100);
    assert_eq!(s.ammo.rounds, 30);
    assert_eq!(s.kills, 0);
    assert_eq!(s.frame, 0);
    assert!(s.enemies.is_empty());
    assert!(s.enemy_projectiles.is_empty());
}

// ── run ──────────────────────────────────────────────────────────────────────

#[test]
fn run_renders_each_frame_until_quit() {
    let mut game = new_game();
    let mut renderer = Recorder::default();
    let mut input = Script {
        frames: vec![FrameInput::default(); 3],
        polled: 0,
    };

    run(&mut game, &mut renderer, &mut input).unwrap();
    assert_eq!(input.polled, 4);
    assert_eq!(renderer.frames.len(), 3);
    assert_eq!(game.state().frame, 3);
    assert!(matches!(renderer.frames[0][0], DrawCall::Clear(_)));
}

#[test]
fn run_applies_display_commands() {
    let mut game = new_game();
    let mut renderer = Recorder::default();
    let mut input = Script {
        frames: vec![
            FrameInput {
                controls: Controls::default(),
                commands: vec![Command::ToggleFullscreen],
            },
            FrameInput {
                controls: Controls::default(),
                commands: vec![Command::Resize(120, 50), Command::ToggleFullscreen],
            },
        ],
        polled: 0,
    };

    run(&mut game, &mut renderer, &mut input).unwrap();
    assert_eq!(
        renderer.mode_changes,
        vec![DisplayMode::Windowed, DisplayMode::Fullscreen]
    );
    assert_eq!(renderer.size, Some((120, 50)));
}
