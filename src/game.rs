/// Game loop orchestration.
///
/// `Game` owns the config, the current round and the RNG; `run` drives it at
/// a fixed frame rate against an `InputSource` and a `Renderer`.

use std::thread;
use std::time::{Duration, Instant};

use log::info;
use rand::Rng;

use crate::compute::{init_state, tick};
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};
use crate::error::ShooterError;
use crate::input::{Command, Controls, InputSource};
use crate::render::{compose, Renderer};

pub struct Game<R: Rng> {
    config: GameConfig,
    state: GameState,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let state = init_state(&config);
        Self { config, state, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Throw away the current round and start a fresh one.
    pub fn restart(&mut self) {
        info!("restarting after {} kills", self.state.kills);
        self.state = init_state(&self.config);
    }

    /// One simulation step. While the round is over, only the restart key is
    /// looked at.
    pub fn frame(&mut self, controls: &Controls, now: Duration) {
        if self.state.status == GameStatus::GameOver {
            if controls.restart {
                self.restart();
            }
            return;
        }
        self.state = tick(&self.state, controls, now, &self.config, &mut self.rng);
    }
}

/// Run until a quit command arrives.
///
/// Each iteration: poll input, apply loop commands, step the simulation,
/// compose and present the frame, then sleep off the rest of the frame
/// budget.
pub fn run<R, D, I>(game: &mut Game<R>, renderer: &mut D, input: &mut I) -> Result<(), ShooterError>
where
    R: Rng,
    D: Renderer,
    I: InputSource,
{
    let frame_budget = game.config().frame_duration();
    let started = Instant::now();

    loop {
        let frame_start = Instant::now();

        let polled = input.poll(&renderer.viewport());
        for command in polled.commands {
            match command {
                Command::Quit => return Ok(()),
                Command::ToggleFullscreen => {
                    let mode = renderer.display_mode().toggled();
                    info!("switching display mode to {:?}", mode);
                    renderer.set_display_mode(mode)?;
                }
                Command::Resize(cols, rows) => renderer.resize(cols, rows)?,
            }
        }

        game.frame(&polled.controls, started.elapsed());
        renderer.draw(&compose(game.state(), game.config()))?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}
