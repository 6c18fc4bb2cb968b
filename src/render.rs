/// Frame composition: translates game state into backend-neutral draw calls.
///
/// No terminal I/O happens here. `compose` builds a `Vec<DrawCall>` from an
/// immutable view of the state, and a `Renderer` turns that list into
/// whatever its output is.

use std::io;

use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};
use crate::geometry::{Rect, Vec2};

// ── Palette ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    White,
    Green,
    Red,
    Black,
    LightGray,
}

const C_BACKGROUND: Color = Color::Black;
const C_PLAYER: Color = Color::Green;
const C_ENEMY: Color = Color::Red;
const C_PROJECTILE: Color = Color::White;
const C_HEALTH_BG: Color = Color::Red;
const C_HEALTH_FG: Color = Color::Green;
const C_HUD: Color = Color::LightGray;
const C_BANNER: Color = Color::White;

/// Health bar geometry, in arena units from the bottom-left corner.
const HEALTH_BAR_MARGIN: f32 = 10.0;
const HEALTH_BAR_LENGTH: f32 = 100.0;
const HEALTH_BAR_HEIGHT: f32 = 20.0;

// ── Draw calls ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    Large,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        anchor: Vec2,
        align: Align,
        size: TextSize,
        color: Color,
    },
}

// ── Screen mapping ───────────────────────────────────────────────────────────

/// Maps the arena onto a grid of screen cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Screen column/row of the arena's top-left corner.
    pub left: u16,
    pub top: u16,
    pub cols: u16,
    pub rows: u16,
    /// Arena size in world units.
    pub world: Vec2,
}

impl Viewport {
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.world.x / self.cols.max(1) as f32,
            self.world.y / self.rows.max(1) as f32,
        )
    }

    /// World position of the center of screen cell `(column, row)`. Cells
    /// outside the viewport map outside the arena.
    pub fn to_world(&self, column: u16, row: u16) -> Vec2 {
        let cell = self.cell_size();
        let cx = column as f32 - self.left as f32 + 0.5;
        let cy = row as f32 - self.top as f32 + 0.5;
        Vec2::new(cx * cell.x, cy * cell.y)
    }

    /// Screen cell containing world point `p`, or `None` outside the arena.
    pub fn to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        if p.x < 0.0 || p.y < 0.0 || p.x >= self.world.x || p.y >= self.world.y {
            return None;
        }
        let cell = self.cell_size();
        let col = ((p.x / cell.x) as u16).min(self.cols.saturating_sub(1));
        let row = ((p.y / cell.y) as u16).min(self.rows.saturating_sub(1));
        Some((self.left + col, self.top + row))
    }
}

// ── Renderer handle ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Windowed,
    Fullscreen,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Windowed => DisplayMode::Fullscreen,
            DisplayMode::Fullscreen => DisplayMode::Windowed,
        }
    }
}

/// Output backend owned by the game loop. Reconfigured in place rather than
/// replaced, so the loop keeps a single handle for the whole session.
pub trait Renderer {
    /// Draw one complete frame and present it.
    fn draw(&mut self, frame: &[DrawCall]) -> io::Result<()>;

    fn display_mode(&self) -> DisplayMode;

    fn set_display_mode(&mut self, mode: DisplayMode) -> io::Result<()>;

    /// The output surface changed size (columns, rows).
    fn resize(&mut self, cols: u16, rows: u16) -> io::Result<()>;

    fn viewport(&self) -> Viewport;
}

// ── Composition ──────────────────────────────────────────────────────────────

/// Build the draw list for one frame: entities, then HUD, then banners.
pub fn compose(state: &GameState, config: &GameConfig) -> Vec<DrawCall> {
    let mut calls = vec![DrawCall::Clear(C_BACKGROUND)];

    calls.push(DrawCall::Circle {
        center: state.player.position,
        radius: state.player.radius,
        color: C_PLAYER,
    });

    for enemy in &state.enemies {
        calls.push(DrawCall::Rect {
            rect: enemy.bounding_box(),
            color: C_ENEMY,
        });
    }

    for shot in state.player_projectiles.iter().chain(&state.enemy_projectiles) {
        calls.push(DrawCall::Circle {
            center: shot.position,
            radius: shot.radius,
            color: C_PROJECTILE,
        });
    }

    compose_hud(&mut calls, state, config);
    calls
}

fn compose_hud(calls: &mut Vec<DrawCall>, state: &GameState, config: &GameConfig) {
    let w = config.arena.width;
    let h = config.arena.height;

    // Health bar, bottom-left: red background, green fill.
    let bar_y = h - HEALTH_BAR_MARGIN - HEALTH_BAR_HEIGHT;
    calls.push(DrawCall::Rect {
        rect: Rect::new(HEALTH_BAR_MARGIN, bar_y, HEALTH_BAR_LENGTH, HEALTH_BAR_HEIGHT),
        color: C_HEALTH_BG,
    });
    let fill = HEALTH_BAR_LENGTH * state.player.health_ratio();
    if fill > 0.0 {
        calls.push(DrawCall::Rect {
            rect: Rect::new(HEALTH_BAR_MARGIN, bar_y, fill, HEALTH_BAR_HEIGHT),
            color: C_HEALTH_FG,
        });
    }

    if state.ammo.is_reloading() {
        calls.push(text(
            "Reloading...",
            Vec2::new(w / 2.0, h / 2.0 - 50.0),
            Align::Center,
            TextSize::Normal,
            C_HUD,
        ));
    }

    calls.push(text(
        &format!("Bullets: {}/{}", state.ammo.rounds, state.ammo.capacity),
        Vec2::new(w - 150.0, h - 30.0),
        Align::Left,
        TextSize::Normal,
        C_HUD,
    ));
    calls.push(text(
        &format!("Kills: {}", state.kills),
        Vec2::new(w - 150.0, h - 60.0),
        Align::Left,
        TextSize::Normal,
        C_HUD,
    ));

    if state.status == GameStatus::GameOver {
        calls.push(text(
            "You Died!",
            Vec2::new(w / 2.0, h / 2.0),
            Align::Center,
            TextSize::Large,
            C_BANNER,
        ));
        calls.push(text(
            &format!(
                "Press {} to restart",
                config.keys.restart.to_ascii_uppercase()
            ),
            Vec2::new(w / 2.0, h / 2.0 + 40.0),
            Align::Center,
            TextSize::Normal,
            C_HUD,
        ));
    }
}

fn text(s: &str, anchor: Vec2, align: Align, size: TextSize, color: Color) -> DrawCall {
    DrawCall::Text {
        text: s.to_string(),
        anchor,
        align,
        size,
        color,
    }
}
