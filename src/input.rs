/// Input layer: turns terminal events into a per-tick `Controls` snapshot.
///
/// Input model: instead of acting on each key event individually, the
/// tracker records the frame number of the last press/repeat event for every
/// key. A key counts as held while it is fresh (within `HOLD_WINDOW` frames)
/// or until its release event arrives.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events, so keys drop on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`). Keys expire after `HOLD_WINDOW` frames of silence,
///   which is shorter than the OS repeat interval.

use std::collections::HashMap;
use std::sync::mpsc;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::KeyBindings;
use crate::geometry::Vec2;
use crate::render::Viewport;

/// A key is "held" if its last press/repeat event arrived within this many
/// frames. At 60 FPS this is ≈133 ms, refreshed by any OS repeat rate ≥ 8 Hz.
pub const HOLD_WINDOW: u64 = 8;

/// Held-input snapshot for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub reload: bool,
    pub restart: bool,
    /// Pointer position in arena coordinates.
    pub pointer: Vec2,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            fire: false,
            reload: false,
            restart: false,
            pointer: Vec2::zeros(),
        }
    }
}

/// One-shot requests handled by the loop rather than the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleFullscreen,
    Resize(u16, u16),
}

/// Everything gathered during one poll.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pub controls: Controls,
    pub commands: Vec<Command>,
}

/// Source of per-tick input for the game loop.
pub trait InputSource {
    fn poll(&mut self, viewport: &Viewport) -> FrameInput;
}

/// Additive per-axis movement: each held key contributes `step` on its axis.
/// Diagonals are deliberately left unnormalized.
pub fn movement_vector(controls: &Controls, step: f32) -> Vec2 {
    let mut delta = Vec2::zeros();
    if controls.up {
        delta.y -= step;
    }
    if controls.down {
        delta.y += step;
    }
    if controls.left {
        delta.x -= step;
    }
    if controls.right {
        delta.x += step;
    }
    delta
}

// ── Key tracking ─────────────────────────────────────────────────────────────

pub struct InputTracker {
    bindings: KeyBindings,
    /// Maps each held key to the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    mouse_down: bool,
    pointer: Vec2,
}

impl InputTracker {
    pub fn new(bindings: KeyBindings, pointer: Vec2) -> Self {
        Self {
            bindings,
            key_frame: HashMap::new(),
            mouse_down: false,
            pointer,
        }
    }

    /// Fold one event into the tracker. Returns a command for one-shot keys.
    pub fn handle_event(&mut self, event: &Event, frame: u64, viewport: &Viewport) -> Option<Command> {
        match event {
            Event::Key(key) => self.handle_key(key, frame),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse, viewport);
                None
            }
            Event::Resize(cols, rows) => Some(Command::Resize(*cols, *rows)),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, frame: u64) -> Option<Command> {
        let code = normalize(key.code);
        match key.kind {
            // Press: record key + handle one-shot actions
            KeyEventKind::Press => {
                self.key_frame.insert(code, frame);
                match code {
                    KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Command::Quit)
                    }
                    KeyCode::F(11) => Some(Command::ToggleFullscreen),
                    _ => None,
                }
            }
            // Repeat: refresh timestamp so the key stays held
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
                None
            }
            // Release: remove immediately (keyboard-enhancement path)
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
                None
            }
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, viewport: &Viewport) {
        self.pointer = viewport.to_world(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                self.mouse_down = true;
            }
            MouseEventKind::Up(MouseButton::Left) => self.mouse_down = false,
            _ => {}
        }
    }

    fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn bound(&self, c: char, frame: u64) -> bool {
        self.is_held(KeyCode::Char(c.to_ascii_lowercase()), frame)
    }

    /// Snapshot of what is held at `frame`.
    pub fn controls(&self, frame: u64) -> Controls {
        let b = &self.bindings;
        Controls {
            up: self.bound(b.up, frame) || self.is_held(KeyCode::Up, frame),
            down: self.bound(b.down, frame) || self.is_held(KeyCode::Down, frame),
            left: self.bound(b.left, frame) || self.is_held(KeyCode::Left, frame),
            right: self.bound(b.right, frame) || self.is_held(KeyCode::Right, frame),
            fire: self.mouse_down || self.is_held(KeyCode::Char(' '), frame),
            reload: self.bound(b.reload, frame),
            restart: self.bound(b.restart, frame),
            pointer: self.pointer,
        }
    }
}

/// Fold upper-case letters onto lower-case so Shift/Caps Lock don't matter.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

// ── Channel-backed source ────────────────────────────────────────────────────

/// Drains events sent by a dedicated reader thread (see `main`) without ever
/// blocking the game loop.
pub struct ChannelInput {
    rx: mpsc::Receiver<Event>,
    tracker: InputTracker,
    frame: u64,
}

impl ChannelInput {
    pub fn new(rx: mpsc::Receiver<Event>, tracker: InputTracker) -> Self {
        Self {
            rx,
            tracker,
            frame: 0,
        }
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self, viewport: &Viewport) -> FrameInput {
        self.frame += 1;
        let mut commands = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            if let Some(command) = self.tracker.handle_event(&event, self.frame, viewport) {
                commands.push(command);
            }
        }
        FrameInput {
            controls: self.tracker.controls(self.frame),
            commands,
        }
    }
}
