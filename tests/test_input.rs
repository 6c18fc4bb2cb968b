use std::sync::mpsc;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use arena_shooter::config::KeyBindings;
use arena_shooter::geometry::Vec2;
use arena_shooter::input::*;
use arena_shooter::render::Viewport;

fn viewport() -> Viewport {
    Viewport {
        left: 0,
        top: 0,
        cols: 80,
        rows: 30,
        world: Vec2::new(800.0, 600.0),
    }
}

fn tracker() -> InputTracker {
    InputTracker::new(KeyBindings::default(), Vec2::new(400.0, 300.0))
}

fn press(c: KeyCode) -> Event {
    Event::Key(KeyEvent::new(c, KeyModifiers::NONE))
}

fn release(c: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(c, KeyModifiers::NONE, KeyEventKind::Release))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

// ── movement_vector ──────────────────────────────────────────────────────────

#[test]
fn movement_vector_is_additive_per_axis() {
    let c = Controls {
        up: true,
        left: true,
        ..Controls::default()
    };
    assert_eq!(movement_vector(&c, 5.0), Vec2::new(-5.0, -5.0));

    let none = Controls::default();
    assert_eq!(movement_vector(&none, 5.0), Vec2::zeros());

    let all = Controls {
        up: true,
        down: true,
        left: true,
        right: true,
        ..Controls::default()
    };
    assert_eq!(movement_vector(&all, 5.0), Vec2::zeros());
}

// ── Held keys ────────────────────────────────────────────────────────────────

#[test]
fn pressed_key_is_held_until_release() {
    let v = viewport();
    let mut t = tracker();
    assert_eq!(t.handle_event(&press(KeyCode::Char('w')), 1, &v), None);
    assert!(t.controls(1).up);
    assert!(t.controls(3).up);

    t.handle_event(&release(KeyCode::Char('w')), 4, &v);
    assert!(!t.controls(4).up);
}

#[test]
fn pressed_key_expires_after_hold_window() {
    let v = viewport();
    let mut t = tracker();
    t.handle_event(&press(KeyCode::Char('d')), 10, &v);
    assert!(t.controls(10 + HOLD_WINDOW).right);
    assert!(!t.controls(11 + HOLD_WINDOW).right);
}

#[test]
fn uppercase_and_arrows_map_to_movement() {
    let v = viewport();
    let mut t = tracker();
    t.handle_event(&press(KeyCode::Char('A')), 1, &v);
    t.handle_event(&press(KeyCode::Down), 1, &v);
    let c = t.controls(1);
    assert!(c.left);
    assert!(c.down);
    assert!(!c.up && !c.right);
}

#[test]
fn reload_and_restart_share_the_r_key() {
    let v = viewport();
    let mut t = tracker();
    t.handle_event(&press(KeyCode::Char('r')), 1, &v);
    let c = t.controls(1);
    assert!(c.reload);
    assert!(c.restart);
}

// ── Commands ─────────────────────────────────────────────────────────────────

#[test]
fn one_shot_commands() {
    let v = viewport();
    let mut t = tracker();
    assert_eq!(t.handle_event(&press(KeyCode::F(11)), 1, &v), Some(Command::ToggleFullscreen));
    assert_eq!(t.handle_event(&press(KeyCode::Esc), 1, &v), Some(Command::Quit));
    assert_eq!(t.handle_event(&press(KeyCode::Char('q')), 1, &v), Some(Command::Quit));
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(t.handle_event(&ctrl_c, 1, &v), Some(Command::Quit));
    assert_eq!(t.handle_event(&Event::Resize(100, 40), 1, &v), Some(Command::Resize(100, 40)));
}

// ── Mouse ────────────────────────────────────────────────────────────────────

#[test]
fn mouse_button_controls_fire_and_pointer() {
    let v = viewport();
    let mut t = tracker();
    t.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 5), 1, &v);
    let c = t.controls(1);
    assert!(c.fire);
    // center of cell (10, 5) with 10×20 cells
    assert_eq!(c.pointer, Vec2::new(105.0, 110.0));

    t.handle_event(&mouse(MouseEventKind::Moved, 0, 0), 2, &v);
    assert!(t.controls(2).fire);
    assert_eq!(t.controls(2).pointer, Vec2::new(5.0, 10.0));

    t.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), 3, &v);
    assert!(!t.controls(3).fire);
}

#[test]
fn right_button_does_not_fire() {
    let v = viewport();
    let mut t = tracker();
    t.handle_event(&mouse(MouseEventKind::Down(MouseButton::Right), 1, 1), 1, &v);
    assert!(!t.controls(1).fire);
}

#[test]
fn space_is_an_alternate_fire_key() {
    let v = viewport();
    let mut t = tracker();
    t.handle_event(&press(KeyCode::Char(' ')), 1, &v);
    assert!(t.controls(1).fire);
}

// ── Channel source ───────────────────────────────────────────────────────────

#[test]
fn channel_input_drains_pending_events() {
    let (tx, rx) = mpsc::channel();
    let mut source = ChannelInput::new(rx, tracker());
    tx.send(press(KeyCode::Char('s'))).unwrap();
    tx.send(press(KeyCode::F(11))).unwrap();

    let polled = source.poll(&viewport());
    assert!(polled.controls.down);
    assert_eq!(polled.commands, vec![Command::ToggleFullscreen]);

    let polled = source.poll(&viewport());
    assert!(polled.controls.down);
    assert!(polled.commands.is_empty());
}
