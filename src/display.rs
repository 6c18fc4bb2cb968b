/// Rendering backend: all terminal I/O lives here.
///
/// `TerminalRenderer` receives a frame of `DrawCall`s and rasterises it to
/// character cells. No game logic is performed; this module only translates
/// draw calls into terminal commands.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Attribute, Color as TermColor, Print},
    terminal, QueueableCommand,
};

use crate::geometry::{Rect, Vec2};
use crate::render::{Align, Color, DisplayMode, DrawCall, Renderer, TextSize, Viewport};

const C_BORDER: TermColor = TermColor::DarkBlue;

const FILL: &str = "█";
/// Used for shapes too small to cover any cell center.
const DOT: &str = "•";

fn term_color(color: Color) -> TermColor {
    match color {
        Color::White => TermColor::White,
        Color::Green => TermColor::Green,
        Color::Red => TermColor::Red,
        Color::Black => TermColor::Black,
        Color::LightGray => TermColor::Grey,
    }
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    mode: DisplayMode,
    /// Full terminal size in cells.
    term_cols: u16,
    term_rows: u16,
    /// Viewport size used in windowed mode.
    windowed_cols: u16,
    windowed_rows: u16,
    world: Vec2,
    viewport: Viewport,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(
        out: W,
        mode: DisplayMode,
        (term_cols, term_rows): (u16, u16),
        (windowed_cols, windowed_rows): (u16, u16),
        world: Vec2,
    ) -> Self {
        let mut renderer = Self {
            out,
            mode,
            term_cols,
            term_rows,
            windowed_cols,
            windowed_rows,
            world,
            viewport: Viewport {
                left: 0,
                top: 0,
                cols: term_cols,
                rows: term_rows,
                world,
            },
        };
        renderer.layout();
        renderer
    }

    /// Recompute the viewport for the current mode and terminal size.
    fn layout(&mut self) {
        self.viewport = match self.mode {
            DisplayMode::Fullscreen => Viewport {
                left: 0,
                top: 0,
                cols: self.term_cols.max(1),
                rows: self.term_rows.max(1),
                world: self.world,
            },
            DisplayMode::Windowed => {
                // Leave one cell on each side for the border.
                let cols = self.windowed_cols.min(self.term_cols.saturating_sub(2)).max(1);
                let rows = self.windowed_rows.min(self.term_rows.saturating_sub(2)).max(1);
                Viewport {
                    left: (self.term_cols.saturating_sub(cols)) / 2,
                    top: (self.term_rows.saturating_sub(rows)) / 2,
                    cols,
                    rows,
                    world: self.world,
                }
            }
        };
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // ── Border ────────────────────────────────────────────────────────────────

    fn draw_border(&mut self) -> io::Result<()> {
        let v = self.viewport;
        if v.left == 0 || v.top == 0 {
            return Ok(());
        }
        let w = v.cols as usize;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(v.left - 1, v.top - 1))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
        self.out.queue(cursor::MoveTo(v.left - 1, v.top + v.rows))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

        for row in v.top..v.top + v.rows {
            self.out.queue(cursor::MoveTo(v.left - 1, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(v.left + v.cols, row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    // ── Shapes ────────────────────────────────────────────────────────────────

    /// Paint every cell whose center satisfies `inside`, scanning the cells
    /// under `bounds`. Falls back to a dot at `center` if nothing matched.
    fn fill_cells(
        &mut self,
        bounds: Rect,
        center: Vec2,
        color: Color,
        inside: impl Fn(Vec2) -> bool,
    ) -> io::Result<()> {
        let v = self.viewport;
        let cell = v.cell_size();
        self.out.queue(style::SetForegroundColor(term_color(color)))?;

        let first_col = (bounds.x / cell.x).floor().max(0.0) as u16;
        let first_row = (bounds.y / cell.y).floor().max(0.0) as u16;
        let last_col = ((bounds.right() / cell.x).ceil().max(0.0) as u16).min(v.cols);
        let last_row = ((bounds.bottom() / cell.y).ceil().max(0.0) as u16).min(v.rows);

        let mut painted = false;
        for row in first_row..last_row {
            for col in first_col..last_col {
                let p = Vec2::new((col as f32 + 0.5) * cell.x, (row as f32 + 0.5) * cell.y);
                if inside(p) {
                    self.out.queue(cursor::MoveTo(v.left + col, v.top + row))?;
                    self.out.queue(Print(FILL))?;
                    painted = true;
                }
            }
        }

        if !painted {
            if let Some((col, row)) = v.to_cell(center) {
                self.out.queue(cursor::MoveTo(col, row))?;
                self.out.queue(Print(DOT))?;
            }
        }
        Ok(())
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) -> io::Result<()> {
        let bounds = Rect::centered(center, radius);
        self.fill_cells(bounds, center, color, |p| (p - center).norm() <= radius)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        self.fill_cells(rect, rect.center(), color, |p| rect.contains(p))
    }

    fn draw_text(
        &mut self,
        text: &str,
        anchor: Vec2,
        align: Align,
        size: TextSize,
        color: Color,
    ) -> io::Result<()> {
        let v = self.viewport;
        let Some((col, row)) = v.to_cell(anchor) else {
            return Ok(());
        };
        let width = text.chars().count() as u16;
        let col = match align {
            Align::Left => col,
            Align::Center => col.saturating_sub(width / 2).max(v.left),
        };

        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(term_color(color)))?;
        if size == TextSize::Large {
            self.out.queue(style::SetAttribute(Attribute::Bold))?;
        }
        self.out.queue(Print(text))?;
        if size == TextSize::Large {
            self.out.queue(style::SetAttribute(Attribute::NormalIntensity))?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, frame: &[DrawCall]) -> io::Result<()> {
        for call in frame {
            match call {
                DrawCall::Clear(_) => {
                    self.out.queue(terminal::Clear(terminal::ClearType::All))?;
                    self.draw_border()?;
                }
                DrawCall::Circle {
                    center,
                    radius,
                    color,
                } => self.draw_circle(*center, *radius, *color)?,
                DrawCall::Rect { rect, color } => self.draw_rect(*rect, *color)?,
                DrawCall::Text {
                    text,
                    anchor,
                    align,
                    size,
                    color,
                } => self.draw_text(text, *anchor, *align, *size, *color)?,
            }
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out
            .queue(cursor::MoveTo(0, self.term_rows.saturating_sub(1)))?;
        self.out.flush()
    }

    fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    fn set_display_mode(&mut self, mode: DisplayMode) -> io::Result<()> {
        self.mode = mode;
        self.layout();
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.out.flush()
    }

    fn resize(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.term_cols = cols;
        self.term_rows = rows;
        self.layout();
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
