//! Terminal backend: logical pixels onto a grid of character cells
//!
//! Drawing goes into a back buffer; `present` writes only the rows that
//! changed since the previous frame and flushes once.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
};
use glam::IVec2;

use super::{Canvas, TextAlign};
use crate::settings::Rgb;
use crate::sim::Rect;

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgb(255, 255, 255),
            bg: Rgb(0, 0, 0),
        }
    }
}

pub struct TerminalCanvas<W: Write> {
    out: W,
    /// Logical pixels per cell
    cell_size: IVec2,
    cols: usize,
    rows: usize,
    back: Vec<Cell>,
    /// What the terminal currently shows; empty until the first present
    front: Vec<Cell>,
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

impl<W: Write> TerminalCanvas<W> {
    /// Canvas covering `screen_size` logical pixels
    pub fn new(out: W, screen_size: IVec2, cell_size: IVec2) -> Self {
        let cell_size = cell_size.max(IVec2::ONE);
        let grid = (screen_size / cell_size).max(IVec2::ONE);
        let (cols, rows) = (grid.x as usize, grid.y as usize);
        Self {
            out,
            cell_size,
            cols,
            rows,
            back: vec![Cell::default(); cols * rows],
            front: Vec::new(),
        }
    }

    /// Grid size in cells (columns, rows)
    pub fn grid_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.back.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Force the next `present` to redraw every row
    pub fn invalidate(&mut self) {
        self.front.clear();
    }

    /// Nearest cell boundary for a logical x / y coordinate
    fn col(&self, x: i32) -> i32 {
        (x + self.cell_size.x / 2).div_euclid(self.cell_size.x)
    }

    fn row(&self, y: i32) -> i32 {
        (y + self.cell_size.y / 2).div_euclid(self.cell_size.y)
    }

    /// Cell span of a rect as (col0, row0, col1, row1), end-exclusive and
    /// clipped to the grid. Non-empty rects always cover at least one cell.
    fn span(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        if rect.w <= 0 || rect.h <= 0 {
            return None;
        }
        let c0 = self.col(rect.left());
        let r0 = self.row(rect.top());
        let c1 = self.col(rect.right()).max(c0 + 1);
        let r1 = self.row(rect.bottom()).max(r0 + 1);

        let clip = |v: i32, max: usize| v.clamp(0, max as i32) as usize;
        let span = (
            clip(c0, self.cols),
            clip(r0, self.rows),
            clip(c1, self.cols),
            clip(r1, self.rows),
        );
        (span.0 < span.2 && span.1 < span.3).then_some(span)
    }

    fn cell_mut(&mut self, col: usize, row: usize) -> &mut Cell {
        &mut self.back[row * self.cols + col]
    }

    fn put(&mut self, col: usize, row: usize, ch: char, fg: Rgb) {
        let cell = self.cell_mut(col, row);
        cell.ch = ch;
        cell.fg = fg;
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn clear(&mut self, color: Rgb) {
        self.back.fill(Cell {
            ch: ' ',
            fg: color,
            bg: color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let Some((c0, r0, c1, r1)) = self.span(rect) else {
            return;
        };
        for row in r0..r1 {
            for col in c0..c1 {
                *self.cell_mut(col, row) = Cell {
                    ch: ' ',
                    fg: color,
                    bg: color,
                };
            }
        }
    }

    fn outline_rect(&mut self, rect: Rect, color: Rgb) {
        let Some((c0, r0, c1, r1)) = self.span(rect) else {
            return;
        };
        let (last_col, last_row) = (c1 - 1, r1 - 1);
        for col in c0..c1 {
            self.put(col, r0, '─', color);
            self.put(col, last_row, '─', color);
        }
        for row in r0..r1 {
            self.put(c0, row, '│', color);
            self.put(last_col, row, '│', color);
        }
        self.put(c0, r0, '┌', color);
        self.put(last_col, r0, '┐', color);
        self.put(c0, last_row, '└', color);
        self.put(last_col, last_row, '┘', color);
    }

    fn draw_sprite(&mut self, rect: Rect, glyph: &str, color: Rgb) {
        let Some((c0, r0, c1, r1)) = self.span(rect) else {
            return;
        };
        let glyph: Vec<char> = glyph.chars().collect();
        if glyph.is_empty() {
            return;
        }
        for row in r0..r1 {
            for (i, col) in (c0..c1).enumerate() {
                self.put(col, row, glyph[i % glyph.len()], color);
            }
        }
    }

    fn draw_text(&mut self, pos: IVec2, text: &str, color: Rgb, align: TextAlign) {
        let row = pos.y.div_euclid(self.cell_size.y);
        if row < 0 || row as usize >= self.rows {
            return;
        }
        let len = text.chars().count() as i32;
        let anchor = self.col(pos.x);
        let start = match align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - len / 2,
            TextAlign::Right => anchor - len,
        };
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as i32;
            if col >= 0 && (col as usize) < self.cols {
                self.put(col as usize, row as usize, ch, color);
            }
        }
    }

    fn present(&mut self) -> io::Result<()> {
        for row in 0..self.rows {
            let range = row * self.cols..(row + 1) * self.cols;
            let cells = &self.back[range.clone()];
            if self.front.get(range) == Some(cells) {
                continue;
            }

            self.out.queue(cursor::MoveTo(0, row as u16))?;
            let mut current: Option<(Rgb, Rgb)> = None;
            for cell in cells {
                if current != Some((cell.fg, cell.bg)) {
                    self.out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                    self.out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                    current = Some((cell.fg, cell.bg));
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;

        self.front.clone_from(&self.back);
        Ok(())
    }
}
