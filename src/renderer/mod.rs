//! Rendering module
//!
//! The scene is described against the `Canvas` trait in logical pixels; the
//! terminal backend maps those onto character cells.

pub mod scene;
pub mod terminal;

use std::io;

use glam::IVec2;

use crate::settings::Rgb;
use crate::sim::Rect;

pub use scene::draw_frame;
pub use terminal::TerminalCanvas;

/// Horizontal anchoring of `Canvas::draw_text` relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing surface for one frame. Nothing is visible until `present`.
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, color: Rgb);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// One-cell border along the inside edge of `rect`
    fn outline_rect(&mut self, rect: Rect, color: Rgb);

    /// Draw a sprite covering `rect`, keeping the background underneath
    fn draw_sprite(&mut self, rect: Rect, glyph: &str, color: Rgb);

    /// Single line of text; `pos.y` is the line's vertical centre
    fn draw_text(&mut self, pos: IVec2, text: &str, color: Rgb, align: TextAlign);

    /// Show the finished frame
    fn present(&mut self) -> io::Result<()>;
}
