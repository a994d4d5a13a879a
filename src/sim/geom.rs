//! Axis-aligned rectangle geometry
//!
//! All simulation coordinates are integer logical pixels with the origin at
//! the top-left corner of the screen and y growing downward.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
///
/// `right` and `bottom` are exclusive: a rect at x=0 with w=10 covers columns
/// 0..10 and its `right()` is 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect of the given size with its top-left at `pos`
    pub fn from_pos_size(pos: IVec2, size: IVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn pos(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.w, self.h)
    }

    /// Copy of this rect moved by `delta`
    pub fn translated(&self, delta: IVec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_center_x(&mut self, cx: i32) {
        self.x = cx - self.w / 2;
    }

    /// True if the interiors intersect. Rects that only share an edge do not
    /// overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// True if `other` lies entirely inside this rect (shared edges allowed)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rect covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}
