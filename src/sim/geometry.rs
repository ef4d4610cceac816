//! Rotated-rectangle and circle geometry
//!
//! Walls are rectangles conceived axis-aligned with their top-left corner at
//! an anchor, then rotated clockwise about that anchor. With y growing
//! downward, a clockwise rotation by `theta` is the usual
//! `(x cos - y sin, x sin + y cos)` map.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A rectangular wall: anchor corner, extent, clockwise rotation about the anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WallTuple", into = "WallTuple")]
pub struct Wall {
    /// Pre-rotation top-left corner
    pub anchor: Vec2,
    pub width: f32,
    pub height: f32,
    /// Clockwise rotation about the anchor (radians)
    pub theta: f32,
}

/// Wire form of a wall: `[x, y, width, height, theta]`
type WallTuple = (f32, f32, f32, f32, f32);

impl From<WallTuple> for Wall {
    fn from((x, y, width, height, theta): WallTuple) -> Self {
        Self::new(x, y, width, height, theta)
    }
}

impl From<Wall> for WallTuple {
    fn from(wall: Wall) -> Self {
        (wall.anchor.x, wall.anchor.y, wall.width, wall.height, wall.theta)
    }
}

impl Wall {
    pub fn new(x: f32, y: f32, width: f32, height: f32, theta: f32) -> Self {
        Self {
            anchor: Vec2::new(x, y),
            width,
            height,
            theta,
        }
    }

    /// Corners in winding order (see [`rectangle_corners`])
    pub fn corners(&self) -> [Vec2; 4] {
        rectangle_corners(self.anchor, self.width, self.height, self.theta)
    }

    /// Axis-aligned bounding box of the rotated wall as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        bounding_box(&self.corners())
    }

    /// True when the wall has no area (nothing to draw)
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Rotate a point clockwise by `theta` about the origin
#[inline]
pub fn rotate_forward(p: Vec2, theta: f32) -> Vec2 {
    let (s, c) = theta.sin_cos();
    Vec2::new(c * p.x - s * p.y, s * p.x + c * p.y)
}

/// Undo a clockwise rotation by `theta` (rotate by `-theta`)
#[inline]
pub fn rotate_back(p: Vec2, theta: f32) -> Vec2 {
    let (s, c) = theta.sin_cos();
    Vec2::new(c * p.x + s * p.y, -s * p.x + c * p.y)
}

/// Corners of a rectangle anchored at `anchor`, rotated clockwise by `theta`
///
/// Order is upper-left, upper-right, lower-right, lower-left in the unrotated
/// local frame. The first corner is always the anchor itself.
pub fn rectangle_corners(anchor: Vec2, w: f32, h: f32, theta: f32) -> [Vec2; 4] {
    [
        Vec2::ZERO,
        Vec2::new(w, 0.0),
        Vec2::new(w, h),
        Vec2::new(0.0, h),
    ]
    .map(|local| anchor + rotate_forward(local, theta))
}

/// Axis-aligned bounds of a point set as (min, max)
pub fn bounding_box(points: &[Vec2]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(lo, hi), &p| (lo.min(p), hi.max(p)),
    )
}

/// Strict circle-circle overlap; touching circles do not overlap
#[inline]
pub fn circle_overlap(p: Vec2, q: Vec2, r_p: f32, r_q: f32) -> bool {
    p.distance(q) - r_p - r_q < 0.0
}

/// Circle against a rotated wall
///
/// Works in the wall's local frame, where the wall is the box
/// `[left, right] x [top, bottom]`. Each contact case is tested on its own:
/// center inside, the four edge bands (only within the opposite axis' span),
/// then the four corners as zero-radius circles.
pub fn circle_rect_overlap(center: Vec2, radius: f32, wall: &Wall) -> bool {
    let p = rotate_back(center, wall.theta);
    let top_left = rotate_back(wall.anchor, wall.theta);
    let (left, top) = (top_left.x, top_left.y);
    let right = left + wall.width;
    let bottom = top + wall.height;

    let in_rows = p.y >= top && p.y <= bottom;
    let in_cols = p.x >= left && p.x <= right;

    if in_rows && in_cols {
        return true;
    }
    // left / right bands
    if in_rows && p.x <= left && p.x + radius > left {
        return true;
    }
    if in_rows && p.x >= right && p.x - radius < right {
        return true;
    }
    // top / bottom bands
    if in_cols && p.y <= top && p.y + radius > top {
        return true;
    }
    if in_cols && p.y >= bottom && p.y - radius < bottom {
        return true;
    }

    [
        Vec2::new(left, top),
        Vec2::new(right, top),
        Vec2::new(left, bottom),
        Vec2::new(right, bottom),
    ]
    .into_iter()
    .any(|corner| circle_overlap(p, corner, radius, 0.0))
}

/// True when a circle touches none of the walls
pub fn clear_of_walls(center: Vec2, radius: f32, walls: &[Wall]) -> bool {
    !walls
        .iter()
        .any(|wall| circle_rect_overlap(center, radius, wall))
}

/// Signed distance from a point to a rotated wall (negative inside)
///
/// Rendering helper; collision uses [`circle_rect_overlap`].
pub fn sd_wall(p: Vec2, wall: &Wall) -> f32 {
    let local = rotate_back(p - wall.anchor, wall.theta);
    let half = Vec2::new(wall.width, wall.height) * 0.5;
    let d = (local - half).abs() - half;
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}
