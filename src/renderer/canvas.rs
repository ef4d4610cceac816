//! CPU reference rasterizer
//!
//! Evaluates signed distance per pixel center, the same way the shader
//! pipeline shades shapes, but into an in-memory `Raster`. Used headless for
//! training observations and by tests.

use glam::Vec2;
use std::ops::Range;

use super::raster::{Raster, Rgb, colors};
use super::sink::RenderSink;
use crate::sim::geometry::{Wall, bounding_box, sd_wall};

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Headless square canvas
#[derive(Debug, Clone)]
pub struct SoftwareCanvas {
    raster: Raster,
    frames_presented: u64,
}

impl SoftwareCanvas {
    pub fn new(resolution: u32) -> Self {
        Self {
            raster: Raster::new(resolution, colors::BACKGROUND),
            frames_presented: 0,
        }
    }

    /// Borrow the current frame without copying
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Number of `present` calls so far
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Pixel indices whose centers may fall in `[lo, hi]`
    fn span(&self, lo: f32, hi: f32) -> Range<u32> {
        let res = self.raster.size() as f32;
        let start = (lo - 0.5).ceil().clamp(0.0, res) as u32;
        let end = ((hi - 0.5).floor() + 1.0).clamp(0.0, res) as u32;
        start..end.max(start)
    }

    /// Shade every pixel in the box whose center satisfies `inside`
    fn fill_where<F>(&mut self, lo: Vec2, hi: Vec2, color: Rgb, inside: F)
    where
        F: Fn(Vec2) -> bool,
    {
        let xs = self.span(lo.x, hi.x);
        for y in self.span(lo.y, hi.y) {
            for x in xs.clone() {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(center) {
                    self.raster.set(x, y, color);
                }
            }
        }
    }
}

impl RenderSink for SoftwareCanvas {
    fn resolution(&self) -> u32 {
        self.raster.size()
    }

    fn resize(&mut self, resolution: u32) {
        if resolution != self.raster.size() {
            self.raster = Raster::new(resolution, colors::BACKGROUND);
        }
    }

    fn clear(&mut self, color: Rgb) {
        self.raster.fill(color);
    }

    fn draw_filled_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let extent = Vec2::splat(radius);
        self.fill_where(center - extent, center + extent, color, |p| {
            sd_circle(p, center, radius) <= 0.0
        });
    }

    fn draw_rotated_rectangle(
        &mut self,
        anchor: Vec2,
        width: f32,
        height: f32,
        theta: f32,
        color: Rgb,
    ) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let wall = Wall {
            anchor,
            width,
            height,
            theta,
        };
        let (lo, hi) = bounding_box(&wall.corners());
        self.fill_where(lo, hi, color, |p| sd_wall(p, &wall) <= 0.0);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb) {
        let length = from.distance(to);
        let samples = (length * 2.0).ceil().max(1.0) as u32;
        for i in 0..=samples {
            let p = from.lerp(to, i as f32 / samples as f32);
            if p.x >= 0.0 && p.y >= 0.0 {
                self.raster.set(p.x as u32, p.y as u32, color);
            }
        }
    }

    fn read_pixels(&self) -> Raster {
        self.raster.clone()
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }
}
