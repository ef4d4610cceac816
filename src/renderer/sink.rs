//! Render collaborator seam
//!
//! The simulation never draws directly. It describes the scene to a
//! `RenderSink` in pixel coordinates and reads the result back as a `Raster`.

use glam::Vec2;

use super::raster::{Raster, Rgb, colors};
use crate::sim::World;
use crate::{heading, to_pixels};

/// Something that can rasterize the arena's primitives
///
/// All coordinates and lengths are in pixels of the current target.
pub trait RenderSink {
    /// Current target edge length in pixels
    fn resolution(&self) -> u32;

    /// Switch to a square target of the given size
    fn resize(&mut self, resolution: u32);

    fn clear(&mut self, color: Rgb);

    fn draw_filled_circle(&mut self, center: Vec2, radius: f32, color: Rgb);

    /// Rectangle with top-left `anchor`, rotated clockwise by `theta` about it
    fn draw_rotated_rectangle(
        &mut self,
        anchor: Vec2,
        width: f32,
        height: f32,
        theta: f32,
        color: Rgb,
    );

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb);

    fn read_pixels(&self) -> Raster;

    /// Push the frame to a display; headless sinks ignore this
    fn present(&mut self) {}
}

/// Draw the world at the sink's current resolution: agent, walls, then gold
pub fn draw_scene<S: RenderSink + ?Sized>(world: &World, sink: &mut S) {
    let res = sink.resolution();
    let level = world.level();
    let scale = res as f32;

    sink.clear(colors::BACKGROUND);

    let agent = to_pixels(world.agent.pos, res);
    sink.draw_filled_circle(agent, level.agent_radius * scale, colors::AGENT);
    let tip = agent + heading(world.agent.direction) * level.indicator_length * scale;
    sink.draw_line(agent, tip, colors::INDICATOR);

    for wall in world.walls() {
        if wall.is_degenerate() {
            log::debug!("Skipping zero-area wall {:?}", wall);
            continue;
        }
        sink.draw_rotated_rectangle(
            to_pixels(wall.anchor, res),
            wall.width * scale,
            wall.height * scale,
            wall.theta,
            colors::WALL,
        );
    }

    for &gold in &world.gold {
        sink.draw_filled_circle(to_pixels(gold, res), level.gold_radius * scale, colors::GOLD);
    }
}

/// Rasterize the same world at another resolution
///
/// The world is untouched; the sink is resized and redrawn.
pub fn render_at<S: RenderSink + ?Sized>(world: &World, sink: &mut S, resolution: u32) -> Raster {
    sink.resize(resolution);
    draw_scene(world, sink);
    sink.read_pixels()
}
