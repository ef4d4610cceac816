//! Rendering module
//!
//! The render collaborator trait plus a CPU rasterizer that shades shapes by
//! signed distance at each pixel center.

pub mod canvas;
pub mod raster;
pub mod sink;

pub use canvas::SoftwareCanvas;
pub use raster::{CHANNELS, Raster, Rgb, colors};
pub use sink::{RenderSink, draw_scene, render_at};
