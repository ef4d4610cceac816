//! Gold Arena - a discrete 2D arena for agent training
//!
//! A circular agent moves in kinematic steps through a unit-square arena of
//! rotated rectangular walls, collecting gold.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, movement, world state, level generation)
//! - `renderer`: Render collaborator seam plus a CPU reference rasterizer
//! - `engine`: reset/step interface over a world and a render sink
//! - `observation`: Multi-scale crops for perception training
//! - `settings`: Data-driven configuration

pub mod engine;
pub mod error;
pub mod observation;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::{DisplayMode, Engine, StepInfo, StepOutcome};
pub use error::{ConfigError, EngineError, GenerationError, LevelError, ObservationError};
pub use settings::{BatchConfig, EngineSettings, GeneratorConfig};

use glam::Vec2;

/// Level-wide defaults
pub mod consts {
    /// Default canvas edge length in pixels
    pub const CANVAS_RESOLUTION: u32 = 800;

    /// Agent radius in normalized units (40px on an 800px canvas)
    pub const AGENT_RADIUS: f32 = 0.05;
    /// Gold radius in normalized units (10px on an 800px canvas)
    pub const GOLD_RADIUS: f32 = 0.0125;
    /// Heading indicator length (400px on an 800px canvas)
    pub const INDICATOR_LENGTH: f32 = 0.5;

    /// Largest displacement of a single step action
    pub const STEP_LIMIT: f32 = 1.0 / 64.0;
    /// Heading change of a single rotate action
    pub const ROTATION_STEP: f32 = std::f32::consts::PI / 30.0;

    /// Largest magnification the observation sampler accepts
    pub const MAX_ZOOM: f32 = 16.0;
    /// Largest raster edge the observation sampler will render
    pub const MAX_RASTER_SIZE: u32 = 8192;
}

/// Wrap an angle into [0, 2π) using floor-based modulo
#[inline]
pub fn wrap_angle(theta: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = theta - (theta / TAU).floor() * TAU;
    // f32 rounding can land exactly on TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Scale a normalized point into pixel space for a given canvas
#[inline]
pub fn to_pixels(p: Vec2, resolution: u32) -> Vec2 {
    p * resolution as f32
}

/// Unit heading vector for a direction in radians
#[inline]
pub fn heading(direction: f32) -> Vec2 {
    Vec2::new(direction.cos(), direction.sin())
}
