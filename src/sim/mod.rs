//! Deterministic simulation module
//!
//! All simulation logic lives here. This module must be pure and deterministic:
//! - Kinematic steps only, no velocities
//! - Seeded RNG only, passed in by the caller
//! - Stable iteration order over walls and gold
//! - No rendering or platform dependencies

pub mod action;
pub mod generator;
pub mod geometry;
pub mod level;
pub mod movement;
pub mod world;

pub use action::{ACTION_SPACE, Action};
pub use generator::{Side, generate_level};
pub use geometry::{
    Wall, circle_overlap, circle_rect_overlap, clear_of_walls, rectangle_corners, rotate_back,
    rotate_forward,
};
pub use level::{AgentPose, Level, boundary_walls};
pub use movement::{MAX_SCAN_STEPS, MovementResolver, scan_steps};
pub use world::World;
