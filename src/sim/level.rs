//! Level description: the unit of configuration, save/load and generation
//!
//! All positions and sizes live in normalized [0, 1] space. The canvas
//! resolution only matters when rendering and for the default movement
//! granularity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Wall, clear_of_walls};
use crate::consts::*;
use crate::error::LevelError;

/// Agent position and heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "AgentTuple", into = "AgentTuple")]
pub struct AgentPose {
    pub pos: Vec2,
    /// Heading in radians, kept in [0, 2π)
    pub direction: f32,
}

type AgentTuple = (f32, f32, f32);

impl From<AgentTuple> for AgentPose {
    fn from((x, y, direction): AgentTuple) -> Self {
        Self::new(x, y, direction)
    }
}

impl From<AgentPose> for AgentTuple {
    fn from(agent: AgentPose) -> Self {
        (agent.pos.x, agent.pos.y, agent.direction)
    }
}

impl AgentPose {
    pub fn new(x: f32, y: f32, direction: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            direction: crate::wrap_angle(direction),
        }
    }
}

/// A complete level: walls, gold, agent spawn and level-wide constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Pixel edge length of the base canvas
    pub canvas_resolution: u32,
    pub agent_radius: f32,
    pub gold_radius: f32,
    /// Length of the heading line drawn from the agent center
    #[serde(default = "default_indicator_length")]
    pub indicator_length: f32,
    pub agent: AgentPose,
    pub walls: Vec<Wall>,
    pub gold: Vec<Vec2>,
}

fn default_indicator_length() -> f32 {
    INDICATOR_LENGTH
}

impl Default for Level {
    fn default() -> Self {
        Self {
            canvas_resolution: CANVAS_RESOLUTION,
            agent_radius: AGENT_RADIUS,
            gold_radius: GOLD_RADIUS,
            indicator_length: INDICATOR_LENGTH,
            agent: AgentPose::new(0.5, 0.5, 0.0),
            walls: Vec::new(),
            gold: Vec::new(),
        }
    }
}

impl Level {
    /// Level enclosed by four solid boundary walls of the given thickness
    pub fn boundary_only(thickness: f32) -> Self {
        Self {
            walls: boundary_walls(thickness).to_vec(),
            ..Self::default()
        }
    }

    /// Build a level from pixel-unit geometry on a square canvas
    ///
    /// Walls are `[x, y, w, h, theta]` with `theta` already in radians; only
    /// lengths are rescaled.
    pub fn from_pixels(
        canvas: u32,
        agent: (f32, f32, f32),
        agent_radius: f32,
        gold_radius: f32,
        walls: &[(f32, f32, f32, f32, f32)],
        gold: &[(f32, f32)],
    ) -> Self {
        let size = canvas as f32;
        Self {
            canvas_resolution: canvas,
            agent_radius: agent_radius / size,
            gold_radius: gold_radius / size,
            indicator_length: INDICATOR_LENGTH,
            agent: AgentPose::new(agent.0 / size, agent.1 / size, agent.2),
            walls: walls
                .iter()
                .map(|&(x, y, w, h, theta)| {
                    Wall::new(x / size, y / size, w / size, h / size, theta)
                })
                .collect(),
            gold: gold.iter().map(|&(x, y)| Vec2::new(x, y) / size).collect(),
        }
    }

    /// Movement granularity: one canvas pixel in normalized units
    #[inline]
    pub fn pixel_size(&self) -> f32 {
        1.0 / self.canvas_resolution as f32
    }

    /// Whether a circle of `radius` at `p` is clear of every wall
    pub fn is_clear(&self, p: Vec2, radius: f32) -> bool {
        clear_of_walls(p, radius, &self.walls)
    }

    /// Agent and every gold item are clear of every wall
    pub fn is_valid_spawn(&self) -> bool {
        self.is_clear(self.agent.pos, self.agent_radius)
            && self.gold.iter().all(|&g| self.is_clear(g, self.gold_radius))
    }

    /// Check level-wide constants
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.canvas_resolution == 0 {
            return Err(LevelError::Invalid("canvas_resolution must be positive".into()));
        }
        let positive = |r: f32| r > 0.0 && r.is_finite();
        if !positive(self.agent_radius) || !positive(self.gold_radius) {
            return Err(LevelError::Invalid("radii must be finite and positive".into()));
        }
        let finite_point = |p: Vec2| p.is_finite();
        if !finite_point(self.agent.pos) || !self.agent.direction.is_finite() {
            return Err(LevelError::Invalid("agent pose must be finite".into()));
        }
        if !self.gold.iter().all(|&g| finite_point(g)) {
            return Err(LevelError::Invalid("gold positions must be finite".into()));
        }
        let wall_finite = |w: &Wall| {
            w.anchor.is_finite()
                && w.width.is_finite()
                && w.height.is_finite()
                && w.theta.is_finite()
        };
        if !self.walls.iter().all(wall_finite) {
            return Err(LevelError::Invalid("wall geometry must be finite".into()));
        }
        if self.walls.iter().any(|w| w.width < 0.0 || w.height < 0.0) {
            return Err(LevelError::Invalid("wall extents must be non-negative".into()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }
}

/// The four solid walls around the unit square: left, top, bottom, right
pub fn boundary_walls(thickness: f32) -> [Wall; 4] {
    let t = thickness;
    [
        Wall::new(0.0, 0.0, t, 1.0, 0.0),
        Wall::new(0.0, 0.0, 1.0, t, 0.0),
        Wall::new(0.0, 1.0 - t, 1.0, t, 0.0),
        Wall::new(1.0 - t, 0.0, t, 1.0, 0.0),
    ]
}
