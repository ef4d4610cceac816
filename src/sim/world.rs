//! Mutable world state
//!
//! A `World` owns the level it was built from plus the live agent pose, the
//! remaining gold and the reward counter. Walls are read from the level and
//! never change.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::geometry::{Wall, circle_overlap};
use super::level::{AgentPose, Level};
use super::movement::MovementResolver;
use crate::consts::ROTATION_STEP;
use crate::{heading, wrap_angle};

/// Live simulation state built from a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Configuration captured at construction; `reset` restores from it
    level: Level,
    pub agent: AgentPose,
    pub gold: Vec<Vec2>,
    /// Gold collected since the last reset
    pub reward: u32,
}

impl World {
    pub fn new(level: Level) -> Self {
        let agent = level.agent;
        let gold = level.gold.clone();
        Self {
            level,
            agent,
            gold,
            reward: 0,
        }
    }

    /// Restore agent, gold and reward to their construction values
    pub fn reset(&mut self) {
        self.agent = self.level.agent;
        self.gold.clone_from(&self.level.gold);
        self.reward = 0;
        log::debug!("World reset: {} gold", self.gold.len());
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn walls(&self) -> &[Wall] {
        &self.level.walls
    }

    /// Snapshot of the live state as a level (walls unchanged)
    pub fn snapshot(&self) -> Level {
        Level {
            agent: self.agent,
            gold: self.gold.clone(),
            ..self.level.clone()
        }
    }

    /// Apply one action, then resolve gold pickup
    ///
    /// Returns the number of gold items collected by this update.
    pub fn apply(&mut self, action: Action, step_limit: f32, min_step: f32) -> u32 {
        match action {
            Action::NoOp => {}
            Action::StepForward => self.step(step_limit, min_step, 1.0),
            Action::StepBackward => self.step(step_limit, min_step, -1.0),
            Action::RotateClockwise => self.rotate(-ROTATION_STEP),
            Action::RotateCounterClockwise => self.rotate(ROTATION_STEP),
        }
        self.collect_gold()
    }

    /// Move along the heading (`sign` 1) or against it (`sign` -1)
    fn step(&mut self, lim: f32, min_step: f32, sign: f32) {
        let dir = heading(self.agent.direction) * sign;
        let origin = self.agent.pos;
        let resolver = MovementResolver::new(&self.level.walls, self.level.agent_radius, min_step);
        let step = resolver.step_along(origin, dir, lim);
        self.agent.pos = origin + dir * step;
    }

    fn rotate(&mut self, delta: f32) {
        self.agent.direction = wrap_angle(self.agent.direction + delta);
    }

    /// Remove every gold item overlapping the agent, one reward each
    pub fn collect_gold(&mut self) -> u32 {
        let agent = self.agent.pos;
        let (agent_r, gold_r) = (self.level.agent_radius, self.level.gold_radius);
        let before = self.gold.len();
        self.gold.retain(|&g| !circle_overlap(agent, g, agent_r, gold_r));
        let collected = (before - self.gold.len()) as u32;
        if collected > 0 {
            self.reward += collected;
            log::debug!("Collected {} gold, reward {}", collected, self.reward);
        }
        collected
    }
}
