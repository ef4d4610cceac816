//! Reset/step engine
//!
//! Owns one `World` and one render sink. Every action fully resolves
//! (movement or rotation, gold pickup, redraw) before `step` returns.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ConfigError, EngineError};
use crate::renderer::{Raster, RenderSink, draw_scene};
use crate::settings::EngineSettings;
use crate::sim::{ACTION_SPACE, Action, Level, World};

/// Whether frames go to a display or stay headless
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Present every frame to the sink's display
    Human,
    /// Headless; frames are only read back as observations
    #[default]
    Machine,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Human => "human",
            DisplayMode::Machine => "machine",
        }
    }

    #[inline]
    pub fn presents(&self) -> bool {
        matches!(self, DisplayMode::Human)
    }
}

impl FromStr for DisplayMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(DisplayMode::Human),
            "machine" => Ok(DisplayMode::Machine),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Extra step information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepInfo {
    pub done: bool,
    /// Reward accumulated since the last reset
    pub total_reward: u32,
}

/// Result of one `step`
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: Raster,
    pub reward_delta: u32,
    /// Always false; episodes have no terminal state of their own
    pub done: bool,
    pub info: StepInfo,
}

/// The arena engine: one world, one sink
pub struct Engine<S: RenderSink> {
    world: World,
    sink: S,
    mode: DisplayMode,
    settings: EngineSettings,
}

impl<S: RenderSink> Engine<S> {
    pub fn new(
        level: Level,
        sink: S,
        mode: DisplayMode,
        settings: EngineSettings,
    ) -> Result<Self, EngineError> {
        level.validate()?;
        settings.validate()?;
        settings.validate_scan(settings.min_step.unwrap_or_else(|| level.pixel_size()))?;

        let mut engine = Self {
            world: World::new(level),
            sink,
            mode,
            settings,
        };
        let resolution = engine.world.level().canvas_resolution;
        engine.sink.resize(resolution);
        engine.redraw();

        log::info!(
            "Engine ready: mode={}, canvas={}px, {} walls, {} gold",
            mode.as_str(),
            engine.world.level().canvas_resolution,
            engine.world.walls().len(),
            engine.world.gold.len()
        );
        Ok(engine)
    }

    /// Construct from a mode name ("human" or "machine")
    pub fn with_mode(level: Level, sink: S, mode: &str) -> Result<Self, EngineError> {
        let mode = mode.parse::<DisplayMode>()?;
        Self::new(level, sink, mode, EngineSettings::default())
    }

    /// The fixed action space, in index order
    pub fn action_space(&self) -> &'static [Action] {
        &ACTION_SPACE
    }

    /// Restore the construction-time state and return the first observation
    pub fn reset(&mut self) -> Raster {
        self.world.reset();
        self.redraw();
        self.observation()
    }

    /// Apply the action at `index` in the action space
    pub fn step(&mut self, index: usize) -> Result<StepOutcome, EngineError> {
        let action = Action::try_from(index)?;
        let reward_delta = self.apply(action);
        Ok(StepOutcome {
            observation: self.observation(),
            reward_delta,
            done: false,
            info: StepInfo {
                done: false,
                total_reward: self.world.reward,
            },
        })
    }

    /// Apply an action and redraw; returns gold collected
    pub fn apply(&mut self, action: Action) -> u32 {
        let min_step = self.min_step();
        let collected = self.world.apply(action, self.settings.step_limit, min_step);
        self.redraw();
        collected
    }

    /// Current frame at the base resolution
    pub fn observation(&self) -> Raster {
        self.sink.read_pixels()
    }

    /// Movement granularity in use
    pub fn min_step(&self) -> f32 {
        self.settings
            .min_step
            .unwrap_or_else(|| self.world.level().pixel_size())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (World, S) {
        (self.world, self.sink)
    }

    fn redraw(&mut self) {
        draw_scene(&self.world, &mut self.sink);
        if self.mode.presents() {
            self.sink.present();
        }
    }
}
