//! Engine, generator and observation settings
//!
//! Plain serde records with defaults; load from JSON to override.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{MAX_SCAN_STEPS, scan_steps};

/// Movement tuning for the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Largest displacement of one step action
    pub step_limit: f32,
    /// Movement scan granularity; `None` means one canvas pixel
    pub min_step: Option<f32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            step_limit: STEP_LIMIT,
            min_step: None,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_limit >= 0.0 && self.step_limit.is_finite()) {
            return Err(ConfigError::InvalidSetting {
                name: "step_limit",
                reason: format!("{} must be finite and non-negative", self.step_limit),
            });
        }
        if let Some(min_step) = self.min_step {
            if !(min_step > 0.0 && min_step.is_finite()) {
                return Err(ConfigError::InvalidSetting {
                    name: "min_step",
                    reason: format!("{min_step} must be finite and positive"),
                });
            }
            self.validate_scan(min_step)?;
        }
        Ok(())
    }

    /// Reject step limits that need more than `MAX_SCAN_STEPS` decrements
    pub fn validate_scan(&self, min_step: f32) -> Result<(), ConfigError> {
        let steps = scan_steps(self.step_limit, min_step);
        if steps > MAX_SCAN_STEPS {
            return Err(ConfigError::InvalidSetting {
                name: "min_step",
                reason: format!(
                    "step_limit {} / min_step {min_step} needs {steps} scan steps (max {})",
                    self.step_limit, MAX_SCAN_STEPS
                ),
            });
        }
        Ok(())
    }
}

/// Procedural level generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base canvas resolution recorded in generated levels
    pub canvas_resolution: u32,
    pub agent_radius: f32,
    pub gold_radius: f32,
    /// Thickness of the four boundary walls
    pub boundary_thickness: f32,
    /// Probability that one boundary gets an exit gap
    pub exit_probability: f64,
    /// Exit gap width as a multiple of the agent diameter (at least 1)
    pub exit_gap_scale: f32,
    /// Interior wall count is drawn from `1..=max_wall_num`
    pub max_wall_num: u32,
    /// Fixed interior wall width
    pub wall_width: f32,
    pub min_wall_height: f32,
    pub max_wall_height: f32,
    pub gold_count: u32,
    /// Rejection-sampling cap per placed entity
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            canvas_resolution: CANVAS_RESOLUTION,
            agent_radius: AGENT_RADIUS,
            gold_radius: GOLD_RADIUS,
            boundary_thickness: 0.025,
            exit_probability: 0.5,
            exit_gap_scale: 1.5,
            max_wall_num: 4,
            wall_width: 0.025,
            min_wall_height: 0.1,
            max_wall_height: 0.4,
            gold_count: 5,
            max_attempts: 10_000,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |name: &'static str, reason: String| {
            Err(ConfigError::InvalidSetting { name, reason })
        };
        if self.canvas_resolution == 0 {
            return invalid("canvas_resolution", "must be positive".into());
        }
        let floats = [
            ("agent_radius", self.agent_radius),
            ("gold_radius", self.gold_radius),
            ("boundary_thickness", self.boundary_thickness),
            ("exit_gap_scale", self.exit_gap_scale),
            ("wall_width", self.wall_width),
            ("min_wall_height", self.min_wall_height),
            ("max_wall_height", self.max_wall_height),
        ];
        if let Some((name, value)) = floats.into_iter().find(|(_, v)| !v.is_finite()) {
            return invalid(name, format!("{value} is not finite"));
        }
        if !(self.agent_radius > 0.0 && self.gold_radius > 0.0) {
            return invalid("radius", "agent and gold radii must be positive".into());
        }
        if !(self.boundary_thickness > 0.0 && self.boundary_thickness < 0.5) {
            return invalid(
                "boundary_thickness",
                format!("{} not in (0, 0.5)", self.boundary_thickness),
            );
        }
        if !(0.0..=1.0).contains(&self.exit_probability) {
            return invalid(
                "exit_probability",
                format!("{} not in [0, 1]", self.exit_probability),
            );
        }
        if !(self.exit_gap_scale >= 1.0) {
            return invalid(
                "exit_gap_scale",
                format!("{} would make the exit narrower than the agent", self.exit_gap_scale),
            );
        }
        if self.exit_probability > 0.0 && self.exit_gap() > 1.0 - 2.0 * self.boundary_thickness {
            return invalid(
                "exit_gap_scale",
                format!("exit gap {} is wider than a boundary side", self.exit_gap()),
            );
        }
        if self.max_wall_num == 0 {
            return invalid("max_wall_num", "at least one interior wall is drawn".into());
        }
        if !(self.wall_width > 0.0 && self.wall_width < 1.0) {
            return invalid("wall_width", format!("{} not in (0, 1)", self.wall_width));
        }
        if !(self.min_wall_height > 0.0 && self.min_wall_height <= self.max_wall_height) {
            return invalid(
                "wall_height",
                format!(
                    "need 0 < min ({}) <= max ({})",
                    self.min_wall_height, self.max_wall_height
                ),
            );
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts", "must be positive".into());
        }
        Ok(())
    }

    /// Exit gap width in normalized units
    pub fn exit_gap(&self) -> f32 {
        2.0 * self.agent_radius * self.exit_gap_scale
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidSetting {
                name: "generator",
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}

/// Composition of a multi-scale training batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of independently sampled zoom factors
    pub zoom_count: u32,
    /// Zoom factors are drawn uniformly from `[min_zoom, max_zoom]`
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Crops centered on random gold items, per zoom factor
    pub gold_crops: u32,
    /// Max distance of the jittered agent crop from the agent center
    pub agent_jitter: f32,
    /// Crops centered on wall-biased points, per zoom factor
    pub wall_crops: u32,
    /// Crops at uniformly random centers, per zoom factor
    pub random_crops: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            zoom_count: 2,
            min_zoom: 1.5,
            max_zoom: 4.0,
            gold_crops: 2,
            agent_jitter: 0.05,
            wall_crops: 4,
            random_crops: 2,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom >= 1.0 && self.min_zoom <= self.max_zoom && self.max_zoom <= MAX_ZOOM) {
            return Err(ConfigError::InvalidSetting {
                name: "zoom",
                reason: format!(
                    "need 1 <= min ({}) <= max ({}) <= {MAX_ZOOM}",
                    self.min_zoom, self.max_zoom
                ),
            });
        }
        if !(self.agent_jitter >= 0.0 && self.agent_jitter.is_finite()) {
            return Err(ConfigError::InvalidSetting {
                name: "agent_jitter",
                reason: format!("{} must be finite and non-negative", self.agent_jitter),
            });
        }
        Ok(())
    }

    /// Crops produced per zoom factor (two agent crops included)
    pub fn crops_per_zoom(&self) -> usize {
        (self.gold_crops + 2 + self.wall_crops + self.random_crops) as usize
    }

    /// Total images in a batch, full scene included
    pub fn batch_len(&self) -> usize {
        1 + self.zoom_count as usize * self.crops_per_zoom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineSettings::default().validate().is_ok());
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(BatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_exit_gap_fits_agent() {
        let config = GeneratorConfig::default();
        assert!(config.exit_gap() >= 2.0 * config.agent_radius);
    }

    #[test]
    fn test_generator_partial_json_uses_defaults() {
        let config = GeneratorConfig::from_json(r#"{ "gold_count": 9 }"#).unwrap();
        assert_eq!(config.gold_count, 9);
        assert_eq!(config.max_wall_num, GeneratorConfig::default().max_wall_num);
    }

    #[test]
    fn test_generator_rejects_narrow_exit() {
        let config = GeneratorConfig {
            exit_gap_scale: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { name: "exit_gap_scale", .. })
        ));
    }

    #[test]
    fn test_batch_rejects_shrinking_zoom() {
        let config = BatchConfig {
            min_zoom: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_len() {
        let config = BatchConfig::default();
        assert_eq!(config.crops_per_zoom(), 10);
        assert_eq!(config.batch_len(), 21);
    }

    #[test]
    fn test_engine_rejects_non_finite_step_limit() {
        for step_limit in [f32::INFINITY, f32::NAN, -1.0] {
            let settings = EngineSettings {
                step_limit,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(ConfigError::InvalidSetting { name: "step_limit", .. })
            ));
        }
    }

    #[test]
    fn test_engine_rejects_unbounded_scan() {
        let tiny = EngineSettings {
            min_step: Some(1e-12),
            ..Default::default()
        };
        assert!(matches!(
            tiny.validate(),
            Err(ConfigError::InvalidSetting { name: "min_step", .. })
        ));

        let far = EngineSettings {
            step_limit: 40_000.0,
            min_step: Some(1.0 / 800.0),
        };
        assert!(far.validate().is_err());
        assert!(EngineSettings::default().validate_scan(1.0 / 800.0).is_ok());
    }

    #[test]
    fn test_engine_rejects_infinite_granularity() {
        let settings = EngineSettings {
            min_step: Some(f32::INFINITY),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_generator_rejects_non_finite_floats() {
        let cases = [
            GeneratorConfig {
                agent_radius: f32::NAN,
                ..Default::default()
            },
            GeneratorConfig {
                gold_radius: f32::INFINITY,
                ..Default::default()
            },
            GeneratorConfig {
                boundary_thickness: f32::NAN,
                ..Default::default()
            },
            GeneratorConfig {
                exit_gap_scale: f32::INFINITY,
                exit_probability: 0.0,
                ..Default::default()
            },
            GeneratorConfig {
                wall_width: f32::INFINITY,
                ..Default::default()
            },
            GeneratorConfig {
                min_wall_height: f32::NAN,
                ..Default::default()
            },
            GeneratorConfig {
                max_wall_height: f32::INFINITY,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "accepted {config:?}");
        }
    }

    #[test]
    fn test_batch_rejects_unbounded_zoom() {
        for max_zoom in [f32::INFINITY, f32::NAN, MAX_ZOOM * 2.0] {
            let config = BatchConfig {
                max_zoom,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "accepted max_zoom {max_zoom}");
        }
        let jitter = BatchConfig {
            agent_jitter: f32::INFINITY,
            ..Default::default()
        };
        assert!(jitter.validate().is_err());
    }

    #[test]
    fn test_engine_rejects_zero_granularity() {
        let settings = EngineSettings {
            min_step: Some(0.0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
