//! Error types
//!
//! Simulation steps never fail on valid input; everything here is either a
//! caller mistake (bad action, bad mode, bad zoom) or generator exhaustion.

/// Invalid configuration detected at construction time
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Display mode string not recognized
    #[error("unknown display mode {0:?} (expected \"human\" or \"machine\")")]
    UnknownMode(String),

    /// A numeric setting is outside its valid range
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting {
        /// Setting that failed validation
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors raised by the engine's reset/step interface
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Action index outside the action space
    #[error("invalid action index {0} (action space has 5 actions)")]
    InvalidAction(usize),

    /// Engine construction failed
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error
        #[from]
        source: ConfigError,
    },

    /// Level handed to the engine is malformed
    #[error("level error: {source}")]
    Level {
        /// The underlying level error
        #[from]
        source: LevelError,
    },
}

/// Level generation could not produce a valid world
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Rejection sampling never found a collision-free point
    #[error("could not place {entity} after {attempts} attempts")]
    PlacementExhausted {
        /// What was being placed ("gold" or "agent")
        entity: &'static str,
        /// Attempts spent before giving up
        attempts: u32,
    },

    /// No sampled wall shape fit inside the arena interior
    #[error("could not fit interior wall {index} after {attempts} attempts")]
    WallExhausted {
        /// Index of the interior wall being placed
        index: usize,
        /// Attempts spent before giving up
        attempts: u32,
    },

    /// Generator configuration is unusable
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error
        #[from]
        source: ConfigError,
    },
}

/// Errors from the multi-scale observation sampler
#[derive(Debug, thiserror::Error)]
pub enum ObservationError {
    /// Zoom factors below 1 would produce a raster smaller than a crop
    #[error("zoom factor {0} must be at least 1")]
    InvalidZoom(f32),

    /// Raster is smaller than the requested crop window
    #[error("raster of size {raster} cannot hold a {window}x{window} crop")]
    RasterTooSmall {
        /// Raster edge length in pixels
        raster: u32,
        /// Crop edge length in pixels
        window: u32,
    },
}

/// Level (de)serialization failures
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// JSON could not be parsed or produced
    #[error("level json: {source}")]
    Json {
        /// The underlying serde_json error
        #[from]
        source: serde_json::Error,
    },

    /// Level parsed but violates a level invariant
    #[error("invalid level: {0}")]
    Invalid(String),
}
