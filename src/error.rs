//! Error types
//!
//! Only configuration loading and surface setup can fail outright. A running
//! animation never errors; it degrades visually instead.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while loading or validating a scene configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML could not be parsed
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Two growth specs share an id
    #[error("Duplicate growth spec id '{0}'")]
    DuplicateId(String),

    /// Attachment point outside the parent
    #[error("Growth spec '{id}' attaches at {value}%, expected 0-100")]
    AttachmentOutOfRange { id: String, value: f32 },

    /// A numeric field is negative or not finite
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: f32 },
}

/// Errors raised by the phase orchestrator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhaseError {
    /// A growth cycle is still running; its barrier has not resolved yet
    #[error("Cannot restart while the {phase} phase is still running")]
    CycleInProgress { phase: &'static str },
}

/// Errors raised while setting up a rendering surface
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Surface setup failed: {0}")]
    Context(String),
}

impl From<JsValue> for SurfaceError {
    fn from(value: JsValue) -> Self {
        SurfaceError::Context(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
