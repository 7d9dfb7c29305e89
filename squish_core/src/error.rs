//! Error types for soft-body construction, simulation access and config loading

use rapier2d::prelude::RigidBodyHandle;
use thiserror::Error;

/// Soft-body errors
#[derive(Debug, Error)]
pub enum SoftBodyError {
    #[error("Physics world cannot accept bodies: {reason}")]
    InvalidWorldState { reason: String },

    #[error("Soft body already holds live bodies; destroy it before creating again")]
    AlreadyInitialized,

    #[error("Soft body has no physics object yet")]
    NotInitialized,

    #[error("Body {0:?} is no longer in the physics world")]
    BodyMissing(RigidBodyHandle),

    #[error("Invalid soft body configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SoftBodyError {
    pub fn invalid_world(reason: impl Into<String>) -> Self {
        Self::InvalidWorldState {
            reason: reason.into(),
        }
    }
}

impl From<serde_yaml::Error> for SoftBodyError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::de::Error> for SoftBodyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for soft-body operations
pub type SoftBodyResult<T> = Result<T, SoftBodyError>;
