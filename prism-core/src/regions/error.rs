//! Region error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("view already exists in region '{region}'")]
    ViewAlreadyExists { region: String },

    #[error("region '{region}' already contains a view named '{name}'")]
    NameInUse { region: String, name: String },

    #[error("view does not belong to region '{region}'")]
    ViewNotInRegion { region: String },

    #[error("behavior '{0}' is already registered")]
    BehaviorAlreadyExists(String),

    #[error("views in all-active region '{region}' cannot be deactivated")]
    DeactivateNotAllowed { region: String },

    #[error("invalid region settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RegionError>;
