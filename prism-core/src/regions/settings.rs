//! Declarative region configuration.

use serde::{Deserialize, Serialize};

use super::error::Result;

/// How a region treats activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Any number of views may be active.
    #[default]
    Multiple,
    /// Activating a view deactivates the others.
    SingleActive,
    /// Every view is active from the moment it is added.
    AllActive,
}

/// Settings a region is built from.
///
/// ```json
/// { "name": "MainRegion", "kind": "single_active", "context_binding": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSettings {
    pub name: String,

    #[serde(default)]
    pub kind: RegionKind,

    /// Attach the member lifetime behavior.
    #[serde(default = "enabled")]
    pub member_lifetime: bool,

    /// Attach the region context binding behavior.
    #[serde(default = "enabled")]
    pub context_binding: bool,
}

fn enabled() -> bool {
    true
}

impl RegionSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RegionKind::default(),
            member_lifetime: true,
            context_binding: true,
        }
    }

    pub fn with_kind(mut self, kind: RegionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
