//! Why an activation transition happened.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification tag carried by activation changes and by the
/// notifications they produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    /// Navigation requested by the application.
    RequestNavigate,
    /// Backward journal navigation.
    GoBack,
    /// Forward journal navigation.
    GoForward,
    /// Direct, programmatic activation or deactivation.
    Programmatic,
}

impl fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavigationKind::RequestNavigate => "RequestNavigate",
            NavigationKind::GoBack => "GoBack",
            NavigationKind::GoForward => "GoForward",
            NavigationKind::Programmatic => "Programmatic",
        };
        f.write_str(name)
    }
}
