//! Error types for the sidebar dock
//!
//! Every failure here is recoverable: a panel that cannot reserve space keeps
//! working, it just overlaps other windows.

use thiserror::Error;

use crate::core::types::{Mechanism, PanelId};

/// Result type for reservation mechanisms and platform backends
pub type ReservationResult<T> = std::result::Result<T, ReservationError>;

/// Result type for the dock coordinator
pub type DockResult<T> = std::result::Result<T, DockError>;

/// Errors raised while reading or mutating the desktop work area
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Desktop space reservation is not supported on {platform}")]
    PlatformUnsupported { platform: String },

    #[error("Failed to query work area: {reason}")]
    QueryFailed { reason: String },

    #[error("Failed to apply work area: {reason}")]
    ApplyFailed { reason: String },

    #[error("Reservation manager used before initialize()")]
    NotInitialized,

    #[error("Window handle invalid: {reason}")]
    InvalidWindowHandle { reason: String },
}

impl ReservationError {
    /// Error for the host we are currently running on
    pub fn unsupported_here() -> Self {
        Self::PlatformUnsupported {
            platform: std::env::consts::OS.to_string(),
        }
    }

    pub fn apply(reason: impl Into<String>) -> Self {
        Self::ApplyFailed {
            reason: reason.into(),
        }
    }

    pub fn query(reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the dock coordinator to panels
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DockError {
    #[error("Desktop space reservation is disabled in settings")]
    Disabled,

    #[error("Desktop space reservation unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Reservation for {panel} was taken over by another panel")]
    Superseded { panel: PanelId },

    #[error("Reservation for {panel} was already released")]
    Released { panel: PanelId },

    #[error("Cannot switch reservation from {active} to {requested} while running")]
    MechanismChange {
        active: Mechanism,
        requested: Mechanism,
    },

    #[error(transparent)]
    Reservation(#[from] ReservationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_names_host_platform() {
        let err = ReservationError::unsupported_here();
        assert!(err.to_string().contains(std::env::consts::OS));
    }

    #[test]
    fn test_dock_error_wraps_reservation_error() {
        let err: DockError = ReservationError::NotInitialized.into();
        assert_eq!(err, DockError::Reservation(ReservationError::NotInitialized));
    }

    #[test]
    fn test_superseded_message_names_panel() {
        let err = DockError::Superseded {
            panel: PanelId::Notebook,
        };
        assert_eq!(
            err.to_string(),
            "Reservation for notebook was taken over by another panel"
        );
    }
}
