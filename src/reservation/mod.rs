//! Desktop space reservation
//!
//! Two mechanisms keep maximized windows out of a docked panel's strip:
//! - [`WorkareaReservation`] shrinks the system work area
//! - [`AppBarReservation`] registers the panel window as a shell AppBar
//!
//! Both sit behind [`SpaceReserver`] so the dock coordinator owns exactly
//! one of them at a time.

mod appbar;
mod workarea;

#[cfg(test)]
mod tests;

pub use appbar::AppBarReservation;
pub use workarea::WorkareaReservation;

use serde::{Deserialize, Serialize};

use crate::config::ReservationConfig;
use crate::core::error::{ReservationError, ReservationResult};
use crate::core::types::{DockSide, Mechanism, WindowHandle, WorkArea};
use crate::os::{ApplyOptions, PlatformAppBar, PlatformWorkarea};

/// Lifecycle phase of a reservation manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationPhase {
    /// `initialize()` has not succeeded yet
    #[default]
    Uninitialized,
    /// Baseline captured, reservations can be made
    Ready,
    /// Platform unsupported or the baseline query failed
    Unavailable,
}

/// What is currently reserved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReservationState {
    pub is_reserved: bool,
    pub reserved_width_px: u32,
    pub reserved_side: Option<DockSide>,
}

impl ReservationState {
    pub(crate) fn reserved(side: DockSide, width_px: u32) -> Self {
        Self {
            is_reserved: true,
            reserved_width_px: width_px,
            reserved_side: Some(side),
        }
    }
}

/// Snapshot returned by `status()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationStatus {
    pub phase: ReservationPhase,
    pub mechanism: Mechanism,
    #[serde(flatten)]
    pub state: ReservationState,
    /// Baseline captured by `initialize()`
    pub original: Option<WorkArea>,
}

impl ReservationStatus {
    pub fn is_reserved(&self) -> bool {
        self.state.is_reserved
    }
}

/// A mechanism that can reserve a strip on one screen edge
pub trait SpaceReserver: Send {
    /// Which OS mechanism this is
    fn mechanism(&self) -> Mechanism;

    /// Capture the baseline area; must succeed before anything else
    fn initialize(&mut self) -> ReservationResult<WorkArea>;

    /// Reserve `width_px` on `side`, replacing any active reservation
    fn reserve(&mut self, side: DockSide, width_px: u32) -> ReservationResult<()>;

    /// Release the active reservation; no-op when nothing is reserved
    fn restore(&mut self) -> ReservationResult<()>;

    /// Current state, never fails
    fn status(&self) -> ReservationStatus;

    /// Initialize against a baseline recorded by an earlier process and put
    /// it back. Returns whether anything was rewritten.
    fn recover(&mut self, baseline: WorkArea) -> ReservationResult<bool>;

    /// Replace the flags used for later writes.
    ///
    /// AppBar messages carry no such flags, so the default ignores them.
    fn set_apply_options(&mut self, _options: ApplyOptions) {}
}

/// Apply flags from settings
pub fn apply_options(config: &ReservationConfig) -> ApplyOptions {
    ApplyOptions {
        persist: config.persist_to_profile,
        broadcast: config.broadcast_change,
    }
}

/// Build the configured mechanism on top of this host's platform backend.
///
/// The AppBar mechanism needs the handle of the window being docked.
pub fn platform_reserver(
    config: &ReservationConfig,
    hwnd: Option<WindowHandle>,
) -> ReservationResult<Box<dyn SpaceReserver>> {
    match config.mechanism {
        Mechanism::Workarea => Ok(Box::new(WorkareaReservation::new(
            PlatformWorkarea::new(),
            apply_options(config),
        ))),
        Mechanism::AppBar => {
            let hwnd = hwnd.ok_or_else(|| ReservationError::InvalidWindowHandle {
                reason: "AppBar reservation needs the docked window's handle".to_string(),
            })?;
            Ok(Box::new(AppBarReservation::new(PlatformAppBar::new(), hwnd)))
        }
    }
}
