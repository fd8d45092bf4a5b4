//! AppBar reservation
//!
//! Registers the docked panel's window as a shell AppBar. The shell then
//! keeps other windows out of the strip until the bar is removed.

use crate::core::error::{ReservationError, ReservationResult};
use crate::core::types::{DockSide, Edge, Mechanism, WindowHandle, WorkArea};
use crate::os::AppBarBackend;

use super::{ReservationPhase, ReservationState, ReservationStatus, SpaceReserver};

/// AppBar reservation for a single window
#[derive(Debug)]
pub struct AppBarReservation<B: AppBarBackend> {
    backend: B,
    hwnd: WindowHandle,
    /// Area strips are computed against, captured by `initialize`
    screen: Option<WorkArea>,
    registered: bool,
    /// Rectangle the shell accepted for the current registration
    committed: Option<WorkArea>,
    state: ReservationState,
    phase: ReservationPhase,
}

impl<B: AppBarBackend> AppBarReservation<B> {
    pub fn new(backend: B, hwnd: WindowHandle) -> Self {
        Self {
            backend,
            hwnd,
            screen: None,
            registered: false,
            committed: None,
            state: ReservationState::default(),
            phase: ReservationPhase::Uninitialized,
        }
    }

    pub fn initialize(&mut self) -> ReservationResult<WorkArea> {
        if let Err(e) = self.ensure_supported() {
            self.phase = ReservationPhase::Unavailable;
            return Err(e);
        }

        if let Some(screen) = self.screen {
            return Ok(screen);
        }

        match self.backend.screen_area() {
            Ok(area) => {
                self.screen = Some(area);
                self.phase = ReservationPhase::Ready;
                tracing::info!(
                    backend = self.backend.name(),
                    "AppBar reservation ready for window {:#x}, screen {}",
                    self.hwnd.0,
                    area
                );
                Ok(area)
            }
            Err(e) => {
                self.phase = ReservationPhase::Unavailable;
                tracing::error!("Failed to read screen area: {}", e);
                Err(e)
            }
        }
    }

    /// Dock the window on `side` with `width_px`.
    ///
    /// Any previous registration is dropped first, then the bar is
    /// registered, negotiated and committed.
    pub fn reserve(&mut self, side: DockSide, width_px: u32) -> ReservationResult<()> {
        let screen = self.baseline()?;

        if self.registered {
            self.restore()?;
        }

        let strip = screen.edge_strip(side, width_px).ok_or_else(|| {
            ReservationError::apply(format!(
                "cannot dock {width_px}px on the {side} of {screen}"
            ))
        })?;

        self.backend.register(self.hwnd)?;
        self.registered = true;

        match self.negotiate(side, width_px, strip) {
            Ok(rect) => {
                self.committed = Some(rect);
                self.state = ReservationState::reserved(side, width_px);
                tracing::info!("AppBar docked {}px on the {} at {}", width_px, side, rect);
                Ok(())
            }
            Err(e) => {
                tracing::error!("AppBar positioning failed, unregistering: {}", e);
                if let Err(remove_err) = self.backend.remove(self.hwnd) {
                    tracing::warn!("Failed to unregister AppBar: {}", remove_err);
                }
                self.registered = false;
                self.committed = None;
                Err(match e {
                    ReservationError::ApplyFailed { .. } => e,
                    other => ReservationError::apply(other.to_string()),
                })
            }
        }
    }

    /// Unregister the bar; no-op when nothing is registered
    pub fn restore(&mut self) -> ReservationResult<()> {
        self.baseline()?;

        if !self.registered {
            return Ok(());
        }

        self.backend.remove(self.hwnd)?;
        self.registered = false;
        self.committed = None;
        self.state = ReservationState::default();
        tracing::info!("AppBar for window {:#x} removed", self.hwnd.0);
        Ok(())
    }

    /// Drop a registration an earlier process left on this window.
    ///
    /// AppBar space belongs to the window, not to a work area baseline, so
    /// there is nothing to rewrite and this never reports a write.
    pub fn recover(&mut self, _baseline: WorkArea) -> ReservationResult<bool> {
        self.initialize()?;
        self.restore()?;
        self.backend.remove(self.hwnd)?;
        Ok(false)
    }

    pub fn status(&self) -> ReservationStatus {
        ReservationStatus {
            phase: self.phase,
            mechanism: Mechanism::AppBar,
            state: self.state,
            original: self.screen,
        }
    }

    /// Rectangle the shell committed for the current registration
    pub fn committed(&self) -> Option<WorkArea> {
        self.committed
    }

    fn negotiate(
        &mut self,
        side: DockSide,
        width_px: u32,
        strip: WorkArea,
    ) -> ReservationResult<WorkArea> {
        let edge = Edge::from(side);
        let mut rect = self.backend.query_position(self.hwnd, edge, strip)?;

        // QUERYPOS may move the docked edge; keep the requested width
        let width = i32::try_from(width_px)
            .map_err(|_| ReservationError::apply(format!("width {width_px}px out of range")))?;
        match side {
            DockSide::Right => rect.left = rect.right.saturating_sub(width),
            DockSide::Left => rect.right = rect.left.saturating_add(width),
        }

        self.backend.set_position(self.hwnd, edge, rect)
    }

    fn ensure_supported(&self) -> ReservationResult<()> {
        if self.backend.is_supported() {
            Ok(())
        } else {
            Err(ReservationError::unsupported_here())
        }
    }

    fn baseline(&self) -> ReservationResult<WorkArea> {
        self.ensure_supported()?;
        self.screen.ok_or(ReservationError::NotInitialized)
    }
}

impl<B: AppBarBackend> SpaceReserver for AppBarReservation<B> {
    fn mechanism(&self) -> Mechanism {
        Mechanism::AppBar
    }

    fn initialize(&mut self) -> ReservationResult<WorkArea> {
        AppBarReservation::initialize(self)
    }

    fn reserve(&mut self, side: DockSide, width_px: u32) -> ReservationResult<()> {
        AppBarReservation::reserve(self, side, width_px)
    }

    fn restore(&mut self) -> ReservationResult<()> {
        AppBarReservation::restore(self)
    }

    fn status(&self) -> ReservationStatus {
        AppBarReservation::status(self)
    }

    fn recover(&mut self, baseline: WorkArea) -> ReservationResult<bool> {
        AppBarReservation::recover(self, baseline)
    }
}
