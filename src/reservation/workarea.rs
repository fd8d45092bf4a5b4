//! Work area reservation
//!
//! Shrinks the system work area so maximized windows leave room for a
//! docked panel, and puts the captured baseline back on restore.

use crate::core::error::{ReservationError, ReservationResult};
use crate::core::types::{DockSide, Mechanism, WorkArea};
use crate::os::{ApplyOptions, WorkareaBackend};

use super::{ReservationPhase, ReservationState, ReservationStatus, SpaceReserver};

/// Work area reservation manager
///
/// Holds at most one reservation. Reserving again, on either side, restores
/// the baseline first so reservations never stack.
#[derive(Debug)]
pub struct WorkareaReservation<B: WorkareaBackend> {
    backend: B,
    options: ApplyOptions,
    /// Baseline captured by `initialize`
    original: Option<WorkArea>,
    state: ReservationState,
    phase: ReservationPhase,
}

impl<B: WorkareaBackend> WorkareaReservation<B> {
    /// Create a manager over `backend`; nothing is queried until `initialize`
    pub fn new(backend: B, options: ApplyOptions) -> Self {
        Self {
            backend,
            options,
            original: None,
            state: ReservationState::default(),
            phase: ReservationPhase::Uninitialized,
        }
    }

    /// Capture the current work area as the baseline.
    ///
    /// Calling again after a success returns the stored baseline, so a
    /// shrunk area is never mistaken for the original.
    pub fn initialize(&mut self) -> ReservationResult<WorkArea> {
        if let Err(e) = self.ensure_supported() {
            self.phase = ReservationPhase::Unavailable;
            return Err(e);
        }

        if let Some(original) = self.original {
            return Ok(original);
        }

        match self.backend.query_work_area() {
            Ok(area) => {
                self.original = Some(area);
                self.phase = ReservationPhase::Ready;
                tracing::info!(
                    backend = self.backend.name(),
                    "Work area reservation ready, baseline {}",
                    area
                );
                Ok(area)
            }
            Err(e) => {
                self.phase = ReservationPhase::Unavailable;
                tracing::error!("Failed to read work area: {}", e);
                Err(e)
            }
        }
    }

    /// Reserve `width_px` on the left edge
    pub fn reserve_left(&mut self, width_px: u32) -> ReservationResult<()> {
        self.reserve(DockSide::Left, width_px)
    }

    /// Reserve `width_px` on the right edge
    pub fn reserve_right(&mut self, width_px: u32) -> ReservationResult<()> {
        self.reserve(DockSide::Right, width_px)
    }

    /// Reserve `width_px` on `side`, replacing any active reservation.
    ///
    /// The active reservation is restored first, so a rejected width leaves
    /// nothing reserved.
    pub fn reserve(&mut self, side: DockSide, width_px: u32) -> ReservationResult<()> {
        let original = self.baseline()?;

        if self.state.is_reserved {
            self.restore()?;
        }

        let target = original.with_reserved(side, width_px).ok_or_else(|| {
            ReservationError::apply(format!(
                "cannot reserve {width_px}px on the {side} of {original}"
            ))
        })?;

        if let Err(e) = self.backend.apply_work_area(&target, self.options) {
            tracing::error!("Failed to reserve {}px on the {}: {}", width_px, side, e);
            return Err(e);
        }

        self.state = ReservationState::reserved(side, width_px);
        tracing::info!("Reserved {}px on the {}, work area now {}", width_px, side, target);
        Ok(())
    }

    /// Put the baseline back; no-op when nothing is reserved
    pub fn restore(&mut self) -> ReservationResult<()> {
        let original = self.baseline()?;

        if !self.state.is_reserved {
            return Ok(());
        }

        if let Err(e) = self.backend.apply_work_area(&original, self.options) {
            tracing::error!("Failed to restore work area {}: {}", original, e);
            return Err(e);
        }

        self.state = ReservationState::default();
        tracing::info!("Work area restored to {}", original);
        Ok(())
    }

    /// Put back a baseline recorded by an earlier process that exited with
    /// space still reserved.
    ///
    /// `baseline` becomes this manager's baseline. Returns whether the work
    /// area had to be rewritten.
    pub fn recover(&mut self, baseline: WorkArea) -> ReservationResult<bool> {
        if baseline.is_degenerate() {
            return Err(ReservationError::apply(format!(
                "refusing to recover degenerate work area {baseline}"
            )));
        }

        self.initialize()?;
        self.restore()?;

        let current = self.backend.query_work_area()?;
        self.original = Some(baseline);
        if current == baseline {
            tracing::debug!("Work area already at recorded baseline {}", baseline);
            return Ok(false);
        }

        if let Err(e) = self.backend.apply_work_area(&baseline, self.options) {
            tracing::error!("Failed to recover work area {}: {}", baseline, e);
            return Err(e);
        }

        tracing::info!("Recovered work area {} (was {})", baseline, current);
        Ok(true)
    }

    pub fn status(&self) -> ReservationStatus {
        ReservationStatus {
            phase: self.phase,
            mechanism: Mechanism::Workarea,
            state: self.state,
            original: self.original,
        }
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
        self.original.ok_or(ReservationError::NotInitialized)
    }
}

impl<B: WorkareaBackend> SpaceReserver for WorkareaReservation<B> {
    fn mechanism(&self) -> Mechanism {
        Mechanism::Workarea
    }

    fn initialize(&mut self) -> ReservationResult<WorkArea> {
        WorkareaReservation::initialize(self)
    }

    fn reserve(&mut self, side: DockSide, width_px: u32) -> ReservationResult<()> {
        WorkareaReservation::reserve(self, side, width_px)
    }

    fn restore(&mut self) -> ReservationResult<()> {
        WorkareaReservation::restore(self)
    }

    fn status(&self) -> ReservationStatus {
        WorkareaReservation::status(self)
    }

    fn recover(&mut self, baseline: WorkArea) -> ReservationResult<bool> {
        WorkareaReservation::recover(self, baseline)
    }

    fn set_apply_options(&mut self, options: ApplyOptions) {
        self.options = options;
    }
}
