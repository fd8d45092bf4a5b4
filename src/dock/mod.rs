//! Dock coordination
//!
//! Panels never touch the reservation mechanism directly. They ask the
//! process-wide [`DockCoordinator`] for a [`DockLease`]; only the newest lease
//! is live, and space is given back when it is released or dropped.


use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::ReservationConfig;
use crate::core::error::{DockError, DockResult};
use crate::core::types::{DockSide, PanelId, WindowHandle, WorkArea};
use crate::reservation::{apply_options, platform_reserver, ReservationStatus, SpaceReserver};

/// Panel currently holding the reservation
#[derive(Debug, Clone, Copy)]
struct Holder {
    panel: PanelId,
    ticket: u64,
    side: DockSide,
}

enum Availability {
    /// `initialize` not attempted yet
    Pending,
    Ready,
    /// Initialization failed; reservation is off for this process
    Degraded(String),
}

struct DockState {
    reserver: Box<dyn SpaceReserver>,
    config: ReservationConfig,
    availability: Availability,
    holder: Option<Holder>,
    next_ticket: u64,
}

impl DockState {
    fn initialize(&mut self) -> DockResult<WorkArea> {
        match self.reserver.initialize() {
            Ok(baseline) => {
                self.availability = Availability::Ready;
                Ok(baseline)
            }
            Err(e) => {
                tracing::warn!(
                    mechanism = %self.reserver.mechanism(),
                    "Desktop space reservation unavailable, panels will overlap windows: {}",
                    e
                );
                self.availability = Availability::Degraded(e.to_string());
                Err(e.into())
            }
        }
    }

    fn ensure_ready(&mut self) -> DockResult<()> {
        if matches!(self.availability, Availability::Pending) {
            // The error is surfaced as Unavailable below
            let _ = self.initialize();
        }
        match &self.availability {
            Availability::Ready => Ok(()),
            Availability::Degraded(reason) => Err(DockError::Unavailable {
                reason: reason.clone(),
            }),
            Availability::Pending => Err(DockError::Unavailable {
                reason: "not initialized".to_string(),
            }),
        }
    }

    /// Drop the holder when the OS no longer has anything reserved
    fn sync_holder(&mut self) {
        if !self.reserver.status().is_reserved() {
            self.holder = None;
        }
    }

    fn release_all(&mut self) -> DockResult<()> {
        if self.reserver.status().is_reserved() {
            self.reserver.restore()?;
        }
        self.holder = None;
        Ok(())
    }
}

impl Drop for DockState {
    fn drop(&mut self) {
        if self.reserver.status().is_reserved() {
            tracing::info!("Dock shutting down with space reserved, restoring");
            if let Err(e) = self.release_all() {
                tracing::error!("Failed to restore desktop space on shutdown: {}", e);
            }
        }
    }
}

/// Status reported to the UI and the CLI
#[derive(Debug, Clone, Serialize)]
pub struct DockStatus {
    pub enabled: bool,
    pub available: bool,
    /// Why reservation is unavailable, if it is
    pub degraded_reason: Option<String>,
    /// Panel holding the live lease
    pub holder: Option<PanelId>,
    pub reservation: ReservationStatus,
}

/// Serializes every reservation change for the process.
///
/// Clones share one coordinator. When the last clone and the last lease are
/// gone, anything still reserved is restored.
#[derive(Clone)]
pub struct DockCoordinator {
    state: Arc<Mutex<DockState>>,
}

impl DockCoordinator {
    /// Coordinate `reserver` with the given settings
    pub fn new(reserver: Box<dyn SpaceReserver>, config: ReservationConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(DockState {
                reserver,
                config,
                availability: Availability::Pending,
                holder: None,
                next_ticket: 1,
            })),
        }
    }

    /// Coordinator over this host's platform backend
    pub fn for_platform(config: ReservationConfig, hwnd: Option<WindowHandle>) -> DockResult<Self> {
        let reserver = platform_reserver(&config, hwnd)?;
        Ok(Self::new(reserver, config))
    }

    /// Capture the baseline.
    ///
    /// A failure is not fatal: the coordinator degrades and every later
    /// acquire reports `Unavailable`. Calling again retries.
    pub fn initialize(&self) -> DockResult<WorkArea> {
        self.state.lock().initialize()
    }

    /// Initialize against a baseline an earlier process recorded and put it
    /// back. Any reservation this coordinator holds is released first.
    ///
    /// Returns whether the desktop had to be rewritten.
    pub fn recover(&self, baseline: WorkArea) -> DockResult<bool> {
        let mut state = self.state.lock();
        state.release_all()?;

        match state.reserver.recover(baseline) {
            Ok(rewritten) => {
                state.availability = Availability::Ready;
                Ok(rewritten)
            }
            Err(e) => {
                tracing::warn!("Failed to recover baseline {}: {}", baseline, e);
                state.availability = Availability::Degraded(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Reserve space for `panel` using its configured side and width
    pub fn acquire(&self, panel: PanelId) -> DockResult<DockLease> {
        let layout = *self.state.lock().config.panels.get(panel);
        self.acquire_with(panel, layout.side, layout.width_px)
    }

    /// Reserve space for `panel` on `side`.
    ///
    /// Any earlier lease, from this or another panel, is superseded.
    pub fn acquire_with(&self, panel: PanelId, side: DockSide, width_px: u32) -> DockResult<DockLease> {
        let mut state = self.state.lock();

        if !state.config.enabled {
            return Err(DockError::Disabled);
        }
        state.ensure_ready()?;

        let width_px = state.config.clamp_width(width_px);
        if let Err(e) = state.reserver.reserve(side, width_px) {
            tracing::error!("Failed to reserve space for {}: {}", panel, e);
            state.sync_holder();
            return Err(e.into());
        }

        if let Some(previous) = state.holder {
            tracing::warn!(
                "{} took over the reservation held by {}",
                panel,
                previous.panel
            );
        }

        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.holder = Some(Holder { panel, ticket, side });
        tracing::info!("{} docked {} with {}px reserved", panel, side, width_px);

        Ok(DockLease {
            state: Arc::clone(&self.state),
            panel,
            ticket,
            released: false,
        })
    }

    pub fn status(&self) -> DockStatus {
        let state = self.state.lock();
        let (available, degraded_reason) = match &state.availability {
            Availability::Ready => (true, None),
            Availability::Pending => (false, None),
            Availability::Degraded(reason) => (false, Some(reason.clone())),
        };

        DockStatus {
            enabled: state.config.enabled,
            available,
            degraded_reason,
            holder: state.holder.map(|h| h.panel),
            reservation: state.reserver.status(),
        }
    }

    /// Restore whatever is held; outstanding leases become inert
    pub fn shutdown(&self) -> DockResult<()> {
        let mut state = self.state.lock();
        if let Some(holder) = state.holder {
            tracing::info!("Releasing reservation held by {}", holder.panel);
        }
        state.release_all()
    }

    /// Swap in new settings.
    ///
    /// Write flags apply from the next OS call and an active reservation
    /// keeps its current size. Switching mechanism needs a new coordinator.
    pub fn update_config(&self, config: ReservationConfig) -> DockResult<()> {
        let mut state = self.state.lock();

        let active = state.reserver.mechanism();
        if config.mechanism != active {
            return Err(DockError::MechanismChange {
                active,
                requested: config.mechanism,
            });
        }

        state.reserver.set_apply_options(apply_options(&config));
        state.config = config;
        tracing::debug!("Dock settings updated");
        Ok(())
    }
}

/// A panel's claim on reserved desktop space
///
/// Dropping a live lease releases the space.
pub struct DockLease {
    state: Arc<Mutex<DockState>>,
    panel: PanelId,
    ticket: u64,
    released: bool,
}

impl DockLease {
    pub fn panel(&self) -> PanelId {
        self.panel
    }

    /// Whether this lease still owns the reservation
    pub fn is_active(&self) -> bool {
        !self.released && self.owns(&self.state.lock())
    }

    /// Re-reserve at a new width after the panel was resized
    pub fn resize(&self, width_px: u32) -> DockResult<()> {
        let mut state = self.state.lock();
        let holder = self.current_holder(&state)?;

        let width_px = state.config.clamp_width(width_px);
        if let Err(e) = state.reserver.reserve(holder.side, width_px) {
            tracing::error!("Failed to resize {} reservation: {}", self.panel, e);
            // The old strip may already be gone
            state.sync_holder();
            return Err(e.into());
        }

        tracing::debug!("{} reservation resized to {}px", self.panel, width_px);
        Ok(())
    }

    /// Give the space back. A superseded lease has nothing to give back.
    pub fn release(&mut self) -> DockResult<()> {
        if self.released {
            return Ok(());
        }

        let mut state = self.state.lock();
        if self.owns(&state) {
            state.release_all()?;
            tracing::info!("{} released its reservation", self.panel);
        }
        drop(state);

        self.released = true;
        Ok(())
    }

    fn owns(&self, state: &DockState) -> bool {
        state.holder.is_some_and(|h| h.ticket == self.ticket)
    }

    fn current_holder(&self, state: &DockState) -> DockResult<Holder> {
        if self.released {
            return Err(DockError::Released { panel: self.panel });
        }
        match state.holder {
            Some(holder) if holder.ticket == self.ticket => Ok(holder),
            // A newer lease was issued after this one
            _ if self.ticket + 1 != state.next_ticket => {
                Err(DockError::Superseded { panel: self.panel })
            }
            _ => Err(DockError::Released { panel: self.panel }),
        }
    }
}

impl Drop for DockLease {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::error!("Failed to release {} reservation on drop: {}", self.panel, e);
        }
    }
}

impl std::fmt::Debug for DockLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockLease")
            .field("panel", &self.panel)
            .field("ticket", &self.ticket)
            .field("released", &self.released)
            .finish()
    }
}
