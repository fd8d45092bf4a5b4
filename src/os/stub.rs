//! Stub backends for non-Windows platforms
//!
//! Work area reservation only exists on Windows. These backends report
//! themselves unsupported and fail every call, so the reservation layer
//! degrades instead of pretending to succeed.

use crate::core::error::{ReservationError, ReservationResult};
use crate::core::types::{Edge, WindowHandle, WorkArea};
use crate::os::{AppBarBackend, ApplyOptions, WorkareaBackend};

/// Work area backend for platforms without one
#[derive(Debug, Default)]
pub struct UnsupportedWorkarea;

impl UnsupportedWorkarea {
    pub fn new() -> Self {
        Self
    }
}

impl WorkareaBackend for UnsupportedWorkarea {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn query_work_area(&self) -> ReservationResult<WorkArea> {
        Err(ReservationError::unsupported_here())
    }

    fn apply_work_area(&mut self, _area: &WorkArea, _options: ApplyOptions) -> ReservationResult<()> {
        tracing::warn!("Work area control not supported on this platform");
        Err(ReservationError::unsupported_here())
    }
}

/// AppBar backend for platforms without a shell AppBar API
#[derive(Debug, Default)]
pub struct UnsupportedAppBar;

impl UnsupportedAppBar {
    pub fn new() -> Self {
        Self
    }
}

impl AppBarBackend for UnsupportedAppBar {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn screen_area(&self) -> ReservationResult<WorkArea> {
        Err(ReservationError::unsupported_here())
    }

    fn register(&mut self, _hwnd: WindowHandle) -> ReservationResult<()> {
        tracing::warn!("AppBar registration not supported on this platform");
        Err(ReservationError::unsupported_here())
    }

    fn query_position(
        &mut self,
        _hwnd: WindowHandle,
        _edge: Edge,
        _proposed: WorkArea,
    ) -> ReservationResult<WorkArea> {
        Err(ReservationError::unsupported_here())
    }

    fn set_position(
        &mut self,
        _hwnd: WindowHandle,
        _edge: Edge,
        _rect: WorkArea,
    ) -> ReservationResult<WorkArea> {
        Err(ReservationError::unsupported_here())
    }

    fn remove(&mut self, _hwnd: WindowHandle) -> ReservationResult<()> {
        Err(ReservationError::unsupported_here())
    }
}
