//! OS Integration Layer
//!
//! Platform access for desktop space reservation:
//! - Reading and writing the system work area
//! - Shell AppBar registration for docked windows
//!
//! Native calls live only under `os::windows`. Everything else talks to the
//! traits below, so other hosts get the unsupported stub and tests use the
//! simulated desktop.

#[cfg(windows)]
pub mod windows;

#[cfg(windows)]
pub use self::windows::{ShellAppBar as PlatformAppBar, SystemWorkarea as PlatformWorkarea};

pub mod stub;

#[cfg(not(windows))]
pub use self::stub::{UnsupportedAppBar as PlatformAppBar, UnsupportedWorkarea as PlatformWorkarea};

pub mod simulated;


use crate::core::error::ReservationResult;
use crate::core::types::{Edge, WindowHandle, WorkArea};

pub use simulated::SimulatedDesktop;

/// How a new work area is pushed to the system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Write the change to the user profile (`SPIF_UPDATEINIFILE`)
    pub persist: bool,
    /// Broadcast `WM_SETTINGCHANGE` so running apps re-layout (`SPIF_SENDCHANGE`)
    pub broadcast: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            persist: true,
            broadcast: true,
        }
    }
}

/// Access to the system-wide work area rectangle
pub trait WorkareaBackend: Send {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Whether this backend can touch the desktop at all
    fn is_supported(&self) -> bool {
        true
    }

    /// Read the current work area of the primary monitor
    fn query_work_area(&self) -> ReservationResult<WorkArea>;

    /// Replace the work area of the primary monitor
    fn apply_work_area(&mut self, area: &WorkArea, options: ApplyOptions) -> ReservationResult<()>;
}

/// Shell AppBar registration keyed by a native window handle
pub trait AppBarBackend: Send {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Whether this backend can touch the desktop at all
    fn is_supported(&self) -> bool {
        true
    }

    /// Area that AppBar strips are computed against
    fn screen_area(&self) -> ReservationResult<WorkArea>;

    /// Register `hwnd` as an AppBar (`ABM_NEW`)
    fn register(&mut self, hwnd: WindowHandle) -> ReservationResult<()>;

    /// Ask the shell to adjust a proposed rectangle (`ABM_QUERYPOS`)
    fn query_position(
        &mut self,
        hwnd: WindowHandle,
        edge: Edge,
        proposed: WorkArea,
    ) -> ReservationResult<WorkArea>;

    /// Commit the rectangle and reserve it (`ABM_SETPOS`)
    fn set_position(
        &mut self,
        hwnd: WindowHandle,
        edge: Edge,
        rect: WorkArea,
    ) -> ReservationResult<WorkArea>;

    /// Unregister `hwnd` and release its space (`ABM_REMOVE`)
    fn remove(&mut self, hwnd: WindowHandle) -> ReservationResult<()>;
}

impl<T: WorkareaBackend + ?Sized> WorkareaBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn query_work_area(&self) -> ReservationResult<WorkArea> {
        (**self).query_work_area()
    }

    fn apply_work_area(&mut self, area: &WorkArea, options: ApplyOptions) -> ReservationResult<()> {
        (**self).apply_work_area(area, options)
    }
}

impl<T: AppBarBackend + ?Sized> AppBarBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn screen_area(&self) -> ReservationResult<WorkArea> {
        (**self).screen_area()
    }

    fn register(&mut self, hwnd: WindowHandle) -> ReservationResult<()> {
        (**self).register(hwnd)
    }

    fn query_position(
        &mut self,
        hwnd: WindowHandle,
        edge: Edge,
        proposed: WorkArea,
    ) -> ReservationResult<WorkArea> {
        (**self).query_position(hwnd, edge, proposed)
    }

    fn set_position(
        &mut self,
        hwnd: WindowHandle,
        edge: Edge,
        rect: WorkArea,
    ) -> ReservationResult<WorkArea> {
        (**self).set_position(hwnd, edge, rect)
    }

    fn remove(&mut self, hwnd: WindowHandle) -> ReservationResult<()> {
        (**self).remove(hwnd)
    }
}
