//! Windows Shell AppBar Backend
//!
//! Registers a panel window as an AppBar so the shell keeps maximized
//! windows out of its strip. Sequence: ABM_NEW, ABM_QUERYPOS, ABM_SETPOS,
//! and ABM_REMOVE on release.

use std::ffi::c_void;
use std::mem;

use windows::Win32::Foundation::{HWND, LPARAM, RECT};
use windows::Win32::UI::Shell::{
    SHAppBarMessage, ABM_NEW, ABM_QUERYPOS, ABM_REMOVE, ABM_SETPOS, APPBARDATA,
};

use super::{from_rect, to_rect};
use crate::core::error::{ReservationError, ReservationResult};
use crate::core::types::{Edge, WindowHandle, WorkArea};
use crate::os::{AppBarBackend, WorkareaBackend};

use super::workarea::SystemWorkarea;

/// Shell AppBar registration
#[derive(Debug, Default)]
pub struct ShellAppBar {
    workarea: SystemWorkarea,
}

impl ShellAppBar {
    pub fn new() -> Self {
        Self {
            workarea: SystemWorkarea::new(),
        }
    }

    fn appbar_data(hwnd: WindowHandle, edge: Edge, rect: RECT) -> APPBARDATA {
        APPBARDATA {
            cbSize: mem::size_of::<APPBARDATA>() as u32,
            hWnd: HWND(hwnd.0 as *mut c_void),
            uCallbackMessage: 0,
            uEdge: edge.as_raw(),
            rc: rect,
            lParam: LPARAM(0),
        }
    }

    fn check_handle(hwnd: WindowHandle) -> ReservationResult<()> {
        if hwnd.is_null() {
            return Err(ReservationError::InvalidWindowHandle {
                reason: "null window handle".to_string(),
            });
        }
        Ok(())
    }
}

impl AppBarBackend for ShellAppBar {
    fn name(&self) -> &'static str {
        "win32-appbar"
    }

    fn screen_area(&self) -> ReservationResult<WorkArea> {
        self.workarea.query_work_area()
    }

    fn register(&mut self, hwnd: WindowHandle) -> ReservationResult<()> {
        Self::check_handle(hwnd)?;
        let mut data = Self::appbar_data(hwnd, Edge::Right, RECT::default());

        // ABM_NEW returns FALSE when the window is already registered
        let registered = unsafe { SHAppBarMessage(ABM_NEW, &mut data) };
        if registered == 0 {
            return Err(ReservationError::apply(format!(
                "ABM_NEW rejected window {:#x}",
                hwnd.0
            )));
        }

        tracing::debug!("Registered AppBar for window {:#x}", hwnd.0);
        Ok(())
    }

    fn query_position(
        &mut self,
        hwnd: WindowHandle,
        edge: Edge,
        proposed: WorkArea,
    ) -> ReservationResult<WorkArea> {
        Self::check_handle(hwnd)?;
        let mut data = Self::appbar_data(hwnd, edge, to_rect(&proposed));

        unsafe {
            SHAppBarMessage(ABM_QUERYPOS, &mut data);
        }

        Ok(from_rect(&data.rc))
    }

    fn set_position(
        &mut self,
        hwnd: WindowHandle,
        edge: Edge,
        rect: WorkArea,
    ) -> ReservationResult<WorkArea> {
        Self::check_handle(hwnd)?;
        if rect.is_degenerate() {
            return Err(ReservationError::apply(format!(
                "refusing degenerate AppBar rect {rect}"
            )));
        }
        let mut data = Self::appbar_data(hwnd, edge, to_rect(&rect));

        unsafe {
            SHAppBarMessage(ABM_SETPOS, &mut data);
        }

        let committed = from_rect(&data.rc);
        tracing::debug!("AppBar {:#x} committed at {}", hwnd.0, committed);
        Ok(committed)
    }

    fn remove(&mut self, hwnd: WindowHandle) -> ReservationResult<()> {
        Self::check_handle(hwnd)?;
        let mut data = Self::appbar_data(hwnd, Edge::Right, RECT::default());

        unsafe {
            SHAppBarMessage(ABM_REMOVE, &mut data);
        }

        tracing::debug!("Removed AppBar for window {:#x}", hwnd.0);
        Ok(())
    }
}
