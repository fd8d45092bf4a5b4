//! Windows Work Area Backend
//!
//! Reads and replaces the primary monitor's work area with
//! `SystemParametersInfoW(SPI_GETWORKAREA / SPI_SETWORKAREA)`.

use std::ffi::c_void;

use windows::Win32::Foundation::RECT;
use windows::Win32::UI::WindowsAndMessaging::{
    SystemParametersInfoW, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SPI_GETWORKAREA, SPI_SETWORKAREA,
    SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS,
};

use super::{from_rect, to_rect};
use crate::core::error::{ReservationError, ReservationResult};
use crate::core::types::WorkArea;
use crate::os::{ApplyOptions, WorkareaBackend};

/// System work area of the primary monitor
#[derive(Debug, Default)]
pub struct SystemWorkarea;

impl SystemWorkarea {
    pub fn new() -> Self {
        Self
    }

    fn update_flags(options: ApplyOptions) -> SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS {
        let mut bits = 0;
        if options.persist {
            bits |= SPIF_UPDATEINIFILE.0;
        }
        if options.broadcast {
            bits |= SPIF_SENDCHANGE.0;
        }
        SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(bits)
    }
}

impl WorkareaBackend for SystemWorkarea {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn query_work_area(&self) -> ReservationResult<WorkArea> {
        let mut rect = RECT::default();

        unsafe {
            SystemParametersInfoW(
                SPI_GETWORKAREA,
                0,
                Some(&mut rect as *mut RECT as *mut c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
            .map_err(|e| ReservationError::QueryFailed {
                reason: format!("SPI_GETWORKAREA failed: {:?}", e),
            })?;
        }

        let area = from_rect(&rect);
        tracing::debug!("Queried work area {}", area);
        Ok(area)
    }

    fn apply_work_area(&mut self, area: &WorkArea, options: ApplyOptions) -> ReservationResult<()> {
        if area.is_degenerate() {
            return Err(ReservationError::apply(format!(
                "refusing degenerate work area {area}"
            )));
        }

        let mut rect = to_rect(area);

        unsafe {
            SystemParametersInfoW(
                SPI_SETWORKAREA,
                0,
                Some(&mut rect as *mut RECT as *mut c_void),
                Self::update_flags(options),
            )
            .map_err(|e| ReservationError::ApplyFailed {
                reason: format!("SPI_SETWORKAREA failed: {:?}", e),
            })?;
        }

        tracing::debug!(
            persist = options.persist,
            broadcast = options.broadcast,
            "Applied work area {}",
            area
        );
        Ok(())
    }
}
