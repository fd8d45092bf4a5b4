//! Windows-specific desktop space reservation
//!
//! - Work area control via `SystemParametersInfoW`
//! - Shell AppBar registration via `SHAppBarMessage`

pub mod appbar;
pub mod workarea;

pub use appbar::ShellAppBar;
pub use workarea::SystemWorkarea;

use windows::Win32::Foundation::RECT;

use crate::core::types::WorkArea;

pub(crate) fn to_rect(area: &WorkArea) -> RECT {
    RECT {
        left: area.left,
        top: area.top,
        right: area.right,
        bottom: area.bottom,
    }
}

pub(crate) fn from_rect(rect: &RECT) -> WorkArea {
    WorkArea::new(rect.left, rect.top, rect.right, rect.bottom)
}
