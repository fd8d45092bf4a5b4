//! Core data types shared by the backends, the reservation mechanisms and
//! the dock coordinator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Usable desktop rectangle in screen pixels (Win32 `RECT` layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorkArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WorkArea {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// A rectangle with no usable area
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// This area with `width_px` taken off the given edge.
    ///
    /// Returns `None` for a zero width, on overflow, or when nothing usable
    /// would be left.
    pub fn with_reserved(&self, side: DockSide, width_px: u32) -> Option<WorkArea> {
        if width_px == 0 {
            return None;
        }
        let width = i32::try_from(width_px).ok()?;
        let shrunk = match side {
            DockSide::Left => WorkArea {
                left: self.left.checked_add(width)?,
                ..*self
            },
            DockSide::Right => WorkArea {
                right: self.right.checked_sub(width)?,
                ..*self
            },
        };
        (!shrunk.is_degenerate()).then_some(shrunk)
    }

    pub fn with_left_reserved(&self, width_px: u32) -> Option<WorkArea> {
        self.with_reserved(DockSide::Left, width_px)
    }

    pub fn with_right_reserved(&self, width_px: u32) -> Option<WorkArea> {
        self.with_reserved(DockSide::Right, width_px)
    }

    /// The strip a docked panel of `width_px` occupies on `side`
    pub fn edge_strip(&self, side: DockSide, width_px: u32) -> Option<WorkArea> {
        let remaining = self.with_reserved(side, width_px)?;
        Some(match side {
            DockSide::Left => WorkArea {
                right: remaining.left,
                ..*self
            },
            DockSide::Right => WorkArea {
                left: remaining.right,
                ..*self
            },
        })
    }
}

impl fmt::Display for WorkArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{left: {}, top: {}, right: {}, bottom: {}}}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Screen edge a panel docks against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockSide {
    Left,
    #[default]
    Right,
}

impl fmt::Display for DockSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockSide::Left => write!(f, "left"),
            DockSide::Right => write!(f, "right"),
        }
    }
}

/// Shell edge identifiers (`ABE_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left = 0,
    Top = 1,
    Right = 2,
    Bottom = 3,
}

impl Edge {
    pub fn as_raw(self) -> u32 {
        self as u32
    }
}

impl From<DockSide> for Edge {
    fn from(side: DockSide) -> Self {
        match side {
            DockSide::Left => Edge::Left,
            DockSide::Right => Edge::Right,
        }
    }
}

/// Opaque native window handle (`HWND` on Windows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub usize);

impl WindowHandle {
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// OS mechanism used to keep other windows out of the reserved strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mechanism {
    /// Shrink the system work area (`SPI_SETWORKAREA`)
    #[default]
    Workarea,
    /// Register the panel window as a shell AppBar
    AppBar,
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mechanism::Workarea => write!(f, "workarea"),
            Mechanism::AppBar => write!(f, "appbar"),
        }
    }
}

/// Dockable panels of the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    Notebook,
    Browser,
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelId::Notebook => write!(f, "notebook"),
            PanelId::Browser => write!(f, "browser"),
        }
    }
}
