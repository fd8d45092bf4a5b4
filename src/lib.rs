//! sidebar-dock - desktop space reservation for docked sidebar panels
//!
//! This crate keeps maximized windows clear of a docked sidebar panel:
//! - Work area reservation through `SPI_SETWORKAREA`
//! - Shell AppBar registration as an alternative mechanism
//! - One coordinator per process handing out leases to panels
//! - Platform backends with an unsupported stub and an in-memory desktop
//! - JSON settings and `tracing` based logging

pub mod config;
pub mod core;
pub mod dock;
pub mod logging;
pub mod os;
pub mod reservation;

// Re-export commonly used items
pub use config::{ConfigStore, ReservationConfig, SidebarConfig};
pub use crate::core::error::{DockError, ReservationError};
pub use crate::core::types::{DockSide, Mechanism, PanelId, WindowHandle, WorkArea};
pub use dock::{DockCoordinator, DockLease, DockStatus};
pub use reservation::{
    platform_reserver, AppBarReservation, ReservationStatus, SpaceReserver, WorkareaReservation,
};
