//! Core types and errors
//!
//! - Error types and handling
//! - Work area geometry and identifiers shared across modules

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{DockError, ReservationError};
pub use types::{DockSide, Edge, Mechanism, PanelId, WindowHandle, WorkArea};
