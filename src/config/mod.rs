//! Configuration Management Module
//!
//! Persistent settings for the sidebar:
//! - Reservation switch, mechanism and per-panel layout
//! - Logging setup
//! - JSON file storage with atomic writes

mod settings;
mod storage;

pub use settings::{PanelConfig, PanelsConfig, ReservationConfig, SidebarConfig};
pub use storage::{default_config_path, ConfigError, ConfigResult, ConfigStore, ConfigStoreConfig};
