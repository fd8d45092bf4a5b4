//! Settings model
//!
//! Everything carries a serde default so partial or older files still load.

use serde::{Deserialize, Serialize};

use crate::core::types::{DockSide, Mechanism, PanelId, WorkArea};
use crate::logging::LoggingConfig;

use super::{ConfigError, ConfigResult};

/// Root of `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Desktop space reservation
    #[serde(default)]
    pub reservation: ReservationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Work area to put back if a reservation outlived its process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_baseline: Option<WorkArea>,

    /// Last modified timestamp
    #[serde(default = "default_timestamp")]
    pub last_modified: String,
}

fn default_version() -> u32 {
    1
}

fn default_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            reservation: ReservationConfig::default(),
            logging: LoggingConfig::default(),
            saved_baseline: None,
            last_modified: default_timestamp(),
        }
    }
}

impl SidebarConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.reservation.validate()
    }
}

/// Work area reservation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Reserve space while a panel is docked
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub mechanism: Mechanism,

    /// Write work area changes to the user profile
    #[serde(default = "default_true")]
    pub persist_to_profile: bool,

    /// Tell running applications about work area changes
    #[serde(default = "default_true")]
    pub broadcast_change: bool,

    /// Narrowest panel a reservation is made for
    #[serde(default = "default_min_width")]
    pub min_width_px: u32,

    #[serde(default)]
    pub panels: PanelsConfig,
}

fn default_true() -> bool {
    true
}

fn default_min_width() -> u32 {
    300
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mechanism: Mechanism::default(),
            persist_to_profile: default_true(),
            broadcast_change: default_true(),
            min_width_px: default_min_width(),
            panels: PanelsConfig::default(),
        }
    }
}

impl ReservationConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_width_px == 0 {
            return Err(ConfigError::Invalid(
                "reservation.min_width_px must be greater than 0".to_string(),
            ));
        }

        for panel in [PanelId::Notebook, PanelId::Browser] {
            let width = self.panels.get(panel).width_px;
            if width < self.min_width_px {
                return Err(ConfigError::Invalid(format!(
                    "{panel} width {width}px is below the {}px minimum",
                    self.min_width_px
                )));
            }
        }

        Ok(())
    }

    /// Width to reserve for `requested`, never below the minimum
    pub fn clamp_width(&self, requested: u32) -> u32 {
        requested.max(self.min_width_px)
    }
}

/// Where a panel docks and how wide it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub side: DockSide,
    pub width_px: u32,
}

/// Per-panel layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelsConfig {
    #[serde(default = "default_notebook")]
    pub notebook: PanelConfig,

    #[serde(default = "default_browser")]
    pub browser: PanelConfig,
}

fn default_notebook() -> PanelConfig {
    PanelConfig {
        side: DockSide::Right,
        width_px: 450,
    }
}

fn default_browser() -> PanelConfig {
    PanelConfig {
        side: DockSide::Right,
        width_px: 500,
    }
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            notebook: default_notebook(),
            browser: default_browser(),
        }
    }
}

impl PanelsConfig {
    pub fn get(&self, panel: PanelId) -> &PanelConfig {
        match panel {
            PanelId::Notebook => &self.notebook,
            PanelId::Browser => &self.browser,
        }
    }

    pub fn get_mut(&mut self, panel: PanelId) -> &mut PanelConfig {
        match panel {
            PanelId::Notebook => &mut self.notebook,
            PanelId::Browser => &mut self.browser,
        }
    }
}
