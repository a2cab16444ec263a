//! Editor configuration and drawing aid settings.

use crate::history::DEFAULT_UNDO_LIMIT;
use crate::snap::SnapModes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Drawing aid toggles. Not part of the undoable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    pub grid_visible: bool,
    pub grid_size: f64,
    /// Constrain placement to horizontal/vertical.
    pub ortho: bool,
    /// Object snapping.
    pub osnap: bool,
    pub snap_modes: SnapModes,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_visible: true,
            grid_size: 10.0,
            ortho: false,
            osnap: true,
            snap_modes: SnapModes::default(),
        }
    }
}

/// Panel visibility flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiState {
    pub layer_panel_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            layer_panel_open: true,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo steps kept.
    pub undo_limit: usize,
    /// Pick radius for the select tool, in screen pixels.
    pub hit_tolerance_px: f64,
    /// Capture radius for object snapping, in screen pixels.
    pub snap_tolerance_px: f64,
    /// Settings the editor starts with.
    pub settings: EditorSettings,
    pub ui: UiState,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            hit_tolerance_px: 5.0,
            snap_tolerance_px: 4.0,
            settings: EditorSettings::default(),
            ui: UiState::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.undo_limit == 0 {
            return Err(ConfigError::Invalid("undoLimit must be at least 1"));
        }
        if !(self.hit_tolerance_px.is_finite() && self.hit_tolerance_px >= 0.0) {
            return Err(ConfigError::Invalid("hitTolerancePx must be non-negative"));
        }
        if !(self.snap_tolerance_px.is_finite() && self.snap_tolerance_px >= 0.0) {
            return Err(ConfigError::Invalid("snapTolerancePx must be non-negative"));
        }
        if !(self.settings.grid_size.is_finite() && self.settings.grid_size > 0.0) {
            return Err(ConfigError::Invalid("gridSize must be positive"));
        }
        Ok(())
    }
}
