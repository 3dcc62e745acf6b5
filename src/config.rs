//! Highlighter configuration persistence
//!
//! Stores user preferences in `~/.config/tint/config.yaml`

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::HighlightError;
use crate::highlight::BatchOrder;
use crate::model::Color;

/// Semi-transparent defaults: yellow, green, blue, deep orange, purple, orange
pub const DEFAULT_COLORS: [&str; 6] = [
    "#ffeb3b40",
    "#4caf5040",
    "#2196f340",
    "#ff572240",
    "#9c27b040",
    "#ff980040",
];

/// Highlighter configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlighterConfig {
    /// Color tokens; `apply-color-N` uses `colors[N - 1]`
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,

    /// How the host reports multi-change edit batches
    #[serde(default)]
    pub batch_coordinates: BatchOrder,

    /// How long a color choice may stay open before it is abandoned
    #[serde(default = "default_picker_timeout_ms")]
    pub picker_timeout_ms: u64,

    /// Number of `apply-color-N` commands the host registers
    #[serde(default = "default_max_color_commands")]
    pub max_color_commands: usize,
}

fn default_colors() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
}

fn default_picker_timeout_ms() -> u64 {
    15_000
}

fn default_max_color_commands() -> usize {
    9
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            batch_coordinates: BatchOrder::default(),
            picker_timeout_ms: default_picker_timeout_ms(),
            max_color_commands: default_max_color_commands(),
        }
    }
}

impl HighlighterConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = crate::config_paths::config_file().context("No config directory available")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Color for a 1-based command index
    pub fn color(&self, index: usize) -> Result<Color, HighlightError> {
        index
            .checked_sub(1)
            .and_then(|i| self.colors.get(i))
            .map(|token| Color::new(token.as_str()))
            .ok_or(HighlightError::InvalidColorIndex {
                index,
                available: self.colors.len(),
            })
    }

    /// Number of `apply-color-N` commands to register
    pub fn color_command_count(&self) -> usize {
        self.colors.len().min(self.max_color_commands)
    }
}
