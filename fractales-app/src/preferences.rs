use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use fractales_core::{FractalOptions, FractalType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    /// Fractal rendered when no record file is given.
    #[serde(default)]
    pub default_fractal: FractalType,
    /// Options for `default_fractal`. A Julia default needs `complex_constant`.
    #[serde(default)]
    pub default_options: FractalOptions,
    /// Tiled rayon render; `false` computes on the main thread.
    #[serde(default = "default_true")]
    pub parallel_render: bool,
    /// Custom output directory. When empty, an `images/` folder next to the executable is used.
    #[serde(default)]
    pub images_dir: String,
}

fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            default_fractal: FractalType::default(),
            default_options: FractalOptions::default(),
            parallel_render: true,
            images_dir: String::new(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable. A missing file is
    /// created with defaults so it can be edited.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            return Self::load_from(&path);
        }
        debug!("No preferences file at {}", path.display());
        let prefs = Self::default();
        prefs.save_to(&path);
        prefs
    }

    /// Read `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs;
                }
                Err(e) => error!("Failed to parse preferences: {e}"),
            },
            Err(e) => error!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences to {}", path.display());
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    pub fn images_directory(&self) -> PathBuf {
        if self.images_dir.is_empty() {
            crate::app_dir::images_directory()
        } else {
            PathBuf::from(&self.images_dir)
        }
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
