use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::graphics::{Color, WHITE};
use engine::surface::SurfaceSize;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{BLACK, BLUE, BoardConfig, OutOfGridPolicy, RED};

const MAX_CELL_SIZE: i32 = 4096;
const MAX_OFFSET: i32 = 4096;
const MAX_CANVAS_SIDE: u32 = 8192;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutSettings {
    pub offset: i32,
    pub cell_size: i32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            offset: 10,
            cell_size: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColorSettings {
    pub o: Color,
    pub x: Color,
    pub grid: Color,
    pub background: Color,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            o: RED,
            x: BLUE,
            grid: BLACK,
            background: WHITE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanvasSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            title: "tic-tac-toe".to_string(),
            width: 310,
            height: 310,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputSettings {
    pub out_of_grid: OutOfGridPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub colors: ColorSettings,
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub input: InputSettings,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            layout: LayoutSettings::default(),
            colors: ColorSettings::default(),
            canvas: CanvasSettings::default(),
            input: InputSettings::default(),
        }
    }
}

impl BoardSettings {
    /// Pins sizes to ranges the rasterizer and the window can handle.
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.layout.cell_size = self.layout.cell_size.clamp(1, MAX_CELL_SIZE);
        self.layout.offset = self.layout.offset.clamp(-MAX_OFFSET, MAX_OFFSET);
        self.canvas.width = self.canvas.width.clamp(1, MAX_CANVAS_SIDE);
        self.canvas.height = self.canvas.height.clamp(1, MAX_CANVAS_SIDE);
        self
    }

    pub fn board_config(&self) -> BoardConfig {
        BoardConfig::new(
            self.layout.offset,
            self.layout.cell_size,
            self.colors.o,
            self.colors.x,
            self.colors.grid,
        )
    }

    pub fn canvas_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width, self.canvas.height)
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("TICTACTOE_SETTINGS_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("tictactoe");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads settings, falling back to defaults when the file is missing or invalid.
    pub fn load(&self) -> BoardSettings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "no settings file, using defaults");
                return BoardSettings::default();
            }
        };
        match serde_json::from_slice::<BoardSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "invalid settings file, using defaults");
                BoardSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &BoardSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
