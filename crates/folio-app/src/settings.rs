// Settings persistence: user configuration stored next to the layout storage.
// Uses platform-native config dir: e.g. ~/Library/Application Support/folio/settings.json
// on macOS, ~/.config/folio/settings.json on Linux.

use std::path::{Path, PathBuf};
use std::time::Duration;

use folio_input::DEFAULT_HIT_SLOP;
use folio_layout::{
    LayoutPolicy, DEFAULT_COMBINED_FLOOR, DEFAULT_COMBINED_WIDTH, DEFAULT_DRAG_IDLE_TIMEOUT,
    DEFAULT_DUAL_BREAKPOINT, DEFAULT_EDITOR_WIDTH, DEFAULT_MIN_PANE_WIDTH, DEFAULT_PREVIEW_PAGE_WIDTH,
    DEFAULT_PREVIEW_RESERVE_FACTOR, DEFAULT_TRIPLE_BREAKPOINT,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
pub const DEFAULT_EDITOR_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolioSettings {
    #[serde(default)]
    pub layout: LayoutSettings,
    /// Width assumed before the host reports one.
    #[serde(default = "default_viewport_width")]
    pub initial_viewport_width: f32,
    #[serde(default = "default_editor_debounce_ms")]
    pub editor_debounce_ms: u64,
    /// Overrides the storage file location.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_viewport_width() -> f32 {
    DEFAULT_VIEWPORT_WIDTH
}

fn default_editor_debounce_ms() -> u64 {
    DEFAULT_EDITOR_DEBOUNCE_MS
}

impl Default for FolioSettings {
    fn default() -> Self {
        Self {
            layout: LayoutSettings::default(),
            initial_viewport_width: DEFAULT_VIEWPORT_WIDTH,
            editor_debounce_ms: DEFAULT_EDITOR_DEBOUNCE_MS,
            storage_path: None,
        }
    }
}

impl FolioSettings {
    pub fn editor_debounce(&self) -> Duration {
        Duration::from_millis(self.editor_debounce_ms)
    }

    /// The configured policy, or the built-in one if the knobs contradict
    /// each other.
    pub fn layout_policy(&self) -> LayoutPolicy {
        let policy = self.layout.to_policy();
        match policy.validate() {
            Ok(()) => policy,
            Err(e) => {
                log::warn!("Invalid layout settings ({}), using defaults", e);
                LayoutPolicy::default()
            }
        }
    }
}

/// Layout knobs. Field names follow `LayoutPolicy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub min_pane_width: f32,
    pub preview_reserve_factor: f32,
    pub combined_floor: f32,
    pub dual_breakpoint: f32,
    pub triple_breakpoint: f32,
    pub preview_page_width: f32,
    pub default_editor_width: f32,
    pub default_combined_width: f32,
    pub drag_idle_timeout_ms: u64,
    pub handle_hit_slop: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            min_pane_width: DEFAULT_MIN_PANE_WIDTH,
            preview_reserve_factor: DEFAULT_PREVIEW_RESERVE_FACTOR,
            combined_floor: DEFAULT_COMBINED_FLOOR,
            dual_breakpoint: DEFAULT_DUAL_BREAKPOINT,
            triple_breakpoint: DEFAULT_TRIPLE_BREAKPOINT,
            preview_page_width: DEFAULT_PREVIEW_PAGE_WIDTH,
            default_editor_width: DEFAULT_EDITOR_WIDTH,
            default_combined_width: DEFAULT_COMBINED_WIDTH,
            drag_idle_timeout_ms: DEFAULT_DRAG_IDLE_TIMEOUT.as_millis() as u64,
            handle_hit_slop: DEFAULT_HIT_SLOP,
        }
    }
}

impl LayoutSettings {
    pub fn to_policy(&self) -> LayoutPolicy {
        LayoutPolicy {
            min_pane_width: self.min_pane_width,
            preview_reserve_factor: self.preview_reserve_factor,
            combined_floor: self.combined_floor,
            dual_breakpoint: self.dual_breakpoint,
            triple_breakpoint: self.triple_breakpoint,
            preview_page_width: self.preview_page_width,
            default_editor_width: self.default_editor_width,
            default_combined_width: self.default_combined_width,
            drag_idle_timeout: Duration::from_millis(self.drag_idle_timeout_ms),
        }
    }
}

// ──────────────────────────────────────────────
// Settings file I/O
// ──────────────────────────────────────────────

pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("folio"))
}

pub fn settings_path() -> Option<PathBuf> {
    Some(config_dir()?.join("settings.json"))
}

pub fn load_settings() -> FolioSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => FolioSettings::default(),
    }
}

pub fn load_settings_from(path: &Path) -> FolioSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                FolioSettings::default()
            }
        },
        Err(_) => FolioSettings::default(),
    }
}

pub fn save_settings(settings: &FolioSettings, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("Failed to create config dir {}: {}", parent.display(), e);
            return;
        }
    }

    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                log::error!("Failed to write {}: {}", path.display(), e);
            }
        }
        Err(e) => {
            log::error!("Failed to serialize settings: {}", e);
        }
    }
}
