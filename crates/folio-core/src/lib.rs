use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A horizontal extent: panes only negotiate width, height is always the full workspace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub x: f32,
    pub width: f32,
}

impl Span {
    pub fn new(x: f32, width: f32) -> Self {
        Self { x, width }
    }

    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.end()
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

/// The three logical panes, in left-to-right order.
///
/// The numeric index doubles as the persisted `displayId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaneRole {
    #[default]
    Editor,
    Style,
    Preview,
}

impl PaneRole {
    pub const ALL: [PaneRole; 3] = [PaneRole::Editor, PaneRole::Style, PaneRole::Preview];

    pub fn index(self) -> u8 {
        match self {
            PaneRole::Editor => 0,
            PaneRole::Style => 1,
            PaneRole::Preview => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(PaneRole::Editor),
            1 => Some(PaneRole::Style),
            2 => Some(PaneRole::Preview),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaneRole::Editor => "editor",
            PaneRole::Style => "style",
            PaneRole::Preview => "preview",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "editor" => Some(PaneRole::Editor),
            "style" => Some(PaneRole::Style),
            "preview" => Some(PaneRole::Preview),
            _ => None,
        }
    }
}

impl TryFrom<u8> for PaneRole {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PaneRole::from_index(value).ok_or_else(|| format!("invalid display id {value}"))
    }
}

impl From<PaneRole> for u8 {
    fn from(role: PaneRole) -> u8 {
        role.index()
    }
}

/// How many pane boundaries are materialized side by side.
///
/// `Single`: one pane at full width. `Dual`: editor and preview, style pane
/// behind a mode switch. `Triple`: all three panes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum ExpandLevel {
    Single,
    Dual,
    #[default]
    Triple,
}

impl ExpandLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            ExpandLevel::Single => 0,
            ExpandLevel::Dual => 1,
            ExpandLevel::Triple => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ExpandLevel::Single),
            1 => Some(ExpandLevel::Dual),
            2 => Some(ExpandLevel::Triple),
            _ => None,
        }
    }

    /// Whether the given handle is on screen at this level.
    pub fn has_handle(self, handle: Handle) -> bool {
        match handle {
            Handle::EditorStyle => self >= ExpandLevel::Dual,
            Handle::StylePreview => self >= ExpandLevel::Triple,
        }
    }
}

impl TryFrom<u8> for ExpandLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ExpandLevel::from_u8(value).ok_or_else(|| format!("invalid expand level {value}"))
    }
}

impl From<ExpandLevel> for u8 {
    fn from(level: ExpandLevel) -> u8 {
        level.as_u8()
    }
}

/// The user's explicit expand level choice. Persisted as `-1` for `FollowViewport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum ExpandPreference {
    /// Track the viewport ceiling.
    FollowViewport,
    Fixed(ExpandLevel),
}

impl Default for ExpandPreference {
    fn default() -> Self {
        ExpandPreference::Fixed(ExpandLevel::Triple)
    }
}

impl TryFrom<i8> for ExpandPreference {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(ExpandPreference::FollowViewport),
            0..=2 => ExpandLevel::from_u8(value as u8)
                .map(ExpandPreference::Fixed)
                .ok_or_else(|| format!("invalid expand preference {value}")),
            _ => Err(format!("invalid expand preference {value}")),
        }
    }
}

impl From<ExpandPreference> for i8 {
    fn from(pref: ExpandPreference) -> i8 {
        match pref {
            ExpandPreference::FollowViewport => -1,
            ExpandPreference::Fixed(level) => level.as_u8() as i8,
        }
    }
}

/// The two draggable dividers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Between the editor and the style pane (handle 0).
    EditorStyle,
    /// Between the style pane and the preview (handle 1).
    StylePreview,
}

impl Handle {
    pub fn index(self) -> u8 {
        match self {
            Handle::EditorStyle => 0,
            Handle::StylePreview => 1,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Handle::EditorStyle),
            1 => Some(Handle::StylePreview),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Input
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse and touch drive drags through separate listener sets on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Why a drag ended without a pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    PointerCaptureLost,
    Hidden,
    FocusLost,
    EscapeKey,
    IdleTimeout,
    /// The viewport shrank below the level that shows the dragged handle.
    HandleHidden,
}

impl CancelReason {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "capture" => Some(CancelReason::PointerCaptureLost),
            "hidden" => Some(CancelReason::Hidden),
            "focus" => Some(CancelReason::FocusLost),
            "escape" => Some(CancelReason::EscapeKey),
            "idle" => Some(CancelReason::IdleTimeout),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPress { key: Key, modifiers: Modifiers },
    PointerDown { position: Vec2, source: PointerSource },
    PointerMove { position: Vec2, source: PointerSource },
    PointerUp { source: PointerSource },
    PointerCaptureLost,
    VisibilityChanged { visible: bool },
    FocusLost,
    Resize { width: f32 },
}

// ──────────────────────────────────────────────
// Trait: LayoutEngine
// ──────────────────────────────────────────────

/// The layout engine owns pane geometry. Hosts feed it viewport widths and
/// drag gestures; it never reports errors, only ever a valid geometry.
pub trait LayoutEngine {
    fn resize_viewport(&mut self, width: f32);
    /// Returns false when the handle is not on screen at the current level.
    fn begin_drag(&mut self, handle: Handle, pointer_x: f32, source: PointerSource, now: Instant)
        -> bool;
    fn drag_to(&mut self, pointer_x: f32, now: Instant);
    fn end_drag(&mut self);
    fn cancel_drag(&mut self, reason: CancelReason);
    fn is_resizing(&self) -> bool;
    /// Screen x of every handle currently on screen.
    fn handle_positions(&self) -> Vec<(Handle, f32)>;
}

// ──────────────────────────────────────────────
// Trait: KeyValueStore
// ──────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed storage file: {0}")]
    Malformed(String),
}

/// Durable string key-value storage (the host's local storage).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store. `fail_writes` simulates an unavailable backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    pub fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
