// Persistence adapter: mirrors committed layout state into a key-value store.
// Best effort only; a session never depends on a write succeeding.

use folio_core::{ExpandLevel, ExpandPreference, KeyValueStore, PaneRole};
use serde::{Deserialize, Serialize};

use crate::policy::LayoutPolicy;
use crate::state::{LayoutState, PaneMode};

/// Storage key of the layout record.
pub const LAYOUT_KEY: &str = "layout";

// ──────────────────────────────────────────────
// Serializable record
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub expand_level: ExpandLevel,
    pub display_id: PaneRole,
    #[serde(alias = "editorAreaW")]
    pub editor_width: f32,
    #[serde(alias = "editorAndSetAreaW")]
    pub combined_width: f32,
    pub custom_expand_level: ExpandPreference,
    /// Set only on the defaults written by a first session.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_init: bool,
}

impl LayoutRecord {
    pub fn from_state(state: &LayoutState) -> Self {
        Self {
            expand_level: state.expand_level,
            display_id: state.display_id,
            editor_width: state.editor_width,
            combined_width: state.combined_width,
            custom_expand_level: state.custom_expand_level,
            is_init: false,
        }
    }

    /// Seed a fresh state from this record. A zero span is how older records
    /// marked a collapsed style pane.
    pub fn into_state(self, policy: &LayoutPolicy) -> LayoutState {
        let mut state = LayoutState::with_policy(policy);
        state.expand_level = self.expand_level;
        state.display_id = self.display_id;
        state.editor_width = self.editor_width;
        state.combined_width = self.combined_width;
        state.custom_expand_level = self.custom_expand_level;
        if self.combined_width == 0.0 {
            state.pane_mode = PaneMode::TwoWide;
        }
        state
    }

    pub fn parse(data: &str) -> Option<Self> {
        let record: Self = serde_json::from_str(data).ok()?;
        if record.editor_width.is_finite() && record.combined_width.is_finite() {
            Some(record)
        } else {
            None
        }
    }
}

// ──────────────────────────────────────────────
// Adapter
// ──────────────────────────────────────────────

pub struct LayoutPersistence<S> {
    store: S,
    /// Tracked fields as last written (or read). `None` until `load`.
    last_saved: Option<LayoutRecord>,
}

impl<S: KeyValueStore> LayoutPersistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_saved: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn is_initialized(&self) -> bool {
        self.last_saved.is_some()
    }

    /// Read the stored record, or write and return the defaults.
    pub fn load(&mut self, policy: &LayoutPolicy) -> LayoutState {
        let stored = match self.store.get(LAYOUT_KEY) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Could not read layout record: {}", e);
                None
            }
        };

        if let Some(data) = stored {
            match LayoutRecord::parse(&data) {
                Some(record) => {
                    let mut seen = record.clone();
                    seen.is_init = false;
                    self.last_saved = Some(seen);
                    return record.into_state(policy);
                }
                None => log::warn!("Discarding malformed layout record"),
            }
        }

        let state = LayoutState::with_policy(policy);
        let record = LayoutRecord::from_state(&state);
        self.write(&LayoutRecord {
            is_init: true,
            ..record.clone()
        });
        self.last_saved = Some(record);
        state
    }

    /// Write the tracked fields if they changed since the last write.
    /// Returns true when a write was attempted.
    pub fn sync(&mut self, state: &LayoutState) -> bool {
        let Some(last) = &self.last_saved else {
            return false;
        };
        let record = LayoutRecord::from_state(state);
        if *last == record {
            return false;
        }
        self.write(&record);
        self.last_saved = Some(record);
        true
    }

    fn write(&mut self, record: &LayoutRecord) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize layout record: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(LAYOUT_KEY, &json) {
            log::warn!("Layout not persisted: {}", e);
        }
    }
}
