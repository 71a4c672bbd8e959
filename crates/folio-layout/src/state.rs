use folio_core::{ExpandLevel, ExpandPreference, PaneRole};

use crate::policy::LayoutPolicy;

/// Whether the style pane currently owns a slice of the editor + style span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneMode {
    #[default]
    ThreeWide,
    /// The style pane was squeezed out by a handle 0 drag at level 1. The next
    /// solver pass gives it back a pane floor taken from the editor.
    TwoWide,
}

/// The authoritative layout record of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    pub editor_width: f32,
    /// Editor plus style pane, measured from the left edge.
    pub combined_width: f32,
    pub expand_level: ExpandLevel,
    pub max_expand_level: ExpandLevel,
    pub custom_expand_level: ExpandPreference,
    pub display_id: PaneRole,
    pub is_resizing: bool,
    pub pane_mode: PaneMode,
}

impl LayoutState {
    pub fn with_policy(policy: &LayoutPolicy) -> Self {
        Self {
            editor_width: policy.default_editor_width,
            combined_width: policy.default_combined_width,
            expand_level: ExpandLevel::Triple,
            max_expand_level: ExpandLevel::Triple,
            custom_expand_level: ExpandPreference::default(),
            display_id: PaneRole::Editor,
            is_resizing: false,
            pane_mode: PaneMode::ThreeWide,
        }
    }

    /// Width of the style pane when it sits between editor and preview.
    pub fn style_width(&self) -> f32 {
        self.combined_width - self.editor_width
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::with_policy(&LayoutPolicy::default())
    }
}
