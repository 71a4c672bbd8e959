// Display mode selector: which pane a collapsed layout shows.

use folio_core::{ExpandLevel, PaneRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Laid out in its own column.
    Visible,
    /// Drawn on top of the editor column (the style pane at level 1).
    Overlay,
    /// Mounted but transparent to pointer input.
    Hidden,
}

impl Visibility {
    pub fn is_shown(self) -> bool {
        !matches!(self, Visibility::Hidden)
    }
}

/// How `role` is presented at `level` when `display` is the selected pane.
///
/// `display` only matters below level 2.
pub fn visibility(role: PaneRole, level: ExpandLevel, display: PaneRole) -> Visibility {
    match level {
        ExpandLevel::Triple => Visibility::Visible,
        ExpandLevel::Dual => match role {
            PaneRole::Editor | PaneRole::Preview => Visibility::Visible,
            PaneRole::Style if display == PaneRole::Style => Visibility::Overlay,
            PaneRole::Style => Visibility::Hidden,
        },
        ExpandLevel::Single if role == display => Visibility::Visible,
        ExpandLevel::Single => Visibility::Hidden,
    }
}
