// Viewport monitor: turns host width changes into the responsive ceiling.

use folio_core::ExpandLevel;

use crate::policy::LayoutPolicy;
use crate::state::LayoutState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMonitor {
    max_width: f32,
}

impl ViewportMonitor {
    pub fn new(width: f32) -> Self {
        Self {
            max_width: if width.is_finite() { width.max(0.0) } else { 0.0 },
        }
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Record a new viewport width and update the ceiling in `state`.
    ///
    /// Returns false (and leaves everything untouched) for widths no window
    /// can have. The caller must run a solver pass afterwards.
    pub fn observe(&mut self, state: &mut LayoutState, width: f32, policy: &LayoutPolicy) -> bool {
        if !width.is_finite() || width < 0.0 {
            log::warn!("Ignoring viewport width {}", width);
            return false;
        }

        let ceiling = policy.max_level_for(width);
        if ceiling == ExpandLevel::Single {
            // A lone pane fills everything; no secondary width survives.
            state.combined_width = width;
            state.editor_width = width;
        }
        if ceiling != state.max_expand_level {
            log::debug!(
                "Viewport {}px: ceiling {} -> {}",
                width,
                state.max_expand_level.as_u8(),
                ceiling.as_u8()
            );
        }
        state.max_expand_level = ceiling;
        self.max_width = width;
        true
    }
}
