// Constraint solver: re-clamps a candidate state so every layout invariant holds.

use folio_core::{ExpandLevel, ExpandPreference};

use crate::policy::LayoutPolicy;
use crate::state::{LayoutState, PaneMode};

/// Run one solver pass over `candidate` for a viewport `max_width` wide.
///
/// Pure and idempotent: `solve(&solve(s, w, p), w, p) == solve(s, w, p)`.
pub fn solve(candidate: &LayoutState, max_width: f32, policy: &LayoutPolicy) -> LayoutState {
    let mut state = candidate.clone();
    let min = policy.min_pane_width;

    // 1. A collapsed style pane comes back with a pane floor donated by the editor.
    if state.pane_mode == PaneMode::TwoWide {
        state.combined_width = state.editor_width;
        state.editor_width -= min;
        state.pane_mode = PaneMode::ThreeWide;
    }

    // 2. Resolve the level against the viewport ceiling.
    state.expand_level = match state.custom_expand_level {
        ExpandPreference::Fixed(level) => level.min(state.max_expand_level),
        ExpandPreference::FollowViewport => state.expand_level.min(state.max_expand_level),
    };
    let level = state.expand_level;

    // 3. The preview keeps its reserve. At level 0 the single pane owns the
    //    whole viewport and the span is left as the viewport monitor set it.
    if level > ExpandLevel::Single {
        let limit = policy.combined_limit(max_width);
        if state.combined_width > limit {
            state.combined_width = limit;
        }
    }

    // 4/5. Editor within [floor, budget]; the budget wins on degenerate viewports.
    let budget = policy.editor_budget(max_width, level);
    if state.editor_width > budget {
        state.editor_width = budget;
    }
    if state.editor_width < min {
        state.editor_width = min.min(budget);
    }

    // 6. The span never ends inside the editor, and at level 2 it holds a
    //    full style pane.
    let span_floor = match level {
        ExpandLevel::Single => None,
        ExpandLevel::Dual => Some(state.editor_width),
        ExpandLevel::Triple => Some(state.editor_width + min),
    };
    if let Some(floor) = span_floor {
        if state.combined_width < floor {
            state.combined_width = floor;
        }
    }

    state
}
