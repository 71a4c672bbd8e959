// Adaptive three-pane layout engine.
// Implements folio_core::LayoutEngine on top of a pure constraint solver.

mod display;
mod drag;
mod frame;
mod persist;
mod policy;
mod solver;
mod state;
mod tests;
mod viewport;

use std::time::Instant;

use folio_core::{
    CancelReason, ExpandPreference, Handle, LayoutEngine, PaneRole, PointerSource,
};

pub use display::{visibility, Visibility};
pub use drag::{DragController, DragSession, DragState};
pub use frame::{PaneFrame, PanePlacement};
pub use persist::{LayoutPersistence, LayoutRecord, LAYOUT_KEY};
pub use policy::*;
pub use solver::solve;
pub use state::{LayoutState, PaneMode};
pub use viewport::ViewportMonitor;

// ──────────────────────────────────────────────
// PaneLayout
// ──────────────────────────────────────────────

/// The layout state store. Every mutation goes through [`solve`] before it
/// becomes visible, so `state()` always satisfies the layout invariants.
pub struct PaneLayout {
    policy: LayoutPolicy,
    state: LayoutState,
    viewport: ViewportMonitor,
    drag: DragController,
}

impl PaneLayout {
    /// Build an engine from a seed state (defaults or a persisted record) and
    /// the host's current width.
    pub fn new(policy: LayoutPolicy, seed: LayoutState, viewport_width: f32) -> Self {
        let mut state = seed;
        state.is_resizing = false;
        let mut viewport = ViewportMonitor::new(viewport_width);
        viewport.observe(&mut state, viewport.max_width(), &policy);
        let state = solve(&state, viewport.max_width(), &policy);
        let drag = DragController::new(&state);
        Self {
            policy,
            state,
            viewport,
            drag,
        }
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport.max_width()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn frame(&self) -> PaneFrame {
        PaneFrame::project(&self.state, self.viewport.max_width(), &self.policy)
    }

    pub fn display(&self) -> PaneRole {
        self.state.display_id
    }

    /// Select the pane shown when panes are collapsed. Widths are untouched.
    pub fn set_display(&mut self, role: PaneRole) {
        self.state.display_id = role;
    }

    pub fn set_expand_preference(&mut self, preference: ExpandPreference) {
        let mut candidate = self.state.clone();
        candidate.custom_expand_level = preference;
        self.commit(candidate);
        self.drop_hidden_drag();
    }

    /// Cancel a drag that has gone quiet for longer than the policy allows.
    pub fn expire_stale_drag(&mut self, now: Instant) -> bool {
        if self.drag.is_stale(now, self.policy.drag_idle_timeout) {
            return self.drag.cancel(&mut self.state, CancelReason::IdleTimeout);
        }
        false
    }

    fn commit(&mut self, candidate: LayoutState) {
        let solved = solve(&candidate, self.viewport.max_width(), &self.policy);
        if solved != self.state {
            log::debug!(
                "Layout commit: level={} editor={:.1} combined={:.1}",
                solved.expand_level.as_u8(),
                solved.editor_width,
                solved.combined_width
            );
        }
        self.state = solved;
    }

    fn drop_hidden_drag(&mut self) {
        let Some(handle) = self.drag.session().map(|s| s.handle) else {
            return;
        };
        if !self.state.expand_level.has_handle(handle) {
            self.drag.cancel(&mut self.state, CancelReason::HandleHidden);
        }
    }
}

impl LayoutEngine for PaneLayout {
    fn resize_viewport(&mut self, width: f32) {
        let mut candidate = self.state.clone();
        if !self.viewport.observe(&mut candidate, width, &self.policy) {
            return;
        }
        self.commit(candidate);
        self.drop_hidden_drag();
    }

    fn begin_drag(
        &mut self,
        handle: Handle,
        pointer_x: f32,
        source: PointerSource,
        now: Instant,
    ) -> bool {
        self.drag.begin(&mut self.state, handle, pointer_x, source, now)
    }

    fn drag_to(&mut self, pointer_x: f32, now: Instant) {
        if !pointer_x.is_finite() {
            return;
        }
        let candidate = self.drag.candidate(
            &self.state,
            pointer_x,
            self.viewport.max_width(),
            &self.policy,
            now,
        );
        if let Some(candidate) = candidate {
            self.commit(candidate);
        }
    }

    fn end_drag(&mut self) {
        self.drag.end(&mut self.state);
    }

    fn cancel_drag(&mut self, reason: CancelReason) {
        self.drag.cancel(&mut self.state, reason);
    }

    fn is_resizing(&self) -> bool {
        self.state.is_resizing
    }

    fn handle_positions(&self) -> Vec<(Handle, f32)> {
        frame::handle_positions(&self.state)
    }
}
