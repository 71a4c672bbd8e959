// Drag session controller: Idle <-> Dragging, translating pointer deltas into
// candidate widths. Candidates are always handed to the solver before commit.

use std::time::{Duration, Instant};

use folio_core::{CancelReason, ExpandLevel, Handle, PointerSource};

use crate::policy::LayoutPolicy;
use crate::state::{LayoutState, PaneMode};

/// Everything captured at drag start. Deltas are applied to these widths,
/// never to the live state, so a drag is a pure function of pointer x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: Handle,
    pub source: PointerSource,
    pub start_pointer_x: f32,
    pub start_editor_width: f32,
    pub start_combined_width: f32,
    pub last_activity: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    /// Committed widths at the end of the last session.
    anchor: (f32, f32),
}

impl DragController {
    pub fn new(state: &LayoutState) -> Self {
        Self {
            state: DragState::Idle,
            anchor: (state.editor_width, state.combined_width),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Widths the next session will start from if nothing else moves them.
    pub fn anchor(&self) -> (f32, f32) {
        self.anchor
    }

    /// Idle -> Dragging. Only a handle that is on screen can be grabbed.
    pub fn begin(
        &mut self,
        layout: &mut LayoutState,
        handle: Handle,
        pointer_x: f32,
        source: PointerSource,
        now: Instant,
    ) -> bool {
        if !layout.expand_level.has_handle(handle) {
            log::debug!(
                "Handle {} is not shown at level {}",
                handle.index(),
                layout.expand_level.as_u8()
            );
            return false;
        }
        if let DragState::Dragging(previous) = self.state {
            log::debug!("Restarting drag on handle {}", previous.handle.index());
        }

        self.anchor = (layout.editor_width, layout.combined_width);
        self.state = DragState::Dragging(DragSession {
            handle,
            source,
            start_pointer_x: pointer_x,
            start_editor_width: layout.editor_width,
            start_combined_width: layout.combined_width,
            last_activity: now,
        });
        layout.is_resizing = true;
        true
    }

    /// Dragging -> Dragging. Returns the unsolved candidate, or `None` when the
    /// move is ignored.
    pub fn candidate(
        &mut self,
        layout: &LayoutState,
        pointer_x: f32,
        max_width: f32,
        policy: &LayoutPolicy,
        now: Instant,
    ) -> Option<LayoutState> {
        let session = match &mut self.state {
            DragState::Dragging(session) => session,
            DragState::Idle => return None,
        };
        session.last_activity = now;

        if !layout.expand_level.has_handle(session.handle) {
            return None;
        }

        let delta = pointer_x - session.start_pointer_x;
        match session.handle {
            Handle::EditorStyle => Some(drag_editor_handle(layout, session, delta, max_width, policy)),
            Handle::StylePreview => drag_style_handle(layout, session, delta, max_width, policy),
        }
    }

    /// Dragging -> Idle on pointer-up / touch-end.
    pub fn end(&mut self, layout: &mut LayoutState) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.finish(layout);
        true
    }

    /// Dragging -> Idle without a pointer-up. Keeps the last committed geometry.
    pub fn cancel(&mut self, layout: &mut LayoutState, reason: CancelReason) -> bool {
        let Some(session) = self.session().copied() else {
            return false;
        };
        log::info!("Drag on handle {} cancelled: {:?}", session.handle.index(), reason);
        self.finish(layout);
        true
    }

    /// True when a session has seen no activity for `timeout`.
    pub fn is_stale(&self, now: Instant, timeout: Duration) -> bool {
        self.session()
            .is_some_and(|s| now.saturating_duration_since(s.last_activity) >= timeout)
    }

    fn finish(&mut self, layout: &mut LayoutState) {
        layout.is_resizing = false;
        self.anchor = (layout.editor_width, layout.combined_width);
        self.state = DragState::Idle;
    }
}

/// Handle 0 moves the editor's right edge.
fn drag_editor_handle(
    layout: &LayoutState,
    session: &DragSession,
    delta: f32,
    max_width: f32,
    policy: &LayoutPolicy,
) -> LayoutState {
    let min = policy.min_pane_width;
    let level = layout.expand_level;
    let raw = session.start_editor_width + delta;
    let budget = policy.editor_budget(max_width, level);
    let mut next = layout.clone();

    // Push the style pane right instead of letting it go negative.
    if level == ExpandLevel::Triple && layout.combined_width - raw < min {
        next.combined_width = (raw + min)
            .max(min)
            .min(policy.combined_limit(max_width));
    }

    next.editor_width = raw.max(min).min(budget);

    // At level 1 there is no room left for the hidden style pane.
    if level == ExpandLevel::Dual && raw.max(min) > budget {
        next.pane_mode = PaneMode::TwoWide;
    }
    next
}

/// Handle 1 moves the style pane's right edge. Returns `None` when the pointer
/// is left of two pane floors.
fn drag_style_handle(
    layout: &LayoutState,
    session: &DragSession,
    delta: f32,
    max_width: f32,
    policy: &LayoutPolicy,
) -> Option<LayoutState> {
    let min = policy.min_pane_width;
    let raw = session.start_combined_width + delta;
    if raw < 2.0 * min {
        return None;
    }

    let mut next = layout.clone();
    if raw - layout.editor_width < min {
        next.editor_width = raw - min;
    }
    next.combined_width = raw
        .max(policy.combined_floor)
        .min(policy.combined_limit(max_width));
    Some(next)
}
