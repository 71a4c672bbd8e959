// Input router: turns raw host events into layout actions.
// Hit-tests resize handles, keeps a drag on one pointer source, and
// intercepts the layout hotkeys.

use folio_core::{
    CancelReason, ExpandLevel, ExpandPreference, Handle, InputEvent, Key, Modifiers, PaneRole,
    PointerSource, Vec2,
};

/// Default distance in pixels within which a press grabs a handle.
pub const DEFAULT_HIT_SLOP: f32 = 6.0;

// ──────────────────────────────────────────────
// Action types
// ──────────────────────────────────────────────

/// Actions the workspace should apply to the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    BeginDrag {
        handle: Handle,
        x: f32,
        source: PointerSource,
    },
    DragTo(f32),
    EndDrag,
    CancelDrag(CancelReason),
    ResizeViewport(f32),
    GlobalAction(GlobalAction),
    /// No action to take.
    None,
}

/// Toolbar operations reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    /// Cmd+1/2/3: pane shown while panes are collapsed.
    ShowPane(PaneRole),
    /// Cmd+Shift+0/1/2/3: follow the viewport, or pin a level.
    SetExpand(ExpandPreference),
    ToggleHeader,
}

// ──────────────────────────────────────────────
// Router
// ──────────────────────────────────────────────

pub struct Router {
    /// Source of the pointer that owns the current drag.
    dragging: Option<PointerSource>,
    hit_slop: f32,
}

impl Router {
    pub fn new() -> Self {
        Self::with_hit_slop(DEFAULT_HIT_SLOP)
    }

    pub fn with_hit_slop(hit_slop: f32) -> Self {
        Self {
            dragging: None,
            hit_slop,
        }
    }

    /// Returns true while a handle drag is routed.
    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Forget the current drag. Call when the engine ends a drag on its own
    /// (idle timeout, handle hidden by a resize).
    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Process one event against the handles currently on screen.
    pub fn process(&mut self, event: InputEvent, handles: &[(Handle, f32)]) -> Action {
        match event {
            InputEvent::KeyPress { key, modifiers } => self.process_key(key, modifiers),
            InputEvent::PointerDown { position, source } => {
                self.process_down(position, source, handles)
            }
            InputEvent::PointerMove { position, source } => match self.dragging {
                // Moves anywhere in the window keep steering the handle.
                Some(owner) if owner == source => Action::DragTo(position.x),
                _ => Action::None,
            },
            InputEvent::PointerUp { source } => match self.dragging {
                Some(owner) if owner == source => {
                    self.dragging = None;
                    Action::EndDrag
                }
                _ => Action::None,
            },
            InputEvent::PointerCaptureLost => self.cancel(CancelReason::PointerCaptureLost),
            InputEvent::VisibilityChanged { visible: false } => self.cancel(CancelReason::Hidden),
            InputEvent::VisibilityChanged { visible: true } => Action::None,
            InputEvent::FocusLost => self.cancel(CancelReason::FocusLost),
            InputEvent::Resize { width } => Action::ResizeViewport(width),
        }
    }

    fn cancel(&mut self, reason: CancelReason) -> Action {
        match self.dragging.take() {
            Some(_) => Action::CancelDrag(reason),
            None => Action::None,
        }
    }

    // ── Pointer processing ──────────────────────

    fn process_down(
        &mut self,
        position: Vec2,
        source: PointerSource,
        handles: &[(Handle, f32)],
    ) -> Action {
        if let Some(owner) = self.dragging {
            // A second pointer never steals a running drag.
            if owner != source {
                return Action::None;
            }
            log::debug!("Pointer down while dragging; restarting drag");
        }

        match self.handle_at(position.x, handles) {
            Some(handle) => {
                self.dragging = Some(source);
                Action::BeginDrag {
                    handle,
                    x: position.x,
                    source,
                }
            }
            None => {
                self.dragging = None;
                Action::None
            }
        }
    }

    /// Nearest handle within the hit slop of `x`.
    fn handle_at(&self, x: f32, handles: &[(Handle, f32)]) -> Option<Handle> {
        handles
            .iter()
            .map(|&(handle, hx)| (handle, (x - hx).abs()))
            .filter(|&(_, distance)| distance <= self.hit_slop)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }

    // ── Key processing ──────────────────────────

    fn process_key(&mut self, key: Key, modifiers: Modifiers) -> Action {
        if key == Key::Escape {
            return self.cancel(CancelReason::EscapeKey);
        }

        // Cmd on macOS, Ctrl elsewhere.
        if modifiers.meta || modifiers.ctrl {
            if let Some(action) = self.match_hotkey(key, modifiers) {
                return Action::GlobalAction(action);
            }
        }
        Action::None
    }

    fn match_hotkey(&self, key: Key, modifiers: Modifiers) -> Option<GlobalAction> {
        let Key::Char(c) = key else {
            return None;
        };

        if modifiers.shift {
            // Shifted digits arrive as their US-layout symbols on some hosts.
            let preference = match c {
                '0' | ')' => ExpandPreference::FollowViewport,
                '1' | '!' => ExpandPreference::Fixed(ExpandLevel::Single),
                '2' | '@' => ExpandPreference::Fixed(ExpandLevel::Dual),
                '3' | '#' => ExpandPreference::Fixed(ExpandLevel::Triple),
                'h' | 'H' => return Some(GlobalAction::ToggleHeader),
                _ => return None,
            };
            return Some(GlobalAction::SetExpand(preference));
        }

        match c {
            '1' => Some(GlobalAction::ShowPane(PaneRole::Editor)),
            '2' => Some(GlobalAction::ShowPane(PaneRole::Style)),
            '3' => Some(GlobalAction::ShowPane(PaneRole::Preview)),
            _ => None,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
