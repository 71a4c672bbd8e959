// One editing session: the layout engine, its input router, and everything
// persisted alongside it.

use std::time::Instant;

use folio_core::{CancelReason, InputEvent, KeyValueStore, LayoutEngine};
use folio_input::{Action, GlobalAction, Router};
use folio_layout::{LayoutPersistence, PaneLayout};

use crate::document::{Debouncer, DocumentStore};
use crate::settings::FolioSettings;

pub struct Workspace<S> {
    layout: PaneLayout,
    router: Router,
    persistence: LayoutPersistence<S>,
    document: DocumentStore,
    editor: Debouncer<String>,
    header_visible: bool,
}

impl<S: KeyValueStore> Workspace<S> {
    pub fn new(settings: &FolioSettings, store: S) -> Self {
        let policy = settings.layout_policy();
        let mut persistence = LayoutPersistence::new(store);
        let seed = persistence.load(&policy);
        let layout = PaneLayout::new(policy, seed, settings.initial_viewport_width);
        // The first solver pass may have clamped the seed to this viewport.
        persistence.sync(layout.state());
        let document = DocumentStore::load(persistence.store_mut());

        Self {
            layout,
            router: Router::with_hit_slop(settings.layout.handle_hit_slop),
            persistence,
            document,
            editor: Debouncer::new(settings.editor_debounce()),
            header_visible: true,
        }
    }

    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    pub fn header_visible(&self) -> bool {
        self.header_visible
    }

    pub fn document(&self) -> &DocumentStore {
        &self.document
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Route one host event and commit its effect. Returns true when the
    /// rendered frame changed.
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) -> bool {
        self.tracked(|ws| {
            ws.poll_timers(now);
            let action = ws.router.process(event, &ws.layout.handle_positions());
            ws.apply(action, now);
        })
    }

    /// End a drag from outside the event stream.
    pub fn cancel_drag(&mut self, reason: CancelReason, now: Instant) -> bool {
        self.tracked(|ws| {
            ws.poll_timers(now);
            ws.layout.cancel_drag(reason);
        })
    }

    /// Editor keystrokes land in the document after the debounce delay.
    pub fn type_text(&mut self, text: String, now: Instant) {
        self.poll_timers(now);
        self.editor.push(text, now);
    }

    /// Advance time: expire an idle drag and release debounced edits.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.tracked(|ws| ws.poll_timers(now))
    }

    /// Flush pending edits before the session goes away.
    pub fn shutdown(&mut self) {
        if let Some(text) = self.editor.flush() {
            self.document.set_text(self.persistence.store_mut(), text);
        }
        self.settle();
    }

    fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::BeginDrag { handle, x, source } => {
                if !self.layout.begin_drag(handle, x, source, now) {
                    self.router.end_drag();
                }
            }
            Action::DragTo(x) => self.layout.drag_to(x, now),
            Action::EndDrag => self.layout.end_drag(),
            Action::CancelDrag(reason) => self.layout.cancel_drag(reason),
            Action::ResizeViewport(width) => self.layout.resize_viewport(width),
            Action::GlobalAction(GlobalAction::ShowPane(role)) => self.layout.set_display(role),
            Action::GlobalAction(GlobalAction::SetExpand(preference)) => {
                self.layout.set_expand_preference(preference)
            }
            Action::GlobalAction(GlobalAction::ToggleHeader) => {
                self.header_visible = !self.header_visible;
                log::debug!("Header visible: {}", self.header_visible);
            }
            Action::None => {}
        }
    }

    fn poll_timers(&mut self, now: Instant) {
        self.layout.expire_stale_drag(now);
        if let Some(text) = self.editor.poll(now) {
            self.document.set_text(self.persistence.store_mut(), text);
        }
    }

    /// Bring the router in line with the engine and mirror the committed state.
    fn settle(&mut self) {
        if !self.layout.is_resizing() {
            self.router.end_drag();
        }
        self.persistence.sync(self.layout.state());
    }

    fn tracked(&mut self, f: impl FnOnce(&mut Self)) -> bool {
        let before = (self.layout.frame(), self.header_visible);
        f(self);
        self.settle();
        before != (self.layout.frame(), self.header_visible)
    }
}
