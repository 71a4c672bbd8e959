// Markdown source persistence and the editor's trailing debounce.

use std::time::{Duration, Instant};

use folio_core::KeyValueStore;

pub const DOCUMENT_KEY: &str = "mdValue";
pub const SEEDED_KEY: &str = "notNew";

/// Shown once, on the very first run.
pub const WELCOME_DOC: &str = "\
# Welcome to Folio

Write Markdown on the left, tune the print style in the middle, and watch
the page on the right.

- Drag the dividers to resize panes.
- Cmd+1/2/3 picks the pane shown on narrow windows.
- Cmd+Shift+0/1/2/3 pins how many panes are shown.
";

// ──────────────────────────────────────────────
// DocumentStore
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStore {
    text: String,
}

impl DocumentStore {
    /// Load the document. A stored non-empty value wins over the welcome
    /// document; a missing value is initialized to the empty string.
    pub fn load(store: &mut impl KeyValueStore) -> Self {
        let seeded = read(&*store, SEEDED_KEY).is_some();
        let stored = read(&*store, DOCUMENT_KEY);
        if stored.is_none() {
            write(store, DOCUMENT_KEY, "");
        }

        let mut doc = Self {
            text: stored.unwrap_or_default(),
        };
        if !seeded {
            log::info!("First run, seeding welcome document");
            write(store, SEEDED_KEY, "true");
            if doc.text.is_empty() {
                doc.set_text(store, WELCOME_DOC.to_string());
            }
        }
        doc
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and persist it. Empty text is kept in memory only.
    pub fn set_text(&mut self, store: &mut impl KeyValueStore, text: String) {
        if text == self.text {
            return;
        }
        self.text = text;
        if !self.text.is_empty() {
            write(store, DOCUMENT_KEY, &self.text);
        }
    }
}

fn read(store: &impl KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Could not read {}: {}", key, e);
            None
        }
    }
}

fn write(store: &mut impl KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        log::warn!("{} not persisted: {}", key, e);
    }
}

// ──────────────────────────────────────────────
// Debouncer
// ──────────────────────────────────────────────

/// Trailing-edge debounce: a value is released once `delay` has passed
/// without a newer one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// The pending value, if it has been quiet long enough.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*at) < self.delay {
            return None;
        }
        self.flush()
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}
