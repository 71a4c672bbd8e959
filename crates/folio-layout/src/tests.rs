#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::{
        LayoutPersistence, LayoutPolicy, LayoutRecord, LayoutState, PaneLayout, PaneMode,
        Visibility, LAYOUT_KEY,
    };
    use folio_core::{
        CancelReason, ExpandLevel, ExpandPreference, Handle, KeyValueStore, LayoutEngine,
        MemoryStore, PaneRole, PointerSource,
    };

    const WIDE: f32 = 1280.0;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    fn engine(width: f32) -> PaneLayout {
        PaneLayout::new(LayoutPolicy::default(), LayoutState::default(), width)
    }

    fn drag(layout: &mut PaneLayout, handle: Handle, from: f32, to: f32) {
        let now = Instant::now();
        assert!(layout.begin_drag(handle, from, PointerSource::Mouse, now));
        layout.drag_to(to, now);
        layout.end_drag();
    }

    // ──────────────────────────────────────────
    // Defaults
    // ──────────────────────────────────────────

    #[test]
    fn test_defaults_on_wide_viewport() {
        let layout = engine(WIDE);
        let state = layout.state();
        assert_eq!(state.expand_level, ExpandLevel::Triple);
        assert_eq!(state.max_expand_level, ExpandLevel::Triple);
        assert_eq!(state.display_id, PaneRole::Editor);
        assert!(approx_eq(state.editor_width, 350.0));
        assert!(approx_eq(state.combined_width, 650.0));
        assert!(!layout.is_resizing());
    }

    #[test]
    fn test_handle_positions_follow_level() {
        let layout = engine(WIDE);
        let handles = layout.handle_positions();
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].0, Handle::EditorStyle);
        assert!(approx_eq(handles[0].1, 350.0));
        assert_eq!(handles[1].0, Handle::StylePreview);
        assert!(approx_eq(handles[1].1, 650.0));

        let layout = engine(800.0);
        assert_eq!(layout.handle_positions().len(), 1);
        let layout = engine(500.0);
        assert!(layout.handle_positions().is_empty());
    }

    // ──────────────────────────────────────────
    // Dragging handle 0
    // ──────────────────────────────────────────

    #[test]
    fn test_editor_drag_is_capped_by_budget() {
        let mut layout = engine(WIDE);
        drag(&mut layout, Handle::EditorStyle, 350.0, 850.0);

        let state = layout.state();
        let budget = WIDE - 192.0 - 1.3 * 192.0;
        assert!(approx_eq(state.editor_width, budget));
        assert!(state.editor_width < 850.0);
        assert!(state.style_width() >= 192.0 - 0.01);
        assert!(state.combined_width <= WIDE - 1.3 * 192.0 + 0.01);
    }

    #[test]
    fn test_editor_drag_pushes_style_pane() {
        let mut layout = engine(WIDE);
        drag(&mut layout, Handle::EditorStyle, 350.0, 500.0);

        let state = layout.state();
        assert!(approx_eq(state.editor_width, 500.0));
        assert!(approx_eq(state.combined_width, 692.0));
        assert!(approx_eq(state.style_width(), 192.0));
    }

    #[test]
    fn test_style_pane_push_is_continuous() {
        let mut layout = engine(WIDE);
        let now = Instant::now();
        assert!(layout.begin_drag(Handle::EditorStyle, 350.0, PointerSource::Mouse, now));

        // The style pane reaches its floor at 458 and is pushed from there on.
        layout.drag_to(458.0, now);
        assert!(approx_eq(layout.state().combined_width, 650.0));
        layout.drag_to(459.0, now);
        assert!(approx_eq(layout.state().combined_width, 651.0));
        assert!(approx_eq(layout.state().style_width(), 192.0));
        layout.drag_to(460.0, now);
        assert!(approx_eq(layout.state().style_width(), 192.0));

        // Coming back leaves the pushed edge where it was.
        layout.drag_to(350.0, now);
        layout.end_drag();
        let state = layout.state();
        assert!(approx_eq(state.editor_width, 350.0));
        assert!(approx_eq(state.combined_width, 652.0));
        assert!(approx_eq(state.style_width(), 302.0));
    }

    #[test]
    fn test_editor_drag_respects_floor() {
        let mut layout = engine(WIDE);
        drag(&mut layout, Handle::EditorStyle, 350.0, 0.0);

        let state = layout.state();
        assert!(approx_eq(state.editor_width, 192.0));
        assert!(approx_eq(state.combined_width, 650.0));
    }

    #[test]
    fn test_level_one_overflow_collapses_then_restores_style_pane() {
        let mut layout = engine(800.0);
        assert_eq!(layout.state().expand_level, ExpandLevel::Dual);
        let limit = 800.0 - 1.3 * 192.0;
        assert!(approx_eq(layout.state().combined_width, limit));

        drag(&mut layout, Handle::EditorStyle, 350.0, 600.0);

        // The collapse is resolved by the same solver pass that commits it.
        let state = layout.state();
        assert_eq!(state.pane_mode, PaneMode::ThreeWide);
        assert!(approx_eq(state.combined_width, limit));
        assert!(approx_eq(state.editor_width, limit - 192.0));
    }

    // ──────────────────────────────────────────
    // Dragging handle 1
    // ──────────────────────────────────────────

    #[test]
    fn test_style_drag_moves_span() {
        let mut layout = engine(WIDE);
        drag(&mut layout, Handle::StylePreview, 650.0, 800.0);

        let state = layout.state();
        assert!(approx_eq(state.combined_width, 800.0));
        assert!(approx_eq(state.editor_width, 350.0));
    }

    #[test]
    fn test_style_drag_below_two_floors_is_ignored() {
        let mut layout = engine(WIDE);
        let before = layout.state().clone();
        let now = Instant::now();
        assert!(layout.begin_drag(Handle::StylePreview, 650.0, PointerSource::Mouse, now));
        layout.drag_to(-50.0, now);

        let state = layout.state();
        assert!(approx_eq(state.editor_width, before.editor_width));
        assert!(approx_eq(state.combined_width, before.combined_width));
        assert!(layout.is_resizing());
    }

    #[test]
    fn test_style_drag_squeezes_editor() {
        let mut layout = engine(WIDE);
        drag(&mut layout, Handle::StylePreview, 650.0, 450.0);

        let state = layout.state();
        assert!(approx_eq(state.combined_width, 450.0));
        assert!(approx_eq(state.editor_width, 258.0));
        assert!(approx_eq(state.style_width(), 192.0));
    }

    #[test]
    fn test_style_drag_respects_combined_floor() {
        let mut layout = engine(WIDE);
        drag(&mut layout, Handle::StylePreview, 650.0, 390.0);

        let state = layout.state();
        assert!(state.combined_width >= 386.0);
        assert!(state.style_width() >= 192.0 - 0.01);
        assert!(state.editor_width >= 192.0 - 0.01);
    }

    #[test]
    fn test_begin_drag_on_hidden_handle() {
        let mut layout = engine(800.0);
        let now = Instant::now();
        assert!(!layout.begin_drag(Handle::StylePreview, 550.0, PointerSource::Touch, now));
        assert!(!layout.is_resizing());
    }

    // ──────────────────────────────────────────
    // Cancellation
    // ──────────────────────────────────────────

    #[test]
    fn test_cancel_keeps_last_geometry() {
        let mut layout = engine(WIDE);
        let now = Instant::now();
        layout.begin_drag(Handle::EditorStyle, 350.0, PointerSource::Mouse, now);
        layout.drag_to(420.0, now);
        layout.cancel_drag(CancelReason::PointerCaptureLost);

        assert!(!layout.is_resizing());
        assert!(layout.drag_session().is_none());
        assert!(approx_eq(layout.state().editor_width, 420.0));

        // Later moves are ignored until a new session starts.
        layout.drag_to(600.0, now);
        assert!(approx_eq(layout.state().editor_width, 420.0));
    }

    #[test]
    fn test_idle_drag_expires() {
        let mut layout = engine(WIDE);
        let start = Instant::now();
        layout.begin_drag(Handle::EditorStyle, 350.0, PointerSource::Mouse, start);

        assert!(!layout.expire_stale_drag(start + Duration::from_secs(1)));
        assert!(layout.is_resizing());
        assert!(layout.expire_stale_drag(start + Duration::from_secs(6)));
        assert!(!layout.is_resizing());
        assert!(!layout.expire_stale_drag(start + Duration::from_secs(60)));
    }

    #[test]
    fn test_resize_cancels_drag_on_hidden_handle() {
        let mut layout = engine(WIDE);
        let now = Instant::now();
        layout.begin_drag(Handle::StylePreview, 650.0, PointerSource::Mouse, now);
        layout.resize_viewport(800.0);

        assert!(!layout.is_resizing());
        assert!(layout.drag_session().is_none());
    }

    #[test]
    fn test_resize_keeps_drag_on_visible_handle() {
        let mut layout = engine(WIDE);
        let now = Instant::now();
        layout.begin_drag(Handle::EditorStyle, 350.0, PointerSource::Mouse, now);
        layout.resize_viewport(900.0);

        assert!(layout.is_resizing());
        assert!(layout.drag_session().is_some());
    }

    // ──────────────────────────────────────────
    // Viewport changes
    // ──────────────────────────────────────────

    #[test]
    fn test_shrink_to_single_pane() {
        let mut layout = engine(WIDE);
        layout.resize_viewport(500.0);

        let state = layout.state();
        assert_eq!(state.max_expand_level, ExpandLevel::Single);
        assert_eq!(state.expand_level, ExpandLevel::Single);
        assert!(approx_eq(state.editor_width, 500.0));
        assert!(approx_eq(state.combined_width, 500.0));
    }

    #[test]
    fn test_fixed_preference_is_restored_on_grow() {
        let mut layout = engine(WIDE);
        layout.resize_viewport(800.0);
        assert_eq!(layout.state().expand_level, ExpandLevel::Dual);
        layout.resize_viewport(WIDE);
        assert_eq!(layout.state().expand_level, ExpandLevel::Triple);
    }

    #[test]
    fn test_follow_viewport_does_not_grow_back() {
        let mut layout = engine(800.0);
        layout.set_expand_preference(ExpandPreference::FollowViewport);
        assert_eq!(layout.state().expand_level, ExpandLevel::Dual);
        layout.resize_viewport(WIDE);
        assert_eq!(layout.state().expand_level, ExpandLevel::Dual);
        assert_eq!(layout.state().max_expand_level, ExpandLevel::Triple);
    }

    #[test]
    fn test_invalid_width_is_ignored() {
        let mut layout = engine(WIDE);
        let before = layout.state().clone();
        layout.resize_viewport(f32::NAN);
        layout.resize_viewport(-10.0);
        assert_eq!(layout.state(), &before);
        assert!(approx_eq(layout.viewport_width(), WIDE));
    }

    // ──────────────────────────────────────────
    // Expand preference and display
    // ──────────────────────────────────────────

    #[test]
    fn test_fixed_preference_is_capped_by_ceiling() {
        let mut layout = engine(800.0);
        layout.set_expand_preference(ExpandPreference::Fixed(ExpandLevel::Triple));
        assert_eq!(layout.state().expand_level, ExpandLevel::Dual);

        layout.set_expand_preference(ExpandPreference::Fixed(ExpandLevel::Single));
        assert_eq!(layout.state().expand_level, ExpandLevel::Single);
    }

    #[test]
    fn test_set_display_keeps_widths() {
        let mut layout = engine(800.0);
        let before = layout.state().clone();
        layout.set_display(PaneRole::Style);

        assert_eq!(layout.display(), PaneRole::Style);
        assert_eq!(layout.state().editor_width, before.editor_width);
        assert_eq!(layout.state().combined_width, before.combined_width);
        let frame = layout.frame();
        assert_eq!(frame.pane(PaneRole::Style).visibility, Visibility::Overlay);
    }

    // ──────────────────────────────────────────
    // Frame projection
    // ──────────────────────────────────────────

    #[test]
    fn test_frame_three_panes() {
        let frame = engine(WIDE).frame();
        assert!(approx_eq(frame.width(PaneRole::Editor), 350.0));
        assert!(approx_eq(frame.width(PaneRole::Style), 300.0));
        assert!(approx_eq(frame.width(PaneRole::Preview), 630.0));
        assert!(approx_eq(frame.pane(PaneRole::Preview).span.x, 650.0));
        assert!(approx_eq(frame.pane(PaneRole::Preview).span.end(), WIDE));
        assert!(frame.pane(PaneRole::Style).span.contains_x(500.0));
        assert!(approx_eq(frame.preview_scale, 630.0 / 850.0));
        assert_eq!(frame.handles.len(), 2);
    }

    #[test]
    fn test_frame_two_panes() {
        let frame = engine(800.0).frame();
        assert!(approx_eq(frame.width(PaneRole::Editor), 350.0));
        assert!(approx_eq(frame.pane(PaneRole::Preview).span.x, 350.0));
        assert!(approx_eq(frame.width(PaneRole::Preview), 450.0));
        assert_eq!(frame.pane(PaneRole::Style).visibility, Visibility::Hidden);
    }

    #[test]
    fn test_frame_single_pane() {
        let mut layout = engine(500.0);
        layout.set_display(PaneRole::Preview);
        let frame = layout.frame();
        assert!(approx_eq(frame.width(PaneRole::Preview), 500.0));
        assert_eq!(frame.pane(PaneRole::Preview).visibility, Visibility::Visible);
        assert_eq!(frame.pane(PaneRole::Editor).visibility, Visibility::Hidden);
        assert!(frame.handles.is_empty());
    }

    #[test]
    fn test_frame_summary_line() {
        let frame = engine(WIDE).frame();
        assert_eq!(
            frame.to_string(),
            "level=2 display=editor viewport=1280.0 editor=350.0@0.0 style=300.0@350.0 \
             preview=630.0@650.0 scale=0.741"
        );
    }

    // ──────────────────────────────────────────
    // Persistence
    // ──────────────────────────────────────────

    #[test]
    fn test_first_session_writes_defaults_once() {
        let policy = LayoutPolicy::default();
        let mut persistence = LayoutPersistence::new(MemoryStore::new());
        let seed = persistence.load(&policy);
        assert_eq!(persistence.store().writes(), 1);

        let layout = PaneLayout::new(policy, seed, WIDE);
        assert!(!persistence.sync(layout.state()));
        assert_eq!(persistence.store().writes(), 1);

        let stored = persistence.store().get(LAYOUT_KEY).unwrap().unwrap();
        let record = LayoutRecord::parse(&stored).unwrap();
        assert!(record.is_init);
        assert!(approx_eq(record.editor_width, 350.0));
        assert!(approx_eq(record.combined_width, 650.0));
        assert_eq!(record.expand_level, ExpandLevel::Triple);
        assert_eq!(record.display_id, PaneRole::Editor);
    }

    #[test]
    fn test_stored_record_seeds_without_write_back() {
        let policy = LayoutPolicy::default();
        let stored = r#"{"expandLevel":2,"displayId":1,"editorWidth":400,"combinedWidth":800,"customExpandLevel":2}"#;
        let mut persistence =
            LayoutPersistence::new(MemoryStore::new().with_entry(LAYOUT_KEY, stored));
        let seed = persistence.load(&policy);
        let layout = PaneLayout::new(policy, seed, WIDE);

        assert_eq!(layout.display(), PaneRole::Style);
        assert!(approx_eq(layout.state().editor_width, 400.0));
        assert!(!persistence.sync(layout.state()));
        assert_eq!(persistence.store().writes(), 0);
    }

    #[test]
    fn test_sync_writes_only_on_change() {
        let policy = LayoutPolicy::default();
        let mut persistence = LayoutPersistence::new(MemoryStore::new());
        let seed = persistence.load(&policy);
        let mut layout = PaneLayout::new(policy, seed, WIDE);

        drag(&mut layout, Handle::EditorStyle, 350.0, 400.0);
        assert!(persistence.sync(layout.state()));
        assert!(!persistence.sync(layout.state()));
        assert_eq!(persistence.store().writes(), 2);

        let stored = persistence.store().get(LAYOUT_KEY).unwrap().unwrap();
        let record = LayoutRecord::parse(&stored).unwrap();
        assert!(!record.is_init);
        assert!(approx_eq(record.editor_width, 400.0));
    }

    #[test]
    fn test_saved_state_reloads_unchanged() {
        let policy = LayoutPolicy::default();
        let mut saved = LayoutState::with_policy(&policy);
        saved.expand_level = ExpandLevel::Dual;
        saved.display_id = PaneRole::Style;
        saved.editor_width = 412.75;
        saved.combined_width = 733.5;
        saved.custom_expand_level = ExpandPreference::FollowViewport;

        let mut persistence = LayoutPersistence::new(MemoryStore::new());
        persistence.load(&policy);
        assert!(persistence.sync(&saved));

        let mut reopened = LayoutPersistence::new(persistence.into_store());
        let restored = reopened.load(&policy);
        assert_eq!(LayoutRecord::from_state(&restored), LayoutRecord::from_state(&saved));
        assert_eq!(restored.pane_mode, PaneMode::ThreeWide);
        assert!(!reopened.sync(&restored));
    }

    #[test]
    fn test_legacy_record_with_collapsed_style_pane() {
        let policy = LayoutPolicy::default();
        let stored = r#"{"expandLevel":1,"displayId":2,"editorAreaW":600,"editorAndSetAreaW":0,"customExpandLevel":-1}"#;
        let record = LayoutRecord::parse(stored).unwrap();
        let seed = record.into_state(&policy);
        assert_eq!(seed.pane_mode, PaneMode::TwoWide);
        assert_eq!(seed.custom_expand_level, ExpandPreference::FollowViewport);

        let layout = PaneLayout::new(policy, seed, 900.0);
        let state = layout.state();
        assert_eq!(state.expand_level, ExpandLevel::Dual);
        assert_eq!(state.display_id, PaneRole::Preview);
        assert!(approx_eq(state.combined_width, 600.0));
        assert!(approx_eq(state.editor_width, 408.0));
    }

    #[test]
    fn test_malformed_record_falls_back_to_defaults() {
        let policy = LayoutPolicy::default();
        let mut persistence =
            LayoutPersistence::new(MemoryStore::new().with_entry(LAYOUT_KEY, "{not json"));
        let seed = persistence.load(&policy);

        assert_eq!(seed, LayoutState::with_policy(&policy));
        assert_eq!(persistence.store().writes(), 1);
        assert!(LayoutRecord::parse(r#"{"expandLevel":7}"#).is_none());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let policy = LayoutPolicy::default();
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let mut persistence = LayoutPersistence::new(store);
        let seed = persistence.load(&policy);
        assert!(persistence.is_initialized());

        let mut layout = PaneLayout::new(policy, seed, WIDE);
        drag(&mut layout, Handle::StylePreview, 650.0, 700.0);
        assert!(persistence.sync(layout.state()));
        assert_eq!(persistence.store().writes(), 0);
        assert!(approx_eq(layout.state().combined_width, 700.0));
    }

    #[test]
    fn test_sync_before_load_is_a_no_op() {
        let mut persistence = LayoutPersistence::new(MemoryStore::new());
        assert!(!persistence.sync(&LayoutState::default()));
        assert_eq!(persistence.into_store().writes(), 0);
    }
}
