// Renderer-facing projection of a committed layout state.

use std::fmt;

use folio_core::{ExpandLevel, Handle, PaneRole, Span};

use crate::display::{visibility, Visibility};
use crate::policy::LayoutPolicy;
use crate::state::LayoutState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanePlacement {
    pub role: PaneRole,
    pub span: Span,
    pub visibility: Visibility,
}

/// Everything a renderer needs for one paint. Plain values, no references
/// back into the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneFrame {
    pub viewport_width: f32,
    pub expand_level: ExpandLevel,
    pub display_id: PaneRole,
    /// Renderers suppress pointer events on overlays while this is set.
    pub is_resizing: bool,
    pub panes: [PanePlacement; 3],
    pub handles: Vec<(Handle, f32)>,
    /// Preview width over the typeset page width.
    pub preview_scale: f32,
    /// Left edge of the preview cover.
    pub preview_offset: f32,
    pub preview_margin: f32,
}

impl PaneFrame {
    pub fn project(state: &LayoutState, max_width: f32, policy: &LayoutPolicy) -> Self {
        let level = state.expand_level;
        let display = state.display_id;

        let editor = Span::new(
            0.0,
            match level {
                ExpandLevel::Single => max_width,
                _ => state.editor_width,
            },
        );
        let style = match level {
            ExpandLevel::Triple => Span::new(state.editor_width, state.style_width()),
            ExpandLevel::Dual => Span::new(0.0, state.editor_width),
            ExpandLevel::Single => Span::new(0.0, max_width),
        };
        let preview_x = preview_offset(state);
        let preview = Span::new(preview_x, max_width - preview_x);

        let placement = |role: PaneRole, span: Span| PanePlacement {
            role,
            span,
            visibility: visibility(role, level, display),
        };

        let handles = handle_positions(state);
        let preview_margin = match level {
            ExpandLevel::Triple => 24.0,
            ExpandLevel::Dual => 16.0,
            ExpandLevel::Single => 8.0,
        };

        Self {
            viewport_width: max_width,
            expand_level: level,
            display_id: display,
            is_resizing: state.is_resizing,
            panes: [
                placement(PaneRole::Editor, editor),
                placement(PaneRole::Style, style),
                placement(PaneRole::Preview, preview),
            ],
            handles,
            preview_scale: preview.width / policy.preview_page_width,
            preview_offset: preview_x,
            preview_margin,
        }
    }

    pub fn pane(&self, role: PaneRole) -> &PanePlacement {
        &self.panes[role.index() as usize]
    }

    pub fn width(&self, role: PaneRole) -> f32 {
        self.pane(role).span.width
    }
}

fn preview_offset(state: &LayoutState) -> f32 {
    match state.expand_level {
        ExpandLevel::Triple => state.combined_width,
        ExpandLevel::Dual => state.editor_width,
        ExpandLevel::Single => 0.0,
    }
}

pub(crate) fn handle_positions(state: &LayoutState) -> Vec<(Handle, f32)> {
    let mut handles = Vec::new();
    if state.expand_level.has_handle(Handle::EditorStyle) {
        handles.push((Handle::EditorStyle, state.editor_width));
    }
    if state.expand_level.has_handle(Handle::StylePreview) {
        handles.push((Handle::StylePreview, state.combined_width));
    }
    handles
}

impl fmt::Display for PaneFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level={} display={} viewport={:.1}",
            self.expand_level.as_u8(),
            self.display_id.name(),
            self.viewport_width
        )?;
        for pane in &self.panes {
            let mark = match pane.visibility {
                Visibility::Visible => "",
                Visibility::Overlay => "^",
                Visibility::Hidden => "~",
            };
            write!(f, " {}{}={:.1}@{:.1}", mark, pane.role.name(), pane.span.width, pane.span.x)?;
        }
        write!(f, " scale={:.3}", self.preview_scale)?;
        if self.is_resizing {
            write!(f, " resizing")?;
        }
        Ok(())
    }
}
