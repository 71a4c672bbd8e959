// Layout policy: every tunable number the engine uses, in one place.

use std::time::Duration;

use folio_core::ExpandLevel;

/// Hard floor for any materialized pane.
pub const DEFAULT_MIN_PANE_WIDTH: f32 = 192.0;
/// The preview's floor, as a multiple of the pane floor.
pub const DEFAULT_PREVIEW_RESERVE_FACTOR: f32 = 1.3;
/// Absolute floor for the editor + style span while dragging handle 1.
pub const DEFAULT_COMBINED_FLOOR: f32 = 386.0;
/// Viewports at least this wide may show editor and preview side by side.
pub const DEFAULT_DUAL_BREAKPOINT: f32 = 640.0;
/// Viewports at least this wide may show all three panes.
pub const DEFAULT_TRIPLE_BREAKPOINT: f32 = 1024.0;
/// Width the preview page is typeset at; the preview is scaled to fit.
pub const DEFAULT_PREVIEW_PAGE_WIDTH: f32 = 850.0;
pub const DEFAULT_EDITOR_WIDTH: f32 = 350.0;
pub const DEFAULT_COMBINED_WIDTH: f32 = 650.0;
pub const DEFAULT_DRAG_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("preview reserve factor must be at least 1, got {0}")]
    ReserveTooSmall(f32),
    #[error("dual breakpoint {dual} must be below triple breakpoint {triple}")]
    BreakpointOrder { dual: f32, triple: f32 },
    #[error("a {width}px viewport cannot fit the pane floors of expand level {level}")]
    LevelDoesNotFit { level: u8, width: f32 },
    #[error("combined floor {floor} does not fit a {width}px three-pane viewport")]
    CombinedFloorDoesNotFit { floor: f32, width: f32 },
    #[error("drag idle timeout must be non-zero")]
    ZeroIdleTimeout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPolicy {
    pub min_pane_width: f32,
    pub preview_reserve_factor: f32,
    pub combined_floor: f32,
    pub dual_breakpoint: f32,
    pub triple_breakpoint: f32,
    pub preview_page_width: f32,
    pub default_editor_width: f32,
    pub default_combined_width: f32,
    pub drag_idle_timeout: Duration,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            min_pane_width: DEFAULT_MIN_PANE_WIDTH,
            preview_reserve_factor: DEFAULT_PREVIEW_RESERVE_FACTOR,
            combined_floor: DEFAULT_COMBINED_FLOOR,
            dual_breakpoint: DEFAULT_DUAL_BREAKPOINT,
            triple_breakpoint: DEFAULT_TRIPLE_BREAKPOINT,
            preview_page_width: DEFAULT_PREVIEW_PAGE_WIDTH,
            default_editor_width: DEFAULT_EDITOR_WIDTH,
            default_combined_width: DEFAULT_COMBINED_WIDTH,
            drag_idle_timeout: DEFAULT_DRAG_IDLE_TIMEOUT,
        }
    }
}

impl LayoutPolicy {
    /// Space held back for the preview whenever it sits beside the editor.
    pub fn preview_reserve(&self) -> f32 {
        self.preview_reserve_factor * self.min_pane_width
    }

    /// Upper bound of the editor + style span: the preview keeps its reserve.
    pub fn combined_limit(&self, max_width: f32) -> f32 {
        max_width - self.preview_reserve()
    }

    /// Space that must stay free to the right of the editor at `level`.
    ///
    /// Level 2 holds a pane floor for the style pane, any level above 0 holds
    /// the preview reserve. A level above 2 would add one more preview-sized
    /// reserve for a fourth pane; `ExpandLevel` stops at 2, so that term does
    /// not exist yet and must be added here together with any new level.
    pub fn editor_reserve(&self, level: ExpandLevel) -> f32 {
        let style = if level > ExpandLevel::Dual {
            self.min_pane_width
        } else {
            0.0
        };
        let preview = if level > ExpandLevel::Single {
            self.preview_reserve()
        } else {
            0.0
        };
        style + preview
    }

    /// Largest editor width allowed at `level`.
    pub fn editor_budget(&self, max_width: f32, level: ExpandLevel) -> f32 {
        max_width - self.editor_reserve(level)
    }

    /// Responsive ceiling for a viewport width.
    pub fn max_level_for(&self, width: f32) -> ExpandLevel {
        if width < self.dual_breakpoint {
            ExpandLevel::Single
        } else if width < self.triple_breakpoint {
            ExpandLevel::Dual
        } else {
            ExpandLevel::Triple
        }
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        let positive = [
            ("min_pane_width", self.min_pane_width),
            ("combined_floor", self.combined_floor),
            ("dual_breakpoint", self.dual_breakpoint),
            ("triple_breakpoint", self.triple_breakpoint),
            ("preview_page_width", self.preview_page_width),
            ("default_editor_width", self.default_editor_width),
            ("default_combined_width", self.default_combined_width),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PolicyError::NotPositive { name, value });
            }
        }
        if !self.preview_reserve_factor.is_finite() || self.preview_reserve_factor < 1.0 {
            return Err(PolicyError::ReserveTooSmall(self.preview_reserve_factor));
        }
        if self.dual_breakpoint >= self.triple_breakpoint {
            return Err(PolicyError::BreakpointOrder {
                dual: self.dual_breakpoint,
                triple: self.triple_breakpoint,
            });
        }
        // The narrowest viewport of each level must leave the editor its floor.
        for (level, width) in [
            (ExpandLevel::Dual, self.dual_breakpoint),
            (ExpandLevel::Triple, self.triple_breakpoint),
        ] {
            if self.editor_budget(width, level) < self.min_pane_width {
                return Err(PolicyError::LevelDoesNotFit {
                    level: level.as_u8(),
                    width,
                });
            }
        }
        if self.combined_floor > self.combined_limit(self.triple_breakpoint) {
            return Err(PolicyError::CombinedFloorDoesNotFit {
                floor: self.combined_floor,
                width: self.triple_breakpoint,
            });
        }
        if self.drag_idle_timeout.is_zero() {
            return Err(PolicyError::ZeroIdleTimeout);
        }
        Ok(())
    }
}
