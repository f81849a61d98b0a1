//! Palette table state: rows built from a generation result plus the single
//! active selection.

use colorevolve_types::{Capabilities, GenerationResult, HexColor, Palette};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::ui::components::preview::PreviewInput;

/// Label spanning the metric columns of the baseline row.
pub const BASELINE_LABEL: &str = "Initial palette (not optimized)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The unoptimized starting palette.
    Baseline,
    /// A ranked optimizer result; `rank` starts at 1.
    Optimized { rank: usize },
}

/// Display values for the metric columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMetrics {
    pub contrast: String,
    pub delta_e: String,
    pub daltonism: String,
}

impl From<&Palette> for RowMetrics {
    fn from(palette: &Palette) -> Self {
        Self {
            contrast: palette.contrast.to_string(),
            delta_e: palette.delta_e.to_string(),
            daltonism: palette.daltonism.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteRow {
    pub kind: RowKind,
    pub colors: [HexColor; 3],
    /// `None` for the baseline row, which shows [`BASELINE_LABEL`] instead.
    pub metrics: Option<RowMetrics>,
}

impl PaletteRow {
    pub fn is_baseline(&self) -> bool {
        matches!(self.kind, RowKind::Baseline)
    }
}

#[derive(Debug, Default, Clone)]
pub struct PaletteTableState {
    rows: Vec<PaletteRow>,
    baseline: Option<[HexColor; 3]>,
    active: Option<usize>,
    /// Keyboard highlight; independent of the active row until clicked.
    cursor: usize,
    /// Last rendered body area, used for mouse hit-testing.
    body_area: Rect,
    offset: usize,
    focus: FocusFlag,
}

impl PaletteTableState {
    /// Clear and rebuild the rows from `result`, then select the first
    /// optimized row. Returns the preview input of that default selection.
    ///
    /// Row 0 is the baseline when the capability is on and the result
    /// carries initial colors; palettes follow in received order.
    pub fn rebuild(&mut self, result: &GenerationResult, capabilities: &Capabilities) -> Option<PreviewInput> {
        self.rows.clear();
        self.active = None;
        self.cursor = 0;
        self.offset = 0;
        self.baseline = result.initial_colors.clone();

        if capabilities.has_initial_palette_row
            && let Some(initial_colors) = &self.baseline
        {
            self.rows.push(PaletteRow {
                kind: RowKind::Baseline,
                colors: initial_colors.clone(),
                metrics: None,
            });
        }
        self.rows.extend(result.palettes.iter().enumerate().map(|(index, palette)| PaletteRow {
            kind: RowKind::Optimized { rank: index + 1 },
            colors: palette.colors.clone(),
            metrics: Some(RowMetrics::from(palette)),
        }));
        debug!(rows = self.rows.len(), "palette table rebuilt");

        let first_optimized = self.first_optimized_index()?;
        self.select(first_optimized)
    }

    /// Make `index` the only active row and return what the preview needs.
    pub fn select(&mut self, index: usize) -> Option<PreviewInput> {
        let colors = self.rows.get(index)?.colors.clone();
        self.active.take();
        self.active = Some(index);
        self.cursor = index;
        Some(PreviewInput {
            colors,
            baseline: self.baseline.clone(),
        })
    }

    pub fn rows(&self) -> &[PaletteRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn first_optimized_index(&self) -> Option<usize> {
        self.rows.iter().position(|row| !row.is_baseline())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_row(&self) -> Option<&PaletteRow> {
        self.rows.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn set_layout(&mut self, body_area: Rect, offset: usize) {
        self.body_area = body_area;
        self.offset = offset;
    }

    /// Row index under a terminal position, if any.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.body_area;
        if column < area.x || column >= area.x + area.width || row < area.y || row >= area.y + area.height {
            return None;
        }
        let index = self.offset + usize::from(row - area.y);
        (index < self.rows.len()).then_some(index)
    }
}

impl HasFocus for PaletteTableState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.body_area
    }
}
