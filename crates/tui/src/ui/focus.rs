//! Focus targets and the rat-focus tree behind Tab navigation.
//!
//! Each control owns a `FocusFlag` in its component state. `App` registers
//! them with a `FocusBuilder` in on-screen order, so the `Focus` built from
//! it cycles through exactly the controls the variant renders.
//! [`FocusTarget`] names the flag that is currently set so key routing can
//! match on it.

use colorevolve_types::{ExtractionKind, SliderId};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use crate::app::App;

/// Every focusable control on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// Terminal color picker of linked pair `n`.
    Picker(usize),
    /// Hex text field of linked pair `n`.
    HexText(usize),
    Slider(SliderId),
    AccessibilityWeight,
    WcagLevel,
    GenerateButton,
    ExtractionSource(ExtractionKind),
    ApplyExtracted,
    Table,
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.widget(&self.inputs);
        builder.widget(&self.extraction);
        builder.widget(&self.table);
    }

    fn focus(&self) -> FocusFlag {
        self.focus_root.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

impl App {
    /// The control whose flag is set, if any.
    pub fn focused_target(&self) -> Option<FocusTarget> {
        self.inputs
            .focused_target()
            .or_else(|| self.extraction.focused_target())
            .or_else(|| self.table.is_focused().then_some(FocusTarget::Table))
    }

    /// Move focus to `target`. Controls the variant does not render are
    /// ignored.
    pub fn focus_on(&self, target: FocusTarget) {
        let flag = match target {
            FocusTarget::ExtractionSource(_) | FocusTarget::ApplyExtracted => self.extraction.flag(target),
            FocusTarget::Table => Some(self.table.focus()),
            _ => self.inputs.flag(target),
        };
        if let Some(flag) = flag {
            self.focus.focus(&flag);
        }
    }
}
