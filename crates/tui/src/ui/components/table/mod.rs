mod palette_table_component;
mod state;

pub use palette_table_component::PaletteTableComponent;
pub use state::{BASELINE_LABEL, PaletteRow, PaletteTableState, RowKind, RowMetrics};
