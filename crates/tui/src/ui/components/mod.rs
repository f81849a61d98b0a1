//! UI components: generation inputs, extraction, palette table, preview.

pub mod common;
pub mod component;
pub mod extraction;
pub mod inputs;
pub mod preview;
pub mod table;

pub use component::*;
pub use extraction::ExtractionComponent;
pub use inputs::InputsComponent;
pub use preview::PreviewComponent;
pub use table::PaletteTableComponent;
