mod extraction_component;
mod state;

pub use extraction_component::ExtractionComponent;
pub use state::{ExtractionFlow, ExtractionState, StagedExtraction};
