mod chart;
mod preview_component;
mod state;

pub use chart::ChartImage;
pub use preview_component::PreviewComponent;
pub use state::{ColorDiff, ColorInfo, Mockup, PreviewInput, PreviewModel};

#[cfg(test)]
pub(crate) use chart::tests::two_band_png;
