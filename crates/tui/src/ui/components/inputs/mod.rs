mod inputs_component;
mod state;

pub use inputs_component::InputsComponent;
pub use state::{InputsState, LinkedInputPair, SliderBinding, WeightSliderBinding};
