mod text_field;
pub mod text_input;

pub use text_field::render_text_field;
pub use text_input::TextInputState;
