//! Theme styling for the controller UI.
//!
//! Two dark palettes (Dracula, Nord) map onto semantic roles; components use
//! the helpers in [`theme_helpers`] instead of hard-coding colors. Palette
//! swatches are the exception: they paint the user's colors verbatim.

use std::env;

use tracing::debug;

pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable naming the theme to load.
pub const THEME_ENV: &str = "TUI_THEME";

/// Resolve a theme by name, case-insensitively.
pub fn resolve(name: &str) -> Option<Box<dyn Theme>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "dracula" => Some(Box::new(DraculaTheme::new())),
        "nord" => Some(Box::new(NordTheme::new())),
        _ => None,
    }
}

/// Selects the theme named by `TUI_THEME`, falling back to Dracula.
pub fn load_from_env() -> Box<dyn Theme> {
    if let Ok(theme_name) = env::var(THEME_ENV) {
        if let Some(theme) = resolve(&theme_name) {
            return theme;
        }
        debug!(theme = %theme_name, "unknown theme requested; using dracula");
    }
    Box::new(DraculaTheme::new())
}
