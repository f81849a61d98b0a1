//! UI rendering module for the controller.
//!
//! This module provides the terminal runtime, the root view, focus handling,
//! components and theming.

pub mod components;
pub mod focus;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
