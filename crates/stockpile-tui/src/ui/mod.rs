//! Terminal UI: rendering, input handling and styles.

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
