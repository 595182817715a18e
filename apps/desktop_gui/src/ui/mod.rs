//! UI layer for the viewer: app shell, panels, widgets, and portrait textures.

pub mod app;
pub mod panels;
pub mod portraits;
pub mod widgets;

pub use app::{StartupConfig, ViewerApp};
