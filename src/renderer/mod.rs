//! Browser rendering
//!
//! Canvas 2D is plenty for a few thousand circles and twelve arcs.

pub mod canvas;

pub use canvas::CanvasRenderer;
