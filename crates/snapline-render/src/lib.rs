//! Snapline Render Library
//!
//! Guide-overlay rendering for the Snapline engine.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{GuideTheme, CANVAS_GUIDE_WIDTH, CENTER_DASHES, OBJECT_GUIDE_WIDTH, SPACING_TICK};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloGuideRenderer;
