//! The drawing seam between guide computation and the host renderer.

use kurbo::Size;

use crate::alignment::AlignmentGuide;
use crate::distance::DistanceLabel;
use crate::preferences::{DistanceUnit, GridStyle};
use crate::spacing::EqualSpacingGroup;

/// Grid overlay parameters resolved from preferences and theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    pub spacing: f64,
    pub style: GridStyle,
    pub dark: bool,
}

/// A stateful surface the orchestrator pushes guide geometry into.
///
/// `clear` resets drawn content cheaply between frames; `destroy`
/// releases the underlying resources at the end of a drag session.
/// Implementations must tolerate both being called while already
/// empty.
pub trait GuideSurface {
    fn clear(&mut self);
    fn draw_alignment_guide(&mut self, guide: &AlignmentGuide, canvas: Size);
    fn draw_spacing_group(&mut self, group: &EqualSpacingGroup, unit: DistanceUnit);
    fn draw_distance_label(&mut self, label: &DistanceLabel, unit: DistanceUnit);
    fn draw_grid(&mut self, canvas: Size, settings: &GridSettings);
    fn destroy(&mut self);
}
