//! Axis snapping: correcting a raw pointer coordinate toward the most
//! relevant nearby candidate.

use crate::candidates::{AxisCandidate, CandidateResult, CandidateSource, Strength};
use crate::preferences::{ReferenceMode, SnapPreferences};
use kurbo::Point;

/// Tolerance multiplier while magnetic snapping is active.
pub const MAGNETIC_MULTIPLIER: f64 = 1.5;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy)]
pub struct SnappedPoint {
    /// The corrected point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
    /// Source of the winning X candidate, if any.
    pub source_x: Option<CandidateSource>,
    /// Source of the winning Y candidate, if any.
    pub source_y: Option<CandidateSource>,
}

impl SnappedPoint {
    /// Create a result that passes the input through unchanged.
    pub fn passthrough(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
            source_x: None,
            source_y: None,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Effective tolerance for a candidate under the current preferences.
fn effective_tolerance(candidate: &AxisCandidate, prefs: &SnapPreferences) -> f64 {
    let mut tolerance = candidate.strength.base_tolerance();
    if prefs.magnetic_snapping {
        tolerance *= MAGNETIC_MULTIPLIER;
    }
    if prefs.center_bias_enabled && candidate.source.is_center() {
        tolerance *= prefs.center_bias;
    }
    tolerance
}

/// Snap a single coordinate against a candidate list.
///
/// Among matching candidates, a strictly higher strength tier wins; within
/// a tier the smaller distance wins; remaining ties go to the first
/// inserted candidate.
fn snap_axis(
    value: f64,
    candidates: &[AxisCandidate],
    prefs: &SnapPreferences,
) -> Option<(f64, CandidateSource)> {
    let mut best: Option<(&AxisCandidate, f64)> = None;

    for candidate in candidates {
        let distance = (candidate.value - value).abs();
        if distance > effective_tolerance(candidate, prefs) {
            continue;
        }
        let better = match best {
            None => true,
            Some((current, current_distance)) => {
                candidate.strength.priority() < current.strength.priority()
                    || (candidate.strength.priority() == current.strength.priority()
                        && distance < current_distance)
            }
        };
        if better {
            best = Some((candidate, distance));
        }
    }

    best.map(|(c, _)| (c.value, c.source))
}

/// Round a coordinate to the nearest grid multiple when within the strong
/// tolerance.
fn snap_to_grid_axis(value: f64, spacing: f64) -> Option<f64> {
    if spacing <= 0.0 {
        return None;
    }
    let snapped = (value / spacing).round() * spacing;
    ((snapped - value).abs() <= Strength::Strong.base_tolerance()).then_some(snapped)
}

/// Correct a raw pointer point toward nearby candidates, per axis
/// independently.
///
/// Returns the input unchanged when snapping is globally disabled or
/// temporarily suspended.
pub fn snap_point(
    point: Point,
    candidates: &CandidateResult,
    prefs: &SnapPreferences,
    suspended: bool,
) -> SnappedPoint {
    if !prefs.smart_guides || suspended {
        return SnappedPoint::passthrough(point);
    }

    let (vertical, horizontal) = match prefs.reference_mode {
        ReferenceMode::Canvas => (&candidates.vertical, &candidates.horizontal),
        ReferenceMode::Object => (&candidates.object_vertical, &candidates.object_horizontal),
        ReferenceMode::Grid => {
            // Grid mode bypasses candidates entirely.
            let x = snap_to_grid_axis(point.x, prefs.grid_spacing);
            let y = snap_to_grid_axis(point.y, prefs.grid_spacing);
            return SnappedPoint {
                point: Point::new(x.unwrap_or(point.x), y.unwrap_or(point.y)),
                snapped_x: x.is_some(),
                snapped_y: y.is_some(),
                source_x: x.map(|_| CandidateSource::Grid),
                source_y: y.map(|_| CandidateSource::Grid),
            };
        }
    };

    let x = snap_axis(point.x, vertical, prefs);
    let y = snap_axis(point.y, horizontal, prefs);

    SnappedPoint {
        point: Point::new(
            x.map_or(point.x, |(v, _)| v),
            y.map_or(point.y, |(v, _)| v),
        ),
        snapped_x: x.is_some(),
        snapped_y: y.is_some(),
        source_x: x.map(|(_, s)| s),
        source_y: y.map(|(_, s)| s),
    }
}
