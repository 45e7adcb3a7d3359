//! Candidate collection: the coordinate values other geometry can snap
//! or align to, per axis, tagged with origin and strength.

use crate::preferences::SnapPreferences;
use crate::scene::{SceneQuery, snappable_bounds};
use kurbo::{Point, Rect, Size};
use std::collections::HashMap;

/// Above this object count, midpoint synthesis only pairs axis-adjacent
/// neighbors instead of every unordered pair.
pub const MIDPOINT_PAIR_LIMIT: usize = 50;

/// Legacy student-view frame, kept for backward compatibility: its edges
/// and center are always emitted as canvas candidates.
pub const SAFE_AREA_WIDTH: f64 = 1600.0;
pub const SAFE_AREA_HEIGHT: f64 = 900.0;

/// Coarse candidate priority controlling match tolerance and tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Strong,
    Medium,
    Weak,
}

impl Strength {
    /// Base match tolerance for this tier, in canvas pixels.
    pub fn base_tolerance(self) -> f64 {
        match self {
            Strength::Strong => 8.0,
            Strength::Medium => 6.0,
            Strength::Weak => 4.0,
        }
    }

    /// Priority number; lower wins.
    pub fn priority(self) -> u8 {
        match self {
            Strength::Strong => 0,
            Strength::Medium => 1,
            Strength::Weak => 2,
        }
    }
}

/// Where an axis candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    CanvasEdge,
    CanvasCenter,
    CanvasQuadrant,
    ObjectEdge,
    ObjectCenter,
    ObjectEdgeToCenter,
    Grid,
}

impl CandidateSource {
    /// Strength is derived deterministically from the source.
    pub fn strength(self) -> Strength {
        match self {
            CandidateSource::CanvasCenter | CandidateSource::Grid => Strength::Strong,
            CandidateSource::CanvasEdge
            | CandidateSource::ObjectEdge
            | CandidateSource::ObjectEdgeToCenter => Strength::Medium,
            CandidateSource::CanvasQuadrant | CandidateSource::ObjectCenter => Strength::Weak,
        }
    }

    /// Whether the center-bias multiplier applies to this source.
    pub fn is_center(self) -> bool {
        matches!(
            self,
            CandidateSource::CanvasCenter | CandidateSource::ObjectCenter
        )
    }
}

/// A single coordinate value on one axis that geometry may snap to.
///
/// Immutable; regenerated every update cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCandidate {
    pub value: f64,
    pub source: CandidateSource,
    pub strength: Strength,
}

impl AxisCandidate {
    /// Create a candidate; strength follows from the source.
    pub fn new(value: f64, source: CandidateSource) -> Self {
        Self {
            value,
            source,
            strength: source.strength(),
        }
    }
}

/// Collected candidates for one update cycle.
#[derive(Debug, Clone, Default)]
pub struct CandidateResult {
    /// Merged canvas ∪ object candidates, vertical axis (x values).
    pub vertical: Vec<AxisCandidate>,
    /// Merged canvas ∪ object candidates, horizontal axis (y values).
    pub horizontal: Vec<AxisCandidate>,
    /// Object-only candidates per axis.
    pub object_vertical: Vec<AxisCandidate>,
    pub object_horizontal: Vec<AxisCandidate>,
    /// Canvas-only candidates per axis.
    pub canvas_vertical: Vec<AxisCandidate>,
    pub canvas_horizontal: Vec<AxisCandidate>,
    /// Centers of the contributing objects.
    pub object_centers: Vec<Point>,
    /// Logical canvas dimensions at collection time.
    pub canvas_size: Size,
}

/// Optional spatial constraints for candidate collection.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Only consider objects intersecting the canvas inflated by this margin.
    pub margin: Option<f64>,
    /// Bounds to exclude (typically the object being dragged).
    pub exclude: Vec<Rect>,
}

impl CollectOptions {
    /// Exclude a single set of bounds.
    pub fn excluding(bounds: Rect) -> Self {
        Self {
            margin: None,
            exclude: vec![bounds],
        }
    }
}

/// Collect snap candidates from the scene.
///
/// Pure read of external scene state; objects whose bounds cannot be read
/// are skipped.
pub fn collect_candidates(
    scene: &dyn SceneQuery,
    prefs: &SnapPreferences,
    options: &CollectOptions,
) -> CandidateResult {
    let canvas = scene.canvas_size();
    let mut rects = snappable_bounds(scene, &options.exclude);
    if let Some(margin) = options.margin {
        let area = Rect::new(0.0, 0.0, canvas.width, canvas.height).inflate(margin, margin);
        rects.retain(|r| !r.intersect(area).is_zero_area());
    }
    collect_from_bounds(&rects, canvas, prefs)
}

/// Collect snap candidates from pre-filtered object bounds.
pub fn collect_from_bounds(
    objects: &[Rect],
    canvas: Size,
    prefs: &SnapPreferences,
) -> CandidateResult {
    let mut object_vertical = Vec::new();
    let mut object_horizontal = Vec::new();
    let mut centers = Vec::with_capacity(objects.len());

    for rect in objects {
        let center = rect.center();
        object_vertical.push(AxisCandidate::new(rect.x0, CandidateSource::ObjectEdge));
        object_vertical.push(AxisCandidate::new(rect.x1, CandidateSource::ObjectEdge));
        object_vertical.push(AxisCandidate::new(center.x, CandidateSource::ObjectCenter));
        object_horizontal.push(AxisCandidate::new(rect.y0, CandidateSource::ObjectEdge));
        object_horizontal.push(AxisCandidate::new(rect.y1, CandidateSource::ObjectEdge));
        object_horizontal.push(AxisCandidate::new(center.y, CandidateSource::ObjectCenter));

        if prefs.enable_midpoints {
            // Midpoints between each edge and the center, both axes.
            object_vertical.push(AxisCandidate::new(
                (rect.x0 + center.x) / 2.0,
                CandidateSource::ObjectEdgeToCenter,
            ));
            object_vertical.push(AxisCandidate::new(
                (center.x + rect.x1) / 2.0,
                CandidateSource::ObjectEdgeToCenter,
            ));
            object_horizontal.push(AxisCandidate::new(
                (rect.y0 + center.y) / 2.0,
                CandidateSource::ObjectEdgeToCenter,
            ));
            object_horizontal.push(AxisCandidate::new(
                (center.y + rect.y1) / 2.0,
                CandidateSource::ObjectEdgeToCenter,
            ));
        }

        centers.push(center);
    }

    if prefs.enable_midpoints {
        synthesize_pair_midpoints(&centers, &mut object_vertical, &mut object_horizontal);
    }

    let canvas_vertical = canvas_axis_candidates(canvas.width, SAFE_AREA_WIDTH, prefs);
    let canvas_horizontal = canvas_axis_candidates(canvas.height, SAFE_AREA_HEIGHT, prefs);

    let mut vertical = canvas_vertical.clone();
    vertical.extend_from_slice(&object_vertical);
    let mut horizontal = canvas_horizontal.clone();
    horizontal.extend_from_slice(&object_horizontal);

    CandidateResult {
        vertical: merge_candidates(vertical),
        horizontal: merge_candidates(horizontal),
        object_vertical: merge_candidates(object_vertical),
        object_horizontal: merge_candidates(object_horizontal),
        canvas_vertical: merge_candidates(canvas_vertical),
        canvas_horizontal: merge_candidates(canvas_horizontal),
        object_centers: centers,
        canvas_size: canvas,
    }
}

/// Synthesize weak midpoint candidates between object centers.
///
/// Quadratic pairing is fine for small scenes; beyond `MIDPOINT_PAIR_LIMIT`
/// only axis-adjacent neighbors are paired to stay near-linear.
fn synthesize_pair_midpoints(
    centers: &[Point],
    vertical: &mut Vec<AxisCandidate>,
    horizontal: &mut Vec<AxisCandidate>,
) {
    if centers.len() < 2 {
        return;
    }

    if centers.len() <= MIDPOINT_PAIR_LIMIT {
        for i in 0..centers.len() {
            for j in (i + 1)..centers.len() {
                vertical.push(AxisCandidate::new(
                    (centers[i].x + centers[j].x) / 2.0,
                    CandidateSource::ObjectCenter,
                ));
                horizontal.push(AxisCandidate::new(
                    (centers[i].y + centers[j].y) / 2.0,
                    CandidateSource::ObjectCenter,
                ));
            }
        }
        return;
    }

    let mut by_x: Vec<Point> = centers.to_vec();
    by_x.sort_by(|a, b| a.x.total_cmp(&b.x));
    for pair in by_x.windows(2) {
        vertical.push(AxisCandidate::new(
            (pair[0].x + pair[1].x) / 2.0,
            CandidateSource::ObjectCenter,
        ));
    }

    let mut by_y: Vec<Point> = centers.to_vec();
    by_y.sort_by(|a, b| a.y.total_cmp(&b.y));
    for pair in by_y.windows(2) {
        horizontal.push(AxisCandidate::new(
            (pair[0].y + pair[1].y) / 2.0,
            CandidateSource::ObjectCenter,
        ));
    }
}

/// Emit canvas candidates for one axis: edges, center, optional quadrant
/// lines, and the legacy safe-area frame.
fn canvas_axis_candidates(
    extent: f64,
    safe_extent: f64,
    prefs: &SnapPreferences,
) -> Vec<AxisCandidate> {
    let mut out = vec![
        AxisCandidate::new(0.0, CandidateSource::CanvasEdge),
        AxisCandidate::new(extent, CandidateSource::CanvasEdge),
        AxisCandidate::new(extent / 2.0, CandidateSource::CanvasCenter),
    ];

    if prefs.enable_quadrants {
        out.push(AxisCandidate::new(
            extent * 0.25,
            CandidateSource::CanvasQuadrant,
        ));
        out.push(AxisCandidate::new(
            extent * 0.75,
            CandidateSource::CanvasQuadrant,
        ));
    }

    // Legacy safe-area frame, centered in the canvas. Its center coincides
    // with the canvas center and is deduped by the merge pass.
    let safe_start = (extent - safe_extent) / 2.0;
    out.push(AxisCandidate::new(safe_start, CandidateSource::CanvasEdge));
    out.push(AxisCandidate::new(
        safe_start + safe_extent,
        CandidateSource::CanvasEdge,
    ));
    out.push(AxisCandidate::new(
        extent / 2.0,
        CandidateSource::CanvasCenter,
    ));

    out
}

/// Merge near-identical candidates, keeping the strongest.
///
/// Values are keyed at millisecond-equivalent precision (×1000, rounded);
/// among duplicates the lowest priority number wins, first inserted on ties.
fn merge_candidates(candidates: Vec<AxisCandidate>) -> Vec<AxisCandidate> {
    let mut merged: Vec<AxisCandidate> = Vec::with_capacity(candidates.len());
    let mut index_by_key: HashMap<i64, usize> = HashMap::with_capacity(candidates.len());

    for candidate in candidates {
        let key = (candidate.value * 1000.0).round() as i64;
        match index_by_key.get(&key) {
            Some(&i) => {
                if candidate.strength.priority() < merged[i].strength.priority() {
                    merged[i] = candidate;
                }
            }
            None => {
                index_by_key.insert(key, merged.len());
                merged.push(candidate);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::StaticScene;

    fn prefs() -> SnapPreferences {
        SnapPreferences::default()
    }

    fn count_source(list: &[AxisCandidate], source: CandidateSource) -> usize {
        list.iter().filter(|c| c.source == source).count()
    }

    #[test]
    fn test_strength_derived_from_source() {
        assert_eq!(CandidateSource::CanvasCenter.strength(), Strength::Strong);
        assert_eq!(CandidateSource::Grid.strength(), Strength::Strong);
        assert_eq!(CandidateSource::CanvasEdge.strength(), Strength::Medium);
        assert_eq!(CandidateSource::ObjectEdge.strength(), Strength::Medium);
        assert_eq!(
            CandidateSource::ObjectEdgeToCenter.strength(),
            Strength::Medium
        );
        assert_eq!(CandidateSource::ObjectCenter.strength(), Strength::Weak);
        assert_eq!(CandidateSource::CanvasQuadrant.strength(), Strength::Weak);
    }

    #[test]
    fn test_object_candidates() {
        let mut p = prefs();
        p.enable_midpoints = false;
        let rects = [Rect::new(10.0, 20.0, 50.0, 60.0)];
        let result = collect_from_bounds(&rects, Size::new(1000.0, 800.0), &p);

        let edges: Vec<f64> = result
            .object_vertical
            .iter()
            .filter(|c| c.source == CandidateSource::ObjectEdge)
            .map(|c| c.value)
            .collect();
        assert_eq!(edges, vec![10.0, 50.0]);
        let centers: Vec<f64> = result
            .object_vertical
            .iter()
            .filter(|c| c.source == CandidateSource::ObjectCenter)
            .map(|c| c.value)
            .collect();
        assert_eq!(centers, vec![30.0]);
        assert_eq!(result.object_centers, vec![kurbo::Point::new(30.0, 40.0)]);
    }

    #[test]
    fn test_pairwise_midpoint_synthesis() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(100.0, 0.0, 110.0, 10.0),
            Rect::new(200.0, 0.0, 210.0, 10.0),
        ];
        let result = collect_from_bounds(&rects, Size::new(1000.0, 800.0), &prefs());

        // Pair midpoints land at 55, 105, 155 on the vertical axis.
        let values: Vec<f64> = result
            .object_vertical
            .iter()
            .filter(|c| c.source == CandidateSource::ObjectCenter)
            .map(|c| c.value)
            .collect();
        assert!(values.contains(&55.0));
        assert!(values.contains(&105.0));
        assert!(values.contains(&155.0));
    }

    #[test]
    fn test_adjacent_only_synthesis_above_limit() {
        let rects: Vec<Rect> = (0..60)
            .map(|i| {
                let x = i as f64 * 30.0;
                Rect::new(x, 0.0, x + 10.0, 10.0)
            })
            .collect();
        let result = collect_from_bounds(&rects, Size::new(4000.0, 800.0), &prefs());

        // 60 own centers + 59 adjacent midpoints, far below the 1770 pairs
        // full synthesis would produce.
        let center_count = count_source(&result.object_vertical, CandidateSource::ObjectCenter);
        assert_eq!(center_count, 60 + 59);
    }

    #[test]
    fn test_canvas_candidates_and_quadrants() {
        let mut p = prefs();
        p.enable_quadrants = true;
        let result = collect_from_bounds(&[], Size::new(1000.0, 800.0), &p);

        let quadrants: Vec<f64> = result
            .canvas_vertical
            .iter()
            .filter(|c| c.source == CandidateSource::CanvasQuadrant)
            .map(|c| c.value)
            .collect();
        assert_eq!(quadrants, vec![250.0, 750.0]);

        // Canvas edges at 0/1000 plus the safe-area frame at -300/1300.
        let edges: Vec<f64> = result
            .canvas_vertical
            .iter()
            .filter(|c| c.source == CandidateSource::CanvasEdge)
            .map(|c| c.value)
            .collect();
        assert_eq!(edges, vec![0.0, 1000.0, -300.0, 1300.0]);

        // The safe-area center duplicate is merged away.
        assert_eq!(
            count_source(&result.canvas_vertical, CandidateSource::CanvasCenter),
            1
        );
    }

    #[test]
    fn test_merge_keeps_strongest_duplicate() {
        // An object edge sitting exactly on the canvas center: the strong
        // canvas-center candidate must win the merge.
        let rects = [Rect::new(500.0, 0.0, 600.0, 100.0)];
        let result = collect_from_bounds(&rects, Size::new(1000.0, 800.0), &prefs());

        let at_500: Vec<&AxisCandidate> = result
            .vertical
            .iter()
            .filter(|c| (c.value - 500.0).abs() < 1e-9)
            .collect();
        assert_eq!(at_500.len(), 1);
        assert_eq!(at_500[0].source, CandidateSource::CanvasCenter);
        assert_eq!(at_500[0].strength, Strength::Strong);
    }

    #[test]
    fn test_collect_skips_guides_and_dragged() {
        let mut scene = StaticScene::new(Size::new(1000.0, 800.0));
        scene.push_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.push(crate::scene::SceneObject::guide(Rect::new(
            20.0, 0.0, 30.0, 10.0,
        )));
        let dragged = Rect::new(100.0, 100.0, 150.0, 150.0);
        scene.push_rect(dragged);

        let result = collect_candidates(&scene, &prefs(), &CollectOptions::excluding(dragged));
        assert_eq!(result.object_centers.len(), 1);
    }

    #[test]
    fn test_margin_filters_distant_objects() {
        let mut scene = StaticScene::new(Size::new(1000.0, 800.0));
        scene.push_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.push_rect(Rect::new(5000.0, 5000.0, 5010.0, 5010.0));

        let options = CollectOptions {
            margin: Some(100.0),
            exclude: Vec::new(),
        };
        let result = collect_candidates(&scene, &prefs(), &options);
        assert_eq!(result.object_centers.len(), 1);
    }
}
