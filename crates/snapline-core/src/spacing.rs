//! Equal-spacing detection across sequences of nearby objects.

use kurbo::Rect;

/// Minimum confidence a group must exceed to be surfaced.
const ACCEPTANCE_THRESHOLD: f64 = 0.7;
/// Confidence boost when the dragged object could join the sequence.
const INSERTION_BOOST: f64 = 1.2;
/// Maximum groups surfaced per update.
const MAX_GROUPS: usize = 3;

/// The axis a spacing sequence runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A detected run of near-equally spaced objects.
#[derive(Debug, Clone)]
pub struct EqualSpacingGroup {
    /// Members sorted along the axis, at least three.
    pub objects: Vec<Rect>,
    pub axis: Axis,
    /// Average gap between adjacent members.
    pub gap: f64,
    pub start_pos: f64,
    pub end_pos: f64,
    pub confidence: f64,
}

fn span(rect: Rect, axis: Axis) -> (f64, f64) {
    match axis {
        Axis::X => (rect.x0, rect.x1),
        Axis::Y => (rect.y0, rect.y1),
    }
}

/// Gap between two axis-adjacent rects, leading edge of `b` minus
/// trailing edge of `a`.
fn gap_between(a: Rect, b: Rect, axis: Axis) -> f64 {
    span(b, axis).0 - span(a, axis).1
}

/// Uniformity score for a gap sequence: 1.0 for perfectly equal gaps,
/// dropping to 0 as the worst deviation from the mean reaches or
/// exceeds the tolerance.
pub fn spacing_confidence(gaps: &[f64], tolerance: f64) -> f64 {
    if gaps.len() < 2 || tolerance <= 0.0 {
        return 0.0;
    }
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let max_deviation = gaps
        .iter()
        .map(|g| (g - mean).abs())
        .fold(0.0_f64, f64::max);
    (1.0 - max_deviation / tolerance).max(0.0)
}

/// Whether the dragged object, at its current position, extends the
/// sequence: slotted before the first member, after the last, or
/// between two consecutive members, with every adjacent gap within
/// tolerance of the group average.
fn dragged_extends(group: &EqualSpacingGroup, dragged: Rect, tolerance: f64) -> bool {
    let axis = group.axis;
    let (d0, d1) = span(dragged, axis);
    let within = |gap: f64| gap > 0.0 && (gap - group.gap).abs() <= tolerance;

    let first = group.objects[0];
    let last = *group.objects.last().expect("group has members");
    if d1 <= span(first, axis).0 && within(span(first, axis).0 - d1) {
        return true;
    }
    if d0 >= span(last, axis).1 && within(d0 - span(last, axis).1) {
        return true;
    }
    group.objects.windows(2).any(|pair| {
        let (_, a1) = span(pair[0], axis);
        let (b0, _) = span(pair[1], axis);
        d0 >= a1 && d1 <= b0 && within(d0 - a1) && within(b0 - d1)
    })
}

fn detect_axis(
    dragged: Rect,
    nearby: &[Rect],
    axis: Axis,
    tolerance: f64,
) -> Vec<EqualSpacingGroup> {
    let mut sorted = nearby.to_vec();
    sorted.sort_by(|a, b| span(*a, axis).0.total_cmp(&span(*b, axis).0));

    let mut groups = Vec::new();
    // Dedup: a run wholly contained in an already-surfaced run (same or
    // earlier start, same or earlier end) is the duplicate suffix the
    // restart-at-each-index scan produces.
    let mut covered_end = 0usize;

    for start in 0..sorted.len().saturating_sub(2) {
        let mut members = vec![sorted[start]];
        let mut gaps: Vec<f64> = Vec::new();
        let mut end = start;

        for (offset, &next) in sorted[start + 1..].iter().enumerate() {
            let gap = gap_between(*members.last().expect("non-empty"), next, axis);
            if gap <= 0.0 {
                break;
            }
            if !gaps.is_empty() {
                let avg = gaps.iter().sum::<f64>() / gaps.len() as f64;
                if (gap - avg).abs() > tolerance {
                    break;
                }
            }
            gaps.push(gap);
            members.push(next);
            end = start + 1 + offset;
        }

        if members.len() < 3 {
            continue;
        }
        let confidence = spacing_confidence(&gaps, tolerance);
        let avg = gaps.iter().sum::<f64>() / gaps.len() as f64;
        let mut group = EqualSpacingGroup {
            start_pos: span(members[0], axis).0,
            end_pos: span(*members.last().expect("non-empty"), axis).1,
            objects: members,
            axis,
            gap: avg,
            confidence,
        };
        if dragged_extends(&group, dragged, tolerance) {
            group.confidence = (group.confidence * INSERTION_BOOST).min(1.0);
        }
        if group.confidence > ACCEPTANCE_THRESHOLD && (groups.is_empty() || end > covered_end) {
            groups.push(group);
            covered_end = end;
        }
    }
    groups
}

/// Find runs of near-equally spaced objects on both axes, boosting the
/// confidence of any run the dragged object could extend.
pub fn detect_equal_spacing(
    dragged: Rect,
    nearby: &[Rect],
    tolerance: f64,
) -> Vec<EqualSpacingGroup> {
    let mut groups = detect_axis(dragged, nearby, Axis::X, tolerance);
    groups.extend(detect_axis(dragged, nearby, Axis::Y, tolerance));
    groups.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    groups.truncate(MAX_GROUPS);
    groups
}

/// Reposition objects so the gaps along the axis are exactly equal,
/// keeping the first and last members fixed. Fewer than three objects
/// come back unchanged.
pub fn distribute_objects(axis: Axis, rects: &[Rect]) -> Vec<Rect> {
    if rects.len() < 3 {
        return rects.to_vec();
    }
    let mut sorted = rects.to_vec();
    sorted.sort_by(|a, b| span(*a, axis).0.total_cmp(&span(*b, axis).0));

    let total_extent: f64 = sorted.iter().map(|r| span(*r, axis).1 - span(*r, axis).0).sum();
    let start = span(sorted[0], axis).0;
    let end = span(*sorted.last().expect("non-empty"), axis).1;
    let gap = (end - start - total_extent) / (sorted.len() - 1) as f64;

    let mut cursor = start;
    sorted
        .iter()
        .map(|&rect| {
            let extent = span(rect, axis).1 - span(rect, axis).0;
            let moved = match axis {
                Axis::X => Rect::new(cursor, rect.y0, cursor + extent, rect.y1),
                Axis::Y => Rect::new(rect.x0, cursor, rect.x1, cursor + extent),
            };
            cursor += extent + gap;
            moved
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(xs: &[f64], width: f64) -> Vec<Rect> {
        xs.iter()
            .map(|&x| Rect::new(x, 0.0, x + width, 40.0))
            .collect()
    }

    #[test]
    fn test_uniform_gaps_full_confidence() {
        assert_eq!(spacing_confidence(&[20.0, 20.0, 20.0], 2.0), 1.0);
    }

    #[test]
    fn test_uneven_gaps_rejected() {
        // Gaps [20, 24, 16], tolerance 2: worst deviation 4 kills it.
        assert_eq!(spacing_confidence(&[20.0, 24.0, 16.0], 2.0), 0.0);
    }

    #[test]
    fn test_single_gap_has_no_confidence() {
        assert_eq!(spacing_confidence(&[20.0], 2.0), 0.0);
        assert_eq!(spacing_confidence(&[], 2.0), 0.0);
    }

    #[test]
    fn test_detects_even_row() {
        // Three 40-wide objects spaced exactly 20 apart on x.
        let nearby = row(&[0.0, 60.0, 120.0], 40.0);
        let dragged = Rect::new(500.0, 500.0, 540.0, 540.0);

        let groups = detect_equal_spacing(dragged, &nearby, 2.0);
        let group = groups
            .iter()
            .find(|g| g.axis == Axis::X)
            .expect("expected an x-axis group");
        assert_eq!(group.objects.len(), 3);
        assert_eq!(group.gap, 20.0);
        assert_eq!(group.start_pos, 0.0);
        assert_eq!(group.end_pos, 160.0);
        assert_eq!(group.confidence, 1.0);
    }

    #[test]
    fn test_runs_sharing_a_member_both_detected() {
        // Gaps 20,20,20 then 100,100,100: the member at 90 belongs to
        // both runs, so the gap-100 run must start there, not after it.
        let nearby = row(&[0.0, 30.0, 60.0, 90.0, 200.0, 310.0, 420.0], 10.0);
        let dragged = Rect::new(900.0, 900.0, 910.0, 910.0);

        let groups = detect_equal_spacing(dragged, &nearby, 2.0);
        let narrow = groups
            .iter()
            .find(|g| g.gap == 20.0)
            .expect("expected the gap-20 run");
        assert_eq!(narrow.objects.len(), 4);
        assert_eq!(narrow.start_pos, 0.0);

        let wide = groups
            .iter()
            .find(|g| g.gap == 100.0)
            .expect("expected the gap-100 run");
        assert_eq!(wide.objects.len(), 4);
        assert_eq!(wide.start_pos, 90.0);
        assert_eq!(wide.end_pos, 430.0);
    }

    #[test]
    fn test_uneven_row_not_detected() {
        let nearby = row(&[0.0, 60.0, 130.0], 40.0); // gaps 20, 30
        let dragged = Rect::new(500.0, 500.0, 540.0, 540.0);

        let groups = detect_equal_spacing(dragged, &nearby, 2.0);
        assert!(groups.iter().all(|g| g.axis != Axis::X));
    }

    #[test]
    fn test_insertion_boosts_confidence() {
        // A slightly uneven row, then the dragged object sits one gap
        // beyond the last member.
        let nearby = row(&[0.0, 60.4, 120.0], 40.0); // gaps 20.4, 19.6
        let base = spacing_confidence(&[20.4, 19.6], 2.0);
        assert!(base > ACCEPTANCE_THRESHOLD && base < 1.0);

        let far = Rect::new(500.0, 500.0, 540.0, 540.0);
        let adjacent = Rect::new(180.0, 0.0, 220.0, 40.0); // gap 20 after end

        let plain = detect_equal_spacing(far, &nearby, 2.0);
        let boosted = detect_equal_spacing(adjacent, &nearby, 2.0);
        assert!(boosted[0].confidence > plain[0].confidence);
        assert!(boosted[0].confidence <= 1.0);
    }

    #[test]
    fn test_insertion_between_members() {
        // Members at 0 and 120 with a hole where the dragged object
        // sits; flanking members keep their own sequence valid.
        let nearby = row(&[0.0, 60.0, 120.0, 180.0], 40.0);
        let group = EqualSpacingGroup {
            objects: nearby.clone(),
            axis: Axis::X,
            gap: 20.0,
            start_pos: 0.0,
            end_pos: 220.0,
            confidence: 1.0,
        };
        let between = Rect::new(240.0, 0.0, 280.0, 40.0);
        assert!(dragged_extends(&group, between, 2.0));

        let misaligned = Rect::new(250.0, 0.0, 290.0, 40.0);
        assert!(!dragged_extends(&group, misaligned, 2.0));
    }

    #[test]
    fn test_group_cap() {
        // Even rows on both axes in multiple clusters.
        let mut nearby = row(&[0.0, 60.0, 120.0], 40.0);
        nearby.extend(row(&[400.0, 460.0, 520.0], 40.0));
        nearby.extend(
            [0.0, 60.0, 120.0]
                .iter()
                .map(|&y| Rect::new(800.0, y, 840.0, y + 40.0)),
        );
        nearby.extend(
            [300.0, 360.0, 420.0]
                .iter()
                .map(|&y| Rect::new(900.0, y, 940.0, y + 40.0)),
        );
        let dragged = Rect::new(2000.0, 2000.0, 2040.0, 2040.0);

        let groups = detect_equal_spacing(dragged, &nearby, 2.0);
        assert!(groups.len() <= MAX_GROUPS);
    }

    #[test]
    fn test_distribute_evens_out_gaps() {
        let rects = vec![
            Rect::new(0.0, 0.0, 40.0, 40.0),
            Rect::new(50.0, 0.0, 90.0, 40.0),
            Rect::new(160.0, 0.0, 200.0, 40.0),
        ];
        let out = distribute_objects(Axis::X, &rects);
        assert_eq!(out[0].x0, 0.0);
        assert_eq!(out[2].x1, 200.0);
        let gap_a = out[1].x0 - out[0].x1;
        let gap_b = out[2].x0 - out[1].x1;
        assert!((gap_a - gap_b).abs() < 1e-9);
        assert!((gap_a - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_distribute_small_input_unchanged() {
        let rects = vec![
            Rect::new(0.0, 0.0, 40.0, 40.0),
            Rect::new(50.0, 0.0, 90.0, 40.0),
        ];
        assert_eq!(distribute_objects(Axis::X, &rects).len(), 2);
        assert_eq!(distribute_objects(Axis::X, &rects)[1].x0, 50.0);
    }
}
