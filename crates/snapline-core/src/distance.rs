//! Distance measurement between the dragged object and its neighbors.

use kurbo::Rect;

/// Which axis the measured gap runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapDirection {
    Horizontal,
    Vertical,
}

/// A gap measurement ready for labelling.
#[derive(Debug, Clone)]
pub struct DistanceLabel {
    /// Label anchor, midway between the two object centers.
    pub x: f64,
    pub y: f64,
    /// Gap size in canvas units, always positive.
    pub distance: f64,
    pub from_rect: Rect,
    pub to_rect: Rect,
    pub direction: GapDirection,
}

fn ranges_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 < b1 && b0 < a1
}

/// Horizontal gap between two rects whose vertical extents overlap,
/// or None when they touch or intersect on that axis.
fn horizontal_gap(a: Rect, b: Rect) -> Option<f64> {
    let gap = if a.x1 <= b.x0 {
        b.x0 - a.x1
    } else if b.x1 <= a.x0 {
        a.x0 - b.x1
    } else {
        return None;
    };
    (gap > 0.0).then_some(gap)
}

fn vertical_gap(a: Rect, b: Rect) -> Option<f64> {
    let gap = if a.y1 <= b.y0 {
        b.y0 - a.y1
    } else if b.y1 <= a.y0 {
        a.y0 - b.y1
    } else {
        return None;
    };
    (gap > 0.0).then_some(gap)
}

/// Measure the gaps between the dragged object and each nearby object.
///
/// A pair qualifies only when the objects overlap on the perpendicular
/// axis and are disjoint along the measured one. Results come back
/// nearest first, truncated to `max_labels`.
pub fn measure_distances(dragged: Rect, nearby: &[Rect], max_labels: usize) -> Vec<DistanceLabel> {
    let mut labels = Vec::new();

    for &other in nearby {
        if ranges_overlap(dragged.y0, dragged.y1, other.y0, other.y1) {
            if let Some(gap) = horizontal_gap(dragged, other) {
                let mid = dragged.center().midpoint(other.center());
                labels.push(DistanceLabel {
                    x: mid.x,
                    y: mid.y,
                    distance: gap,
                    from_rect: dragged,
                    to_rect: other,
                    direction: GapDirection::Horizontal,
                });
            }
        }
        if ranges_overlap(dragged.x0, dragged.x1, other.x0, other.x1) {
            if let Some(gap) = vertical_gap(dragged, other) {
                let mid = dragged.center().midpoint(other.center());
                labels.push(DistanceLabel {
                    x: mid.x,
                    y: mid.y,
                    distance: gap,
                    from_rect: dragged,
                    to_rect: other,
                    direction: GapDirection::Vertical,
                });
            }
        }
    }

    labels.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    labels.truncate(max_labels);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_gap_measured() {
        let dragged = Rect::new(0.0, 0.0, 50.0, 50.0);
        let other = Rect::new(80.0, 10.0, 130.0, 60.0);

        let labels = measure_distances(dragged, &[other], 8);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].distance, 30.0);
        assert_eq!(labels[0].direction, GapDirection::Horizontal);
        // Anchor midway between centers (25, 25) and (105, 35).
        assert_eq!(labels[0].x, 65.0);
        assert_eq!(labels[0].y, 30.0);
    }

    #[test]
    fn test_no_perpendicular_overlap_is_skipped() {
        let dragged = Rect::new(0.0, 0.0, 50.0, 50.0);
        // Diagonal neighbor: overlaps on neither axis.
        let other = Rect::new(80.0, 80.0, 130.0, 130.0);

        assert!(measure_distances(dragged, &[other], 8).is_empty());
    }

    #[test]
    fn test_intersecting_pair_is_skipped() {
        let dragged = Rect::new(0.0, 0.0, 50.0, 50.0);
        let other = Rect::new(40.0, 10.0, 90.0, 60.0);

        assert!(measure_distances(dragged, &[other], 8).is_empty());
    }

    #[test]
    fn test_touching_edges_produce_no_label() {
        let dragged = Rect::new(0.0, 0.0, 50.0, 50.0);
        let other = Rect::new(50.0, 0.0, 100.0, 50.0);

        assert!(measure_distances(dragged, &[other], 8).is_empty());
    }

    #[test]
    fn test_sorted_and_truncated() {
        let dragged = Rect::new(0.0, 0.0, 50.0, 50.0);
        let nearby = [
            Rect::new(120.0, 0.0, 170.0, 50.0), // gap 70
            Rect::new(60.0, 0.0, 110.0, 50.0),  // gap 10
            Rect::new(90.0, 0.0, 140.0, 50.0),  // gap 40
        ];

        let labels = measure_distances(dragged, &nearby, 2);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].distance, 10.0);
        assert_eq!(labels[1].distance, 40.0);
    }

    #[test]
    fn test_vertical_gap_measured() {
        let dragged = Rect::new(0.0, 0.0, 50.0, 50.0);
        let other = Rect::new(10.0, 75.0, 60.0, 125.0);

        let labels = measure_distances(dragged, &[other], 8);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].distance, 25.0);
        assert_eq!(labels[0].direction, GapDirection::Vertical);
    }
}
