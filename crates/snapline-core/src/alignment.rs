//! Alignment guide detection for the object being manipulated.

use crate::preferences::ReferenceMode;
use kurbo::{Rect, Size};

/// Widened threshold multiplier for canvas-axis tests.
const CANVAS_THRESHOLD_MULTIPLIER: f64 = 2.0;
/// A guide farther than this multiple of the threshold from every dragged
/// position is irrelevant and dropped.
const RELEVANCE_MULTIPLIER: f64 = 3.0;
/// Tighter relevance multiplier in pure object-reference mode.
const OBJECT_MODE_RELEVANCE_MULTIPLIER: f64 = 2.0;
/// Maximum guides surfaced per update.
const MAX_GUIDES: usize = 10;
/// Maximum guides in pure object-reference mode.
const MAX_GUIDES_OBJECT_MODE: usize = 5;
/// Fixed strength for canvas guides; object guides start at 2.
const CANVAS_GUIDE_STRENGTH: u32 = 1;

/// Guide line orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOrientation {
    Vertical,
    Horizontal,
}

/// What kind of positions the guide aligns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentType {
    Edge,
    Center,
}

/// Line style for drawing a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualStyle {
    Solid,
    Dashed,
}

/// What the guide is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideSource {
    ObjectEdge,
    ObjectCenter,
    CanvasEdge,
    CanvasCenter,
}

impl GuideSource {
    /// Object guides rank before canvas guides.
    pub fn is_object(self) -> bool {
        matches!(self, GuideSource::ObjectEdge | GuideSource::ObjectCenter)
    }
}

/// A renderable alignment guide. Created fresh each recomputation.
#[derive(Debug, Clone)]
pub struct AlignmentGuide {
    pub orientation: GuideOrientation,
    pub position: f64,
    pub alignment: AlignmentType,
    /// The aligned objects, dragged object included.
    pub objects: Vec<Rect>,
    pub strength: u32,
    pub source: GuideSource,
    pub visual_style: VisualStyle,
}

impl AlignmentGuide {
    /// Edge alignments draw solid, center alignments dashed.
    fn default_style(alignment: AlignmentType) -> VisualStyle {
        match alignment {
            AlignmentType::Edge => VisualStyle::Solid,
            AlignmentType::Center => VisualStyle::Dashed,
        }
    }
}

/// A tolerance-merged cluster of aligned positions.
struct Bucket {
    key: f64,
    alignment: AlignmentType,
    rects: Vec<Rect>,
}

/// The axis positions of one rectangle: (value, alignment kind).
fn axis_positions(rect: Rect, orientation: GuideOrientation) -> [(f64, AlignmentType); 3] {
    match orientation {
        GuideOrientation::Vertical => [
            (rect.x0, AlignmentType::Edge),
            (rect.center().x, AlignmentType::Center),
            (rect.x1, AlignmentType::Edge),
        ],
        GuideOrientation::Horizontal => [
            (rect.y0, AlignmentType::Edge),
            (rect.center().y, AlignmentType::Center),
            (rect.y1, AlignmentType::Edge),
        ],
    }
}

/// Group nearby-object positions into buckets: a value joins an existing
/// bucket of the same alignment kind when within threshold of its key.
fn bucket_positions(nearby: &[Rect], orientation: GuideOrientation, threshold: f64) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for &rect in nearby {
        for (value, alignment) in axis_positions(rect, orientation) {
            match buckets
                .iter_mut()
                .find(|b| b.alignment == alignment && (value - b.key).abs() <= threshold)
            {
                Some(bucket) => bucket.rects.push(rect),
                None => buckets.push(Bucket {
                    key: value,
                    alignment,
                    rects: vec![rect],
                }),
            }
        }
    }
    buckets
}

/// Detect the alignment guides relevant to the dragged object.
pub fn detect_alignment_guides(
    dragged: Rect,
    nearby: &[Rect],
    canvas: Size,
    mode: ReferenceMode,
    threshold: f64,
) -> Vec<AlignmentGuide> {
    let mut guides = Vec::new();

    for orientation in [GuideOrientation::Vertical, GuideOrientation::Horizontal] {
        let dragged_positions = axis_positions(dragged, orientation);

        for bucket in bucket_positions(nearby, orientation, threshold) {
            let matched = dragged_positions
                .iter()
                .any(|(value, _)| (value - bucket.key).abs() <= threshold);
            if !matched {
                continue;
            }
            let mut objects = bucket.rects;
            objects.push(dragged);
            guides.push(AlignmentGuide {
                orientation,
                position: bucket.key,
                alignment: bucket.alignment,
                strength: objects.len() as u32,
                source: match bucket.alignment {
                    AlignmentType::Edge => GuideSource::ObjectEdge,
                    AlignmentType::Center => GuideSource::ObjectCenter,
                },
                visual_style: AlignmentGuide::default_style(bucket.alignment),
                objects,
            });
        }

        if mode == ReferenceMode::Canvas {
            let extent = match orientation {
                GuideOrientation::Vertical => canvas.width,
                GuideOrientation::Horizontal => canvas.height,
            };
            let canvas_positions = [
                (0.0, AlignmentType::Edge, GuideSource::CanvasEdge),
                (extent, AlignmentType::Edge, GuideSource::CanvasEdge),
                (extent / 2.0, AlignmentType::Center, GuideSource::CanvasCenter),
            ];
            let canvas_threshold = threshold * CANVAS_THRESHOLD_MULTIPLIER;

            for (position, alignment, source) in canvas_positions {
                let matched = dragged_positions
                    .iter()
                    .any(|(value, _)| (value - position).abs() <= canvas_threshold);
                if !matched {
                    continue;
                }
                guides.push(AlignmentGuide {
                    orientation,
                    position,
                    alignment,
                    objects: vec![dragged],
                    strength: CANVAS_GUIDE_STRENGTH,
                    source,
                    visual_style: AlignmentGuide::default_style(alignment),
                });
            }
        }
    }

    let relevance = threshold
        * if mode == ReferenceMode::Object {
            OBJECT_MODE_RELEVANCE_MULTIPLIER
        } else {
            RELEVANCE_MULTIPLIER
        };
    guides.retain(|guide| {
        axis_positions(dragged, guide.orientation)
            .iter()
            .any(|(value, _)| (value - guide.position).abs() <= relevance)
    });

    // Object guides before canvas guides, then by descending strength.
    guides.sort_by(|a, b| {
        b.source
            .is_object()
            .cmp(&a.source.is_object())
            .then(b.strength.cmp(&a.strength))
    });

    let cap = if mode == ReferenceMode::Object {
        MAX_GUIDES_OBJECT_MODE
    } else {
        MAX_GUIDES
    };
    guides.truncate(cap);
    guides
}
