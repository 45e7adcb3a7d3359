//! Scene query interface consumed by the snapping engine.

use kurbo::{Rect, Size};

/// Tolerance for matching the dragged object by bounds equality.
pub const BOUNDS_MATCH_TOLERANCE: f64 = 2.0;

/// Snapshot of a drawable object as seen by the snapping engine.
#[derive(Debug, Clone, Copy)]
pub struct SceneObject {
    /// Object bounds in canvas-local space; `None` if they cannot be read.
    pub bounds: Option<Rect>,
    /// Whether the object is currently visible.
    pub visible: bool,
    /// Whether the object is itself a guide/overlay node.
    pub is_guide: bool,
}

impl SceneObject {
    /// Create a visible, non-guide object.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds: Some(bounds),
            visible: true,
            is_guide: false,
        }
    }

    /// Create a guide/overlay node (ignored by candidate collection).
    pub fn guide(bounds: Rect) -> Self {
        Self {
            bounds: Some(bounds),
            visible: true,
            is_guide: true,
        }
    }
}

/// Read-only access to the scene graph.
///
/// Passed in at construction so the engine carries no implicit global
/// dependency on a document registry.
pub trait SceneQuery {
    /// All objects currently in the scene, visible or not.
    fn visible_objects(&self) -> Vec<SceneObject>;

    /// Logical canvas dimensions.
    fn canvas_size(&self) -> Size;
}

/// Field-wise rectangle equality within a tolerance.
pub fn bounds_approx_eq(a: Rect, b: Rect, tolerance: f64) -> bool {
    (a.x0 - b.x0).abs() <= tolerance
        && (a.y0 - b.y0).abs() <= tolerance
        && (a.x1 - b.x1).abs() <= tolerance
        && (a.y1 - b.y1).abs() <= tolerance
}

/// Collect the bounds the engine may snap or align to: visible, non-guide
/// objects with readable bounds, minus anything in the exclusion list.
pub fn snappable_bounds(scene: &dyn SceneQuery, exclude: &[Rect]) -> Vec<Rect> {
    scene
        .visible_objects()
        .into_iter()
        .filter(|o| o.visible && !o.is_guide)
        .filter_map(|o| o.bounds)
        .filter(|b| {
            !exclude
                .iter()
                .any(|e| bounds_approx_eq(*b, *e, BOUNDS_MATCH_TOLERANCE))
        })
        .collect()
}

/// Fixed in-memory scene, used for tests and headless sessions.
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    objects: Vec<SceneObject>,
    size: Size,
}

impl StaticScene {
    /// Create an empty scene with the given canvas size.
    pub fn new(size: Size) -> Self {
        Self {
            objects: Vec::new(),
            size,
        }
    }

    /// Add an object to the scene.
    pub fn push(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Add a plain visible rectangle to the scene.
    pub fn push_rect(&mut self, bounds: Rect) {
        self.objects.push(SceneObject::new(bounds));
    }
}

impl SceneQuery for StaticScene {
    fn visible_objects(&self) -> Vec<SceneObject> {
        self.objects.clone()
    }

    fn canvas_size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_approx_eq() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(1.5, 0.0, 11.0, 10.0);
        let c = Rect::new(3.0, 0.0, 10.0, 10.0);
        assert!(bounds_approx_eq(a, b, BOUNDS_MATCH_TOLERANCE));
        assert!(!bounds_approx_eq(a, c, BOUNDS_MATCH_TOLERANCE));
    }

    #[test]
    fn test_snappable_bounds_filters() {
        let mut scene = StaticScene::new(Size::new(800.0, 600.0));
        scene.push_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.push(SceneObject::guide(Rect::new(20.0, 0.0, 30.0, 10.0)));
        scene.push(SceneObject {
            bounds: Some(Rect::new(40.0, 0.0, 50.0, 10.0)),
            visible: false,
            is_guide: false,
        });
        scene.push(SceneObject {
            bounds: None,
            visible: true,
            is_guide: false,
        });
        scene.push_rect(Rect::new(60.0, 0.0, 70.0, 10.0));

        let dragged = Rect::new(60.5, 0.0, 70.5, 10.0);
        let bounds = snappable_bounds(&scene, &[dragged]);
        // Guide, hidden, unreadable, and the dragged object are all skipped.
        assert_eq!(bounds, vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
    }
}
