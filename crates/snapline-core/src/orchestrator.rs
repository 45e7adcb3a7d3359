//! Per-drag guide session: owns preferences, throttles recomputation,
//! and dispatches to the detectors and the attached surface.

use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use kurbo::{Point, Rect};
use log::warn;

use crate::alignment::{detect_alignment_guides, AlignmentGuide, AlignmentType};
use crate::candidates::{collect_candidates, CandidateResult, CollectOptions};
use crate::distance::measure_distances;
use crate::preferences::{PreferenceStore, ReferenceMode, SnapPreferences};
use crate::scene::{bounds_approx_eq, SceneQuery, BOUNDS_MATCH_TOLERANCE};
use crate::snapper::{snap_point, SnappedPoint};
use crate::spacing::detect_equal_spacing;
use crate::surface::{GridSettings, GuideSurface};

/// Accepted update rate, roughly one per frame at 60fps.
const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(16);

/// Keyboard modifier snapshot, fed in by the host on key transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A single modifier key, for hosts that deliver per-key transitions
/// instead of full snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl Modifiers {
    fn with_key(mut self, key: ModifierKey, pressed: bool) -> Self {
        match key {
            ModifierKey::Shift => self.shift = pressed,
            ModifierKey::Ctrl => self.ctrl = pressed,
            ModifierKey::Alt => self.alt = pressed,
            ModifierKey::Meta => self.meta = pressed,
        }
        self
    }
}

/// Ephemeral per-drag state, discarded on `stop_guides`.
#[derive(Debug)]
struct GuideState {
    dragged: Rect,
    nearby: Vec<Rect>,
    last_render: Option<Instant>,
    show_distance_labels: bool,
    active_guides: Vec<AlignmentGuide>,
    reference_mode: ReferenceMode,
    suppressed: bool,
}

/// Drives guide computation for one scene. Idle until `start_guides`,
/// active until `stop_guides`, one drag at a time.
pub struct GuideOrchestrator {
    prefs: SnapPreferences,
    scene: Box<dyn SceneQuery>,
    store: Box<dyn PreferenceStore>,
    surface: Option<Box<dyn GuideSurface>>,
    state: Option<GuideState>,
    modifiers: Modifiers,
    dark_mode: bool,
}

impl GuideOrchestrator {
    /// Load preferences from the store, falling back to defaults when
    /// nothing is saved yet or the stored blob is unreadable.
    pub fn new(scene: Box<dyn SceneQuery>, store: Box<dyn PreferenceStore>) -> Self {
        let prefs = match store.load() {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!("failed to load snap preferences, using defaults: {err}");
                SnapPreferences::default()
            }
        };
        Self {
            prefs,
            scene,
            store,
            surface: None,
            state: None,
            modifiers: Modifiers::default(),
            dark_mode: false,
        }
    }

    /// Attach the drawing surface guides are pushed into. Replacing an
    /// existing surface destroys the old one first.
    pub fn set_ui_layer(&mut self, surface: Box<dyn GuideSurface>) {
        if let Some(mut old) = self.surface.replace(surface) {
            old.destroy();
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn preferences(&self) -> &SnapPreferences {
        &self.prefs
    }

    /// Mutate preferences and persist the result. A failed save keeps
    /// the in-memory change and logs.
    pub fn update_preferences(&mut self, f: impl FnOnce(&mut SnapPreferences)) {
        f(&mut self.prefs);
        if let Err(err) = self.store.save(&self.prefs) {
            warn!("failed to persist snap preferences: {err}");
        }
    }

    /// Document-level dark-mode flag, used when the theme is Auto.
    pub fn set_dark_mode(&mut self, dark: bool) {
        self.dark_mode = dark;
    }

    /// Begin a drag session. `mode` overrides the preferred reference
    /// mode for this drag only.
    pub fn start_guides(&mut self, dragged: Rect, nearby: Vec<Rect>, mode: Option<ReferenceMode>) {
        let reference_mode = mode.unwrap_or(self.prefs.reference_mode);
        self.state = Some(GuideState {
            dragged,
            nearby,
            last_render: None,
            show_distance_labels: false,
            active_guides: Vec::new(),
            reference_mode,
            suppressed: false,
        });
        // First pass trusts the caller's nearby set; updates recompute it.
        self.redraw(dragged, false, false);
    }

    /// Pointer-move driver. Throttled; a no-op while idle or while
    /// snapping is suppressed by a modifier.
    pub fn update(&mut self, dragged: Rect) {
        let Some(state) = &self.state else {
            return;
        };
        if state.suppressed || !self.prefs.smart_guides {
            return;
        }
        if let Some(last) = state.last_render {
            if last.elapsed() < MIN_UPDATE_INTERVAL {
                return;
            }
        }
        self.redraw(dragged, false, true);
    }

    /// Resize variant: edge alignment only, no centers, no distance or
    /// spacing output. Gated on the resize-guides preference.
    pub fn update_resize_guides(&mut self, dragged: Rect) {
        if !self.prefs.enable_resize_guides {
            return;
        }
        let Some(state) = &self.state else {
            return;
        };
        if state.suppressed || !self.prefs.smart_guides {
            return;
        }
        if let Some(last) = state.last_render {
            if last.elapsed() < MIN_UPDATE_INTERVAL {
                return;
            }
        }
        self.redraw(dragged, true, true);
    }

    /// Recompute guides for the new dragged bounds, then clear and
    /// repaint the surface. Inert while the master toggle is off.
    fn redraw(&mut self, dragged: Rect, edges_only: bool, recompute_nearby: bool) {
        if !self.prefs.smart_guides {
            return;
        }
        let nearby = recompute_nearby.then(|| self.find_nearby_objects(dragged));
        let canvas = self.scene.canvas_size();

        let Some(state) = &mut self.state else {
            return;
        };
        state.dragged = dragged;
        if let Some(nearby) = nearby {
            state.nearby = nearby;
        }
        state.last_render = Some(Instant::now());

        let mut guides = detect_alignment_guides(
            dragged,
            &state.nearby,
            canvas,
            state.reference_mode,
            self.prefs.snap_threshold,
        );
        if edges_only {
            guides.retain(|g| g.alignment == AlignmentType::Edge);
        }
        state.active_guides = guides;

        let Some(surface) = &mut self.surface else {
            return;
        };
        surface.clear();

        match state.reference_mode {
            ReferenceMode::Canvas => {
                for guide in &state.active_guides {
                    surface.draw_alignment_guide(guide, canvas);
                }
                if !edges_only {
                    for group in
                        detect_equal_spacing(dragged, &state.nearby, self.prefs.equal_tolerance)
                    {
                        surface.draw_spacing_group(&group, self.prefs.distance_unit);
                    }
                    if state.show_distance_labels {
                        for label in measure_distances(
                            dragged,
                            &state.nearby,
                            self.prefs.max_distance_labels,
                        ) {
                            surface.draw_distance_label(&label, self.prefs.distance_unit);
                        }
                    }
                }
            }
            ReferenceMode::Object => {
                for guide in &state.active_guides {
                    surface.draw_alignment_guide(guide, canvas);
                }
            }
            ReferenceMode::Grid => {
                if self.prefs.show_grid {
                    let settings = GridSettings {
                        spacing: self.prefs.grid_spacing,
                        style: self.prefs.grid_style,
                        dark: self.prefs.theme.resolve(self.dark_mode),
                    };
                    surface.draw_grid(canvas, &settings);
                }
            }
        }
    }

    /// Snap a raw pointer point against the current scene. Honors the
    /// active drag's reference mode and suppression flag; outside a
    /// drag it uses the preferred mode over the whole scene.
    ///
    /// Callers must pass the dragged object's current bounds in
    /// `options.exclude`; the drag state's copy lags behind the pointer
    /// by up to one throttle interval, so it only serves as a fallback
    /// when the exclusion list is empty.
    pub fn snap_point(&self, point: Point, options: &CollectOptions) -> SnappedPoint {
        let (suspended, mode) = match &self.state {
            Some(state) => (state.suppressed, state.reference_mode),
            None => (false, self.prefs.reference_mode),
        };
        let mut options = options.clone();
        if options.exclude.is_empty() {
            if let Some(state) = &self.state {
                options.exclude.push(state.dragged);
            }
        }
        let candidates = self.collect(&options);
        let prefs = SnapPreferences {
            reference_mode: mode,
            ..self.prefs.clone()
        };
        snap_point(point, &candidates, &prefs, suspended)
    }

    fn collect(&self, options: &CollectOptions) -> CandidateResult {
        collect_candidates(self.scene.as_ref(), &self.prefs, options)
    }

    /// Per-key press transition; equivalent to a full modifier snapshot.
    pub fn handle_key_down(&mut self, key: ModifierKey) {
        self.set_modifiers(self.modifiers.with_key(key, true));
    }

    /// Per-key release transition.
    pub fn handle_key_up(&mut self, key: ModifierKey) {
        self.set_modifiers(self.modifiers.with_key(key, false));
    }

    /// Modifier snapshot from the host. Alt shows distance labels;
    /// Ctrl or Cmd suppresses guides and snapping while held.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
        let Some(state) = &mut self.state else {
            return;
        };
        state.show_distance_labels = modifiers.alt;
        let suppressed = modifiers.ctrl || modifiers.meta;
        let changed = state.suppressed != suppressed;
        state.suppressed = suppressed;

        if !changed {
            return;
        }
        if suppressed {
            if let Some(surface) = &mut self.surface {
                surface.clear();
            }
        } else {
            let dragged = state.dragged;
            state.last_render = None;
            self.redraw(dragged, false, true);
        }
    }

    pub fn set_show_distance_labels(&mut self, show: bool) {
        if let Some(state) = &mut self.state {
            state.show_distance_labels = show;
        }
    }

    /// End the drag session and clear drawn guides. Safe to call while
    /// already idle.
    pub fn stop_guides(&mut self) {
        self.state = None;
        if let Some(surface) = &mut self.surface {
            surface.clear();
        }
    }

    /// Tear down the drawing surface entirely.
    pub fn destroy(&mut self) {
        self.state = None;
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
    }

    /// Visible, non-guide objects near the dragged one, the dragged
    /// object itself excluded by approximate bounds equality. Scored by
    /// center distance weighted by size mismatch, closest first.
    pub fn find_nearby_objects(&self, dragged: Rect) -> Vec<Rect> {
        let center = dragged.center();
        let mut scored: Vec<(f64, Rect)> = self
            .scene
            .visible_objects()
            .into_iter()
            .filter(|o| o.visible && !o.is_guide)
            .filter_map(|o| o.bounds)
            .filter(|b| !bounds_approx_eq(*b, dragged, BOUNDS_MATCH_TOLERANCE))
            .filter_map(|b| {
                let distance = b.center().distance(center);
                if distance > self.prefs.nearby_radius {
                    return None;
                }
                let ratio = |a: f64, b: f64| {
                    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                    hi / lo.max(f64::EPSILON)
                };
                let size_penalty =
                    ratio(dragged.width(), b.width()).max(ratio(dragged.height(), b.height()));
                Some((distance * size_penalty, b))
            })
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(self.prefs.nearby_cap);
        scored.into_iter().map(|(_, b)| b).collect()
    }
}
