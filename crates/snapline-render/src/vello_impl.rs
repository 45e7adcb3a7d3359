//! Vello-based guide overlay renderer.

use crate::renderer::{
    GuideTheme, CANVAS_GUIDE_WIDTH, CENTER_DASHES, OBJECT_GUIDE_WIDTH, SPACING_TICK,
};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Fill};
use snapline_core::alignment::{AlignmentGuide, GuideOrientation, VisualStyle};
use snapline_core::distance::DistanceLabel;
use snapline_core::preferences::{DistanceUnit, GridStyle};
use snapline_core::spacing::{Axis, EqualSpacingGroup};
use snapline_core::surface::{GridSettings, GuideSurface};
use vello::Scene;

const LABEL_FONT_SIZE: f32 = 11.0;
const LABEL_PADDING_X: f64 = 4.0;
const LABEL_PADDING_Y: f64 = 2.0;
const LABEL_CORNER_RADIUS: f64 = 3.0;
/// Hybrid grids draw a full line every this many spacings.
const HYBRID_MAJOR_EVERY: usize = 5;

/// Guide overlay built on Vello scenes.
///
/// Keeps separate scenes for guide lines, the grid, and text labels so
/// the host can composite them in a fixed order. Scenes are created
/// lazily on first draw; `clear` resets them, `destroy` drops them.
pub struct VelloGuideRenderer {
    guide_scene: Option<Scene>,
    grid_scene: Option<Scene>,
    label_scene: Option<Scene>,
    /// Font context cached to avoid re-enumerating system fonts per frame.
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
    theme: GuideTheme,
}

impl VelloGuideRenderer {
    pub fn new(theme: GuideTheme) -> Self {
        Self {
            guide_scene: None,
            grid_scene: None,
            label_scene: None,
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            theme,
        }
    }

    pub fn theme(&self) -> &GuideTheme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: GuideTheme) {
        self.theme = theme;
    }

    /// Composite the overlay into the host scene: grid behind guides,
    /// labels on top.
    pub fn append_to(&self, target: &mut Scene) {
        if let Some(scene) = &self.grid_scene {
            target.append(scene, None);
        }
        if let Some(scene) = &self.guide_scene {
            target.append(scene, None);
        }
        if let Some(scene) = &self.label_scene {
            target.append(scene, None);
        }
    }

    /// Lay out and draw a short text label centered on `center`, with a
    /// padded rounded background behind it.
    fn draw_label(&mut self, text: &str, center: Point) {
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(LABEL_FONT_SIZE));
        builder.push_default(StyleProperty::Brush(Brush::Solid(self.theme.label_text)));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Generic(parley::GenericFamily::SansSerif),
        )));

        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let width = layout.width() as f64;
        let height = layout.height() as f64;
        let origin = Point::new(center.x - width / 2.0, center.y - height / 2.0);

        let scene = self.label_scene.get_or_insert_with(Scene::new);

        let background = Rect::new(origin.x, origin.y, origin.x + width, origin.y + height)
            .inflate(LABEL_PADDING_X, LABEL_PADDING_Y)
            .to_rounded_rect(LABEL_CORNER_RADIUS);
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            self.theme.label_background,
            None,
            &background,
        );

        let text_transform = Affine::translate((origin.x, origin.y));
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    scene
                        .draw_glyphs(font)
                        .brush(&Brush::Solid(self.theme.label_text))
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
    }
}

impl Default for VelloGuideRenderer {
    fn default() -> Self {
        Self::new(GuideTheme::light())
    }
}

impl GuideSurface for VelloGuideRenderer {
    fn clear(&mut self) {
        if let Some(scene) = &mut self.guide_scene {
            scene.reset();
        }
        if let Some(scene) = &mut self.grid_scene {
            scene.reset();
        }
        if let Some(scene) = &mut self.label_scene {
            scene.reset();
        }
    }

    fn draw_alignment_guide(&mut self, guide: &AlignmentGuide, canvas: Size) {
        let color = self.theme.guide_color(guide.strength);
        let width = if guide.source.is_object() {
            OBJECT_GUIDE_WIDTH
        } else {
            CANVAS_GUIDE_WIDTH
        };
        let stroke = match guide.visual_style {
            VisualStyle::Solid => Stroke::new(width),
            VisualStyle::Dashed => Stroke::new(width).with_dashes(0.0, CENTER_DASHES),
        };

        // Guides always span the full canvas extent.
        let mut path = BezPath::new();
        match guide.orientation {
            GuideOrientation::Vertical => {
                path.move_to(Point::new(guide.position, 0.0));
                path.line_to(Point::new(guide.position, canvas.height));
            }
            GuideOrientation::Horizontal => {
                path.move_to(Point::new(0.0, guide.position));
                path.line_to(Point::new(canvas.width, guide.position));
            }
        }
        let scene = self.guide_scene.get_or_insert_with(Scene::new);
        scene.stroke(&stroke, Affine::IDENTITY, color, None, &path);
    }

    fn draw_spacing_group(&mut self, group: &EqualSpacingGroup, unit: DistanceUnit) {
        if group.objects.len() < 2 {
            return;
        }
        let color = self.theme.guide_color(2);
        let stroke = Stroke::new(CANVAS_GUIDE_WIDTH);

        // Baseline sits on the average of the member centers on the
        // perpendicular axis.
        let baseline = match group.axis {
            Axis::X => {
                group.objects.iter().map(|r| r.center().y).sum::<f64>()
                    / group.objects.len() as f64
            }
            Axis::Y => {
                group.objects.iter().map(|r| r.center().x).sum::<f64>()
                    / group.objects.len() as f64
            }
        };

        let mut path = BezPath::new();
        let point_at = |pos: f64| match group.axis {
            Axis::X => Point::new(pos, baseline),
            Axis::Y => Point::new(baseline, pos),
        };
        path.move_to(point_at(group.start_pos));
        path.line_to(point_at(group.end_pos));

        let tick_at = |path: &mut BezPath, pos: f64| match group.axis {
            Axis::X => {
                path.move_to(Point::new(pos, baseline - SPACING_TICK));
                path.line_to(Point::new(pos, baseline + SPACING_TICK));
            }
            Axis::Y => {
                path.move_to(Point::new(baseline - SPACING_TICK, pos));
                path.line_to(Point::new(baseline + SPACING_TICK, pos));
            }
        };

        let mut gap_labels = Vec::new();
        for pair in group.objects.windows(2) {
            let (trailing, leading) = match group.axis {
                Axis::X => (pair[0].x1, pair[1].x0),
                Axis::Y => (pair[0].y1, pair[1].y0),
            };
            tick_at(&mut path, trailing);
            tick_at(&mut path, leading);

            let mid = (trailing + leading) / 2.0;
            let label_center = match group.axis {
                Axis::X => Point::new(mid, baseline - SPACING_TICK - 10.0),
                Axis::Y => Point::new(baseline + SPACING_TICK + 18.0, mid),
            };
            gap_labels.push((unit.format(leading - trailing), label_center));
        }

        let scene = self.guide_scene.get_or_insert_with(Scene::new);
        scene.stroke(&stroke, Affine::IDENTITY, color, None, &path);

        for (text, center) in gap_labels {
            self.draw_label(&text, center);
        }
    }

    fn draw_distance_label(&mut self, label: &DistanceLabel, unit: DistanceUnit) {
        self.draw_label(&unit.format(label.distance), Point::new(label.x, label.y));
    }

    fn draw_grid(&mut self, canvas: Size, settings: &GridSettings) {
        let spacing = settings.spacing;
        if spacing < 1.0 {
            return;
        }
        let theme = GuideTheme::resolve(settings.dark);
        let scene = self.grid_scene.get_or_insert_with(Scene::new);

        let line_path = |major_only: bool| {
            let mut path = BezPath::new();
            let step = if major_only {
                spacing * HYBRID_MAJOR_EVERY as f64
            } else {
                spacing
            };
            let mut x = 0.0;
            while x <= canvas.width {
                path.move_to(Point::new(x, 0.0));
                path.line_to(Point::new(x, canvas.height));
                x += step;
            }
            let mut y = 0.0;
            while y <= canvas.height {
                path.move_to(Point::new(0.0, y));
                path.line_to(Point::new(canvas.width, y));
                y += step;
            }
            path
        };

        // Dots batch into one fill path; squares are cheaper than ellipses.
        let dot_path = || {
            let dot_size = 1.5;
            let mut path = BezPath::new();
            let mut x = 0.0;
            while x <= canvas.width {
                let mut y = 0.0;
                while y <= canvas.height {
                    path.extend(
                        Rect::new(x - dot_size, y - dot_size, x + dot_size, y + dot_size)
                            .path_elements(0.1),
                    );
                    y += spacing;
                }
                x += spacing;
            }
            path
        };

        match settings.style {
            GridStyle::Lines => {
                scene.stroke(
                    &Stroke::new(0.5),
                    Affine::IDENTITY,
                    theme.grid,
                    None,
                    &line_path(false),
                );
            }
            GridStyle::Dots => {
                scene.fill(Fill::NonZero, Affine::IDENTITY, theme.grid, None, &dot_path());
            }
            GridStyle::Hybrid => {
                scene.fill(Fill::NonZero, Affine::IDENTITY, theme.grid, None, &dot_path());
                scene.stroke(
                    &Stroke::new(0.5),
                    Affine::IDENTITY,
                    theme.grid_major,
                    None,
                    &line_path(true),
                );
            }
        }
    }

    fn destroy(&mut self) {
        self.guide_scene = None;
        self.grid_scene = None;
        self.label_scene = None;
    }
}
