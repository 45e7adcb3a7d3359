//! Shared rendering types for the guide overlay.

use peniko::Color;

/// Line widths for guide strokes, in device-independent pixels.
pub const OBJECT_GUIDE_WIDTH: f64 = 1.5;
pub const CANVAS_GUIDE_WIDTH: f64 = 1.0;
/// Dash pattern for center-alignment guides.
pub const CENTER_DASHES: [f64; 2] = [6.0, 4.0];
/// Half-length of the perpendicular ticks on spacing baselines.
pub const SPACING_TICK: f64 = 6.0;

/// Colors for the guide overlay, resolved per light/dark theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideTheme {
    /// Base guide tint; alpha is derived from guide strength at draw time.
    pub guide: [u8; 3],
    pub label_text: Color,
    pub label_background: Color,
    pub grid: Color,
    pub grid_major: Color,
}

impl GuideTheme {
    pub fn light() -> Self {
        Self {
            guide: [236, 72, 153], // Pink-500
            label_text: Color::from_rgba8(30, 30, 30, 255),
            label_background: Color::from_rgba8(255, 255, 255, 225),
            grid: Color::from_rgba8(160, 160, 160, 70),
            grid_major: Color::from_rgba8(140, 140, 140, 110),
        }
    }

    pub fn dark() -> Self {
        Self {
            guide: [244, 114, 182], // Pink-400 reads better on dark
            label_text: Color::from_rgba8(235, 235, 235, 255),
            label_background: Color::from_rgba8(40, 40, 40, 225),
            grid: Color::from_rgba8(110, 110, 110, 70),
            grid_major: Color::from_rgba8(140, 140, 140, 110),
        }
    }

    pub fn resolve(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    pub fn with_guide_color(mut self, rgba: [u8; 4]) -> Self {
        self.guide = [rgba[0], rgba[1], rgba[2]];
        self
    }

    /// Guide color with alpha scaled by strength, stronger guides more
    /// opaque, capped so stacked guides never go fully solid.
    pub fn guide_color(&self, strength: u32) -> Color {
        let alpha = (0.35 + 0.12 * strength as f64).min(0.85);
        let [r, g, b] = self.guide;
        Color::from_rgba8(r, g, b, (alpha * 255.0) as u8)
    }
}

impl Default for GuideTheme {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_scales_with_strength_and_caps() {
        let theme = GuideTheme::light();
        let weak = theme.guide_color(1);
        let strong = theme.guide_color(3);
        let max = theme.guide_color(20);

        assert!(strong.components[3] > weak.components[3]);
        assert_eq!(max.components[3], theme.guide_color(50).components[3]);
    }

    #[test]
    fn test_custom_guide_color_applied() {
        let theme = GuideTheme::light().with_guide_color([10, 20, 30, 255]);
        assert_eq!(theme.guide, [10, 20, 30]);
    }
}
