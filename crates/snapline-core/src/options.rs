//! UI-facing option descriptors derived from the current preferences.
//!
//! Hosts render these into whatever settings surface they have; the
//! `id` field round-trips through [`apply_option`] when the user
//! changes a value.

use serde::{Deserialize, Serialize};

use crate::preferences::{DistanceUnit, GridStyle, ReferenceMode, SnapPreferences, Theme};

/// One user-facing control in the snapping settings menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionControl {
    Toggle {
        id: String,
        label: String,
        value: bool,
    },
    Slider {
        id: String,
        label: String,
        value: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    Dropdown {
        id: String,
        label: String,
        choices: Vec<String>,
        selected: usize,
    },
    Swatch {
        id: String,
        label: String,
        color: [u8; 4],
    },
}

fn toggle(id: &str, label: &str, value: bool) -> OptionControl {
    OptionControl::Toggle {
        id: id.to_string(),
        label: label.to_string(),
        value,
    }
}

/// Build the settings-menu controls for the given preferences.
pub fn preference_controls(prefs: &SnapPreferences) -> Vec<OptionControl> {
    vec![
        toggle("smart_guides", "Smart guides", prefs.smart_guides),
        toggle("magnetic_snapping", "Magnetic snapping", prefs.magnetic_snapping),
        toggle("enable_midpoints", "Midpoint candidates", prefs.enable_midpoints),
        toggle("enable_quadrants", "Canvas quadrants", prefs.enable_quadrants),
        toggle("enable_resize_guides", "Guides while resizing", prefs.enable_resize_guides),
        toggle("center_bias_enabled", "Easier centering", prefs.center_bias_enabled),
        toggle("show_grid", "Show grid", prefs.show_grid),
        OptionControl::Slider {
            id: "snap_threshold".to_string(),
            label: "Snap distance".to_string(),
            value: prefs.snap_threshold,
            min: 1.0,
            max: 32.0,
            step: 1.0,
        },
        OptionControl::Slider {
            id: "grid_spacing".to_string(),
            label: "Grid spacing".to_string(),
            value: prefs.grid_spacing,
            min: 4.0,
            max: 200.0,
            step: 1.0,
        },
        OptionControl::Dropdown {
            id: "reference_mode".to_string(),
            label: "Snap relative to".to_string(),
            choices: vec!["Canvas".to_string(), "Objects".to_string(), "Grid".to_string()],
            selected: match prefs.reference_mode {
                ReferenceMode::Canvas => 0,
                ReferenceMode::Object => 1,
                ReferenceMode::Grid => 2,
            },
        },
        OptionControl::Dropdown {
            id: "grid_style".to_string(),
            label: "Grid style".to_string(),
            choices: vec!["Dots".to_string(), "Lines".to_string(), "Hybrid".to_string()],
            selected: match prefs.grid_style {
                GridStyle::Dots => 0,
                GridStyle::Lines => 1,
                GridStyle::Hybrid => 2,
            },
        },
        OptionControl::Dropdown {
            id: "theme".to_string(),
            label: "Guide theme".to_string(),
            choices: vec!["Light".to_string(), "Dark".to_string(), "Auto".to_string()],
            selected: match prefs.theme {
                Theme::Light => 0,
                Theme::Dark => 1,
                Theme::Auto => 2,
            },
        },
        OptionControl::Dropdown {
            id: "distance_unit".to_string(),
            label: "Distance unit".to_string(),
            choices: vec!["Pixels".to_string(), "Centimeters".to_string()],
            selected: match prefs.distance_unit {
                DistanceUnit::Px => 0,
                DistanceUnit::Cm => 1,
            },
        },
        OptionControl::Swatch {
            id: "guide_color".to_string(),
            label: "Guide color".to_string(),
            color: prefs.guide_color,
        },
    ]
}

/// The value side of a control change coming back from the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Index(usize),
    Color([u8; 4]),
}

/// Apply a single control change to the preferences. Unknown ids and
/// mismatched value kinds are ignored.
pub fn apply_option(prefs: &mut SnapPreferences, id: &str, value: OptionValue) {
    match (id, value) {
        ("smart_guides", OptionValue::Bool(v)) => prefs.smart_guides = v,
        ("magnetic_snapping", OptionValue::Bool(v)) => prefs.magnetic_snapping = v,
        ("enable_midpoints", OptionValue::Bool(v)) => prefs.enable_midpoints = v,
        ("enable_quadrants", OptionValue::Bool(v)) => prefs.enable_quadrants = v,
        ("enable_resize_guides", OptionValue::Bool(v)) => prefs.enable_resize_guides = v,
        ("center_bias_enabled", OptionValue::Bool(v)) => prefs.center_bias_enabled = v,
        ("show_grid", OptionValue::Bool(v)) => prefs.show_grid = v,
        ("snap_threshold", OptionValue::Number(v)) => prefs.snap_threshold = v.max(0.0),
        ("grid_spacing", OptionValue::Number(v)) => prefs.grid_spacing = v.max(1.0),
        ("reference_mode", OptionValue::Index(i)) => {
            prefs.reference_mode = match i {
                1 => ReferenceMode::Object,
                2 => ReferenceMode::Grid,
                _ => ReferenceMode::Canvas,
            }
        }
        ("grid_style", OptionValue::Index(i)) => {
            prefs.grid_style = match i {
                0 => GridStyle::Dots,
                2 => GridStyle::Hybrid,
                _ => GridStyle::Lines,
            }
        }
        ("theme", OptionValue::Index(i)) => {
            prefs.theme = match i {
                0 => Theme::Light,
                1 => Theme::Dark,
                _ => Theme::Auto,
            }
        }
        ("distance_unit", OptionValue::Index(i)) => {
            prefs.distance_unit = if i == 1 { DistanceUnit::Cm } else { DistanceUnit::Px }
        }
        ("guide_color", OptionValue::Color(c)) => prefs.guide_color = c,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_reflect_preferences() {
        let mut prefs = SnapPreferences::default();
        prefs.smart_guides = false;
        prefs.reference_mode = ReferenceMode::Grid;

        let controls = preference_controls(&prefs);
        let smart = controls
            .iter()
            .find_map(|c| match c {
                OptionControl::Toggle { id, value, .. } if id == "smart_guides" => Some(*value),
                _ => None,
            })
            .expect("smart_guides control");
        assert!(!smart);

        let mode = controls
            .iter()
            .find_map(|c| match c {
                OptionControl::Dropdown { id, selected, .. } if id == "reference_mode" => {
                    Some(*selected)
                }
                _ => None,
            })
            .expect("reference_mode control");
        assert_eq!(mode, 2);
    }

    #[test]
    fn test_apply_roundtrip() {
        let mut prefs = SnapPreferences::default();
        apply_option(&mut prefs, "snap_threshold", OptionValue::Number(12.0));
        apply_option(&mut prefs, "reference_mode", OptionValue::Index(1));
        apply_option(&mut prefs, "guide_color", OptionValue::Color([10, 20, 30, 255]));

        assert_eq!(prefs.snap_threshold, 12.0);
        assert_eq!(prefs.reference_mode, ReferenceMode::Object);
        assert_eq!(prefs.guide_color, [10, 20, 30, 255]);
    }

    #[test]
    fn test_unknown_or_mismatched_is_ignored() {
        let mut prefs = SnapPreferences::default();
        let before = prefs.clone();
        apply_option(&mut prefs, "no_such_option", OptionValue::Bool(true));
        apply_option(&mut prefs, "snap_threshold", OptionValue::Bool(true));
        assert_eq!(prefs, before);
    }

    #[test]
    fn test_controls_serialize() {
        let controls = preference_controls(&SnapPreferences::default());
        let json = serde_json::to_string(&controls).expect("serializable");
        assert!(json.contains("\"kind\":\"toggle\""));
        assert!(json.contains("\"kind\":\"dropdown\""));
    }
}
