//! Snap preferences and their persistence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default snap threshold in canvas pixels.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 8.0;
/// Default equal-spacing tolerance in canvas pixels.
pub const DEFAULT_EQUAL_TOLERANCE: f64 = 2.0;
/// Default tolerance multiplier for center-type candidates.
pub const DEFAULT_CENTER_BIAS: f64 = 2.4;
/// Default grid spacing in canvas pixels.
pub const DEFAULT_GRID_SPACING: f64 = 20.0;
/// Default radius for nearby-object discovery.
pub const DEFAULT_NEARBY_RADIUS: f64 = 300.0;
/// Default cap on nearby objects considered per update.
pub const DEFAULT_NEARBY_CAP: usize = 12;
/// Default cap on distance labels per update.
pub const DEFAULT_MAX_DISTANCE_LABELS: usize = 8;

/// Frame of reference guides and snapping are computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    /// Canvas edges/center/quadrants plus sibling objects.
    #[default]
    Canvas,
    /// Sibling objects only.
    Object,
    /// Grid multiples only.
    Grid,
}

impl ReferenceMode {
    /// Get display name for this reference mode.
    pub fn name(self) -> &'static str {
        match self {
            ReferenceMode::Canvas => "Canvas",
            ReferenceMode::Object => "Object",
            ReferenceMode::Grid => "Grid",
        }
    }
}

/// Grid overlay display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// Dots at grid intersections.
    Dots,
    /// Full grid lines.
    #[default]
    Lines,
    /// Dots at every intersection plus lines at major intervals.
    Hybrid,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::Dots => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Hybrid,
            GridStyle::Hybrid => GridStyle::Dots,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::Dots => "Dots",
            GridStyle::Lines => "Lines",
            GridStyle::Hybrid => "Hybrid",
        }
    }
}

/// Guide color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the document-level dark-mode flag.
    #[default]
    Auto,
}

impl Theme {
    /// Resolve to a concrete dark flag given the document-level dark-mode state.
    pub fn resolve(self, document_dark: bool) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::Auto => document_dark,
        }
    }

    /// Get display name for this theme.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Auto => "Auto",
        }
    }
}

/// CSS reference pixel density used for unit conversion.
const PX_PER_CM: f64 = 96.0 / 2.54;

/// Display unit for distance labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Px,
    Cm,
}

impl DistanceUnit {
    /// Format a pixel distance for display in this unit.
    pub fn format(self, distance: f64) -> String {
        match self {
            DistanceUnit::Px => format!("{}", distance.round() as i64),
            DistanceUnit::Cm => format!("{:.1} cm", distance / PX_PER_CM),
        }
    }

    /// Get display name for this unit.
    pub fn name(self) -> &'static str {
        match self {
            DistanceUnit::Px => "px",
            DistanceUnit::Cm => "cm",
        }
    }
}

/// Long-lived snapping configuration.
///
/// Loaded once at orchestrator initialization and written back on every
/// mutation. Every field has a default so partial or legacy stored JSON
/// merges cleanly instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapPreferences {
    /// Master toggle for the whole smart-guide engine.
    pub smart_guides: bool,
    /// Base matching threshold for alignment guides, in canvas pixels.
    pub snap_threshold: f64,
    /// Gap-uniformity tolerance for equal-spacing detection.
    pub equal_tolerance: f64,
    /// Tolerance multiplier for center-type snap candidates.
    pub center_bias: f64,
    /// Whether the center bias multiplier is applied.
    pub center_bias_enabled: bool,
    /// Synthesize midpoint candidates between object centers.
    pub enable_midpoints: bool,
    /// Emit canvas quadrant lines at 25%/75%.
    pub enable_quadrants: bool,
    /// Show alignment guides while resizing.
    pub enable_resize_guides: bool,
    /// Frame of reference for guides and snapping.
    pub reference_mode: ReferenceMode,
    /// Grid cell size in canvas pixels.
    pub grid_spacing: f64,
    /// Grid overlay display style.
    pub grid_style: GridStyle,
    /// Whether the grid overlay is drawn in grid reference mode.
    pub show_grid: bool,
    /// Guide color theme.
    pub theme: Theme,
    /// Widen tolerances so the pointer sticks to nearby candidates.
    pub magnetic_snapping: bool,
    /// Display unit for distance labels.
    pub distance_unit: DistanceUnit,
    /// Accent color for guide lines, RGBA.
    pub guide_color: [u8; 4],
    /// Cap on distance labels per update.
    pub max_distance_labels: usize,
    /// Radius for nearby-object discovery, in canvas pixels.
    pub nearby_radius: f64,
    /// Cap on nearby objects considered per update.
    pub nearby_cap: usize,
}

impl Default for SnapPreferences {
    fn default() -> Self {
        Self {
            smart_guides: true,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            equal_tolerance: DEFAULT_EQUAL_TOLERANCE,
            center_bias: DEFAULT_CENTER_BIAS,
            center_bias_enabled: true,
            enable_midpoints: true,
            enable_quadrants: false,
            enable_resize_guides: true,
            reference_mode: ReferenceMode::default(),
            grid_spacing: DEFAULT_GRID_SPACING,
            grid_style: GridStyle::default(),
            show_grid: true,
            theme: Theme::default(),
            magnetic_snapping: true,
            distance_unit: DistanceUnit::default(),
            guide_color: [236, 72, 153, 255],
            max_distance_labels: DEFAULT_MAX_DISTANCE_LABELS,
            nearby_radius: DEFAULT_NEARBY_RADIUS,
            nearby_cap: DEFAULT_NEARBY_CAP,
        }
    }
}

/// Preference persistence errors.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preferences not found")]
    NotFound,
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for preference store operations.
pub type PreferenceResult<T> = Result<T, PreferenceError>;

/// Trait for preference persistence backends.
///
/// Backends are string/JSON based; missing fields in stored data fall back
/// to defaults during deserialization rather than failing.
pub trait PreferenceStore {
    /// Load stored preferences.
    fn load(&self) -> PreferenceResult<SnapPreferences>;

    /// Persist preferences.
    fn save(&self, prefs: &SnapPreferences) -> PreferenceResult<()>;
}

/// Parse stored preference JSON, tolerating missing fields.
fn parse_preferences(json: &str) -> PreferenceResult<SnapPreferences> {
    serde_json::from_str(json).map_err(|e| PreferenceError::Serialization(e.to_string()))
}

/// In-memory preference store, used for tests and headless sessions.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    stored: std::sync::Mutex<Option<String>>,
}

impl MemoryPreferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with raw JSON (for legacy-format tests).
    pub fn with_json(json: &str) -> Self {
        Self {
            stored: std::sync::Mutex::new(Some(json.to_string())),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> PreferenceResult<SnapPreferences> {
        let stored = self.stored.lock().expect("preference store poisoned");
        match stored.as_deref() {
            Some(json) => parse_preferences(json),
            None => Err(PreferenceError::NotFound),
        }
    }

    fn save(&self, prefs: &SnapPreferences) -> PreferenceResult<()> {
        let json = serde_json::to_string(prefs)
            .map_err(|e| PreferenceError::Serialization(e.to_string()))?;
        *self.stored.lock().expect("preference store poisoned") = Some(json);
        Ok(())
    }
}

/// File-backed preference store (native platforms).
#[cfg(not(target_arch = "wasm32"))]
pub struct FilePreferenceStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FilePreferenceStore {
    /// Create a store at the platform config directory.
    pub fn new() -> Self {
        let base = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            path: base.join("snapline").join("preferences.json"),
        }
    }

    /// Create a store at an explicit path.
    pub fn with_path(path: std::path::PathBuf) -> Self {
        Self { path }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for FilePreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> PreferenceResult<SnapPreferences> {
        if !self.path.exists() {
            return Err(PreferenceError::NotFound);
        }
        let json =
            std::fs::read_to_string(&self.path).map_err(|e| PreferenceError::Io(e.to_string()))?;
        parse_preferences(&json)
    }

    fn save(&self, prefs: &SnapPreferences) -> PreferenceResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PreferenceError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(prefs)
            .map_err(|e| PreferenceError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| PreferenceError::Io(e.to_string()))
    }
}
