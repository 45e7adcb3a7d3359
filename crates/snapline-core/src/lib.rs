//! Snapline Core Library
//!
//! Platform-agnostic smart-guide and snapping engine for 2D design canvases.

pub mod alignment;
pub mod candidates;
pub mod distance;
pub mod options;
pub mod orchestrator;
pub mod preferences;
pub mod scene;
pub mod snapper;
pub mod spacing;
pub mod surface;

pub use alignment::{
    detect_alignment_guides, AlignmentGuide, AlignmentType, GuideOrientation, GuideSource,
    VisualStyle,
};
pub use candidates::{
    collect_candidates, CandidateResult, CandidateSource, CollectOptions, Strength,
};
pub use distance::{measure_distances, DistanceLabel, GapDirection};
pub use options::{apply_option, preference_controls, OptionControl, OptionValue};
pub use orchestrator::{GuideOrchestrator, ModifierKey, Modifiers};
#[cfg(not(target_arch = "wasm32"))]
pub use preferences::FilePreferenceStore;
pub use preferences::{
    DistanceUnit, GridStyle, MemoryPreferenceStore, PreferenceError, PreferenceResult,
    PreferenceStore, ReferenceMode, SnapPreferences, Theme,
};
pub use scene::{SceneObject, SceneQuery, StaticScene};
pub use snapper::{snap_point, SnappedPoint};
pub use spacing::{
    detect_equal_spacing, distribute_objects, spacing_confidence, Axis, EqualSpacingGroup,
};
pub use surface::{GridSettings, GuideSurface};
