//! airtrace - trace letters in the air with pinch gestures.
//!
//! The per-frame core of a hand-tracking letter tracing game:
//! - `gesture`: resolve detected hands into a pointer touching an anchor
//! - `coverage`: decide when the ink covers the glyph well enough
//! - `curriculum`: the fixed list of symbols and the cursor walking it
//! - `session`: the frame loop tying them together
//!
//! Hand detection, font metrics and rendering are external; the detector
//! feeds a `Session` through `HandObserver`, metrics come from a
//! `GlyphMetrics` implementation, and the renderer reads the trail back.

pub mod config;
pub mod control;
pub mod coverage;
pub mod curriculum;
pub mod error;
pub mod feed;
pub mod geometry;
pub mod gesture;
pub mod hand;
pub mod ink;
pub mod session;
mod sexp;

pub use config::{HandColors, LayoutConfig, SessionConfig};
pub use coverage::{CompletionConfig, CompletionPolicy, TraceProgressEstimator};
pub use curriculum::{Curriculum, CurriculumCursor, CurriculumEntry, CursorState, EndPolicy};
pub use error::ConfigError;
pub use feed::{HandFeed, HandObserver};
pub use geometry::{Point, TargetRegion, ViewTransform};
pub use gesture::{GestureConfig, GestureTracker, InteractionMode, PointerEvent};
pub use hand::{HandObservation, Handedness, Keypoint, KEYPOINT_COUNT};
pub use ink::{InkColor, InkPoint, InkTrail};
pub use session::{FrameOutcome, GlyphMetrics, Session, SkipReason};
