//! Pointer resolution from detected hands.
//!
//! Turns one frame's hand observations into at most one pointer: where it
//! is in target space and whether it is "touching" a given anchor.  Two
//! interaction modes are supported: a two-point pinch (thumb and index tips
//! must both be near the anchor) and single-point proximity (index tip only).
//! Pure with respect to its inputs; no per-frame state is kept.

use tracing::debug;

use crate::geometry::{Point, ViewTransform};
use crate::hand::{HandObservation, Handedness, Keypoint};

// ── Interaction mode ───────────────────────────────────────

/// How a hand touches the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionMode {
    /// Thumb tip and index tip both within the pointer radius.
    #[default]
    Pinch,
    /// Index tip alone within the pointer radius.
    SinglePoint,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pinch => "pinch",
            Self::SinglePoint => "single-point",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pinch" => Some(Self::Pinch),
            "single-point" => Some(Self::SinglePoint),
            _ => None,
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Thresholds for pointer resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    pub mode: InteractionMode,
    /// Hands at or below this confidence are ignored.
    pub min_confidence: f32,
    /// Distance (target-space pixels) within which a fingertip touches the anchor.
    pub pointer_radius: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Pinch,
            min_confidence: 0.1,
            pointer_radius: 50.0,
        }
    }
}

// ── Pointer event ──────────────────────────────────────────

/// Result of resolving one frame's hands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in target space, if any hand qualified.
    pub position: Option<Point>,
    /// Whether the pointer is touching the anchor.
    pub active: bool,
    /// Hand that produced the pointer.
    pub handedness: Handedness,
}

impl PointerEvent {
    /// No qualifying hand this frame.
    pub fn idle() -> Self {
        Self {
            position: None,
            active: false,
            handedness: Handedness::Unknown,
        }
    }
}

impl Default for PointerEvent {
    fn default() -> Self {
        Self::idle()
    }
}

// ── Tracker ────────────────────────────────────────────────

/// Resolves hands into a `PointerEvent` according to `GestureConfig`.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    pub config: GestureConfig,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GestureConfig) -> Self {
        Self { config }
    }

    /// Resolve the pointer for this frame against `anchor` (target space).
    ///
    /// Hands are visited in detector order.  An active hand replaces any
    /// earlier result; an inactive hand only replaces an earlier inactive one,
    /// so the last touching hand wins.
    pub fn resolve(
        &self,
        hands: &[HandObservation],
        transform: &ViewTransform,
        anchor: Point,
    ) -> PointerEvent {
        let mut event = PointerEvent::idle();

        for hand in hands {
            if !hand.is_confident(self.config.min_confidence) {
                debug!(
                    "Gesture: skipping {} hand, confidence {:.2} <= {:.2}",
                    hand.handedness.as_str(),
                    hand.confidence,
                    self.config.min_confidence,
                );
                continue;
            }

            let candidate = match self.config.mode {
                InteractionMode::Pinch => self.resolve_pinch(hand, transform, anchor),
                InteractionMode::SinglePoint => self.resolve_single(hand, transform, anchor),
            };

            if let Some(candidate) = candidate {
                if candidate.active || !event.active {
                    event = candidate;
                }
            }
        }

        event
    }

    /// Two-point pinch: both tips must touch, the pointer sits at their midpoint.
    fn resolve_pinch(
        &self,
        hand: &HandObservation,
        transform: &ViewTransform,
        anchor: Point,
    ) -> Option<PointerEvent> {
        let index = transform.map(hand.keypoint(Keypoint::IndexTip)?);
        let thumb = transform.map(hand.keypoint(Keypoint::ThumbTip)?);

        let active = self.touches(index, anchor) && self.touches(thumb, anchor);
        Some(PointerEvent {
            position: Some(index.midpoint(thumb)),
            active,
            handedness: hand.handedness,
        })
    }

    /// Single-point proximity: the index tip alone.
    fn resolve_single(
        &self,
        hand: &HandObservation,
        transform: &ViewTransform,
        anchor: Point,
    ) -> Option<PointerEvent> {
        let index = transform.map(hand.keypoint(Keypoint::IndexTip)?);
        Some(PointerEvent {
            position: Some(index),
            active: self.touches(index, anchor),
            handedness: hand.handedness,
        })
    }

    fn touches(&self, p: Point, anchor: Point) -> bool {
        p.distance(anchor) < self.config.pointer_radius
    }

    /// Generate s-expression of the current configuration.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:mode :{} :min-confidence {} :pointer-radius {})",
            self.config.mode.as_str(),
            self.config.min_confidence,
            self.config.pointer_radius,
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
