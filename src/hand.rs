//! Hand observations as delivered by the landmark detector.
//!
//! Models the 21-keypoint hand layout used by common 2D hand-pose models
//! (index 4 = thumb tip, index 8 = index fingertip).  Observations are
//! produced fresh every frame and never retained past the frame that owns them.

use tracing::debug;

use crate::geometry::Point;

// ── Keypoint definitions ───────────────────────────────────

/// The 21 hand keypoints, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keypoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of keypoints per hand.
pub const KEYPOINT_COUNT: usize = 21;

impl Keypoint {
    /// Position of this keypoint in the detector's keypoint array.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }

    /// Fingertip keypoints for convenience.
    pub fn fingertips() -> [Keypoint; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::PinkyTip,
        ]
    }
}

// ── Handedness ─────────────────────────────────────────────

/// Which hand the detector believes it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a detector label ("Left", "right", ...).  Anything else is Unknown.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("left") {
            Self::Left
        } else if label.eq_ignore_ascii_case("right") {
            Self::Right
        } else {
            Self::Unknown
        }
    }
}

// ── Observation ────────────────────────────────────────────

/// One detected hand in one frame, in detector space.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    /// Keypoint positions indexed by `Keypoint`.
    pub keypoints: Vec<Point>,
    /// Detector confidence (0.0-1.0).
    pub confidence: f32,
    pub handedness: Handedness,
}

impl HandObservation {
    pub fn new(keypoints: Vec<Point>, confidence: f32, handedness: Handedness) -> Self {
        Self {
            keypoints,
            confidence,
            handedness,
        }
    }

    /// Position of a keypoint, or `None` if the detector sent too few.
    pub fn keypoint(&self, keypoint: Keypoint) -> Option<Point> {
        let p = self.keypoints.get(keypoint.index()).copied();
        if p.is_none() {
            debug!(
                "Hand observation: missing {} ({} of {} keypoints)",
                keypoint.as_str(),
                self.keypoints.len(),
                KEYPOINT_COUNT,
            );
        }
        p
    }

    /// Distance between two keypoints of this hand, in detector space.
    pub fn keypoint_distance(&self, a: Keypoint, b: Keypoint) -> Option<f32> {
        Some(self.keypoint(a)?.distance(self.keypoint(b)?))
    }

    /// Whether the detector's confidence clears `min_confidence` (strictly).
    pub fn is_confident(&self, min_confidence: f32) -> bool {
        self.confidence > min_confidence
    }
}

/// Full keypoint set at the origin with the thumb and index tips placed.
#[cfg(test)]
pub(crate) fn test_hand(
    thumb: Point,
    index: Point,
    confidence: f32,
    handedness: Handedness,
) -> HandObservation {
    let mut keypoints = vec![Point::default(); KEYPOINT_COUNT];
    keypoints[Keypoint::ThumbTip.index()] = thumb;
    keypoints[Keypoint::IndexTip.index()] = index;
    HandObservation::new(keypoints, confidence, handedness)
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_indices() {
        assert_eq!(Keypoint::Wrist.index(), 0);
        assert_eq!(Keypoint::ThumbTip.index(), 4);
        assert_eq!(Keypoint::IndexTip.index(), 8);
        assert_eq!(Keypoint::PinkyTip.index(), KEYPOINT_COUNT - 1);
    }

    #[test]
    fn test_keypoint_as_str() {
        assert_eq!(Keypoint::ThumbTip.as_str(), "thumb-tip");
        assert_eq!(Keypoint::IndexTip.as_str(), "index-tip");
        assert_eq!(Keypoint::fingertips()[4].as_str(), "pinky-tip");
    }

    #[test]
    fn test_handedness_from_label() {
        assert_eq!(Handedness::from_label("Left"), Handedness::Left);
        assert_eq!(Handedness::from_label("right"), Handedness::Right);
        assert_eq!(Handedness::from_label(""), Handedness::Unknown);
        assert_eq!(Handedness::from_label("both"), Handedness::Unknown);
        assert_eq!(Handedness::default(), Handedness::Unknown);
    }

    #[test]
    fn test_keypoint_lookup() {
        let hand = test_hand(Point::new(1.0, 2.0), Point::new(3.0, 4.0), 0.9, Handedness::Right);
        assert_eq!(hand.keypoint(Keypoint::ThumbTip), Some(Point::new(1.0, 2.0)));
        assert_eq!(hand.keypoint(Keypoint::IndexTip), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_short_keypoint_list() {
        let hand = HandObservation::new(vec![Point::default(); 5], 0.9, Handedness::Left);
        assert!(hand.keypoint(Keypoint::ThumbTip).is_some());
        assert!(hand.keypoint(Keypoint::IndexTip).is_none());
        assert!(hand
            .keypoint_distance(Keypoint::ThumbTip, Keypoint::IndexTip)
            .is_none());
    }

    #[test]
    fn test_keypoint_distance() {
        let hand = test_hand(Point::new(0.0, 0.0), Point::new(3.0, 4.0), 0.9, Handedness::Left);
        let d = hand
            .keypoint_distance(Keypoint::ThumbTip, Keypoint::IndexTip)
            .unwrap();
        assert!((d - 5.0).abs() < 0.001, "Expected 5.0, got {}", d);
    }

    #[test]
    fn test_is_confident_is_strict() {
        let hand = test_hand(Point::default(), Point::default(), 0.1, Handedness::Unknown);
        assert!(!hand.is_confident(0.1));
        assert!(hand.is_confident(0.05));
    }
}
