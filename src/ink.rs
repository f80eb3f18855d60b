//! Ink trail owned by the active target.
//!
//! Points only enter the trail if they fall inside the target region that is
//! current at append time, and the trail is only ever emptied as a whole.

use crate::geometry::{Point, TargetRegion};

/// RGB ink colour tag, consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl InkColor {
    pub const RED: InkColor = InkColor::new(255, 0, 0);
    pub const GREEN: InkColor = InkColor::new(0, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_sexp(&self) -> String {
        format!("({} {} {})", self.r, self.g, self.b)
    }
}

/// One dab of ink in target space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkPoint {
    pub position: Point,
    pub color: Option<InkColor>,
}

/// Append-only sequence of ink points for the current target.
#[derive(Debug, Clone, Default)]
pub struct InkTrail {
    points: Vec<InkPoint>,
    /// Bumped on every clear, so a renderer can tell trails apart.
    generation: u64,
}

impl InkTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `position` if it lies inside `region`.  Returns whether it was kept.
    pub fn push_within(
        &mut self,
        position: Point,
        color: Option<InkColor>,
        region: &TargetRegion,
    ) -> bool {
        if !region.contains(position) {
            return false;
        }
        self.points.push(InkPoint { position, color });
        true
    }

    /// Drop every point at once.
    pub fn clear(&mut self) {
        self.points.clear();
        self.generation += 1;
    }

    pub fn points(&self) -> &[InkPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &InkPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&InkPoint> {
        self.points.last()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_inside_region() {
        let region = TargetRegion::new(0.0, 0.0, 10.0, 10.0);
        let mut trail = InkTrail::new();
        assert!(trail.push_within(Point::new(5.0, 5.0), Some(InkColor::RED), &region));
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.last().unwrap().color, Some(InkColor::RED));
    }

    #[test]
    fn test_push_outside_region_rejected() {
        let region = TargetRegion::new(0.0, 0.0, 10.0, 10.0);
        let mut trail = InkTrail::new();
        assert!(!trail.push_within(Point::new(11.0, 5.0), None, &region));
        assert!(trail.is_empty());
    }

    #[test]
    fn test_clear_empties_and_bumps_generation() {
        let region = TargetRegion::new(0.0, 0.0, 10.0, 10.0);
        let mut trail = InkTrail::new();
        for i in 0..5 {
            trail.push_within(Point::new(i as f32, 1.0), None, &region);
        }
        assert_eq!(trail.len(), 5);
        assert_eq!(trail.generation(), 0);

        trail.clear();
        assert!(trail.is_empty());
        assert_eq!(trail.generation(), 1);
    }

    #[test]
    fn test_color_sexp() {
        assert_eq!(InkColor::GREEN.to_sexp(), "(0 255 0)");
    }
}
