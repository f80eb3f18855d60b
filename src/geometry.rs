//! 2D geometry shared by the tracker, the ink trail and the estimator.
//!
//! Two coordinate spaces exist: detector space (camera pixels as reported
//! by the landmark detector) and target space (canvas pixels, where the
//! glyph and the ink live).  `ViewTransform` maps the former into the latter.

// ── Point ──────────────────────────────────────────────────

/// A position in either detector or target space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        Point {
            x: lerp(self.x, other.x, 0.5),
            y: lerp(self.y, other.y, 0.5),
        }
    }
}

// ── TargetRegion ───────────────────────────────────────────

/// Axis-aligned bounding box of the glyph currently being traced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TargetRegion {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `p` lies inside the box (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Point at fractional offsets `(u, v)` in `[0, 1]` across the box.
    pub fn at(&self, u: f32, v: f32) -> Point {
        Point::new(self.x + u * self.width, self.y + v * self.height)
    }

    pub fn to_sexp(&self) -> String {
        format!(
            "(:x {:.1} :y {:.1} :w {:.1} :h {:.1})",
            self.x, self.y, self.width, self.height
        )
    }
}

// ── ViewTransform ──────────────────────────────────────────

/// Linear map from detector space into a destination rectangle in target space.
///
/// When `mirror_x` is set the x axis is flipped before scaling, so a hand
/// moving to the user's right moves right on screen.  The renderer must flip
/// the video frame with the same flag; keypoints are expected unmirrored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Width of the detector's input frame.
    pub source_width: f32,
    /// Height of the detector's input frame.
    pub source_height: f32,
    /// Where the camera image is drawn on the canvas.
    pub dest: TargetRegion,
    /// Flip x before mapping.
    pub mirror_x: bool,
}

impl ViewTransform {
    pub fn new(source_width: f32, source_height: f32, dest: TargetRegion, mirror_x: bool) -> Self {
        Self {
            source_width,
            source_height,
            dest,
            mirror_x,
        }
    }

    /// Transform that leaves coordinates untouched (source == destination).
    pub fn identity(width: f32, height: f32) -> Self {
        Self::new(width, height, TargetRegion::new(0.0, 0.0, width, height), false)
    }

    /// Camera drawn as a centred square of side `min(w, h) * scale`.
    pub fn centered_square(
        canvas_width: f32,
        canvas_height: f32,
        scale: f32,
        source_width: f32,
        source_height: f32,
        mirror_x: bool,
    ) -> Self {
        let side = canvas_width.min(canvas_height) * scale;
        let dest = TargetRegion::new(
            (canvas_width - side) / 2.0,
            (canvas_height - side) / 2.0,
            side,
            side,
        );
        Self::new(source_width, source_height, dest, mirror_x)
    }

    /// Map a detector-space point into target space.
    pub fn map(&self, p: Point) -> Point {
        let sx = if self.mirror_x {
            self.source_width - p.x
        } else {
            p.x
        };
        Point {
            x: self.dest.x + sx / self.source_width * self.dest.width,
            y: self.dest.y + p.y / self.source_height * self.dest.height,
        }
    }
}

/// Linear interpolation helper.
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let d = Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-5, "Expected 5.0, got {}", d);
    }

    #[test]
    fn test_midpoint() {
        let m = Point::new(120.0, 110.0).midpoint(Point::new(130.0, 90.0));
        assert_eq!(m, Point::new(125.0, 100.0));
    }

    #[test]
    fn test_region_contains_edges() {
        let r = TargetRegion::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(30.0, 30.0)));
        assert!(r.contains(Point::new(20.0, 15.0)));
        assert!(!r.contains(Point::new(9.9, 15.0)));
        assert!(!r.contains(Point::new(20.0, 30.1)));
    }

    #[test]
    fn test_region_center_and_area() {
        let r = TargetRegion::new(0.0, 0.0, 10.0, 4.0);
        assert_eq!(r.center(), Point::new(5.0, 2.0));
        assert!((r.area() - 40.0).abs() < f32::EPSILON);
        assert_eq!(TargetRegion::new(0.0, 0.0, -1.0, 5.0).area(), 0.0);
    }

    #[test]
    fn test_identity_transform() {
        let t = ViewTransform::identity(640.0, 480.0);
        assert_eq!(t.map(Point::new(12.0, 34.0)), Point::new(12.0, 34.0));
    }

    #[test]
    fn test_scaled_transform() {
        let t = ViewTransform::new(100.0, 100.0, TargetRegion::new(50.0, 20.0, 200.0, 400.0), false);
        let p = t.map(Point::new(50.0, 25.0));
        assert!((p.x - 150.0).abs() < 1e-4);
        assert!((p.y - 120.0).abs() < 1e-4);
    }

    #[test]
    fn test_mirrored_transform_flips_x_only() {
        let t = ViewTransform::new(100.0, 100.0, TargetRegion::new(0.0, 0.0, 100.0, 100.0), true);
        assert_eq!(t.map(Point::new(10.0, 30.0)), Point::new(90.0, 30.0));
        // Motion to the right in camera space moves left on screen.
        let a = t.map(Point::new(10.0, 0.0));
        let b = t.map(Point::new(20.0, 0.0));
        assert!(b.x < a.x);
    }

    #[test]
    fn test_centered_square() {
        let t = ViewTransform::centered_square(1000.0, 500.0, 0.7, 640.0, 480.0, false);
        assert!((t.dest.width - 350.0).abs() < 1e-3);
        assert!((t.dest.height - 350.0).abs() < 1e-3);
        assert!((t.dest.x - 325.0).abs() < 1e-3);
        assert!((t.dest.y - 75.0).abs() < 1e-3);
        let corner = t.map(Point::new(640.0, 480.0));
        assert!((corner.x - 675.0).abs() < 1e-3);
        assert!((corner.y - 425.0).abs() < 1e-3);
    }

    #[test]
    fn test_region_sexp() {
        let s = TargetRegion::new(1.0, 2.0, 3.0, 4.0).to_sexp();
        assert_eq!(s, "(:x 1.0 :y 2.0 :w 3.0 :h 4.0)");
    }
}
