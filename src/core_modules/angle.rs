// THEORY:
// The `angle` module holds the only real arithmetic of the classifier: the
// interior angle at a vertex formed by two rays. It works in the image plane,
// so depth is ignored and the inputs are plain 2D points.
//
// The angle is the difference between the directions of B→C and B→A, each taken
// with `atan2`. The absolute value of that difference can reach 360 degrees, so
// anything above 180 is folded back with `360 - angle`. The result always lands
// in [0, 180] and does not depend on which ray is listed first.

/// A point on the image plane, in whatever units the caller uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Point2::new(x, y)
    }
}

/// Interior angle at `b`, in degrees, between rays `b→a` and `b→c`.
///
/// Coincident points are not special-cased: `atan2(0, 0)` is zero, so the
/// degenerate ray simply points along +x.
pub fn calculate_angle(a: Point2, b: Point2, c: Point2) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let angle = radians.to_degrees().abs();

    if angle > 180.0 { 360.0 - angle } else { angle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn collinear_points_form_a_straight_angle() {
        let angle = calculate_angle(
            Point2::new(0.5, 0.2),
            Point2::new(0.5, 0.5),
            Point2::new(0.5, 0.8),
        );
        assert!((angle - 180.0).abs() < EPS, "got {angle}");
    }

    #[test]
    fn perpendicular_rays_form_a_right_angle() {
        let angle = calculate_angle(
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
        );
        assert!((angle - 90.0).abs() < EPS, "got {angle}");
    }

    #[test]
    fn reflex_difference_is_folded_back() {
        // Raw direction difference here is 270 degrees.
        let angle = calculate_angle(
            Point2::new(0.0, -1.0),
            Point2::new(0.0, 0.0),
            Point2::new(-1.0, 0.0),
        );
        assert!((angle - 90.0).abs() < EPS, "got {angle}");
    }

    #[test]
    fn identical_rays_form_a_zero_angle() {
        let angle = calculate_angle(
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
        );
        assert!(angle.abs() < EPS, "got {angle}");
    }

    fn coordinate() -> impl Strategy<Value = f64> {
        -1000.0f64..1000.0
    }

    fn point() -> impl Strategy<Value = Point2> {
        (coordinate(), coordinate()).prop_map(Point2::from)
    }

    proptest! {
        #[test]
        fn angle_stays_in_principal_range(a in point(), b in point(), c in point()) {
            let angle = calculate_angle(a, b, c);
            prop_assert!((0.0..=180.0).contains(&angle), "angle {} out of range", angle);
        }

        #[test]
        fn angle_is_symmetric_in_its_rays(a in point(), b in point(), c in point()) {
            let forward = calculate_angle(a, b, c);
            let backward = calculate_angle(c, b, a);
            prop_assert!((forward - backward).abs() < 1e-9);
        }

        #[test]
        fn vertex_between_endpoints_is_straight(
            a in point(),
            c in point(),
            t in 0.05f64..0.95,
        ) {
            prop_assume!((a.x - c.x).hypot(a.y - c.y) > 1.0);
            let b = Point2::new(a.x + (c.x - a.x) * t, a.y + (c.y - a.y) * t);
            let angle = calculate_angle(a, b, c);
            prop_assert!((angle - 180.0).abs() < 1e-6, "got {}", angle);
        }
    }
}
