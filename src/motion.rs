use kurbo::Point;

/// Deterministic two-phase motion: both centers travel in a straight line to
/// the midpoint of the t=0 centers.
///
/// Each disk covers exactly half the initial center-to-center distance, so
/// arrival is simultaneous at `t = 1` regardless of the radii. The motion is
/// kinematic, not force-based.
#[derive(Clone, Copy, Debug)]
pub struct MotionPlan {
    /// Disk A center at t=0.
    pub start_a: Point,
    /// Disk B center at t=0.
    pub start_b: Point,
    /// Shared destination of both centers.
    pub midpoint: Point,
}

impl MotionPlan {
    /// Build a plan from the two t=0 centers.
    pub fn new(start_a: Point, start_b: Point) -> Self {
        Self {
            start_a,
            start_b,
            midpoint: start_a.midpoint(start_b),
        }
    }

    /// Both centers at normalized time `t`.
    ///
    /// `t` is clamped to `[0, 1]`; `at(1.0)` returns the midpoint for both
    /// disks exactly (no floating-point residue from the interpolation).
    pub fn at(&self, t: f64) -> (Point, Point) {
        let t = t.clamp(0.0, 1.0);
        if t == 1.0 {
            return (self.midpoint, self.midpoint);
        }
        (
            lerp(self.start_a, self.midpoint, t),
            lerp(self.start_b, self.midpoint, t),
        )
    }

    /// Distance between the two centers at normalized time `t`.
    ///
    /// Non-increasing in `t` by construction.
    pub fn center_distance(&self, t: f64) -> f64 {
        let (a, b) = self.at(t);
        a.distance(b)
    }
}

#[inline]
fn lerp(from: Point, to: Point, t: f64) -> Point {
    Point::new(from.x + t * (to.x - from.x), from.y + t * (to.y - from.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_is_simultaneous_and_exact() {
        let plan = MotionPlan::new(Point::new(100.0, 256.0), Point::new(412.0, 256.0));
        let (a, b) = plan.at(1.0);
        assert_eq!(a, plan.midpoint);
        assert_eq!(b, plan.midpoint);
        assert_eq!(plan.midpoint, Point::new(256.0, 256.0));
    }

    #[test]
    fn exact_equality_holds_for_awkward_coordinates() {
        // Coordinates chosen so a naive lerp would leave fp residue at t=1.
        let plan = MotionPlan::new(Point::new(0.1, 0.3), Point::new(412.7, 99.9));
        let (a, b) = plan.at(1.0);
        assert_eq!(a, b);
        assert_eq!(a, plan.midpoint);
    }

    #[test]
    fn worked_scenario_midframe_positions() {
        let plan = MotionPlan::new(Point::new(100.0, 256.0), Point::new(412.0, 256.0));
        let (a, b) = plan.at(0.5);
        assert_eq!(a, Point::new(178.0, 256.0));
        assert_eq!(b, Point::new(334.0, 256.0));
        assert_eq!(plan.center_distance(0.5), 156.0);
    }

    #[test]
    fn center_distance_is_non_increasing() {
        let plan = MotionPlan::new(Point::new(30.0, 40.0), Point::new(400.0, 300.0));
        let mut prev = plan.center_distance(0.0);
        for i in 1..=20 {
            let d = plan.center_distance(f64::from(i) / 20.0);
            assert!(d <= prev + 1e-12);
            prev = d;
        }
        assert!(plan.center_distance(1.0).abs() < 1e-12);
    }

    #[test]
    fn t_is_clamped() {
        let plan = MotionPlan::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(plan.at(-1.0), plan.at(0.0));
        assert_eq!(plan.at(2.0), plan.at(1.0));
    }
}
