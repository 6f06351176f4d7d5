use kurbo::{Point, Vec2};

/// Spatial relation of two disks at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlapKind {
    /// The disks share no area (tangency counts as disjoint).
    Disjoint,
    /// Disk B lies wholly inside disk A (includes full coincidence).
    AContainsB,
    /// Disk A lies wholly inside disk B.
    BContainsA,
    /// Proper lens overlap, with the two circle-circle intersection points.
    ///
    /// The lens boundary is the pair of circular arcs between `p0` and `p1`,
    /// one from each circle, on the side facing the other disk's center.
    Lens {
        /// Intersection point on the positive-perpendicular side.
        p0: Point,
        /// Intersection point on the negative-perpendicular side.
        p1: Point,
    },
}

/// Classify the intersection of two circles.
///
/// Degenerate input `d = 0` with equal radii is full coincidence and reports
/// as [`OverlapKind::AContainsB`]; this is the terminal-frame case of the
/// merge animation.
pub fn classify_overlap(
    center_a: Point,
    radius_a: f64,
    center_b: Point,
    radius_b: f64,
) -> OverlapKind {
    let d = center_a.distance(center_b);

    if d >= radius_a + radius_b {
        return OverlapKind::Disjoint;
    }
    if d <= (radius_a - radius_b).abs() {
        return if radius_a >= radius_b {
            OverlapKind::AContainsB
        } else {
            OverlapKind::BContainsA
        };
    }

    // Standard two-circle intersection: project the chord midpoint onto the
    // center line, then offset along the perpendicular.
    let a = (d * d - radius_b * radius_b + radius_a * radius_a) / (2.0 * d);
    let h = (radius_a * radius_a - a * a).max(0.0).sqrt();
    let u = (center_b - center_a) / d;
    let perp = Vec2::new(-u.y, u.x);
    let base = center_a + u * a;

    OverlapKind::Lens {
        p0: base + perp * h,
        p1: base - perp * h,
    }
}

/// Per-point classification of which disk(s) cover a screen location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionLabel {
    /// Inside disk A only.
    AOnly,
    /// Inside disk B only.
    BOnly,
    /// Inside both disks.
    Overlap,
    /// Inside neither disk.
    Background,
}

/// Label a query point against two disks.
///
/// A point is `Overlap` iff it lies within both closed disks, regardless of
/// the [`OverlapKind`]: lens, containment, and full coincidence all reduce to
/// plain membership, which subsumes the arc geometry without polygon
/// construction. This per-point test is the source of truth for pixel
/// labeling; `classify_overlap` is only a fast-path gate for rendering.
#[inline]
pub fn label_point(
    p: Point,
    center_a: Point,
    radius_a: f64,
    center_b: Point,
    radius_b: f64,
) -> RegionLabel {
    let in_a = p.distance_squared(center_a) <= radius_a * radius_a;
    let in_b = p.distance_squared(center_b) <= radius_b * radius_b;
    match (in_a, in_b) {
        (true, true) => RegionLabel::Overlap,
        (true, false) => RegionLabel::AOnly,
        (false, true) => RegionLabel::BOnly,
        (false, false) => RegionLabel::Background,
    }
}
