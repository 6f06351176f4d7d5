use kurbo::Point;

use crate::{
    core::{Canvas, Rgb8},
    geometry::{OverlapKind, RegionLabel, classify_overlap, label_point},
    scene::Scene,
};

/// A rasterized RGB8 frame: tightly packed, row-major. Immutable once
/// produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` of them.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// Allocate a frame filled with a single color.
    pub fn filled(canvas: Canvas, color: Rgb8) -> Self {
        let px = (canvas.width as usize) * (canvas.height as usize);
        let mut data = Vec::with_capacity(px * 3);
        for _ in 0..px {
            data.extend_from_slice(&color.channels());
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    #[inline]
    fn put(&mut self, x: u32, y: u32, color: Rgb8) {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        self.data[i] = color.r;
        self.data[i + 1] = color.g;
        self.data[i + 2] = color.b;
    }

    /// Read back one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }
}

/// Circle outline stroked on top of the fill, drawn inward from the radius.
#[derive(Clone, Copy, Debug)]
pub struct Outline {
    pub color: Rgb8,
    /// Stroke width in pixels.
    pub width: f64,
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            color: Rgb8::BLACK,
            width: 2.0,
        }
    }
}

/// Rasterization policy for one instant.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub background: Rgb8,
    /// When set, both full circle outlines are stroked on top of every
    /// region, including through the overlap.
    pub outline: Option<Outline>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: Rgb8::WHITE,
            outline: None,
        }
    }
}

/// Rasterize the scene with the disks at the given centers.
///
/// Membership is the closed-disk test (`distance <= radius`), applied
/// consistently so boundary pixels are deterministic across runs. No
/// anti-aliasing. Only the union bounding box of the two disks is swept;
/// the rest of the canvas is background by definition.
pub fn render_instant(
    scene: &Scene,
    center_a: Point,
    center_b: Point,
    opts: &RenderOptions,
) -> FrameRgb {
    let mut frame = FrameRgb::filled(scene.canvas, opts.background);
    let (ra, rb) = (scene.disk_a.radius, scene.disk_b.radius);
    let mixed = scene.mixed_color();

    // The per-point labels are the source of truth; the classification only
    // gates whether a mixing pass is needed at all.
    let disjoint = matches!(
        classify_overlap(center_a, ra, center_b, rb),
        OverlapKind::Disjoint
    );

    let bbox = union_bbox(scene.canvas, &[(center_a, ra), (center_b, rb)]);
    if let Some((x0, y0, x1, y1)) = bbox {
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(f64::from(x), f64::from(y));
                if disjoint {
                    if p.distance_squared(center_a) <= ra * ra {
                        frame.put(x, y, scene.disk_a.color);
                    } else if p.distance_squared(center_b) <= rb * rb {
                        frame.put(x, y, scene.disk_b.color);
                    }
                } else {
                    match label_point(p, center_a, ra, center_b, rb) {
                        RegionLabel::AOnly => frame.put(x, y, scene.disk_a.color),
                        RegionLabel::BOnly => frame.put(x, y, scene.disk_b.color),
                        RegionLabel::Overlap => frame.put(x, y, mixed),
                        RegionLabel::Background => {}
                    }
                }
            }
        }
    }

    if let Some(outline) = opts.outline {
        stroke_circle(&mut frame, center_a, ra, outline);
        stroke_circle(&mut frame, center_b, rb, outline);
    }

    frame
}

/// Rasterize a single disk (the fused terminal state).
pub fn render_merged(
    canvas: Canvas,
    center: Point,
    radius: f64,
    fill: Rgb8,
    opts: &RenderOptions,
) -> FrameRgb {
    let mut frame = FrameRgb::filled(canvas, opts.background);

    if let Some((x0, y0, x1, y1)) = union_bbox(canvas, &[(center, radius)]) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(f64::from(x), f64::from(y));
                if p.distance_squared(center) <= radius * radius {
                    frame.put(x, y, fill);
                }
            }
        }
    }

    if let Some(outline) = opts.outline {
        stroke_circle(&mut frame, center, radius, outline);
    }

    frame
}

/// Pixel bounding box of a set of disks, clamped to the canvas. `None` when
/// every disk lies entirely off canvas.
fn union_bbox(canvas: Canvas, disks: &[(Point, f64)]) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(c, r) in disks {
        min_x = min_x.min(c.x - r);
        min_y = min_y.min(c.y - r);
        max_x = max_x.max(c.x + r);
        max_y = max_y.max(c.y + r);
    }

    let last_x = f64::from(canvas.width - 1);
    let last_y = f64::from(canvas.height - 1);
    if max_x < 0.0 || max_y < 0.0 || min_x > last_x || min_y > last_y {
        return None;
    }

    Some((
        min_x.floor().max(0.0) as u32,
        min_y.floor().max(0.0) as u32,
        max_x.ceil().min(last_x) as u32,
        max_y.ceil().min(last_y) as u32,
    ))
}

/// Stroke a circle outline by painting the band `radius - width <= d <= radius`.
fn stroke_circle(frame: &mut FrameRgb, center: Point, radius: f64, outline: Outline) {
    let inner = (radius - outline.width).max(0.0);
    let canvas = Canvas {
        width: frame.width,
        height: frame.height,
    };
    let Some((x0, y0, x1, y1)) = union_bbox(canvas, &[(center, radius)]) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let d2 = Point::new(f64::from(x), f64::from(y)).distance_squared(center);
            if d2 <= radius * radius && d2 >= inner * inner {
                frame.put(x, y, outline.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Disk;

    fn scene(ax: f64, bx: f64, ra: f64, rb: f64) -> Scene {
        Scene {
            disk_a: Disk {
                center: Point::new(ax, 256.0),
                radius: ra,
                color: Rgb8::new(100, 150, 75),
            },
            disk_b: Disk {
                center: Point::new(bx, 256.0),
                radius: rb,
                color: Rgb8::new(200, 120, 90),
            },
            canvas: Canvas {
                width: 512,
                height: 512,
            },
        }
    }

    fn count_pixels(frame: &FrameRgb, color: Rgb8) -> usize {
        frame
            .data
            .chunks_exact(3)
            .filter(|px| *px == color.channels())
            .count()
    }

    #[test]
    fn disjoint_disks_have_no_mixed_pixels() {
        let s = scene(100.0, 412.0, 60.0, 60.0);
        let frame = render_instant(&s, s.disk_a.center, s.disk_b.center, &RenderOptions::default());

        let mixed = s.mixed_color();
        assert_eq!(count_pixels(&frame, mixed), 0);
        assert!(count_pixels(&frame, s.disk_a.color) > 0);
        assert!(count_pixels(&frame, s.disk_b.color) > 0);
    }

    #[test]
    fn overlapping_disks_mix_only_the_lens() {
        let s = scene(226.0, 286.0, 60.0, 60.0);
        let frame = render_instant(&s, s.disk_a.center, s.disk_b.center, &RenderOptions::default());

        let mixed = s.mixed_color();
        assert!(count_pixels(&frame, mixed) > 0);
        assert!(count_pixels(&frame, s.disk_a.color) > 0);
        assert!(count_pixels(&frame, s.disk_b.color) > 0);

        // A point between the centers is inside both disks.
        assert_eq!(frame.pixel(256, 256), mixed);
        // Far left of disk A is A-only, far right of disk B is B-only.
        assert_eq!(frame.pixel(180, 256), s.disk_a.color);
        assert_eq!(frame.pixel(332, 256), s.disk_b.color);
    }

    #[test]
    fn coincident_centers_paint_only_mixed_and_background() {
        let s = scene(100.0, 412.0, 60.0, 60.0);
        let mid = s.motion().midpoint;
        let frame = render_instant(&s, mid, mid, &RenderOptions::default());

        assert_eq!(count_pixels(&frame, s.disk_a.color), 0);
        assert_eq!(count_pixels(&frame, s.disk_b.color), 0);
        assert!(count_pixels(&frame, s.mixed_color()) > 0);
        assert_eq!(frame.pixel(256, 256), s.mixed_color());
    }

    #[test]
    fn pixels_outside_union_bbox_stay_background() {
        let s = scene(100.0, 412.0, 60.0, 60.0);
        let frame = render_instant(&s, s.disk_a.center, s.disk_b.center, &RenderOptions::default());
        assert_eq!(frame.pixel(0, 0), Rgb8::WHITE);
        assert_eq!(frame.pixel(511, 511), Rgb8::WHITE);
        assert_eq!(frame.pixel(256, 10), Rgb8::WHITE);
    }

    #[test]
    fn boundary_pixel_follows_closed_disk_rule() {
        let s = scene(100.0, 412.0, 60.0, 60.0);
        let frame = render_instant(&s, s.disk_a.center, s.disk_b.center, &RenderOptions::default());
        // Exactly on the circle: distance == radius is inside.
        assert_eq!(frame.pixel(160, 256), s.disk_a.color);
        // One pixel out is background.
        assert_eq!(frame.pixel(161, 256), Rgb8::WHITE);
    }

    #[test]
    fn outline_strokes_both_circles_over_the_fill() {
        let s = scene(226.0, 286.0, 60.0, 60.0);
        let opts = RenderOptions {
            background: Rgb8::WHITE,
            outline: Some(Outline::default()),
        };
        let frame = render_instant(&s, s.disk_a.center, s.disk_b.center, &opts);

        // Rim pixels of both circles are black, including where circle A's
        // rim crosses disk B's interior.
        assert_eq!(frame.pixel(166, 256), Rgb8::BLACK);
        assert_eq!(frame.pixel(346, 256), Rgb8::BLACK);
        assert_eq!(frame.pixel(286, 256), Rgb8::BLACK); // A's right rim inside B
    }

    #[test]
    fn merged_disk_fills_with_requested_color() {
        let canvas = Canvas {
            width: 512,
            height: 512,
        };
        let mixed = Rgb8::new(0, 26, 115);
        let frame = render_merged(
            canvas,
            Point::new(256.0, 256.0),
            60.0,
            mixed,
            &RenderOptions::default(),
        );
        assert_eq!(frame.pixel(256, 256), mixed);
        assert_eq!(frame.pixel(256, 196), mixed); // top of the disk
        assert_eq!(frame.pixel(256, 195), Rgb8::WHITE);
    }
}
