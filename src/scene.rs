use kurbo::Point;

use crate::{
    color::mix_subtractive,
    core::{Canvas, Rgb8},
    error::{ChromergeError, ChromergeResult},
    motion::MotionPlan,
};

/// A filled circle: the scene's only actor kind.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Disk {
    /// Center in pixel space.
    pub center: Point,
    /// Radius in pixels, must be > 0.
    pub radius: f64,
    /// Fill color.
    pub color: Rgb8,
}

/// Two disks on a canvas at t=0.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub disk_a: Disk,
    pub disk_b: Disk,
    pub canvas: Canvas,
}

impl Scene {
    /// Reject-early validation: positive finite radii, and both disks fully
    /// on canvas at t=0 with their centers inside the edge margin band.
    ///
    /// The motion only ever moves centers toward the midpoint, so a scene
    /// valid at t=0 stays on canvas for all t.
    pub fn validate(&self, edge_margin: f64) -> ChromergeResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ChromergeError::validation("canvas width/height must be > 0"));
        }
        if !(edge_margin >= 0.0) {
            return Err(ChromergeError::validation("edge margin must be >= 0"));
        }

        for (name, disk) in [("disk_a", self.disk_a), ("disk_b", self.disk_b)] {
            if !(disk.radius > 0.0) || !disk.radius.is_finite() {
                return Err(ChromergeError::validation(format!(
                    "{name} radius must be positive and finite (got {})",
                    disk.radius
                )));
            }

            let w = f64::from(self.canvas.width);
            let h = f64::from(self.canvas.height);
            let c = disk.center;
            if c.x < edge_margin || c.x > w - edge_margin || c.y < edge_margin || c.y > h - edge_margin
            {
                return Err(ChromergeError::validation(format!(
                    "{name} center ({}, {}) violates edge margin {edge_margin}",
                    c.x, c.y
                )));
            }
            if c.x - disk.radius < 0.0
                || c.x + disk.radius > w
                || c.y - disk.radius < 0.0
                || c.y + disk.radius > h
            {
                return Err(ChromergeError::validation(format!(
                    "{name} does not fit on the {}x{} canvas",
                    self.canvas.width, self.canvas.height
                )));
            }
        }

        Ok(())
    }

    /// The subtractive mixture of the two disk colors.
    ///
    /// Depends only on the colors: independent of time and geometry.
    pub fn mixed_color(&self) -> Rgb8 {
        mix_subtractive(self.disk_a.color, self.disk_b.color)
    }

    /// Motion plan bringing both centers to the shared midpoint.
    pub fn motion(&self) -> MotionPlan {
        MotionPlan::new(self.disk_a.center, self.disk_b.center)
    }
}
