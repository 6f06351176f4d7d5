use std::path::{Path, PathBuf};

use kurbo::Point;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::{
    core::{Canvas, Fps, Rgb8},
    encode::{is_ffmpeg_on_path, write_png},
    error::{ChromergeError, ChromergeResult},
    math::Fnv1a64,
    prompts::{pick_prompt, pick_rubric},
    render::{FrameRgb, Outline, RenderOptions},
    scene::{Disk, Scene},
    sequence::{MergedRadius, SequenceOpts, final_frame, first_frame, render_to_mp4},
};

/// Immutable task-batch configuration.
///
/// Constructed once (JSON or defaults), validated at construction time, and
/// never mutated afterwards.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Output canvas size.
    pub canvas: Canvas,
    /// Disk A radius in pixels.
    pub radius_a: f64,
    /// Disk B radius in pixels.
    pub radius_b: f64,
    /// Minimum distance from any sampled center to every canvas edge.
    pub edge_margin: f64,
    /// Minimum center-to-center distance between the two sampled positions.
    pub min_separation: f64,
    /// Canvas background color.
    pub background: Rgb8,
    /// Stroke both circle outlines in black, as the rendered tasks do.
    pub outline: bool,
    /// Radius policy for the fused terminal disk.
    pub merged_radius: MergedRadius,
    /// Video frame rate.
    pub fps: Fps,
    /// Number of transition frames between the held first and final states.
    pub transition_frames: u32,
    /// Copies of the first/final frame held at each end of the video.
    pub hold_frames: u32,
    /// Whether `write_task_dir` should produce `ground_truth.mp4`.
    pub generate_video: bool,
    /// Batch seed; each task derives its own rng from this and its task id.
    pub seed: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 512,
                height: 512,
            },
            radius_a: 60.0,
            radius_b: 60.0,
            edge_margin: 80.0,
            min_separation: 200.0,
            background: Rgb8::WHITE,
            outline: true,
            merged_radius: MergedRadius::default(),
            fps: Fps { num: 10, den: 1 },
            transition_frames: 25,
            hold_frames: 5,
            generate_video: true,
            seed: 0,
        }
    }
}

impl TaskConfig {
    /// Reject-early validation, run before any task is generated.
    pub fn validate(&self) -> ChromergeResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ChromergeError::validation("canvas width/height must be > 0"));
        }
        for (name, r) in [("radius_a", self.radius_a), ("radius_b", self.radius_b)] {
            if !(r > 0.0) || !r.is_finite() {
                return Err(ChromergeError::validation(format!(
                    "{name} must be positive and finite (got {r})"
                )));
            }
        }

        // The margin band is where centers are sampled; it must keep either
        // disk fully on canvas and leave a non-empty sampling area.
        let max_radius = self.radius_a.max(self.radius_b);
        if self.edge_margin < max_radius {
            return Err(ChromergeError::validation(format!(
                "edge_margin ({}) must be >= the larger radius ({max_radius}) so disks fit on canvas",
                self.edge_margin
            )));
        }
        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);
        if 2.0 * self.edge_margin >= w || 2.0 * self.edge_margin >= h {
            return Err(ChromergeError::validation(
                "edge_margin leaves no room to place disk centers",
            ));
        }

        if self.min_separation < 0.0 {
            return Err(ChromergeError::validation("min_separation must be >= 0"));
        }
        let band = Point::new(w - 2.0 * self.edge_margin, h - 2.0 * self.edge_margin);
        if self.min_separation > band.to_vec2().hypot() {
            return Err(ChromergeError::validation(
                "min_separation exceeds the placement area diagonal; no layout can satisfy it",
            ));
        }

        if self.transition_frames < 2 {
            return Err(ChromergeError::validation(
                "transition_frames must be >= 2 (first and last frames must differ in t)",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ChromergeError::validation("fps must be non-zero"));
        }
        if self.generate_video
            && (!self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2))
        {
            return Err(ChromergeError::validation(
                "canvas width/height must be even when video output is enabled",
            ));
        }

        Ok(())
    }

    /// Sequencing policy derived from this config.
    pub fn sequence_opts(&self) -> SequenceOpts {
        SequenceOpts {
            frame_count: self.transition_frames,
            fps: self.fps,
            hold_first: self.hold_frames,
            hold_last: self.hold_frames,
            merged_radius: self.merged_radius,
        }
    }

    /// Rasterization policy derived from this config.
    pub fn render_opts(&self) -> RenderOptions {
        RenderOptions {
            background: self.background,
            outline: self.outline.then(Outline::default),
        }
    }
}

/// Everything one generated task exposes to its consumers.
#[derive(Clone, Debug)]
pub struct TaskArtifact {
    pub task_id: String,
    pub scene: Scene,
    pub mixed_color: Rgb8,
    pub prompt: String,
    pub rubric: String,
    pub first_frame: FrameRgb,
    pub final_frame: FrameRgb,
}

/// Capability interface for task generation: anything that can produce a
/// [`TaskArtifact`] for an id satisfies the contract.
pub trait TaskProducer {
    fn produce_task(&mut self, task_id: &str) -> ChromergeResult<TaskArtifact>;
}

/// The disk-merge color-mixing task generator.
pub struct MergeTaskGenerator {
    cfg: TaskConfig,
}

impl MergeTaskGenerator {
    /// Validate the config and build a generator.
    pub fn new(cfg: TaskConfig) -> ChromergeResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Borrow the validated configuration.
    pub fn config(&self) -> &TaskConfig {
        &self.cfg
    }

    /// Per-task rng: batch seed hashed with the task id, so a task's output
    /// is reproducible independent of the order tasks are generated in.
    fn task_rng(&self, task_id: &str) -> StdRng {
        let mut h = Fnv1a64::new_default();
        h.write_u64(self.cfg.seed);
        h.write_bytes(task_id.as_bytes());
        StdRng::seed_from_u64(h.finish())
    }

    fn random_color(rng: &mut StdRng) -> Rgb8 {
        Rgb8::new(
            rng.random_range(50..=255),
            rng.random_range(50..=255),
            rng.random_range(50..=255),
        )
    }

    /// Sample two centers inside the margin band with at least
    /// `min_separation` between them. Falls back to the deterministic
    /// quarter-width layout after 100 attempts.
    fn place_disks(&self, rng: &mut StdRng) -> (Point, Point) {
        let lo_x = self.cfg.edge_margin.ceil() as u32;
        let lo_y = lo_x;
        let hi_x = self.cfg.canvas.width - lo_x;
        let hi_y = self.cfg.canvas.height - lo_y;

        for _ in 0..100 {
            let a = Point::new(
                f64::from(rng.random_range(lo_x..=hi_x)),
                f64::from(rng.random_range(lo_y..=hi_y)),
            );
            let b = Point::new(
                f64::from(rng.random_range(lo_x..=hi_x)),
                f64::from(rng.random_range(lo_y..=hi_y)),
            );
            if a.distance(b) >= self.cfg.min_separation {
                return (a, b);
            }
        }

        fallback_layout(self.cfg.canvas)
    }

    /// Build a validated scene from the task rng.
    pub fn build_scene(&self, rng: &mut StdRng) -> ChromergeResult<Scene> {
        let color_a = Self::random_color(rng);
        let color_b = Self::random_color(rng);
        let (center_a, center_b) = self.place_disks(rng);

        let scene = Scene {
            disk_a: Disk {
                center: center_a,
                radius: self.cfg.radius_a,
                color: color_a,
            },
            disk_b: Disk {
                center: center_b,
                radius: self.cfg.radius_b,
                color: color_b,
            },
            canvas: self.cfg.canvas,
        };
        scene.validate(self.cfg.edge_margin)?;
        Ok(scene)
    }
}

/// Deterministic layout used when random placement cannot satisfy the
/// separation constraint: quarter-width positions on the horizontal midline.
fn fallback_layout(canvas: Canvas) -> (Point, Point) {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    (
        Point::new((w / 4.0).floor(), (h / 2.0).floor()),
        Point::new((3.0 * w / 4.0).floor(), (h / 2.0).floor()),
    )
}

impl TaskProducer for MergeTaskGenerator {
    #[tracing::instrument(skip(self))]
    fn produce_task(&mut self, task_id: &str) -> ChromergeResult<TaskArtifact> {
        let mut rng = self.task_rng(task_id);

        let scene = self.build_scene(&mut rng)?;
        let prompt = pick_prompt(&mut rng).to_owned();
        let rubric = pick_rubric(&mut rng).to_owned();

        let render_opts = self.cfg.render_opts();
        let first = first_frame(&scene, &render_opts);
        let fin = final_frame(&scene, self.cfg.merged_radius, &render_opts);

        Ok(TaskArtifact {
            task_id: task_id.to_owned(),
            mixed_color: scene.mixed_color(),
            scene,
            prompt,
            rubric,
            first_frame: first,
            final_frame: fin,
        })
    }
}

/// JSON manifest written next to the task images.
#[derive(Debug, serde::Serialize)]
pub struct TaskManifest<'a> {
    pub task_id: &'a str,
    pub prompt: &'a str,
    pub rubric: &'a str,
    pub scene: &'a Scene,
    pub mixed_color: Rgb8,
    pub midpoint: Point,
    pub files: ManifestFiles,
}

/// File names of the artifacts written for one task.
#[derive(Debug, serde::Serialize)]
pub struct ManifestFiles {
    pub first_frame: &'static str,
    pub final_frame: &'static str,
    pub ground_truth_video: Option<&'static str>,
}

/// Persist one task: `first_frame.png`, `final_frame.png`, `task.json`, and
/// (when enabled and ffmpeg is available) `ground_truth.mp4`.
///
/// Returns the video path when one was written.
pub fn write_task_dir(
    artifact: &TaskArtifact,
    cfg: &TaskConfig,
    dir: impl AsRef<Path>,
) -> ChromergeResult<Option<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| {
        ChromergeError::encode(format!(
            "failed to create task directory '{}': {e}",
            dir.display()
        ))
    })?;

    write_png(dir.join("first_frame.png"), &artifact.first_frame)?;
    write_png(dir.join("final_frame.png"), &artifact.final_frame)?;

    let mut video_path = None;
    if cfg.generate_video {
        if is_ffmpeg_on_path() {
            let out = dir.join("ground_truth.mp4");
            render_to_mp4(
                &artifact.scene,
                &cfg.sequence_opts(),
                &cfg.render_opts(),
                &out,
                true,
            )?;
            video_path = Some(out);
        } else {
            tracing::warn!(
                task_id = artifact.task_id,
                "ffmpeg not found on PATH; skipping ground_truth.mp4"
            );
        }
    }

    let manifest = TaskManifest {
        task_id: &artifact.task_id,
        prompt: &artifact.prompt,
        rubric: &artifact.rubric,
        scene: &artifact.scene,
        mixed_color: artifact.mixed_color,
        midpoint: artifact.scene.motion().midpoint,
        files: ManifestFiles {
            first_frame: "first_frame.png",
            final_frame: "final_frame.png",
            ground_truth_video: video_path.is_some().then_some("ground_truth.mp4"),
        },
    };
    let json_path = dir.join("task.json");
    let f = std::fs::File::create(&json_path).map_err(|e| {
        ChromergeError::encode(format!("failed to create '{}': {e}", json_path.display()))
    })?;
    serde_json::to_writer_pretty(f, &manifest)
        .map_err(|e| ChromergeError::serde(format!("failed to write task manifest: {e}")))?;

    Ok(video_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        TaskConfig::default().validate().unwrap();
    }

    #[test]
    fn config_rejects_margin_smaller_than_radius() {
        let cfg = TaskConfig {
            edge_margin: 40.0,
            ..TaskConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_rejects_infeasible_separation() {
        let cfg = TaskConfig {
            min_separation: 10_000.0,
            ..TaskConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_rejects_short_transition() {
        let cfg = TaskConfig {
            transition_frames: 1,
            ..TaskConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_rejects_odd_canvas_only_when_video_is_on() {
        let mut cfg = TaskConfig {
            canvas: Canvas {
                width: 511,
                height: 512,
            },
            ..TaskConfig::default()
        };
        assert!(cfg.validate().is_err());
        cfg.generate_video = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn same_task_id_reproduces_the_same_task() {
        let mut g1 = MergeTaskGenerator::new(TaskConfig::default()).unwrap();
        let mut g2 = MergeTaskGenerator::new(TaskConfig::default()).unwrap();

        let a = g1.produce_task("task_0007").unwrap();
        // Generate an unrelated task first: per-task rngs must not be
        // affected by generation order.
        let _ = g2.produce_task("task_0001").unwrap();
        let b = g2.produce_task("task_0007").unwrap();

        assert_eq!(a.scene.disk_a.center, b.scene.disk_a.center);
        assert_eq!(a.scene.disk_b.color, b.scene.disk_b.color);
        assert_eq!(a.mixed_color, b.mixed_color);
        assert_eq!(a.prompt, b.prompt);
        assert_eq!(a.rubric, b.rubric);
        assert_eq!(a.first_frame, b.first_frame);
        assert_eq!(a.final_frame, b.final_frame);
    }

    #[test]
    fn different_ids_or_seeds_vary_the_task() {
        let mut g = MergeTaskGenerator::new(TaskConfig::default()).unwrap();
        let a = g.produce_task("task_0000").unwrap();
        let b = g.produce_task("task_0001").unwrap();
        assert!(
            a.scene.disk_a.color != b.scene.disk_a.color
                || a.scene.disk_a.center != b.scene.disk_a.center
        );

        let mut g_reseeded = MergeTaskGenerator::new(TaskConfig {
            seed: 1,
            ..TaskConfig::default()
        })
        .unwrap();
        let c = g_reseeded.produce_task("task_0000").unwrap();
        assert!(
            a.scene.disk_a.color != c.scene.disk_a.color
                || a.scene.disk_a.center != c.scene.disk_a.center
        );
    }

    #[test]
    fn produced_scene_honors_placement_constraints() {
        let cfg = TaskConfig::default();
        let mut g = MergeTaskGenerator::new(cfg).unwrap();
        for i in 0..8 {
            let t = g.produce_task(&format!("task_{i:04}")).unwrap();
            t.scene.validate(cfg.edge_margin).unwrap();

            let d = t.scene.disk_a.center.distance(t.scene.disk_b.center);
            let fallback = fallback_layout(cfg.canvas);
            assert!(
                d >= cfg.min_separation
                    || (t.scene.disk_a.center, t.scene.disk_b.center) == fallback
            );
        }
    }

    #[test]
    fn produced_colors_stay_in_the_sampled_band() {
        let mut g = MergeTaskGenerator::new(TaskConfig::default()).unwrap();
        let t = g.produce_task("task_0000").unwrap();
        for c in [t.scene.disk_a.color, t.scene.disk_b.color] {
            assert!(c.r >= 50 && c.g >= 50 && c.b >= 50);
        }
    }
}
