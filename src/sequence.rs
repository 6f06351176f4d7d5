use std::path::Path;

use crate::{
    core::{Fps, FrameIndex},
    encode::{FfmpegSink, FfmpegSinkOpts, FrameSink, SinkConfig},
    error::{ChromergeError, ChromergeResult},
    render::{FrameRgb, RenderOptions, render_instant, render_merged},
    scene::Scene,
};

/// Radius of the fused terminal disk when the two radii differ.
///
/// The merge geometry itself does not pin this down, so it is an explicit
/// policy rather than an implicit default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergedRadius {
    /// Always use disk A's radius.
    DiskA,
    /// Always use disk B's radius.
    DiskB,
    /// Use the larger of the two radii (the natural union extent at t=1).
    #[default]
    Larger,
}

impl MergedRadius {
    /// Resolve the policy against the two scene radii.
    pub fn resolve(self, radius_a: f64, radius_b: f64) -> f64 {
        match self {
            Self::DiskA => radius_a,
            Self::DiskB => radius_b,
            Self::Larger => radius_a.max(radius_b),
        }
    }
}

/// Sequencing policy for a full animation.
#[derive(Clone, Copy, Debug)]
pub struct SequenceOpts {
    /// Number of transition frames sampled at `t_i = i / (frame_count - 1)`.
    /// Must be >= 2 so the first and last frames differ in `t`.
    pub frame_count: u32,
    /// Output frame rate (video timing only; the motion is normalized).
    pub fps: Fps,
    /// Copies of the first frame held before the transition.
    pub hold_first: u32,
    /// Copies of the final frame held after the transition.
    pub hold_last: u32,
    /// Radius policy for the fused terminal disk.
    pub merged_radius: MergedRadius,
}

impl SequenceOpts {
    /// Reject-early check, surfaced before any rendering work.
    pub fn validate(&self) -> ChromergeResult<()> {
        if self.frame_count < 2 {
            return Err(ChromergeError::validation(
                "frame_count must be >= 2 (first and last frames must differ in t)",
            ));
        }
        Ok(())
    }
}

/// Render the scene at an arbitrary normalized time.
pub fn frame_at(scene: &Scene, t: f64, opts: &RenderOptions) -> FrameRgb {
    let (a, b) = scene.motion().at(t);
    render_instant(scene, a, b, opts)
}

/// The t=0 frame: both disks at their starting centers.
pub fn first_frame(scene: &Scene, opts: &RenderOptions) -> FrameRgb {
    frame_at(scene, 0.0, opts)
}

/// The terminal frame: a single fused disk at the midpoint, filled with the
/// mixed color. The radius follows the supplied policy.
pub fn final_frame(scene: &Scene, merged_radius: MergedRadius, opts: &RenderOptions) -> FrameRgb {
    render_merged(
        scene.canvas,
        scene.motion().midpoint,
        merged_radius.resolve(scene.disk_a.radius, scene.disk_b.radius),
        scene.mixed_color(),
        opts,
    )
}

/// The core sequence contract: exactly `frame_count` frames, monotone in `t`,
/// terminating exactly at `t = 1`. No hold frames.
pub fn sequence_frames(
    scene: &Scene,
    frame_count: u32,
    opts: &RenderOptions,
) -> ChromergeResult<Vec<FrameRgb>> {
    if frame_count < 2 {
        return Err(ChromergeError::validation(
            "frame_count must be >= 2 (first and last frames must differ in t)",
        ));
    }

    let last = f64::from(frame_count - 1);
    Ok((0..frame_count)
        .map(|i| frame_at(scene, f64::from(i) / last, opts))
        .collect())
}

/// Drive the full animation into a [`FrameSink`] in nondecreasing `t` order.
///
/// The sink receives `hold_first` copies of the first frame, the
/// `frame_count` transition frames, then `hold_last` copies of the terminal
/// frame, with strictly increasing frame indices throughout. There are no
/// frames beyond full merge; `t = 1` is reached by construction, not by
/// observation.
#[tracing::instrument(skip(scene, opts, render_opts, sink))]
pub fn render_sequence(
    scene: &Scene,
    opts: &SequenceOpts,
    render_opts: &RenderOptions,
    sink: &mut dyn FrameSink,
) -> ChromergeResult<()> {
    opts.validate()?;

    sink.begin(SinkConfig {
        width: scene.canvas.width,
        height: scene.canvas.height,
        fps: opts.fps,
    })?;

    let mut idx = 0u64;
    let mut push = |sink: &mut dyn FrameSink, frame: &FrameRgb| -> ChromergeResult<()> {
        sink.push_frame(FrameIndex(idx), frame)?;
        idx += 1;
        Ok(())
    };

    let first = first_frame(scene, render_opts);
    for _ in 0..opts.hold_first {
        push(sink, &first)?;
    }

    let last = f64::from(opts.frame_count - 1);
    for i in 0..opts.frame_count {
        let frame = if i == 0 {
            first.clone()
        } else {
            frame_at(scene, f64::from(i) / last, render_opts)
        };
        push(sink, &frame)?;
    }

    let fin = final_frame(scene, opts.merged_radius, render_opts);
    for _ in 0..opts.hold_last {
        push(sink, &fin)?;
    }

    sink.end()
}

/// Render the full animation straight into an MP4 via the system `ffmpeg`.
pub fn render_to_mp4(
    scene: &Scene,
    opts: &SequenceOpts,
    render_opts: &RenderOptions,
    out_path: impl AsRef<Path>,
    overwrite: bool,
) -> ChromergeResult<()> {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: out_path.as_ref().to_path_buf(),
        overwrite,
    });
    render_sequence(scene, opts, render_opts, &mut sink)
}
