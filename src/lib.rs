//! Chromerge synthesizes short visual scenarios for physical color
//! compositing: two colored disks travel toward each other, fuse at the
//! midpoint between their starting centers, and the overlap region (and the
//! fully merged disk) displays the inverted-additive mixture of the two disk
//! colors.
//!
//! The crate is split into a pure core (color mixing, overlap geometry,
//! motion, rasterization, sequencing) and an I/O rim (PNG/MP4 output, task
//! generation, CLI). The core consumes no randomness and performs no I/O, so
//! identical inputs always reproduce identical frames.
#![forbid(unsafe_code)]

pub mod color;
pub mod core;
pub mod encode;
pub mod error;
pub mod geometry;
mod math;
pub mod motion;
pub mod prompts;
pub mod render;
pub mod scene;
pub mod sequence;
pub mod task;

pub use color::mix_subtractive;
pub use crate::core::{Canvas, Fps, FrameIndex, Point, Rgb8, Vec2};
pub use encode::{
    FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, SinkConfig, ensure_parent_dir,
    is_ffmpeg_on_path, write_png,
};
pub use error::{ChromergeError, ChromergeResult};
pub use geometry::{OverlapKind, RegionLabel, classify_overlap, label_point};
pub use motion::MotionPlan;
pub use render::{FrameRgb, Outline, RenderOptions, render_instant, render_merged};
pub use scene::{Disk, Scene};
pub use sequence::{
    MergedRadius, SequenceOpts, final_frame, first_frame, frame_at, render_sequence,
    render_to_mp4, sequence_frames,
};
pub use task::{MergeTaskGenerator, TaskArtifact, TaskConfig, TaskProducer, write_task_dir};
