use std::fs;
use std::path::Path;

use chromerge::{MergeTaskGenerator, TaskConfig, TaskProducer as _, write_task_dir};

#[test]
fn config_json_fills_missing_fields_with_defaults() {
    let cfg: TaskConfig = serde_json::from_str(r#"{"seed": 9, "transition_frames": 10}"#).unwrap();
    assert_eq!(cfg.seed, 9);
    assert_eq!(cfg.transition_frames, 10);

    let defaults = TaskConfig::default();
    assert_eq!(cfg.canvas, defaults.canvas);
    assert_eq!(cfg.radius_a, defaults.radius_a);
    assert_eq!(cfg.edge_margin, defaults.edge_margin);
    assert_eq!(cfg.fps, defaults.fps);
    assert_eq!(cfg.merged_radius, defaults.merged_radius);
    assert_eq!(cfg.generate_video, defaults.generate_video);
    cfg.validate().unwrap();
}

#[test]
fn config_json_accepts_nested_fields() {
    let cfg: TaskConfig = serde_json::from_str(
        r#"{
            "canvas": {"width": 256, "height": 256},
            "radius_a": 30.0,
            "radius_b": 20.0,
            "edge_margin": 40.0,
            "min_separation": 100.0,
            "background": {"r": 255, "g": 255, "b": 255},
            "merged_radius": "disk_a",
            "fps": {"num": 30, "den": 1},
            "generate_video": false
        }"#,
    )
    .unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas.width, 256);
    assert_eq!(cfg.fps.as_f64(), 30.0);
    assert_eq!(
        cfg.sequence_opts().merged_radius,
        chromerge::MergedRadius::DiskA
    );
}

#[test]
fn unknown_merged_radius_variant_is_rejected() {
    let parsed: Result<TaskConfig, _> =
        serde_json::from_str(r#"{"merged_radius": "smaller"}"#);
    assert!(parsed.is_err());
}

#[test]
fn task_ids_reproduce_across_generator_instances() {
    let cfg = TaskConfig {
        seed: 42,
        generate_video: false,
        ..TaskConfig::default()
    };
    let a = MergeTaskGenerator::new(cfg)
        .unwrap()
        .produce_task("task_0003")
        .unwrap();
    let b = MergeTaskGenerator::new(cfg)
        .unwrap()
        .produce_task("task_0003")
        .unwrap();

    assert_eq!(a.scene.disk_a.center, b.scene.disk_a.center);
    assert_eq!(a.scene.disk_b.center, b.scene.disk_b.center);
    assert_eq!(a.scene.disk_a.color, b.scene.disk_a.color);
    assert_eq!(a.prompt, b.prompt);
    assert_eq!(a.first_frame, b.first_frame);
}

#[test]
fn write_task_dir_persists_images_and_manifest() {
    let cfg = TaskConfig {
        generate_video: false,
        ..TaskConfig::default()
    };
    let mut generator = MergeTaskGenerator::new(cfg).unwrap();
    let artifact = generator.produce_task("task_0000").unwrap();

    let dir = Path::new("target/task_gen_tests/task_0000");
    let video = write_task_dir(&artifact, generator.config(), dir).unwrap();
    assert!(video.is_none());

    assert!(dir.join("first_frame.png").is_file());
    assert!(dir.join("final_frame.png").is_file());
    assert!(!dir.join("ground_truth.mp4").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("task.json")).unwrap()).unwrap();
    assert_eq!(manifest["task_id"], "task_0000");
    assert_eq!(manifest["files"]["first_frame"], "first_frame.png");
    assert!(manifest["files"]["ground_truth_video"].is_null());
    assert!(manifest["prompt"].as_str().unwrap().contains("merge"));
    assert!(manifest["scene"]["disk_a"]["radius"].as_f64().unwrap() > 0.0);
    assert!(manifest["mixed_color"]["r"].is_u64());
    assert_eq!(manifest["midpoint"]["x"], {
        let mid = artifact.scene.motion().midpoint;
        serde_json::json!(mid.x)
    });
}

#[test]
fn prompt_and_rubric_come_from_the_pools() {
    let mut generator = MergeTaskGenerator::new(TaskConfig {
        generate_video: false,
        ..TaskConfig::default()
    })
    .unwrap();
    let artifact = generator.produce_task("task_0000").unwrap();
    assert!(chromerge::prompts::all_prompts().contains(&artifact.prompt.as_str()));
    assert!(chromerge::prompts::all_rubrics().contains(&artifact.rubric.as_str()));
}
