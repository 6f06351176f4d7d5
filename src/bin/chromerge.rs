use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use chromerge::{MergeTaskGenerator, TaskConfig, TaskProducer as _};

#[derive(Parser, Debug)]
#[command(name = "chromerge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a batch of task directories (PNGs, manifest, optional MP4).
    Generate(GenerateArgs),
    /// Render a single task instant as a PNG (debugging aid).
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Output directory; one subdirectory is created per task.
    #[arg(long)]
    out: PathBuf,

    /// Number of tasks to generate.
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Optional task configuration JSON (missing fields use defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the batch seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip ground-truth video output even when the configuration enables it.
    #[arg(long)]
    no_video: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Task id whose scene should be rendered.
    #[arg(long, default_value = "task_0000")]
    task_id: String,

    /// Normalized animation time in [0, 1].
    #[arg(long)]
    t: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Optional task configuration JSON (missing fields use defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the batch seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<TaskConfig> {
    let mut cfg = match path {
        Some(p) => {
            let f = File::open(p).with_context(|| format!("open config '{}'", p.display()))?;
            let r = BufReader::new(f);
            serde_json::from_reader(r).with_context(|| "parse task config JSON")?
        }
        None => TaskConfig::default(),
    };
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref(), args.seed)?;
    if args.no_video {
        cfg.generate_video = false;
    }
    if cfg.generate_video && !chromerge::is_ffmpeg_on_path() {
        eprintln!("warning: ffmpeg not found on PATH; ground-truth videos will be skipped");
    }

    let mut generator = MergeTaskGenerator::new(cfg)?;
    for i in 0..args.count {
        let task_id = format!("task_{i:04}");
        let artifact = generator
            .produce_task(&task_id)
            .with_context(|| format!("generate {task_id}"))?;

        let dir = args.out.join(&task_id);
        let video = chromerge::write_task_dir(&artifact, generator.config(), &dir)
            .with_context(|| format!("write {task_id}"))?;

        match video {
            Some(v) => eprintln!("wrote {} (+ {})", dir.display(), v.display()),
            None => eprintln!("wrote {}", dir.display()),
        }
    }

    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), args.seed)?;

    let mut generator = MergeTaskGenerator::new(cfg)?;
    let artifact = generator.produce_task(&args.task_id)?;

    let frame = chromerge::frame_at(&artifact.scene, args.t, &cfg.render_opts());
    chromerge::write_png(&args.out, &frame)?;

    eprintln!(
        "wrote {} (task {}, t = {})",
        args.out.display(),
        artifact.task_id,
        args.t
    );
    Ok(())
}
