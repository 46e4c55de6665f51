#![deny(unsafe_code)]
//! CLI binary for the LIC renderer.
//!
//! Subcommands:
//! - `render <field>`: render one LIC image of a synthetic field to PNG
//! - `animate <field>`: render a frame sequence with a moving weight window
//! - `list`: print available fields and noise kinds

mod error;

use clap::{ArgAction, Args, Parser, Subcommand};
use error::CliError;
use lic_core::{NoiseKind, RenderOutcome};
use lic_harness::snapshot::{write_frames, write_png};
use lic_harness::{render_spec, FieldKind, RenderSpec};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::AtomicBool;

const DEFAULT_SIZE: usize = 256;
const DEFAULT_SEED: u32 = 42;

#[derive(Parser)]
#[command(name = "lic", about = "Line Integral Convolution renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by `render` and `animate`. Each overrides the matching
/// value from `--spec` when given.
#[derive(Args, Debug, Default)]
struct LicArgs {
    /// Field name (see `lic list`); optional when `--spec` names one.
    field: Option<String>,

    /// Load a JSON render spec.
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Canvas width in pixels [default: 256].
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Canvas height in pixels [default: 256].
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Noise frequency [default: 1.0].
    #[arg(long)]
    frequency: Option<f32>,

    /// Integration steps per direction [default: 15].
    #[arg(long)]
    steps: Option<usize>,

    /// Enable the triangular weight window.
    #[arg(long)]
    window: bool,

    /// Weight window half-width [default: 5].
    #[arg(long)]
    window_width: Option<usize>,

    /// Weight window centre offset [default: 0].
    #[arg(long, allow_hyphen_values = true)]
    window_offset: Option<i64>,

    /// Noise texture [default: coherent].
    #[arg(long, value_parser = ["coherent", "tile"])]
    noise: Option<String>,

    /// Sample the vector field bilinearly instead of nearest-pixel.
    #[arg(long)]
    bilinear: bool,

    /// Seed for noise and random fields [default: 42].
    #[arg(long)]
    seed: Option<u32>,

    /// Field parameters as a JSON object.
    #[arg(long)]
    params: Option<String>,

    /// Render threads [default: available parallelism].
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Render one LIC image to PNG.
    Render {
        #[command(flatten)]
        lic: LicArgs,

        /// Output file path.
        #[arg(short, long, default_value = "lic.png")]
        output: PathBuf,
    },
    /// Render a frame sequence, advancing the weight window each frame.
    Animate {
        #[command(flatten)]
        lic: LicArgs,

        /// Number of frames.
        #[arg(long, default_value_t = 30)]
        frames: usize,

        /// Window offset change per frame.
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        offset_step: i64,

        /// Output directory for `frame_NNNN.png` files.
        #[arg(short, long, default_value = "frames")]
        output: PathBuf,
    },
    /// List available fields and noise kinds.
    List,
}

/// Builds the render spec from an optional spec file plus flag overrides.
fn build_spec(args: &LicArgs) -> Result<RenderSpec, CliError> {
    let mut spec = match &args.spec {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            RenderSpec::from_json(&text)?
        }
        None => {
            let field = args
                .field
                .as_deref()
                .ok_or_else(|| CliError::Input("a field name or --spec is required".into()))?;
            RenderSpec::new(field, DEFAULT_SIZE, DEFAULT_SIZE, DEFAULT_SEED)
        }
    };

    if let Some(field) = &args.field {
        spec.field = field.clone();
    }
    if let Some(w) = args.width {
        spec.width = w;
    }
    if let Some(h) = args.height {
        spec.height = h;
    }
    if let Some(seed) = args.seed {
        spec.seed = seed;
    }
    if let Some(params) = &args.params {
        spec.field_params = serde_json::from_str(params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    }

    let lic = &mut spec.lic;
    if let Some(f) = args.frequency {
        lic.frequency = f;
    }
    if let Some(n) = args.steps {
        lic.num_steps = n;
    }
    if args.window {
        lic.use_weight_window = true;
    }
    if let Some(w) = args.window_width {
        lic.weight_window_width = w;
    }
    if let Some(o) = args.window_offset {
        lic.weight_window_offset = o;
    }
    if let Some(noise) = &args.noise {
        lic.noise = noise.clone();
    }
    if args.bilinear {
        lic.bilinear = true;
    }

    spec.validate()?;
    Ok(spec)
}

fn thread_count(requested: Option<usize>) -> usize {
    requested
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1)
        .max(1)
}

fn outcome_label(outcome: RenderOutcome) -> String {
    match outcome {
        RenderOutcome::Completed { rows } => format!("completed ({rows} rows)"),
        RenderOutcome::Aborted { rows_completed } => {
            format!("aborted after {rows_completed} rows")
        }
    }
}

fn render(
    args: &LicArgs,
    output: &Path,
    json: bool,
    abort: &AtomicBool,
) -> Result<(), CliError> {
    let spec = build_spec(args)?;
    let threads = thread_count(args.threads);
    let (out, outcome) = render_spec(&spec, threads, abort)?;
    write_png(&out, output)?;

    if json {
        let info = serde_json::json!({
            "spec": spec,
            "threads": threads,
            "complete": outcome.is_complete(),
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({}x{}, {} steps, seed {}) {} -> {}",
            spec.field,
            spec.width,
            spec.height,
            spec.lic.num_steps,
            spec.seed,
            outcome_label(outcome),
            output.display()
        );
    }
    Ok(())
}

fn animate(
    args: &LicArgs,
    frames: usize,
    offset_step: i64,
    output: &Path,
    json: bool,
    abort: &AtomicBool,
) -> Result<(), CliError> {
    let spec = build_spec(args)?;
    let threads = thread_count(args.threads);
    let paths = write_frames(&spec, frames, offset_step, threads, abort, output)?;

    if json {
        let info = serde_json::json!({
            "spec": spec,
            "frames": paths.len(),
            "offset_step": offset_step,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {}/{frames} frames of {} -> {}",
            paths.len(),
            spec.field,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli, abort: &AtomicBool) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let fields = FieldKind::list_fields();
            let noises: Vec<&str> = NoiseKind::ALL.iter().map(|k| k.name()).collect();
            if cli.json {
                let info = serde_json::json!({
                    "fields": fields,
                    "noise": noises,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Fields:");
                for name in fields {
                    println!("  {name}");
                }
                println!("Noise:");
                println!("  {}", noises.join(", "));
            }
            Ok(())
        }
        Command::Render { lic, output } => render(&lic, &output, cli.json, abort),
        Command::Animate {
            lic,
            frames,
            offset_step,
            output,
        } => animate(&lic, frames, offset_step, &output, cli.json, abort),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    let abort = AtomicBool::new(false);
    if let Err(e) = run(cli, &abort) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
