use anyhow::{bail, Context, Result};
use clap::Parser;
use ffhevc::{
    config::TranscodeConfig,
    scan, FailurePolicy, Preset,
};
use std::path::PathBuf;
use std::process::ExitCode;
use log::{error, info, LevelFilter};

/// Batch transcode video files to H.265 with ffmpeg
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input files and/or directories (directories are not recursed)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to configuration file (JSON or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for outputs (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Explicit output file name (single input only)
    #[arg(long)]
    output_name: Option<String>,

    /// Video codec passed to -c:v
    #[arg(long)]
    codec: Option<String>,

    /// Output container
    #[arg(long)]
    container: Option<String>,

    /// Constant rate factor
    #[arg(long)]
    crf: Option<u32>,

    /// Speed preset: fast, medium or slow
    #[arg(long)]
    preset: Option<Preset>,

    /// Encoder binary name or path
    #[arg(long)]
    encoder: Option<PathBuf>,

    /// Insert the codec name into derived output names
    #[arg(long)]
    tag_codec: bool,

    /// Do not pass -f <container> to the encoder
    #[arg(long)]
    no_format_flag: bool,

    /// Include dot-files when scanning directories
    #[arg(long)]
    include_hidden: bool,

    /// Continue with the next file after a failure
    #[arg(short, long)]
    keep_going: bool,

    /// Print the encoder commands without running them
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON report of per-file results
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Command-line flags win over the config file
fn apply_overrides(cfg: &mut TranscodeConfig, args: &Args) {
    if let Some(dir) = &args.output_dir {
        cfg.output_dir = Some(dir.clone());
    }
    if let Some(codec) = &args.codec {
        cfg.video_codec = codec.clone();
    }
    if let Some(container) = &args.container {
        cfg.container = container.clone();
    }
    if let Some(crf) = args.crf {
        cfg.crf = crf;
    }
    if let Some(preset) = args.preset {
        cfg.preset = preset;
    }
    if let Some(encoder) = &args.encoder {
        cfg.encoder_bin = encoder.clone();
    }
    if args.tag_codec {
        cfg.tag_codec = true;
    }
    if args.no_format_flag {
        cfg.format_flag = false;
    }
    if args.include_hidden {
        cfg.ignore_hidden = false;
    }
    if args.keep_going {
        cfg.keep_going = true;
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Use RUST_LOG if set, --verbose forces debug
    let mut builder = env_logger::Builder::from_default_env();
    builder.format_timestamp_secs();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Info);
    }
    builder.init();

    let mut cfg = TranscodeConfig::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    apply_overrides(&mut cfg, &args);

    info!("Configuration loaded:");
    info!("  Encoder: {}", cfg.encoder_bin.display());
    info!("  Codec: {}  Container: {}  CRF: {}  Preset: {}", cfg.video_codec, cfg.container, cfg.crf, cfg.preset);
    match &cfg.output_dir {
        Some(dir) => info!("  Output dir: {}", dir.display()),
        None => info!("  Output dir: next to input"),
    }

    let inputs = scan::collect_inputs(&args.inputs, cfg.ignore_hidden)
        .context("Failed to collect input files")?;
    info!("Task count: {}", inputs.len());

    let mut template = cfg.job_template();
    if let Some(name) = &args.output_name {
        if inputs.len() != 1 {
            bail!("--output-name needs exactly one input file, got {}", inputs.len());
        }
        template.set_output_name(name.as_str());
    }

    if args.dry_run {
        for input in &inputs {
            let mut job = template.clone();
            job.set_input(input);
            println!("{}", job.preview());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let policy = if cfg.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::FailFast
    };

    let report = ffhevc::run_batch(&template, &inputs, policy).await;

    if let Some(path) = &args.report {
        report.save(path)?;
        info!("Report written to {}", path.display());
    }

    if let Some(failed) = report.first_failure() {
        error!(
            "{} file(s) failed, first: {} ({})",
            report.count(ffhevc::JobStatus::Failed),
            failed.input.display(),
            failed.reason.as_deref().unwrap_or("unknown error")
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
