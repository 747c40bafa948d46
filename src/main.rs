use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cmyk_halftone::{Channel, PrnFile};
use prn_rip::models::{JobConfig, JobParameters};
use prn_rip::services::{load_png, sibling_output_path, unique_output_path, PrintPipeline};

#[derive(Parser)]
#[command(name = "prn-rip")]
#[command(about = "Convert RGB images to halftoned CMYK PRN spool files")]
struct Cli {
    /// Log every pipeline stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PNG image to a PRN file
    Convert(ConvertArgs),
    /// Print the header and ink coverage of a PRN file
    Inspect {
        /// PRN file to read
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Source PNG image
    #[arg(short, long)]
    input: PathBuf,

    /// Output PRN file (default: input with .prn extension)
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write to a non-clashing name in this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// YAML job file; command line options override its values
    #[arg(short, long)]
    job: Option<PathBuf>,

    /// Dithering selector: 0-2 error diffusion, 3+ ordered
    #[arg(short, long)]
    dithering: Option<u32>,

    /// Target horizontal resolution in DPI
    #[arg(long)]
    x_res: Option<f64>,

    /// Target vertical resolution in DPI
    #[arg(long)]
    y_res: Option<f64>,

    /// Output width as a percentage of the source's physical width
    #[arg(long)]
    width_pct: Option<f64>,

    /// Output height as a percentage of the source's physical height
    #[arg(long)]
    height_pct: Option<f64>,

    /// RGB ICC profile
    #[arg(long)]
    rgb_profile: Option<PathBuf>,

    /// CMYK ICC profile
    #[arg(long)]
    cmyk_profile: Option<PathBuf>,

    /// Worker threads (default: number of CPUs)
    #[arg(short, long)]
    threads: Option<usize>,
}

impl ConvertArgs {
    fn job_config(&self) -> anyhow::Result<JobConfig> {
        let mut config = match &self.job {
            Some(path) => JobConfig::load(path)?,
            None => JobConfig::default(),
        };

        if let Some(v) = self.dithering {
            config.dithering = v;
        }
        if let Some(v) = self.x_res {
            config.x_resolution = v;
        }
        if let Some(v) = self.y_res {
            config.y_resolution = v;
        }
        if let Some(v) = self.width_pct {
            config.width_percentage = v;
        }
        if let Some(v) = self.height_pct {
            config.height_percentage = v;
        }
        if let Some(v) = &self.rgb_profile {
            config.rgb_profile = v.clone();
        }
        if let Some(v) = &self.cmyk_profile {
            config.cmyk_profile = v.clone();
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }

        config.validate()?;
        Ok(config)
    }

    fn output_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }
        match &self.output_dir {
            Some(dir) => unique_output_path(dir, &self.input).with_context(|| {
                format!("No free output name left in {}", dir.display())
            }),
            None => Ok(sibling_output_path(&self.input)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(args) => run_convert_command(&args),
        Commands::Inspect { path } => run_inspect_command(&path),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "prn_rip=debug,cmyk_halftone=debug"
    } else {
        "prn_rip=info,cmyk_halftone=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Convert one image to a PRN file
fn run_convert_command(args: &ConvertArgs) -> anyhow::Result<()> {
    let config = args.job_config()?;

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker pool")?;
    }

    let raster = load_png(&args.input)?;
    let params = JobParameters::resolve(&config, &raster)?;
    let output = args.output_path()?;

    let pipeline = PrintPipeline::new(&params)?;
    let report = pipeline
        .run(&raster, &params, &output)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    println!(
        "Wrote {} ({}x{} px, {} tones, {}, {} bytes)",
        output.display(),
        report.output_width,
        report.output_height,
        report.level,
        report.method,
        report.file_size
    );
    for timing in &report.timings {
        tracing::debug!(
            stage = timing.stage,
            started = %timing.started.to_rfc3339(),
            ms = timing.duration.as_secs_f64() * 1000.0,
            "Timing"
        );
    }
    Ok(())
}

/// Dump a PRN header and per-channel coverage
fn run_inspect_command(path: &Path) -> anyhow::Result<()> {
    let prn = PrnFile::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let header = prn.header();

    println!("{}", path.display());
    println!("  resolution:     {} x {} dpi", header.x_dpi, header.y_dpi);
    println!("  size:           {} x {} px", header.width, header.height);
    println!("  bytes per line: {}", header.bytes_per_line);
    println!("  colors:         {}", header.color_count);
    println!(
        "  tones:          {} (bits code {})",
        prn.level(),
        header.bits_code
    );
    println!("  coverage:");
    for channel in Channel::PRN_ORDER {
        println!(
            "    {}: {:>6.2}%",
            channel.letter(),
            prn.coverage(channel) * 100.0
        );
    }
    Ok(())
}
