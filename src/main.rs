use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use icon_extract::{IconExtractor, OutputConfig};

#[derive(Parser)]
#[command(name = "icon-extract")]
#[command(about = "Crop icon-shaped regions out of a screenshot and record their bounds")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE", default_value = "Equity Portfolio.png")]
    image_path: PathBuf,

    /// Directory receiving icon_<k>.png files and the manifest
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Manifest file name, relative to the output directory
    #[arg(long, value_name = "NAME", default_value = "icons.json")]
    manifest: String,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let output = OutputConfig {
        dir: args.output_dir,
        manifest_name: args.manifest,
    };
    let manifest_path = output.manifest_path();

    let mut extractor = IconExtractor::new(output).with_verbose(args.verbose);
    if let Some(debug_dir) = args.debug_out {
        extractor = extractor.with_debug(debug_dir);
    }

    extractor
        .run(&args.image_path)
        .with_context(|| format!("icon extraction from {} failed", args.image_path.display()))?;

    // icons.json, not ./icons.json
    let shown = manifest_path.strip_prefix(".").unwrap_or(manifest_path.as_path());
    println!("Icons extracted and saved to {}", shown.display());

    Ok(())
}
