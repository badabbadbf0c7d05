use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twobit_pixel_art::{Palette, TransformOptions, palettes, pixelate_bytes};

/// Turn images into 2-bit pixel art with a 4-color palette.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required_unless_present = "list")]
    inputs: Vec<PathBuf>,

    /// Edge length of each art pixel, in source pixels
    #[arg(short = 's', long, default_value_t = 4)]
    pixel_size: u32,

    /// Built-in palette name (see --list)
    #[arg(short = 'c', long, default_value = "2bit_demichrome")]
    palette: String,

    /// Comma-separated list of 4 hex colors, overrides --palette
    #[arg(long)]
    colors: Option<String>,

    /// Clustering seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of seeded k-means restarts
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "pixelart_")]
    prefix: String,

    /// Print a JSON report per file instead of plain text
    #[arg(long)]
    json: bool,

    /// List the built-in palettes and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twobit_pixel_art=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args = Args::parse();

    if args.list {
        for name in palettes::names() {
            let palette = palettes::lookup(name)?;
            println!("{name:<16} {}", palette.to_hex().join(" "));
        }
        return Ok(());
    }

    let palette = match &args.colors {
        Some(list) => {
            let hex: Vec<&str> = list.split(',').map(str::trim).collect();
            Palette::from_hex(&hex).context("invalid --colors")?
        }
        None => palettes::lookup(&args.palette)?,
    };
    let options = TransformOptions::new(args.pixel_size).seed(args.seed).runs(args.runs);

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let out = pixelate_bytes(&bytes, &palette, &options)
            .with_context(|| format!("pixel art conversion failed for {}", input.display()))?;

        let out_path = if let Some(dir) = &args.out_dir {
            let Some(stem) = input.file_stem() else {
                bail!("input has no file name: {}", input.display());
            };
            dir.join(format!("{}.png", stem.to_string_lossy()))
        } else {
            let Some(stem) = input.file_stem() else {
                bail!("input has no file name: {}", input.display());
            };
            PathBuf::from(format!("{}{}.png", args.prefix, stem.to_string_lossy()))
        };

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, &out.png).with_context(|| format!("writing {}", out_path.display()))?;

        if args.json {
            let report = json!({
                "input": input.display().to_string(),
                "output": out_path.display().to_string(),
                "pixel_size": args.pixel_size,
                "seed": args.seed,
                "centroids": out.centroids,
                "mapping": out.mapping,
            });
            println!("{report}");
        } else {
            println!("Saved → {}", out_path.display());
        }
    }

    Ok(())
}
