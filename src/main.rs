use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use svg2png::shell::{convert_file, user_message};
use svg2png::{RasterConfig, Rasterizer, Rgba};

/// Convert an SVG image into an opaque, oversampled PNG
#[derive(Parser, Debug)]
#[command(name = "svg2png", version, about)]
struct Args {
    /// SVG file to convert
    input: PathBuf,

    /// Directory for the PNG (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Oversampling factor
    #[arg(short, long)]
    scale: Option<u32>,

    /// Opaque background fill as #rgb or #rrggbb
    #[arg(short, long)]
    background: Option<Rgba>,

    /// Decode deadline in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Reject files that do not start like SVG markup
    #[arg(long)]
    sniff: bool,

    /// Skip loading system fonts (text elements will not render)
    #[arg(long)]
    no_system_fonts: bool,

    /// Print a data: URL of the PNG on stdout
    #[arg(long)]
    data_url: bool,
}

fn build_config(args: &Args) -> anyhow::Result<RasterConfig> {
    let mut cfg = match &args.config {
        Some(path) => RasterConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RasterConfig::default(),
    };
    if let Some(scale) = args.scale {
        cfg.scale = scale;
    }
    if let Some(bg) = args.background {
        cfg.background = bg;
    }
    if let Some(ms) = args.timeout_ms {
        cfg.decode_timeout_ms = ms;
    }
    if args.sniff {
        cfg.sniff_markup = true;
    }
    if args.no_system_fonts {
        cfg.load_system_fonts = false;
    }
    Ok(cfg)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let cfg = build_config(&args)?;
    log::debug!("Using configuration {:?}", cfg);
    let rasterizer = Rasterizer::new(cfg).context("invalid configuration")?;

    match convert_file(&rasterizer, &args.input, args.output_dir.as_deref()).await {
        Ok((path, result)) => {
            if args.data_url {
                println!("{}", result.data_url());
            } else {
                println!("{}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", user_message(&e));
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
