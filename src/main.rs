use anyhow::{Context, Result};
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{info, warn};

mod config;
mod core;
mod face;
mod platform;
mod render;

use crate::core::face::Host;
use crate::core::runner::Runner;
use crate::face::model::WatchFaceConfig;
use crate::face::{codec, describe};
use crate::platform::assets::{AssetDir, FontShelf};
use crate::platform::clock::SystemClock;
use crate::platform::display::Platform;

#[derive(Parser, Debug)]
#[command(name = "clockface", about = "Configurable watch face renderer")]
struct Args {
    /// Resource directory (data.bin, background.png, font_*.ttf)
    #[arg(short, long, default_value = "resources")]
    resources: PathBuf,

    /// Directory of named system fonts (NAME.ttf)
    #[arg(long, default_value = "fonts")]
    system_fonts: PathBuf,

    /// Run from an XML face description instead of the resource blob
    #[arg(long)]
    face: Option<PathBuf>,

    /// Encode the face into a config blob at this path and exit
    #[arg(long)]
    emit_blob: Option<PathBuf>,

    /// Target platform: aplite, basalt, chalk, diorite, emery
    #[arg(long, default_value = "basalt")]
    platform: String,

    /// Hour format: 12 or 24
    #[arg(long, default_value = "24")]
    clock: String,

    /// Frames per second (1-1000)
    #[arg(long, default_value_t = 1)]
    fps: u32,

    /// Stop after this many frames (0 = until Ctrl-C)
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Output mode: png, raw
    #[arg(long, default_value = "png")]
    output: String,

    /// Output file path (for png mode)
    #[arg(long, default_value = "face.png")]
    output_path: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.parse().unwrap_or_default()),
        )
        .with_writer(std::io::stderr)
        .init();

    let platform: Platform = args.platform.parse().map_err(anyhow::Error::msg)?;
    let metrics = platform.metrics();

    info!(
        "clockface v{} starting ({} {}x{})",
        env!("CARGO_PKG_VERSION"),
        platform.name(),
        metrics.width,
        metrics.height
    );

    let face = match &args.face {
        Some(path) => Some(
            describe::parse_face_file(path)?
                .into_config(metrics.color)
                .with_context(|| format!("Invalid face description {}", path.display()))?,
        ),
        None => None,
    };

    if let Some(blob_path) = &args.emit_blob {
        let config = face.unwrap_or_else(|| {
            warn!("No --face given, encoding the default face");
            WatchFaceConfig::default()
        });
        let blob = codec::encode(&config)?;
        std::fs::write(blob_path, &blob)
            .with_context(|| format!("Failed to write blob to {}", blob_path.display()))?;
        info!("Wrote {} byte blob to {}", blob.len(), blob_path.display());
        return Ok(());
    }

    let run_config = config::RunConfig {
        platform,
        fps: args.fps,
        max_frames: args.frames,
        resource_dir: args.resources.clone(),
        system_font_dir: args.system_fonts.clone(),
        hour_format: args.clock.parse().map_err(anyhow::Error::msg)?,
        output_mode: args.output.parse().map_err(anyhow::Error::msg)?,
        output_path: args.output_path.clone(),
    };

    let host = Host {
        display: metrics,
        clock: Box::new(SystemClock::new(run_config.hour_format)),
        resources: Box::new(AssetDir::new(&run_config.resource_dir)),
        fonts: Rc::new(RefCell::new(FontShelf::new(
            &run_config.resource_dir,
            &run_config.system_font_dir,
        ))),
    };

    let mut runner = Runner::new(run_config, host)?;
    runner.run(face).await?;

    info!("clockface shutdown");
    Ok(())
}
