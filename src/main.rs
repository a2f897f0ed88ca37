//! Snapcam CLI
//!
//! Drives the capture widget end to end: acquire a camera, optionally
//! switch and zoom, take stills into the download directory, then print
//! the gallery the shell would render.

use clap::Parser;
use futures::executor::block_on;
use snapcam::{
    capture::{CameraPlatform, FacingMode, FileConfig, MockPlatform},
    gallery::GalleryShell,
    metrics::{MetricsRegistry, MetricsSnapshot},
    photo::DirectoryDownloads,
    widget::CaptureWidget,
};
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "snapcam", version, about = "Camera capture widget demo")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera to try first (environment/back or user/front)
    #[arg(long)]
    facing: Option<FacingMode>,

    /// Page origin for the secure-context check (mock platform)
    #[arg(long, default_value = "https://localhost")]
    origin: String,

    /// Native frame size of the mock platform
    #[arg(long, default_value = "1280x720")]
    resolution: Resolution,

    /// Cameras the mock platform reports as missing
    #[arg(long = "unavailable")]
    unavailable: Vec<FacingMode>,

    /// Zoom-in steps (0.1x each) before capturing
    #[arg(long, default_value_t = 0)]
    zoom_in: u32,

    /// Zoom-out steps (0.1x each) before capturing
    #[arg(long, default_value_t = 0)]
    zoom_out: u32,

    /// Switch to the other camera before capturing
    #[arg(long)]
    switch: bool,

    /// Number of stills to take
    #[arg(short = 'n', long, default_value_t = 1)]
    shots: u32,

    /// Download directory (overrides the config file)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Use the host's real cameras
    #[cfg(feature = "camera")]
    #[arg(long)]
    native: bool,

    /// Print Prometheus metrics when done
    #[arg(long)]
    metrics: bool,
}

#[derive(Debug, Clone, Copy)]
struct Resolution {
    width: u32,
    height: u32,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = w.trim().parse().map_err(|e| format!("bad width: {}", e))?;
        let height = h.trim().parse().map_err(|e| format!("bad height: {}", e))?;
        if width == 0 || height == 0 {
            return Err("resolution must be non-zero".to_string());
        }
        Ok(Self { width, height })
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Snapcam v{}", snapcam::VERSION);

    if let Err(e) = dispatch(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    if let Some(facing) = args.facing {
        config.capture.preferred_facing = facing;
    }
    if let Some(out) = &args.out {
        config.photo.download_dir = out.clone();
    }
    config.validate()?;

    #[cfg(feature = "camera")]
    {
        if args.native {
            let platform = snapcam::capture::NativePlatform::new(config.native.clone());
            return run(platform, &args, &config);
        }
    }

    let platform = MockPlatform::new()
        .with_origin(args.origin.clone())
        .with_resolution(args.resolution.width, args.resolution.height);
    for facing in &args.unavailable {
        platform.set_unavailable(*facing, true);
    }
    info!("Using mock camera input");
    run(platform, &args, &config)
}

fn run<P: CameraPlatform>(platform: P, args: &Args, config: &FileConfig) -> Result<(), Box<dyn Error>> {
    let downloads = DirectoryDownloads::new(&config.photo.download_dir);
    let widget = CaptureWidget::new(platform, config.capture.clone(), downloads);
    let gallery = GalleryShell::new(widget.clone(), config.gallery.clone());

    if let Err(e) = block_on(widget.start_camera()) {
        if let Some(banner) = widget.view().error {
            eprintln!("{} [{}]", banner.message, banner.retry_label);
        }
        widget.teardown();
        return Err(e.into());
    }

    if args.switch {
        match block_on(widget.switch_camera()) {
            Ok(facing) => info!("Switched to {} camera", facing.label()),
            Err(e) => warn!("{}", e),
        }
    }

    for _ in 0..args.zoom_in {
        widget.zoom_in();
    }
    for _ in 0..args.zoom_out {
        widget.zoom_out();
    }

    let view = widget.view();
    for line in view.info_lines() {
        println!("{}", line);
    }

    for shot in 1..=args.shots {
        match widget.take_photo()? {
            Some(photo) => info!(shot, bytes = photo.bytes().len(), "Captured"),
            None => warn!(shot, "Camera not streaming, nothing captured"),
        }
    }

    if let Some(view) = gallery.render() {
        println!("{} ({} of {})", view.heading, view.thumbnails.len(), gallery.len());
        for thumbnail in &view.thumbnails {
            println!("  {}: {} bytes as data URL", thumbnail.alt, thumbnail.src.len());
        }
    }

    if args.metrics {
        let registry = MetricsRegistry::new()?;
        registry.update(&MetricsSnapshot::from_components(&widget, Some(&gallery)));
        print!("{}", registry.encode()?);
    }

    widget.teardown();
    info!("Done. Photos captured: {}", widget.stats().photos_captured);
    Ok(())
}
