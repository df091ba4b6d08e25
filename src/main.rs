//! Sangen - terminal edition of the Padukuhan Sangen 2 village website
//!
//! Renders the one-page site in the terminal with scroll-triggered reveal
//! animations, an auto-advancing gallery carousel and a scrolling marquee.

mod config;
mod core;
mod data;
mod frontend;
mod performance;
mod theme;
mod widgets;

use anyhow::Result;
use clap::{Parser as ClapParser, Subcommand};
use frontend::Frontend;
use std::path::{Path, PathBuf};

#[derive(ClapParser)]
#[command(name = "sangen")]
#[command(about = "Padukuhan Sangen 2 village website, in the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Site description file (default: <data dir>/site.toml, then the built-in site)
    #[arg(short, long, value_name = "FILE")]
    site: Option<PathBuf>,

    /// Custom data directory (default: ~/.sangen)
    /// Can also be set via SANGEN_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Directory that image paths in the site description resolve against
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Reveal each block only the first time it scrolls into view
    #[arg(long)]
    reveal_once: bool,

    /// Target frame rate
    #[arg(long, value_name = "N")]
    fps: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the embeddable form of a video URL
    EmbedUrl {
        /// YouTube watch, share or embed link
        url: String,
    },
    /// Validate a site description file
    ValidateSite {
        /// Site file to check (default: the site that would be shown)
        file: Option<PathBuf>,
    },
    /// Write the default config.toml and site.toml into the data directory
    InitConfig,
}

fn main() -> Result<()> {
    // Initialize logging to file (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    // TUI apps can't log to stdout, so we write to a file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("sangen.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let cli = Cli::parse();

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }

    let config = load_config(&cli)?;

    if let Some(command) = &cli.command {
        match command {
            Commands::EmbedUrl { url } => {
                let embed = widgets::VideoEmbed::from_url(url);
                println!("{}", embed.embed_url);
                if embed.video_id.is_none() {
                    eprintln!("⚠ Warning: no video id found, URL passed through unchanged");
                }
            }
            Commands::ValidateSite { file } => {
                let path = file.as_deref().or(cli.site.as_deref());
                validate_site(path, &config);
            }
            Commands::InitConfig => {
                let dir = config::Config::config_dir()?;
                let written = config::Config::extract_defaults_to(&dir)?;
                if written.is_empty() {
                    println!("✓ {:?} already has config.toml and site.toml", dir);
                }
                for path in written {
                    println!("✓ Wrote {:?}", path);
                }
            }
        }
        return Ok(());
    }

    let site = config::Config::load_site(cli.site.as_deref())?;
    run_tui(config, site)
}

/// Config file plus command-line overrides
fn load_config(cli: &Cli) -> Result<config::Config> {
    let mut config = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };

    if let Some(root) = &cli.assets {
        config.assets.root = root.clone();
    }
    if cli.reveal_once {
        config.reveal.trigger_once = true;
    }
    if let Some(fps) = cli.fps {
        config.ui.frame_rate = fps;
    }
    Ok(config)
}

/// Report structural errors and warnings for a site file. Exits 1 on errors.
fn validate_site(path: Option<&Path>, config: &config::Config) {
    match path {
        Some(path) => println!("Validating site file: {:?}", path),
        None => println!("Validating default site"),
    }

    let site = match config::Config::load_site(path) {
        Ok(site) => site,
        Err(e) => {
            eprintln!("✗ Failed to load site: {:#}", e);
            std::process::exit(1);
        }
    };

    let blocks: usize = site.sections.iter().map(|s| s.blocks.len()).sum();
    println!("✓ Site '{}' loaded successfully", site.identity.name);
    println!("  {} sections, {} blocks", site.sections.len(), blocks);

    let assets = widgets::FsAssetSource::new(config.assets.root.clone());
    let warnings = site.warnings(&assets);
    if warnings.is_empty() {
        println!("✓ Site is valid with no issues");
    } else {
        for warning in &warnings {
            println!("⚠ Warning: {}", warning);
        }
        println!("⚠ Found {} warning(s)", warnings.len());
    }
}

/// Run TUI frontend
fn run_tui(config: config::Config, site: data::SiteContent) -> Result<()> {
    // Timers run as tokio tasks
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_run_tui(config, site))
}

/// Async TUI main loop
async fn async_run_tui(config: config::Config, site: data::SiteContent) -> Result<()> {
    use crate::core::{AppCore, SiteEvent};
    use frontend::{FrontendEvent, TuiFrontend};
    use std::time::Instant;
    use tokio::sync::mpsc;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<SiteEvent>();

    let frame_interval = config.ui.frame_interval();
    let assets = widgets::FsAssetSource::new(config.assets.root.clone());

    let mut frontend = TuiFrontend::new()?;
    frontend.set_poll_timeout(frame_interval);

    let (width, height) = frontend.size();
    let mut app_core = AppCore::new(config, site, &assets, width, height)?;
    app_core.start_timers(&event_tx);
    tracing::info!(
        "Started with {} blocks, {} observers ({} attached), {} timers",
        app_core.blocks.len(),
        app_core.observer_count(),
        app_core.attached_observer_count(),
        app_core.timer_count()
    );

    // Main event loop
    while app_core.running {
        // Poll for frontend events (keyboard, mouse, resize)
        let events = frontend.poll_events()?;

        for event in events {
            let start = Instant::now();
            match event {
                FrontendEvent::Key { code, modifiers } => {
                    app_core.handle_key(code, modifiers, start);
                }
                FrontendEvent::Mouse { kind, x, y, .. } => {
                    app_core.handle_mouse(kind, x, y, start);
                }
                FrontendEvent::Resize { width, height } => {
                    app_core.resize(width, height, start);
                }
            }
            app_core.perf_stats.record_event_process_time(start.elapsed());
        }

        // Timer ticks (non-blocking)
        while let Ok(event) = event_rx.try_recv() {
            app_core.handle_site_event(event, Instant::now());
        }

        // Advance scroll, reveals and the marquee
        app_core.frame(Instant::now());

        // Render if needed
        if app_core.needs_render {
            frontend.render(&mut app_core)?;
            app_core.needs_render = false;
        }

        // No sleep needed - event::poll() timeout already limits frame rate
    }

    // Dropping the guards aborts the timer tasks
    app_core.stop_timers();

    // Cleanup
    frontend.cleanup()?;

    Ok(())
}
