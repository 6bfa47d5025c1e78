//! mediaprobe - media metadata from the ffmpeg command line
//!
//! Entry point for the command-line front end.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mediaprobe::cli::{Args, Commands};
use mediaprobe::config::{Config, LoggingConfig};
use mediaprobe::media::{normalize_kbps, MediaAdapter, MediaProcessorFactory};

const DEFAULT_CONFIG_FILE: &str = "mediaprobe.toml";

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };
    if let Some(ffmpeg) = &args.ffmpeg {
        config.media.binary_path = ffmpeg.clone();
    }

    setup_logging(args.verbose, &config.logging)?;

    let adapter = MediaProcessorFactory::create_processor(&config.media);

    match args.command {
        Commands::Duration { input, precise } => {
            let duration = if precise {
                adapter.duration(&input)?
            } else {
                adapter.quick_duration(&input)?
            };
            println!("{}", format_duration(duration));
        }
        Commands::Bitrate { input, kbps } => {
            let bitrate = adapter.bitrate(&input)?;
            if kbps {
                let value = normalize_kbps(&bitrate)
                    .with_context(|| format!("Unrecognized bitrate '{}'", bitrate))?;
                println!("{}", value);
            } else {
                println!("{}", bitrate);
            }
        }
        Commands::Title { input } => {
            println!("{}", adapter.title(&input)?);
        }
        Commands::Size { input } => {
            let size = adapter.size(&input)?;
            println!("{}x{}", size.width, size.height);
        }
        Commands::Info { input, json } => {
            let media_info = adapter.info(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&media_info)?);
            } else {
                println!("{:<10} {}", "File", input.display());
                println!(
                    "{:<10} {}",
                    "Duration",
                    media_info.duration.map(format_duration).unwrap_or_else(|| "unknown".to_string())
                );
                println!("{:<10} {}", "Bitrate", media_info.bitrate.as_deref().unwrap_or("unknown"));
                println!("{:<10} {}", "Title", media_info.title.as_deref().unwrap_or("-"));
                println!(
                    "{:<10} {}",
                    "Size",
                    media_info
                        .size
                        .map(|s| format!("{}x{}", s.width, s.height))
                        .unwrap_or_else(|| "unknown".to_string())
                );
            }
        }
        Commands::Trim { input, output, start, duration } => {
            let start = Duration::try_from_secs_f64(start).context("Invalid start offset")?;
            let duration = Duration::try_from_secs_f64(duration).context("Invalid clip duration")?;
            adapter.trim(&input, &output, start, duration)?;
            println!("{}", output.display());
        }
        Commands::Thumbnail { input, output, width, height } => {
            adapter.create_thumbnail(&input, &output, width, height)?;
            println!("{}", output.display());
        }
        Commands::Check => {
            println!("ffmpeg {}", adapter.version_info()?);
        }
        Commands::InitConfig { path } => {
            config.save_to_file(&path)?;
            info!("Wrote configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Setup logging to console and, when enabled, a daily rolling file
fn setup_logging(verbose: bool, logging: &LoggingConfig) -> Result<()> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Results go to stdout, so logs stay on stderr
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = if logging.file_logging {
        std::fs::create_dir_all(&logging.log_dir)?;
        let file_appender = rolling::daily(&logging.log_dir, "mediaprobe.log");
        let (non_blocking_file, guard) = non_blocking(file_appender);
        // Keep the guard alive for the duration of the program
        std::mem::forget(guard);

        Some(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Format a duration as `HH:MM:SS.mmm`
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        d.subsec_millis()
    )
}
