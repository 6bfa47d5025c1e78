use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the ffmpeg executable (overrides the configuration)
    #[arg(long)]
    pub ffmpeg: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the duration of a media file
    Duration {
        /// Input media file
        input: PathBuf,

        /// Decode the whole file instead of trusting the container
        #[arg(long)]
        precise: bool,
    },

    /// Print the overall bitrate of a media file
    Bitrate {
        /// Input media file
        input: PathBuf,

        /// Print whole kilobits per second instead of the raw value
        #[arg(long)]
        kbps: bool,
    },

    /// Print the title metadata of a media file
    Title {
        /// Input media file
        input: PathBuf,
    },

    /// Print the displayed frame size of a media file
    Size {
        /// Input media file
        input: PathBuf,
    },

    /// Print all metadata obtainable from one probe
    Info {
        /// Input media file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cut a clip out of a media file without re-encoding
    Trim {
        /// Input media file
        #[arg(short, long)]
        input: PathBuf,

        /// Output media file (overwritten)
        #[arg(short, long)]
        output: PathBuf,

        /// Start offset in seconds
        #[arg(short, long, default_value = "0")]
        start: f64,

        /// Clip length in seconds
        #[arg(short, long)]
        duration: f64,
    },

    /// Write a single-frame JPEG thumbnail
    Thumbnail {
        /// Input media file
        #[arg(short, long)]
        input: PathBuf,

        /// Output image file (overwritten)
        #[arg(short, long)]
        output: PathBuf,

        /// Thumbnail width in pixels
        #[arg(long)]
        width: u32,

        /// Thumbnail height in pixels
        #[arg(long)]
        height: u32,
    },

    /// Check that ffmpeg is available and print its version
    Check,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination file
        #[arg(default_value = "mediaprobe.toml")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trim() {
        let args = Args::try_parse_from([
            "mediaprobe", "--ffmpeg", "/opt/ffmpeg", "trim", "-i", "in.avi", "-o", "out.avi", "-s", "2", "-d", "5",
        ])
        .unwrap();
        assert_eq!(args.ffmpeg.as_deref(), Some("/opt/ffmpeg"));
        match args.command {
            Commands::Trim { input, output, start, duration } => {
                assert_eq!(input, PathBuf::from("in.avi"));
                assert_eq!(output, PathBuf::from("out.avi"));
                assert_eq!(start, 2.0);
                assert_eq!(duration, 5.0);
            }
            _ => panic!("expected trim"),
        }
    }

    #[test]
    fn test_parse_duration_flags() {
        let args = Args::try_parse_from(["mediaprobe", "-v", "duration", "--precise", "in.mp4"]).unwrap();
        assert!(args.verbose);
        assert!(matches!(args.command, Commands::Duration { precise: true, .. }));
    }

    #[test]
    fn test_thumbnail_requires_dimensions() {
        assert!(Args::try_parse_from(["mediaprobe", "thumbnail", "-i", "in.avi", "-o", "t.jpg"]).is_err());
    }
}
