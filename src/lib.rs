//! mediaprobe - media metadata and artifacts from the ffmpeg command line
//!
//! Reads duration, bitrate, title and frame size out of ffmpeg's diagnostic
//! output, and produces trimmed clips and JPEG thumbnails.

pub mod cli;
pub mod config;
pub mod error;
pub mod media;

pub use error::{MediaProbeError, Result};
pub use media::{FFmpeg, FrameSize, MediaAdapter, MediaInfo, ToolHandle};
