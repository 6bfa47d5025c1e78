// Media probing on top of the ffmpeg command line
//
// - Invoker: runs the tool and captures both output streams
// - Commands: argument vectors for each invocation shape
// - Pattern: named regexes over diagnostic text
// - Duration / Metadata: typed parsers, strategy fallback, rotation correction
// - Artifacts: trim and thumbnail generation
// - Processor: the `FFmpeg` adapter tying it together

pub mod artifacts;
pub mod commands;
pub mod duration;
pub mod invoker;
pub mod metadata;
pub mod pattern;
pub mod processor;

use std::path::Path;
use std::time::Duration;

pub use commands::*;
pub use duration::DurationStrategy;
pub use invoker::{Capture, ProcessRunner, ToolRunner};
pub use metadata::{normalize_kbps, FrameSize, MediaInfo};
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Metadata and artifact operations over one media tool
pub trait MediaAdapter: Send + Sync {
    /// Duration measured by decoding the whole file
    fn duration(&self, input: &Path) -> Result<Duration>;

    /// Container duration, falling back to decoding when it is missing
    fn quick_duration(&self, input: &Path) -> Result<Duration>;

    /// Overall bitrate as printed by the tool, unit included
    fn bitrate(&self, input: &Path) -> Result<String>;

    fn title(&self, input: &Path) -> Result<String>;

    /// Displayed frame size, corrected for display rotation
    fn size(&self, input: &Path) -> Result<FrameSize>;

    /// Stream-copy `duration` of `input` from `start` into `output`, overwriting it
    fn trim(&self, input: &Path, output: &Path, start: Duration, duration: Duration) -> Result<()>;

    /// Write one JPEG frame of the given size to `output`, overwriting it
    fn create_thumbnail(&self, input: &Path, output: &Path, width: u32, height: u32) -> Result<()>;

    /// Check that the configured executable is ffmpeg
    fn check_availability(&self) -> Result<()>;

    /// Version string from the tool banner
    fn version_info(&self) -> Result<String>;

    /// All metadata obtainable from one probe
    fn info(&self, input: &Path) -> Result<MediaInfo>;
}

/// Factory for creating media adapter instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default adapter (ffmpeg subprocess)
    pub fn create_processor(config: &MediaConfig) -> Box<dyn MediaAdapter> {
        Box::new(FFmpeg::from_config(config))
    }
}
