use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{MediaProbeError, Result};
use super::commands::MediaCommandBuilder;
use super::duration::{self, DurationStrategy, PRECISE_ONLY, QUICK_THEN_PRECISE};
use super::invoker::{ProcessRunner, ToolRunner};
use super::metadata::{self, FrameSize, MediaInfo};
use super::pattern::VERSION;
use super::{artifacts, MediaAdapter};

/// Path to the external tool executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    path: PathBuf,
}

impl ToolHandle {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ToolHandle {
    /// Resolved through the search path
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

/// ffmpeg-backed implementation of [`MediaAdapter`]
pub struct FFmpeg<R: ToolRunner = ProcessRunner> {
    tool: ToolHandle,
    builder: MediaCommandBuilder,
    runner: R,
}

impl FFmpeg {
    /// Adapter for `ffmpeg` on the search path
    pub fn new() -> Self {
        Self::with_runner(ToolHandle::default().path(), ProcessRunner::new())
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::with_runner(
            &config.binary_path,
            ProcessRunner::with_timeout(config.timeout()),
        )
    }
}

impl Default for FFmpeg {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ToolRunner> FFmpeg<R> {
    pub fn with_runner<P: Into<PathBuf>>(path: P, runner: R) -> Self {
        let tool = ToolHandle::new(path);
        let builder = MediaCommandBuilder::new(tool.path());
        Self { tool, builder, runner }
    }

    pub fn path(&self) -> &Path {
        self.tool.path()
    }

    pub fn tool(&self) -> &ToolHandle {
        &self.tool
    }

    /// Point the adapter at a different executable
    pub fn set_path<P: Into<PathBuf>>(&mut self, path: P) -> &mut Self {
        self.tool = ToolHandle::new(path);
        self.builder = MediaCommandBuilder::new(self.tool.path());
        self
    }

    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.set_path(path);
        self
    }

    fn durations(&self, input: &Path, strategies: &[DurationStrategy]) -> Result<Duration> {
        duration::probe_duration(&self.runner, &self.builder, input, strategies)
    }
}

impl<R: ToolRunner> MediaAdapter for FFmpeg<R> {
    fn duration(&self, input: &Path) -> Result<Duration> {
        info!("Measuring duration of {} by decoding", input.display());
        self.durations(input, PRECISE_ONLY)
    }

    fn quick_duration(&self, input: &Path) -> Result<Duration> {
        info!("Reading duration of {}", input.display());
        self.durations(input, QUICK_THEN_PRECISE)
    }

    fn bitrate(&self, input: &Path) -> Result<String> {
        info!("Reading bitrate of {}", input.display());
        metadata::bitrate_from(&self.builder.probe(input).run(&self.runner))
    }

    fn title(&self, input: &Path) -> Result<String> {
        info!("Reading title of {}", input.display());
        metadata::title_from(&self.builder.probe(input).run(&self.runner))
    }

    fn size(&self, input: &Path) -> Result<FrameSize> {
        info!("Reading frame size of {}", input.display());
        metadata::size_from(&self.builder.probe(input).run(&self.runner))
    }

    fn trim(&self, input: &Path, output: &Path, start: Duration, duration: Duration) -> Result<()> {
        artifacts::trim(&self.runner, &self.builder, input, output, start, duration)
    }

    fn create_thumbnail(&self, input: &Path, output: &Path, width: u32, height: u32) -> Result<()> {
        artifacts::create_thumbnail(&self.runner, &self.builder, input, output, width, height)
    }

    fn check_availability(&self) -> Result<()> {
        self.version_info().map(|version| {
            info!("ffmpeg {} is available at {}", version, self.path().display());
        })
    }

    fn version_info(&self) -> Result<String> {
        debug!("Getting ffmpeg version information");

        let capture = self.builder.version_check().run(&self.runner);
        let text = capture.selected_text();
        VERSION
            .first_groups(&text)
            .map(|groups| groups[0].to_string())
            .map_err(|_| MediaProbeError::ToolUnavailable(self.path().display().to_string()))
    }

    fn info(&self, input: &Path) -> Result<MediaInfo> {
        info!("Collecting media information for {}", input.display());

        let capture = self.builder.probe(input).run(&self.runner);
        let mut info = MediaInfo::from_probe(&capture);
        if info.duration.is_none() {
            info.duration = self.durations(input, PRECISE_ONLY).ok();
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::invoker::{Capture, MockToolRunner};

    fn stderr(text: &str) -> Capture {
        Capture {
            stdout: Vec::new(),
            stderr: text.as_bytes().to_vec(),
            success: false,
            exit_code: Some(1),
        }
    }

    #[test]
    fn test_default_path() {
        let ffmpeg = FFmpeg::new();
        assert_eq!(ffmpeg.path(), Path::new("ffmpeg"));
        assert_eq!(ffmpeg.tool(), &ToolHandle::default());
    }

    #[test]
    fn test_set_path_is_used_for_invocations() {
        let mut runner = MockToolRunner::new();
        runner
            .expect_run()
            .withf(|program, _| program == Path::new("/opt/ffmpeg/bin/ffmpeg"))
            .times(1)
            .returning(|_, _| stderr("    title           : clip\n"));

        let mut ffmpeg = FFmpeg::with_runner("ffmpeg", runner);
        ffmpeg.set_path("/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(ffmpeg.path(), Path::new("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(ffmpeg.title(Path::new("in.mp4")).unwrap(), "clip");
    }

    #[test]
    fn test_from_config() {
        let config = MediaConfig {
            binary_path: "/usr/local/bin/ffmpeg".to_string(),
            timeout_secs: Some(5),
        };
        let ffmpeg = FFmpeg::from_config(&config);
        assert_eq!(ffmpeg.path(), Path::new("/usr/local/bin/ffmpeg"));
        assert_eq!(ffmpeg.runner.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_version_info() {
        let mut runner = MockToolRunner::new();
        runner
            .expect_run()
            .withf(|_, args| args.is_empty())
            .returning(|_, _| stderr("ffmpeg version 7.0.2 Copyright (c) 2000-2024 the FFmpeg developers\n"));

        let ffmpeg = FFmpeg::with_runner("ffmpeg", runner);
        assert_eq!(ffmpeg.version_info().unwrap(), "7.0.2");
        assert!(ffmpeg.check_availability().is_ok());
    }

    #[test]
    fn test_missing_tool_is_unavailable() {
        let mut runner = MockToolRunner::new();
        runner.expect_run().returning(|_, _| Capture::failed());

        let ffmpeg = FFmpeg::with_runner("missing-ffmpeg", runner);
        match ffmpeg.check_availability() {
            Err(MediaProbeError::ToolUnavailable(path)) => assert_eq!(path, "missing-ffmpeg"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_info_falls_back_to_decoding_for_duration() {
        let mut runner = MockToolRunner::new();
        runner
            .expect_run()
            .withf(|_, args| args == ["-i", "in.avi"])
            .times(1)
            .returning(|_, _| {
                stderr(
                    "  Duration: N/A, bitrate: N/A\n  Stream #0:0: Video: h264, yuv420p, 640x480, 25 fps\n",
                )
            });
        runner
            .expect_run()
            .withf(|_, args| args.len() == 5)
            .times(1)
            .returning(|_, _| stderr("frame=  75 time=00:00:03.00 bitrate=N/A\n"));

        let ffmpeg = FFmpeg::with_runner("ffmpeg", runner);
        let info = ffmpeg.info(Path::new("in.avi")).unwrap();
        assert_eq!(info.duration, Some(Duration::from_secs(3)));
        assert_eq!(info.bitrate.as_deref(), Some("N/A"));
        assert_eq!(info.title, None);
        assert_eq!(info.size, Some(FrameSize::new(640, 480)));
    }

    #[test]
    fn test_adapter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FFmpeg>();
    }
}
