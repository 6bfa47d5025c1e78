use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::commands::MediaCommandBuilder;
use super::invoker::ToolRunner;
use crate::error::{MediaProbeError, Result};

/// Cut `duration` worth of `input` starting at `start` into `output` without re-encoding.
///
/// Only the exit status is checked; the length of the result is not verified.
pub fn trim(
    runner: &dyn ToolRunner,
    builder: &MediaCommandBuilder,
    input: &Path,
    output: &Path,
    start: Duration,
    duration: Duration,
) -> Result<()> {
    info!(
        "Trimming {} ({:?} from {:?}) -> {}",
        input.display(),
        duration,
        start,
        output.display()
    );

    let capture = builder.trim(input, output, start, duration).run(runner);
    if !capture.success {
        debug!("Trim failed: {}", capture.stderr_text());
        return Err(MediaProbeError::TrimFailed);
    }

    info!("Trim completed");
    Ok(())
}

/// Write a single JPEG frame of `input` scaled to `width`x`height`
pub fn create_thumbnail(
    runner: &dyn ToolRunner,
    builder: &MediaCommandBuilder,
    input: &Path,
    output: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    info!(
        "Creating {}x{} thumbnail of {} -> {}",
        width,
        height,
        input.display(),
        output.display()
    );

    let capture = builder.thumbnail(input, output, width, height).run(runner);
    if !capture.success {
        debug!("Thumbnail failed: {}", capture.stderr_text());
        return Err(MediaProbeError::ThumbnailFailed);
    }
    // ffmpeg can exit cleanly without writing anything for some broken inputs
    if !output.is_file() {
        debug!("Thumbnail {} was not written", output.display());
        return Err(MediaProbeError::ThumbnailFailed);
    }

    info!("Thumbnail created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::invoker::{Capture, MockToolRunner};
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    fn exited(success: bool) -> Capture {
        Capture {
            stdout: Vec::new(),
            stderr: b"diagnostics".to_vec(),
            success,
            exit_code: Some(if success { 0 } else { 1 }),
        }
    }

    #[test]
    fn test_trim_succeeds_on_zero_exit() {
        let mut runner = MockToolRunner::new();
        runner
            .expect_run()
            .withf(|_, args| args.first().map(String::as_str) == Some("-y") && args.last().map(String::as_str) == Some("out.avi"))
            .times(1)
            .returning(|_, _| exited(true));

        let builder = MediaCommandBuilder::new("ffmpeg");
        trim(
            &runner,
            &builder,
            Path::new("in.avi"),
            Path::new("out.avi"),
            Duration::from_secs(2),
            Duration::from_secs(5),
        )
        .unwrap();
    }

    #[test]
    fn test_trim_fails_on_nonzero_exit() {
        let mut runner = MockToolRunner::new();
        runner.expect_run().times(1).returning(|_, _| exited(false));

        let builder = MediaCommandBuilder::new("ffmpeg");
        let err = trim(
            &runner,
            &builder,
            Path::new("in.avi"),
            Path::new("out.avi"),
            Duration::from_secs(2),
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, MediaProbeError::TrimFailed));
    }

    #[test]
    fn test_thumbnail_requires_output_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.child("thumb.jpg");

        let mut runner = MockToolRunner::new();
        runner.expect_run().times(1).returning(|_, _| exited(true));

        let builder = MediaCommandBuilder::new("ffmpeg");
        let err = create_thumbnail(&runner, &builder, Path::new("in.avi"), output.path(), 320, 180)
            .unwrap_err();
        assert!(matches!(err, MediaProbeError::ThumbnailFailed));
    }

    #[test]
    fn test_thumbnail_succeeds_when_file_written() {
        let dir = TempDir::new().unwrap();
        let output = dir.child("thumb.jpg");
        let written = output.path().to_path_buf();

        let mut runner = MockToolRunner::new();
        runner.expect_run().times(1).returning(move |_, _| {
            std::fs::write(&written, b"\xff\xd8\xff").unwrap();
            exited(true)
        });

        let builder = MediaCommandBuilder::new("ffmpeg");
        create_thumbnail(&runner, &builder, Path::new("in.avi"), output.path(), 320, 180).unwrap();
        assert!(output.path().is_file());
    }

    #[test]
    fn test_thumbnail_fails_on_nonzero_exit_even_if_file_exists() {
        let dir = TempDir::new().unwrap();
        let output = dir.child("thumb.jpg");
        output.write_binary(b"stale").unwrap();

        let mut runner = MockToolRunner::new();
        runner.expect_run().times(1).returning(|_, _| exited(false));

        let builder = MediaCommandBuilder::new("ffmpeg");
        let err = create_thumbnail(&runner, &builder, Path::new("in.avi"), output.path(), 320, 180)
            .unwrap_err();
        assert!(matches!(err, MediaProbeError::ThumbnailFailed));
    }
}
