use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::invoker::{Capture, ToolRunner};

/// Abstract media tool invocation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: PathBuf,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media tool invocation
    pub fn new<P: Into<PathBuf>, S: Into<String>>(binary_path: P, description: S) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set output container format
    pub fn format<S: Into<String>>(self, format: S) -> Self {
        self.arg("-f").arg(format)
    }

    /// Copy all streams without re-encoding
    pub fn copy_streams(self) -> Self {
        self.arg("-c").arg("copy")
    }

    /// Seek the input before opening it
    pub fn seek(self, start: Duration) -> Self {
        self.arg("-ss").arg(seconds_arg(start))
    }

    /// Stop writing output at this position
    pub fn stop_at(self, position: Duration) -> Self {
        self.arg("-to").arg(seconds_arg(position))
    }

    /// Limit the number of video frames written
    pub fn video_frames(self, count: u32) -> Self {
        self.arg("-vframes").arg(count.to_string())
    }

    /// Set output frame size
    pub fn frame_size(self, width: u32, height: u32) -> Self {
        self.arg("-s").arg(format!("{}x{}", width, height))
    }

    /// Execute the invocation and collect its output
    pub fn run(&self, runner: &dyn ToolRunner) -> Capture {
        debug!("{}: {} {:?}", self.description, self.binary_path.display(), self.args);
        runner.run(&self.binary_path, &self.args)
    }
}

/// Render a duration as decimal seconds, e.g. `2.500`
fn seconds_arg(d: Duration) -> String {
    format!("{}.{:03}", d.as_secs(), d.subsec_millis())
}

/// Builder for the invocation shapes the adapter needs
#[derive(Debug, Clone)]
pub struct MediaCommandBuilder {
    binary_path: PathBuf,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<P: Into<PathBuf>>(binary_path: P) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Build a read-only probe: open the input and print its summary
    pub fn probe<P: AsRef<Path>>(&self, input: P) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Probe").input(input)
    }

    /// Build a full decode into the null muxer
    pub fn decode_to_null<P: AsRef<Path>>(&self, input: P) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Decode to null")
            .input(input)
            .format("null")
            .arg("-")
    }

    /// Build stream-copy trim command
    pub fn trim<P: AsRef<Path>>(
        &self,
        input: P,
        output: P,
        start: Duration,
        duration: Duration,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Trim")
            .overwrite()
            .seek(start)
            .input(input)
            .stop_at(duration)
            .copy_streams()
            .output(output)
    }

    /// Build single-frame JPEG thumbnail command
    pub fn thumbnail<P: AsRef<Path>>(
        &self,
        input: P,
        output: P,
        width: u32,
        height: u32,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Thumbnail")
            .input(input)
            .format("mjpeg")
            .video_frames(1)
            .overwrite()
            .frame_size(width, height)
            .output(output)
    }

    /// Build version check command. A bare invocation prints the banner on stderr.
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_args() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        assert_eq!(builder.probe("in.mp4").args, vec!["-i", "in.mp4"]);
        assert_eq!(
            builder.decode_to_null("in.mp4").args,
            vec!["-i", "in.mp4", "-f", "null", "-"]
        );
    }

    #[test]
    fn test_trim_args() {
        let builder = MediaCommandBuilder::new("/usr/bin/ffmpeg");
        let cmd = builder.trim(
            "in.avi",
            "out.avi",
            Duration::from_secs(2),
            Duration::from_millis(5250),
        );
        assert_eq!(cmd.binary_path, PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(
            cmd.args,
            vec!["-y", "-ss", "2.000", "-i", "in.avi", "-to", "5.250", "-c", "copy", "out.avi"]
        );
    }

    #[test]
    fn test_thumbnail_args() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let cmd = builder.thumbnail("in.avi", "thumb.jpg", 320, 180);
        assert_eq!(
            cmd.args,
            vec!["-i", "in.avi", "-f", "mjpeg", "-vframes", "1", "-y", "-s", "320x180", "thumb.jpg"]
        );
    }

    #[test]
    fn test_version_check_has_no_args() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        assert!(builder.version_check().args.is_empty());
        assert_eq!(builder.binary_path(), Path::new("ffmpeg"));
    }
}
