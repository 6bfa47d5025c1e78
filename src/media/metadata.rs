use serde::{Serialize, Serializer};
use std::time::Duration;
use tracing::debug;

use super::duration::duration_from_text;
use super::invoker::Capture;
use super::pattern::{BITRATE, CONTAINER_DURATION, FRAME_SIZE, ROTATION, TITLE};
use crate::error::{MediaProbeError, Result};

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Displayed size for a stored frame under the given display rotation.
    ///
    /// Axes swap only for odd multiples of 90 degrees. Any other angle,
    /// including ones that are not a multiple of 90, leaves the size as stored.
    pub fn rotated(self, degrees: f64) -> Self {
        if is_quarter_turn(degrees) {
            Self { width: self.height, height: self.width }
        } else {
            self
        }
    }
}

fn is_quarter_turn(degrees: f64) -> bool {
    degrees.is_finite() && (degrees.rem_euclid(180.0) - 90.0).abs() < 1e-6
}

/// Everything a single probe says about a file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaInfo {
    #[serde(rename = "duration_secs", serialize_with = "as_secs")]
    pub duration: Option<Duration>,
    pub bitrate: Option<String>,
    pub bitrate_kbps: Option<u64>,
    pub title: Option<String>,
    pub size: Option<FrameSize>,
}

impl MediaInfo {
    /// Fields readable from one probe capture. Duration is the container's own value.
    pub fn from_probe(capture: &Capture) -> Self {
        let bitrate = bitrate_from(capture).ok();
        Self {
            duration: duration_from_text(&CONTAINER_DURATION, &capture.stderr_text()),
            bitrate_kbps: bitrate.as_deref().and_then(normalize_kbps),
            bitrate,
            title: title_from(capture).ok(),
            size: size_from(capture).ok(),
        }
    }
}

fn as_secs<S: Serializer>(duration: &Option<Duration>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_some(&d.as_secs_f64()),
        None => serializer.serialize_none(),
    }
}

/// Raw bitrate text from the input summary, e.g. `4012 kb/s`
pub fn bitrate_from(capture: &Capture) -> Result<String> {
    let text = capture.selected_text();
    BITRATE
        .first_groups(&text)
        .map(|groups| groups[0].to_string())
        .map_err(|_| MediaProbeError::BitrateUnknown)
}

/// Raw title text from the metadata block
pub fn title_from(capture: &Capture) -> Result<String> {
    let text = capture.selected_text();
    TITLE
        .first_groups(&text)
        .map(|groups| groups[0].to_string())
        .map_err(|_| MediaProbeError::TitleUnknown)
}

/// Displayed frame size of the first video stream
pub fn size_from(capture: &Capture) -> Result<FrameSize> {
    let text = capture.selected_text();
    let groups = FRAME_SIZE
        .first_groups(&text)
        .map_err(|_| MediaProbeError::SizeUnknown)?;
    let width = groups[0].parse().map_err(|_| MediaProbeError::SizeUnknown)?;
    let height = groups[1].parse().map_err(|_| MediaProbeError::SizeUnknown)?;
    let stored = FrameSize::new(width, height);

    match rotation_from(&text) {
        Some(degrees) => {
            let displayed = stored.rotated(degrees);
            debug!("Rotation of {} degrees: {:?} -> {:?}", degrees, stored, displayed);
            Ok(displayed)
        }
        None => Ok(stored),
    }
}

/// Display rotation in degrees, if annotated and parseable
pub fn rotation_from(text: &str) -> Option<f64> {
    let groups = ROTATION.first_groups(text).ok()?;
    groups[0].parse::<f64>().ok().filter(|d| d.is_finite())
}

/// Convert the tool's bitrate text into whole kilobits per second
pub fn normalize_kbps(raw: &str) -> Option<u64> {
    let mut parts = raw.split_whitespace();
    let value: f64 = parts.next()?.parse().ok()?;
    let scale = match parts.next()?.to_ascii_lowercase().as_str() {
        "b/s" => 0.001,
        "kb/s" => 1.0,
        "mb/s" => 1000.0,
        "gb/s" => 1_000_000.0,
        _ => return None,
    };
    let kbps = value * scale;
    (kbps.is_finite() && kbps >= 0.0).then(|| kbps.round() as u64)
}
