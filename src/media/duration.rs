use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::commands::MediaCommandBuilder;
use super::invoker::ToolRunner;
use super::pattern::{ExtractionPattern, CONTAINER_DURATION, PROGRESS_TIME};
use crate::error::{MediaProbeError, Result};

/// Ways of asking the tool for a file's duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationStrategy {
    /// Read the container's own duration field. Fast, but wrong for some codecs.
    Quick,
    /// Decode the whole stream to a null sink and take the last progress timestamp
    Precise,
}

/// Tried in order by the fast entry point
pub const QUICK_THEN_PRECISE: &[DurationStrategy] = &[DurationStrategy::Quick, DurationStrategy::Precise];
pub const PRECISE_ONLY: &[DurationStrategy] = &[DurationStrategy::Precise];

impl DurationStrategy {
    fn pattern(self) -> &'static ExtractionPattern {
        match self {
            DurationStrategy::Quick => &CONTAINER_DURATION,
            DurationStrategy::Precise => &PROGRESS_TIME,
        }
    }

    /// Run the invocation for this strategy and parse its diagnostic output
    pub fn probe(
        self,
        runner: &dyn ToolRunner,
        builder: &MediaCommandBuilder,
        input: &Path,
    ) -> Option<Duration> {
        let command = match self {
            DurationStrategy::Quick => builder.probe(input),
            DurationStrategy::Precise => builder.decode_to_null(input),
        };
        let capture = command.run(runner);
        duration_from_text(self.pattern(), &capture.stderr_text())
    }
}

/// Run each strategy in turn until one yields a duration
pub fn probe_duration(
    runner: &dyn ToolRunner,
    builder: &MediaCommandBuilder,
    input: &Path,
    strategies: &[DurationStrategy],
) -> Result<Duration> {
    for strategy in strategies {
        match strategy.probe(runner, builder, input) {
            Some(duration) => {
                debug!("{:?} duration of {}: {:?}", strategy, input.display(), duration);
                return Ok(duration);
            }
            None => debug!("{:?} duration strategy failed for {}", strategy, input.display()),
        }
    }
    Err(MediaProbeError::DurationUnknown)
}

pub(crate) fn duration_from_text(pattern: &ExtractionPattern, text: &str) -> Option<Duration> {
    let groups = pattern.last_groups(text).ok()?;
    parse_timestamp(groups[0], groups[1], groups[2])
}

/// Convert `HH`, `MM` and `SS.fraction` fields into a duration.
///
/// The fraction is taken digit by digit into nanoseconds, so `10.00` is exactly
/// ten seconds. Digits past nanosecond precision are dropped.
pub fn parse_timestamp(hours: &str, minutes: &str, seconds: &str) -> Option<Duration> {
    let hours: u64 = hours.parse().ok()?;
    let minutes: u64 = minutes.parse().ok()?;
    let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    let whole: u64 = whole.parse().ok()?;
    if minutes >= 60 || whole >= 60 {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut nanos: u32 = 0;
    for (i, digit) in fraction.bytes().take(9).enumerate() {
        nanos += u32::from(digit - b'0') * 10u32.pow(8 - i as u32);
    }

    let secs = hours.checked_mul(3600)?.checked_add(minutes * 60 + whole)?;
    Some(Duration::new(secs, nanos))
}
