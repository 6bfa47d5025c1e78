//! Named regular expressions over ffmpeg's diagnostic output.
//!
//! Every pattern has a fixed number of capture groups. A missing match and a
//! match with fewer participating groups than expected are both `NoMatch`.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no match for pattern '{pattern}'")]
pub struct NoMatch {
    pub pattern: &'static str,
}

pub struct ExtractionPattern {
    name: &'static str,
    arity: usize,
    regex: LazyLock<Regex>,
}

impl ExtractionPattern {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Groups of the first match
    pub fn first_groups<'t>(&self, text: &'t str) -> Result<Vec<&'t str>, NoMatch> {
        self.regex
            .captures(text)
            .and_then(|caps| self.groups(&caps))
            .ok_or(NoMatch { pattern: self.name })
    }

    /// Groups of the last match. Progress lines repeat and only the final one counts.
    pub fn last_groups<'t>(&self, text: &'t str) -> Result<Vec<&'t str>, NoMatch> {
        self.regex
            .captures_iter(text)
            .last()
            .and_then(|caps| self.groups(&caps))
            .ok_or(NoMatch { pattern: self.name })
    }

    fn groups<'t>(&self, caps: &Captures<'t>) -> Option<Vec<&'t str>> {
        (1..=self.arity)
            .map(|i| caps.get(i).map(|m| m.as_str()))
            .collect()
    }
}

macro_rules! extraction_pattern {
    ($ident:ident, $name:literal, $arity:literal, $re:literal) => {
        pub static $ident: ExtractionPattern = ExtractionPattern {
            name: $name,
            arity: $arity,
            regex: LazyLock::new(|| {
                Regex::new($re).expect(concat!("invalid built-in pattern '", $name, "'"))
            }),
        };
    };
}

// Running progress timestamp printed while decoding
extraction_pattern!(PROGRESS_TIME, "time", 3, r"time=([0-9]{2}):([0-9]{2}):([0-9]{2}\.[0-9]+)");
// Container-level duration from the input summary
extraction_pattern!(CONTAINER_DURATION, "duration", 3, r"Duration: ([0-9]{2}):([0-9]{2}):([0-9]{2}\.[0-9]+)");
extraction_pattern!(BITRATE, "bitrate", 1, r"bitrate: (.*)");
extraction_pattern!(TITLE, "title", 1, r"title\s*: (.*)");
extraction_pattern!(FRAME_SIZE, "size", 2, r"Stream.*Video.* ([0-9]+)x([0-9]+)[ ,]");
extraction_pattern!(ROTATION, "rotation", 1, r"displaymatrix: rotation of (-?\d*\.?\d*) degrees");
extraction_pattern!(VERSION, "version", 1, r"ffmpeg version (\S+)");
