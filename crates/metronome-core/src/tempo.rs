//! Tempo configuration.
//!
//! A [`Tempo`] is fixed for the whole run. Both fields are validated once at
//! construction, so everything downstream can rely on them being non-zero.

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Milliseconds in one minute.
const MS_PER_MINUTE: u64 = 60_000;

/// Beats per measure and beats per minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tempo {
    beats_per_measure: u32,
    bpm: u32,
}

impl Tempo {
    /// Create a tempo, rejecting zero for either parameter.
    pub fn new(beats_per_measure: u32, bpm: u32) -> Result<Self> {
        if beats_per_measure == 0 {
            return Err(Error::InvalidTempo {
                field: "beats_per_measure",
                value: beats_per_measure,
            });
        }
        if bpm == 0 {
            return Err(Error::InvalidTempo {
                field: "bpm",
                value: bpm,
            });
        }
        Ok(Self {
            beats_per_measure,
            bpm,
        })
    }

    pub fn beats_per_measure(&self) -> u32 {
        self.beats_per_measure
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Time between two beats, truncated to whole milliseconds.
    ///
    /// 120 BPM gives 500ms, 90 BPM gives 666ms (not 666.67).
    pub fn interval(&self) -> Duration {
        Duration::from_millis(MS_PER_MINUTE / u64::from(self.bpm))
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} beats per measure at {} BPM",
            self.beats_per_measure, self.bpm
        )
    }
}
