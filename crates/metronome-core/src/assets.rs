//! Bundled click sounds and their staging to disk.
//!
//! The two clicks are synthesized by the build script and embedded in the
//! library. External players need a file path, so each click is copied into
//! a named temporary file for the duration of the run. The file is removed
//! when its [`StagedClick`] is dropped.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Asset name of the accent (first beat) click
pub const CLICK_HI_WAV: &str = "click_hi.wav";

/// Asset name of the regular click
pub const CLICK_LO_WAV: &str = "click_lo.wav";

static CLICK_HI: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/click_hi.wav"));
static CLICK_LO: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/click_lo.wav"));

/// Which of the two clicks to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickSound {
    /// First beat of a measure
    Accent,
    /// Every other beat
    Regular,
}

impl ClickSound {
    /// Name of the bundled asset backing this sound
    pub fn asset_name(self) -> &'static str {
        match self {
            ClickSound::Accent => CLICK_HI_WAV,
            ClickSound::Regular => CLICK_LO_WAV,
        }
    }
}

/// Look up a bundled payload by asset name.
pub fn payload(asset_name: &str) -> Option<&'static [u8]> {
    match asset_name {
        CLICK_HI_WAV => Some(CLICK_HI),
        CLICK_LO_WAV => Some(CLICK_LO),
        _ => None,
    }
}

/// A click written to a temporary file.
#[derive(Debug)]
pub struct StagedClick {
    file: NamedTempFile,
}

impl StagedClick {
    /// Location of the staged file
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Write the bundled payload named `asset_name` to a fresh temporary file.
pub fn stage(asset_name: &str) -> Result<StagedClick> {
    let data = payload(asset_name)
        .ok_or_else(|| Error::Staging(format!("reading embedded sound: unknown asset {asset_name}")))?;

    let mut file = tempfile::Builder::new()
        .prefix("click")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| Error::Staging(format!("creating temp file: {e}")))?;

    // On failure the NamedTempFile is dropped here, which removes it
    if let Err(e) = file.write_all(data).and_then(|()| file.flush()) {
        return Err(Error::Staging(format!("writing temp file: {e}")));
    }

    log::debug!("Staged {} at {}", asset_name, file.path().display());
    Ok(StagedClick { file })
}

/// Both clicks, each present only if staging succeeded.
#[derive(Debug, Default)]
pub struct StagedClicks {
    accent: Option<StagedClick>,
    regular: Option<StagedClick>,
}

impl StagedClicks {
    /// Stage both clicks. Failures are logged and leave that click unset.
    pub fn stage_all() -> Self {
        Self {
            accent: stage_or_warn(ClickSound::Accent),
            regular: stage_or_warn(ClickSound::Regular),
        }
    }

    /// Path of the staged file for `sound`, if it was staged
    pub fn handle(&self, sound: ClickSound) -> Option<&Path> {
        let staged = match sound {
            ClickSound::Accent => self.accent.as_ref(),
            ClickSound::Regular => self.regular.as_ref(),
        };
        staged.map(StagedClick::path)
    }
}

fn stage_or_warn(sound: ClickSound) -> Option<StagedClick> {
    match stage(sound.asset_name()) {
        Ok(staged) => Some(staged),
        Err(e) => {
            log::warn!("Could not initialize sound ({})", e);
            None
        }
    }
}
