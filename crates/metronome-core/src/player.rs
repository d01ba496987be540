//! Click playback through an external command-line audio player.
//!
//! Audio is best effort. The first supported player found on the search
//! path is used for the whole run; when none is found every click is a
//! silent no-op. Players are launched without waiting for them. Each one
//! gets its own short-lived reaper thread that collects its exit status, so
//! finished players do not linger as zombies and a hung player only holds
//! up its own reaper.

use crate::assets::{ClickSound, StagedClicks};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// Anything the beat scheduler can ask to make a click.
///
/// Implementations must return promptly; the scheduler calls this from its
/// timing loop.
pub trait ClickOutput {
    /// Play the given click
    fn click(&self, sound: ClickSound);
}

impl<T: ClickOutput + ?Sized> ClickOutput for &T {
    fn click(&self, sound: ClickSound) {
        (**self).click(sound)
    }
}

/// Supported command-line audio players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    /// PulseAudio / PipeWire
    Paplay,
    /// ALSA
    Aplay,
    /// macOS
    Afplay,
    /// Windows, via System.Media.SoundPlayer
    Powershell,
}

impl PlayerKind {
    /// Probe order used by [`ExternalPlayer::detect`]
    pub const PRIORITY: [PlayerKind; 4] = [
        PlayerKind::Paplay,
        PlayerKind::Aplay,
        PlayerKind::Afplay,
        PlayerKind::Powershell,
    ];

    /// Executable name looked up on the search path
    pub fn program(self) -> &'static str {
        match self {
            PlayerKind::Paplay => "paplay",
            PlayerKind::Aplay => "aplay",
            PlayerKind::Afplay => "afplay",
            PlayerKind::Powershell => "powershell",
        }
    }

    /// Build the command that plays `file` with the executable at `program`.
    pub fn command(self, program: &Path, file: &Path) -> Command {
        let mut cmd = Command::new(program);
        match self {
            PlayerKind::Powershell => {
                // Single quotes are doubled inside a PowerShell literal string
                let quoted = file.to_string_lossy().replace('\'', "''");
                cmd.arg("-c")
                    .arg(format!("(New-Object Media.SoundPlayer '{}').PlaySync()", quoted));
            }
            PlayerKind::Paplay | PlayerKind::Aplay | PlayerKind::Afplay => {
                cmd.arg(file);
            }
        }
        cmd
    }
}

/// A detected audio player.
#[derive(Debug)]
pub struct ExternalPlayer {
    kind: PlayerKind,
    program: PathBuf,
}

impl ExternalPlayer {
    /// Find the first supported player on `PATH`.
    pub fn detect() -> Option<Self> {
        Self::detect_with(|name| which::which(name).ok())
    }

    /// Find the first supported player in the given search path
    /// (same format as the `PATH` variable).
    pub fn detect_in(paths: impl AsRef<OsStr>) -> Option<Self> {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::detect_with(|name| which::which_in(name, Some(paths.as_ref()), &cwd).ok())
    }

    fn detect_with(lookup: impl Fn(&str) -> Option<PathBuf>) -> Option<Self> {
        let found = PlayerKind::PRIORITY
            .iter()
            .find_map(|&kind| lookup(kind.program()).map(|program| (kind, program)));

        match found {
            Some((kind, program)) => {
                log::debug!("Using audio player: {}", program.display());
                Some(Self { kind, program })
            }
            None => {
                log::debug!("No audio player found, clicks will be silent");
                None
            }
        }
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    /// Location of the player executable
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Start playing `file` without waiting for it.
    ///
    /// Returns `true` if a player process was started. Launch failures are
    /// swallowed.
    pub fn play(&self, file: &Path) -> bool {
        let spawned = self
            .kind
            .command(&self.program, file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                reap(child);
                true
            }
            Err(e) => {
                log::debug!("Failed to launch {}: {}", self.program.display(), e);
                false
            }
        }
    }
}

/// Wait on `child` from a detached thread of its own.
///
/// If the thread cannot be started the child is never waited on.
fn reap(mut child: Child) -> Option<JoinHandle<Option<ExitStatus>>> {
    let spawned = thread::Builder::new()
        .name("click-reaper".to_string())
        .spawn(move || child.wait().ok());

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::debug!("Failed to start reaper thread: {}", e);
            None
        }
    }
}

/// Plays staged clicks through an optional external player.
#[derive(Debug)]
pub struct ClickPlayer {
    player: Option<ExternalPlayer>,
    clicks: StagedClicks,
}

impl ClickPlayer {
    pub fn new(player: Option<ExternalPlayer>, clicks: StagedClicks) -> Self {
        Self { player, clicks }
    }

    /// The detected player, if any
    pub fn player(&self) -> Option<&ExternalPlayer> {
        self.player.as_ref()
    }

    /// Play a staged file. No-op when `handle` is unset or no player exists.
    pub fn play(&self, handle: Option<&Path>) -> bool {
        match (handle, &self.player) {
            (Some(file), Some(player)) => player.play(file),
            _ => false,
        }
    }
}

impl ClickOutput for ClickPlayer {
    fn click(&self, sound: ClickSound) {
        self.play(self.clicks.handle(sound));
    }
}
