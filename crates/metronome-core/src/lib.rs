//! metronome-core - the moving parts behind the `metronome` command
//!
//! A terminal metronome clicks on every beat, accents the first beat of each
//! measure and prints a running beat counter until the user presses Enter.
//!
//! - [`tempo`] - validated beats-per-measure / BPM and the beat interval
//! - [`assets`] - bundled click sounds staged to temporary files
//! - [`player`] - fire-and-forget playback through an external audio player
//! - [`listener`] - the one-shot stop signal (Enter, SIGINT, SIGTERM)
//! - [`scheduler`] - the tick/stop loop driving clicks and output
//!
//! # Usage as a Library
//!
//! ```no_run
//! use metronome_core::{BeatScheduler, ClickPlayer, ExternalPlayer, StagedClicks, StopTrigger, Tempo};
//!
//! let tempo = Tempo::new(4, 120)?;
//! let player = ClickPlayer::new(ExternalPlayer::detect(), StagedClicks::stage_all());
//!
//! let (trigger, stop) = StopTrigger::pair();
//! metronome_core::listener::listen_stdin(trigger);
//!
//! let mut scheduler = BeatScheduler::new(tempo, &player, std::io::stdout());
//! scheduler.run(&stop)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assets;
pub mod error;
pub mod listener;
pub mod player;
pub mod scheduler;
pub mod tempo;

// Re-export main types
pub use assets::{ClickSound, StagedClick, StagedClicks};
pub use error::{Error, Result};
pub use listener::StopTrigger;
pub use player::{ClickOutput, ClickPlayer, ExternalPlayer, PlayerKind};
pub use scheduler::{Beat, BeatCounter, BeatScheduler, SchedulerState};
pub use tempo::Tempo;
