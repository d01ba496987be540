//! One metronome run: staging, stop sources, terminal setup and the beat loop.

use crate::args::Cli;
use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use metronome_core::listener::{forward_signals, listen_stdin};
use metronome_core::{BeatScheduler, ClickPlayer, ExternalPlayer, StagedClicks, StopTrigger, Tempo};
use std::io::{self, Write};

/// Hides the cursor while alive and shows it again when dropped.
struct CursorGuard;

impl CursorGuard {
    fn hide() -> io::Result<Self> {
        execute!(io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
    }
}

/// Run the metronome until stopped.
///
/// Staged click files are removed when `player` goes out of scope at the
/// end of this function, whichever way it returns.
pub fn run(cli: &Cli) -> Result<()> {
    let tempo = cli.tempo()?;

    let player = ClickPlayer::new(ExternalPlayer::detect(), StagedClicks::stage_all());
    if player.player().is_none() {
        log::info!("No supported audio player found, running silently");
    }

    let mut stdout = io::stdout();
    write_banner(&mut stdout, &tempo)?;

    let (trigger, stop) = StopTrigger::pair();
    listen_stdin(trigger.clone());
    if let Err(e) = forward_signals(trigger) {
        log::warn!("Ctrl+C will not stop cleanly: {}", e);
    }

    let _cursor = CursorGuard::hide().context("Failed to hide cursor")?;

    let mut scheduler = BeatScheduler::new(tempo, &player, stdout);
    let beats = scheduler.run(&stop).context("Failed to write beat display")?;
    log::debug!("Stopped after {} beats", beats);

    Ok(())
}

/// Summary and prompt, followed by the blank line the beats start under.
fn write_banner<W: Write>(out: &mut W, tempo: &Tempo) -> io::Result<()> {
    writeln!(out, "Metronome: {}", tempo)?;
    writeln!(out, "Press Enter to stop...")?;
    writeln!(out)?;
    out.flush()
}
