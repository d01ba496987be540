//! The one-shot stop signal and the sources that raise it.
//!
//! A line on stdin stops the metronome. SIGINT and SIGTERM raise the same
//! signal so that the terminal and staged files get cleaned up on Ctrl+C.
//! However many sources fire, the scheduler sees at most one stop.

use crate::error::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Raises the stop signal. Cheap to clone; all clones share one shot.
#[derive(Debug, Clone)]
pub struct StopTrigger {
    fired: Arc<AtomicBool>,
    tx: Sender<()>,
}

impl StopTrigger {
    /// Create a trigger and the receiver the scheduler waits on.
    pub fn pair() -> (Self, Receiver<()>) {
        let (tx, rx) = bounded(1);
        let trigger = Self {
            fired: Arc::new(AtomicBool::new(false)),
            tx,
        };
        (trigger, rx)
    }

    /// Raise the stop signal.
    ///
    /// Returns `true` only for the call that actually raised it.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        // Capacity is 1 and only one caller gets here, so this never blocks
        let _ = self.tx.try_send(());
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

/// Wait for one line from `reader` on a background thread, then fire.
///
/// EOF or a read error leaves the trigger untouched.
pub fn listen_for_line<R>(mut reader: R, trigger: StopTrigger) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => log::debug!("Input closed, stop listener exiting"),
            Ok(_) => {
                trigger.fire();
            }
            Err(e) => log::debug!("Stop listener read error: {}", e),
        }
    })
}

/// Wait for Enter on stdin.
pub fn listen_stdin(trigger: StopTrigger) -> JoinHandle<()> {
    listen_for_line(io::BufReader::new(io::stdin()), trigger)
}

/// Fire the trigger on SIGINT or SIGTERM.
#[cfg(unix)]
pub fn forward_signals(trigger: StopTrigger) -> Result<()> {
    use crate::error::Error;
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).map_err(|e| Error::Signal(e.to_string()))?;

    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            log::debug!("Received signal {}", signal);
            trigger.fire();
        }
    });

    Ok(())
}

/// No signal forwarding off unix; Ctrl+C terminates the process directly.
#[cfg(not(unix))]
pub fn forward_signals(_trigger: StopTrigger) -> Result<()> {
    Ok(())
}
