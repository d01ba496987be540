//! Beat scheduler.
//!
//! The scheduler owns the beat counter and races two event sources: a
//! periodic tick and the one-shot stop signal. Each tick plays a click and
//! prints the beat number; beat 1 also clears the line so every measure
//! starts fresh. Stop is the only way out.
//!
//! ```text
//!            tick                    tick (beat == N)
//! Running(1) ────► Running(2) ─ … ─► Running(N) ──────► Running(1)
//!     │                                   │
//!     └──────────── stop ─────────────────┴──► Stopped
//! ```

use crate::assets::ClickSound;
use crate::player::ClickOutput;
use crate::tempo::Tempo;
use crossbeam_channel::{never, select, tick, Receiver};
use crossterm::cursor::Show;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Shortest tick period handed to the timer.
///
/// Only matters above 60000 BPM, where the truncated interval is zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// One beat as it is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beat {
    /// Position within the measure, starting at 1
    pub number: u32,
}

impl Beat {
    /// First beat of a measure
    pub fn is_downbeat(&self) -> bool {
        self.number == 1
    }

    /// Click to play for this beat
    pub fn sound(&self) -> ClickSound {
        if self.is_downbeat() {
            ClickSound::Accent
        } else {
            ClickSound::Regular
        }
    }
}

/// Position within the measure, cycling through `1..=beats_per_measure`.
#[derive(Debug, Clone)]
pub struct BeatCounter {
    beat: u32,
    beats_per_measure: u32,
}

impl BeatCounter {
    pub fn new(beats_per_measure: u32) -> Self {
        Self {
            beat: 1,
            beats_per_measure: beats_per_measure.max(1),
        }
    }

    /// The beat the next tick will play
    pub fn current(&self) -> u32 {
        self.beat
    }

    /// Return the current beat and move to the next one, wrapping after the
    /// last beat of the measure.
    pub fn advance(&mut self) -> Beat {
        let beat = Beat { number: self.beat };
        self.beat += 1;
        if self.beat > self.beats_per_measure {
            self.beat = 1;
        }
        beat
    }
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the tick that plays this beat
    Running(u32),
    /// Terminal
    Stopped,
}

/// Drives clicks and the beat display from a periodic tick until stopped.
pub struct BeatScheduler<O, W> {
    tempo: Tempo,
    counter: BeatCounter,
    output: O,
    out: W,
    stopped: bool,
}

impl<O: ClickOutput, W: Write> BeatScheduler<O, W> {
    /// Create a scheduler in `Running(1)`. Nothing is played until the
    /// first tick.
    pub fn new(tempo: Tempo, output: O, out: W) -> Self {
        Self {
            tempo,
            counter: BeatCounter::new(tempo.beats_per_measure()),
            output,
            out,
            stopped: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.stopped {
            SchedulerState::Stopped
        } else {
            SchedulerState::Running(self.counter.current())
        }
    }

    /// Handle one tick. Does nothing once stopped.
    pub fn tick(&mut self) -> io::Result<Option<Beat>> {
        if self.stopped {
            return Ok(None);
        }

        let beat = self.counter.advance();
        if beat.is_downbeat() {
            queue!(self.out, Print('\r'), Clear(ClearType::UntilNewLine))?;
        }
        self.output.click(beat.sound());
        write!(self.out, "{} ", beat.number)?;
        self.out.flush()?;

        Ok(Some(beat))
    }

    /// Enter `Stopped`, restoring the cursor and printing the farewell line.
    pub fn stop(&mut self) -> io::Result<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;

        queue!(self.out, Show)?;
        writeln!(self.out)?;
        writeln!(self.out, "Metronome stopped.")?;
        self.out.flush()
    }

    /// Run on a timer at the tempo's interval until `stop` delivers.
    ///
    /// Returns the number of beats played.
    pub fn run(&mut self, stop: &Receiver<()>) -> io::Result<u64> {
        let interval = self.tempo.interval().max(MIN_INTERVAL);
        log::debug!("Beat interval: {:?}", interval);
        let ticks = tick(interval);
        self.run_with(&ticks, stop)
    }

    /// Run against an arbitrary tick source.
    ///
    /// A disconnected stop channel means nobody can stop us any more, so it
    /// is ignored from then on. A disconnected tick source ends the run as
    /// if stopped.
    pub fn run_with(&mut self, ticks: &Receiver<Instant>, stop: &Receiver<()>) -> io::Result<u64> {
        let closed = never();
        let mut stop_open = true;
        let mut beats = 0u64;

        loop {
            let stop_rx = if stop_open { stop } else { &closed };
            select! {
                recv(stop_rx) -> msg => {
                    if msg.is_err() {
                        log::debug!("Stop channel closed, running until killed");
                        stop_open = false;
                        continue;
                    }
                    self.stop()?;
                    return Ok(beats);
                }
                recv(ticks) -> msg => {
                    if msg.is_err() {
                        log::debug!("Tick source closed");
                        self.stop()?;
                        return Ok(beats);
                    }
                    self.tick()?;
                    beats += 1;
                }
            }
        }
    }

    /// Take back the click output and the writer
    pub fn into_parts(self) -> (O, W) {
        (self.output, self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};
    use std::sync::Mutex;
    use std::thread;

    #[derive(Default)]
    struct Recorder {
        sounds: Mutex<Vec<ClickSound>>,
    }

    impl ClickOutput for Recorder {
        fn click(&self, sound: ClickSound) {
            self.sounds.lock().unwrap().push(sound);
        }
    }

    impl Recorder {
        fn sounds(&self) -> Vec<ClickSound> {
            self.sounds.lock().unwrap().clone()
        }
    }

    fn scheduler(beats: u32, bpm: u32) -> BeatScheduler<Recorder, Vec<u8>> {
        BeatScheduler::new(Tempo::new(beats, bpm).unwrap(), Recorder::default(), Vec::new())
    }

    fn text(out: &[u8]) -> String {
        String::from_utf8(out.to_vec()).unwrap()
    }

    #[test]
    fn test_counter_cycles_within_measure() {
        for n in 1..=12u32 {
            let mut counter = BeatCounter::new(n);
            let played: Vec<u32> = (0..n * 3).map(|_| counter.advance().number).collect();
            let expected: Vec<u32> = (0..n * 3).map(|i| i % n + 1).collect();
            assert_eq!(played, expected);
            assert!(played.iter().all(|b| (1..=n).contains(b)));
        }
    }

    #[test]
    fn test_single_beat_measure_is_always_downbeat() {
        let mut counter = BeatCounter::new(1);
        for _ in 0..5 {
            assert!(counter.advance().is_downbeat());
            assert_eq!(counter.current(), 1);
        }
    }

    #[test]
    fn test_initial_state_emits_nothing() {
        let sched = scheduler(4, 120);
        assert_eq!(sched.state(), SchedulerState::Running(1));
        let (recorder, out) = sched.into_parts();
        assert!(out.is_empty());
        assert!(recorder.sounds().is_empty());
    }

    #[test]
    fn test_four_four_sequence() {
        let mut sched = scheduler(4, 120);
        for _ in 0..9 {
            sched.tick().unwrap();
        }
        assert_eq!(sched.state(), SchedulerState::Running(2));

        let (recorder, out) = sched.into_parts();
        assert_eq!(
            text(&out),
            "\r\x1b[K1 2 3 4 \r\x1b[K1 2 3 4 \r\x1b[K1 "
        );

        use crate::assets::ClickSound::{Accent, Regular};
        assert_eq!(
            recorder.sounds(),
            [Accent, Regular, Regular, Regular, Accent, Regular, Regular, Regular, Accent]
        );
    }

    #[test]
    fn test_only_downbeat_is_accented() {
        let mut sched = scheduler(3, 60);
        let mut beats = Vec::new();
        for _ in 0..7 {
            beats.push(sched.tick().unwrap().unwrap());
        }
        let (recorder, _) = sched.into_parts();
        for (beat, sound) in beats.iter().zip(recorder.sounds()) {
            assert_eq!(beat.number == 1, sound == ClickSound::Accent);
        }
    }

    #[test]
    fn test_stop_is_terminal() {
        let mut sched = scheduler(4, 120);
        sched.tick().unwrap();
        sched.stop().unwrap();
        assert_eq!(sched.state(), SchedulerState::Stopped);

        assert_eq!(sched.tick().unwrap(), None);
        sched.stop().unwrap();

        let (recorder, out) = sched.into_parts();
        assert_eq!(recorder.sounds().len(), 1);
        assert_eq!(text(&out), "\r\x1b[K1 \x1b[?25h\nMetronome stopped.\n");
    }

    #[test]
    fn test_run_processes_ticks_until_stop() {
        // Rendezvous channels: each send returns only once the scheduler
        // has taken the tick, so the stop cannot overtake any of them.
        let (tick_tx, tick_rx) = bounded(0);
        let (stop_tx, stop_rx) = bounded(0);

        let runner = thread::spawn(move || {
            let mut sched = scheduler(3, 120);
            let beats = sched.run_with(&tick_rx, &stop_rx).unwrap();
            let state = sched.state();
            let (recorder, out) = sched.into_parts();
            (beats, state, recorder.sounds(), text(&out))
        });

        for _ in 0..5 {
            tick_tx.send(Instant::now()).unwrap();
        }
        stop_tx.send(()).unwrap();

        let (beats, state, sounds, out) = runner.join().unwrap();
        assert_eq!(beats, 5);
        assert_eq!(state, SchedulerState::Stopped);
        assert_eq!(sounds.len(), 5);
        assert_eq!(out, "\r\x1b[K1 2 3 \r\x1b[K1 2 \x1b[?25h\nMetronome stopped.\n");

        // Nothing is taken after the stop
        assert!(tick_tx.send_timeout(Instant::now(), Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_stop_before_first_tick() {
        let (_tick_tx, tick_rx) = unbounded::<Instant>();
        let (stop_tx, stop_rx) = bounded(1);
        stop_tx.send(()).unwrap();

        let mut sched = scheduler(4, 120);
        assert_eq!(sched.run_with(&tick_rx, &stop_rx).unwrap(), 0);
        let (recorder, out) = sched.into_parts();
        assert!(recorder.sounds().is_empty());
        assert_eq!(text(&out), "\x1b[?25h\nMetronome stopped.\n");
    }

    #[test]
    fn test_closed_stop_channel_keeps_running() {
        let (tick_tx, tick_rx) = bounded(0);
        let (stop_tx, stop_rx) = bounded::<()>(1);
        drop(stop_tx);

        let runner = thread::spawn(move || {
            let mut sched = scheduler(2, 120);
            sched.run_with(&tick_rx, &stop_rx).unwrap()
        });

        for _ in 0..4 {
            tick_tx.send(Instant::now()).unwrap();
        }
        drop(tick_tx);

        assert_eq!(runner.join().unwrap(), 4);
    }

    #[test]
    fn test_run_on_real_timer() {
        let (stop_tx, stop_rx) = bounded(1);
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(120));
            stop_tx.send(()).unwrap();
        });

        // 6000 BPM is a 10ms interval
        let mut sched = scheduler(4, 6000);
        let beats = sched.run(&stop_rx).unwrap();
        stopper.join().unwrap();

        assert!(beats >= 1);
        assert_eq!(sched.state(), SchedulerState::Stopped);
    }
}
