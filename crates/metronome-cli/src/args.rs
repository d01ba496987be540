//! Command-line arguments.

use anyhow::Result;
use clap::Parser;
use metronome_core::Tempo;

/// Shown under `--help` and after every usage error
pub const EXAMPLE: &str = "Example: metronome 4 120";

/// Terminal metronome
#[derive(Parser, Debug)]
#[command(name = "metronome")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A terminal metronome that accents the first beat of every measure", long_about = None)]
#[command(after_help = EXAMPLE)]
pub struct Cli {
    /// Beats in each measure (the first one is accented)
    #[arg(
        value_name = "beats_per_measure",
        allow_negative_numbers = true,
        value_parser = parse_beats_per_measure
    )]
    pub beats_per_measure: u32,

    /// Tempo in beats per minute
    #[arg(value_name = "bpm", allow_negative_numbers = true, value_parser = parse_bpm)]
    pub bpm: u32,
}

impl Cli {
    pub fn tempo(&self) -> Result<Tempo> {
        Ok(Tempo::new(self.beats_per_measure, self.bpm)?)
    }
}

fn parse_beats_per_measure(s: &str) -> std::result::Result<u32, String> {
    parse_positive("beats_per_measure", s)
}

fn parse_bpm(s: &str) -> std::result::Result<u32, String> {
    parse_positive("bpm", s)
}

/// Digits only: surrounding whitespace is rejected like any other junk.
fn parse_positive(name: &str, s: &str) -> std::result::Result<u32, String> {
    match s.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(format!("{} must be a positive integer", name)),
    }
}
