//! Build script for metronome-core.
//!
//! Synthesizes the accent and regular click payloads into OUT_DIR so the
//! library can embed them with `include_bytes!`.

use std::env;
use std::f32::consts::PI;
use std::path::Path;

const SAMPLE_RATE: u32 = 44_100;

/// A decaying sine burst.
struct Click {
    file_name: &'static str,
    frequency: f32,
    amplitude: f32,
    duration_ms: u32,
}

const CLICKS: [Click; 2] = [
    Click {
        file_name: "click_hi.wav",
        frequency: 1760.0,
        amplitude: 0.9,
        duration_ms: 40,
    },
    Click {
        file_name: "click_lo.wav",
        frequency: 880.0,
        amplitude: 0.6,
        duration_ms: 30,
    },
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR").unwrap();

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    for click in &CLICKS {
        let dest_path = Path::new(&out_dir).join(click.file_name);
        let mut writer = hound::WavWriter::create(&dest_path, spec).unwrap();

        let total = SAMPLE_RATE * click.duration_ms / 1000;
        for n in 0..total {
            let t = n as f32 / SAMPLE_RATE as f32;
            // Exponential decay down to roughly -60dB at the end of the burst
            let envelope = (-6.9 * n as f32 / total as f32).exp();
            let sample = (2.0 * PI * click.frequency * t).sin() * envelope * click.amplitude;
            writer
                .write_sample((sample * i16::MAX as f32) as i16)
                .unwrap();
        }

        writer.finalize().unwrap();
    }
}
