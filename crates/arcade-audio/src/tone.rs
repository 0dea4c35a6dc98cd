//! Tone synthesis
//!
//! Renders a single sine "beep" into mono samples. Two envelopes exist:
//! an exponential attack/decay and a flat gate whose cutoff is left to the
//! output (a timer-based stop).

use std::time::Duration;

/// Amplitude the exponential envelope starts from and decays back to.
/// Exponential ramps cannot reach zero, so they bottom out here.
pub const ENVELOPE_FLOOR: f32 = 0.0001;

/// A transient tone request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Oscillator frequency in Hz
    pub frequency: f32,
    /// Audible duration of the envelope
    pub duration: Duration,
}

impl Tone {
    pub fn new(frequency: f32, duration_ms: u32) -> Self {
        Self {
            frequency,
            duration: Duration::from_millis(duration_ms as u64),
        }
    }
}

/// Amplitude envelope applied to a tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// Exponential ramp from the floor up to peak over `attack`, then
    /// exponential ramp back down to the floor at the tone's duration.
    Exponential { attack: Duration },
    /// Instant on at peak; the output is responsible for cutting the tone
    /// off after its duration.
    Gate,
}

/// Envelope gain in `[0, 1]` at `t` seconds into the tone.
pub fn envelope_gain(tone: &Tone, envelope: Envelope, t: f32) -> f32 {
    let duration = tone.duration.as_secs_f32();
    match envelope {
        Envelope::Gate => {
            if t < duration {
                1.0
            } else {
                0.0
            }
        }
        Envelope::Exponential { attack } => {
            let attack = attack.as_secs_f32();
            // A tone shorter than its attack still gets a (short) decay.
            let end = duration.max(attack + 0.001);
            if t <= 0.0 {
                ENVELOPE_FLOOR
            } else if t < attack {
                exp_ramp(ENVELOPE_FLOOR, 1.0, t / attack)
            } else if t < end {
                exp_ramp(1.0, ENVELOPE_FLOOR, (t - attack) / (end - attack))
            } else {
                0.0
            }
        }
    }
}

/// Exponential interpolation `from * (to / from)^progress`.
fn exp_ramp(from: f32, to: f32, progress: f32) -> f32 {
    from * (to / from).powf(progress.clamp(0.0, 1.0))
}

/// Render a tone as mono samples at `sample_rate`.
///
/// The oscillator runs for `duration + tail` so the envelope completes
/// before the sound ends. `volume` scales the peak amplitude.
pub fn render_mono(
    tone: &Tone,
    envelope: Envelope,
    sample_rate: u32,
    volume: f32,
    tail: Duration,
) -> Vec<f32> {
    let total_nanos = (tone.duration + tail).as_nanos() * sample_rate as u128;
    let count = total_nanos.div_ceil(1_000_000_000) as usize;
    let step = std::f32::consts::TAU * tone.frequency / sample_rate as f32;

    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let gain = match envelope {
                // Gated tones sustain through the tail; the cutoff is timed.
                Envelope::Gate => 1.0,
                Envelope::Exponential { .. } => envelope_gain(tone, envelope, t),
            };
            (step * i as f32).sin() * gain * volume
        })
        .collect()
}
