//! Audio outputs
//!
//! A [`ToneOutput`] is the process-wide audio line that tones are played on.
//! Outputs are created lazily through an [`OutputFactory`], so nothing touches
//! the audio device until a tone is actually wanted.

use crate::tone::{render_mono, Envelope, Tone};
use crate::AudioConfig;
use arcade_core::{ArcadeError, Result};
use kira::sound::static_sound::{StaticSoundData, StaticSoundSettings};
use kira::{AudioManager, AudioManagerSettings, DefaultBackend, Easing, Frame, StartTime, Tween};
use std::sync::Arc;
use std::time::Duration;

/// A live audio line capable of playing transient tones.
pub trait ToneOutput {
    /// Whether the output can render smooth exponential envelopes.
    fn supports_ramps(&self) -> bool;

    /// Resume a suspended output. Called from user-gesture handlers.
    fn resume(&mut self) -> Result<()>;

    /// Fire-and-forget playback of one tone.
    fn play(&mut self, tone: &Tone, envelope: Envelope) -> Result<()>;
}

/// Creates the output on first use.
pub trait OutputFactory {
    fn create(&mut self) -> Result<Box<dyn ToneOutput>>;
}

/// Factory for hosts without any audio capability.
pub struct Unsupported;

impl OutputFactory for Unsupported {
    fn create(&mut self) -> Result<Box<dyn ToneOutput>> {
        Err(ArcadeError::AudioError("audio output unsupported".into()))
    }
}

/// Factory opening the default device through Kira.
pub struct KiraFactory {
    config: AudioConfig,
}

impl KiraFactory {
    pub fn new(config: AudioConfig) -> Self {
        Self { config }
    }
}

impl OutputFactory for KiraFactory {
    fn create(&mut self) -> Result<Box<dyn ToneOutput>> {
        Ok(Box::new(KiraOutput::new(&self.config)?))
    }
}

/// Tone output backed by a Kira `AudioManager`.
pub struct KiraOutput {
    manager: AudioManager<DefaultBackend>,
    sample_rate: u32,
    volume: f32,
    tail: Duration,
}

impl KiraOutput {
    pub fn new(config: &AudioConfig) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| ArcadeError::AudioError(format!("no audio device available ({e})")))?;

        Ok(Self {
            manager,
            sample_rate: config.sample_rate,
            volume: config.volume,
            tail: Duration::from_secs_f32(config.tail_ms.max(0.0) / 1000.0),
        })
    }
}

impl ToneOutput for KiraOutput {
    fn supports_ramps(&self) -> bool {
        true
    }

    fn resume(&mut self) -> Result<()> {
        // The cpal stream starts running when the manager is created.
        Ok(())
    }

    fn play(&mut self, tone: &Tone, envelope: Envelope) -> Result<()> {
        let frames: Arc<[Frame]> =
            render_mono(tone, envelope, self.sample_rate, self.volume, self.tail)
                .into_iter()
                .map(Frame::from_mono)
                .collect();

        let data = StaticSoundData {
            sample_rate: self.sample_rate,
            frames,
            settings: StaticSoundSettings::default(),
            slice: None,
        };

        let mut handle = self
            .manager
            .play(data)
            .map_err(|e| ArcadeError::AudioError(format!("failed to play tone: {e}")))?;

        if envelope == Envelope::Gate {
            // Timer-based cutoff for the flat envelope.
            handle.stop(Tween {
                start_time: StartTime::Delayed(tone.duration),
                duration: Duration::ZERO,
                easing: Easing::Linear,
            });
        }

        Ok(())
    }
}
