//! Arcade Audio: short tone feedback (Kira backend)
//!
//! Provides the runtime's audio backend:
//! - `AudioBackend`: lazily created output, global enabled flag, `beep`
//! - `tone`: sine tone synthesis with exponential or gated envelopes
//! - `output`: the `ToneOutput` seam and its Kira implementation
//!
//! No sound is produced unless the backend is enabled, and a disabled
//! backend never opens the audio device.

pub mod output;
pub mod tone;

use output::{KiraFactory, OutputFactory, ToneOutput};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tone::{Envelope, Tone};

/// Audio tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Use exponential envelopes when the output supports them
    pub smooth_envelopes: bool,
    /// Peak amplitude of a tone (0.0..1.0)
    pub volume: f32,
    /// Attack ramp length in milliseconds
    pub attack_ms: f32,
    /// How long the oscillator keeps running after the envelope ends
    pub tail_ms: f32,
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            smooth_envelopes: true,
            volume: 0.25,
            attack_ms: 10.0,
            tail_ms: 30.0,
            sample_rate: 44_100,
        }
    }
}

/// Where the backend is in its lazy lifecycle.
enum OutputSlot {
    /// Not yet requested.
    Pending,
    Ready(Box<dyn ToneOutput>),
    /// Creation failed; the backend stays silent for the process lifetime.
    Unsupported,
}

/// Lazily-initialized tone synthesizer gated by an enabled flag.
pub struct AudioBackend {
    config: AudioConfig,
    factory: Box<dyn OutputFactory>,
    output: OutputSlot,
    enabled: bool,
}

impl AudioBackend {
    /// Backend that opens the default device through Kira on first use.
    pub fn new(config: AudioConfig) -> Self {
        let factory = KiraFactory::new(config.clone());
        Self::with_factory(config, Box::new(factory))
    }

    /// Backend with a custom output factory. Starts disabled.
    pub fn with_factory(config: AudioConfig, factory: Box<dyn OutputFactory>) -> Self {
        Self {
            config,
            factory,
            output: OutputSlot::Pending,
            enabled: false,
        }
    }

    /// Backend for hosts without audio: every call is a no-op.
    pub fn silent() -> Self {
        Self::with_factory(AudioConfig::default(), Box::new(output::Unsupported))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether an output has been created.
    pub fn is_initialized(&self) -> bool {
        matches!(self.output, OutputSlot::Ready(_))
    }

    /// Create (if needed) and resume the output.
    ///
    /// Must be called from a real input-event handler. Resume failures are
    /// swallowed; the next unlock retries.
    pub fn unlock(&mut self) {
        let Some(output) = self.ensure_output() else {
            return;
        };
        if let Err(e) = output.resume() {
            log::debug!("audio: resume rejected ({e}), will retry on next gesture");
        }
    }

    /// Toggle whether `beep` produces sound. Enabling unlocks eagerly.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::debug!("audio: enabled = {enabled}");
        if enabled {
            self.unlock();
        }
    }

    /// Play a single decaying tone. No-op while disabled or unsupported.
    pub fn beep(&mut self, frequency: f32, duration_ms: u32) {
        if !self.enabled {
            return;
        }

        let attack = Duration::from_secs_f32(self.config.attack_ms.max(0.0) / 1000.0);
        let smooth = self.config.smooth_envelopes;
        let Some(output) = self.ensure_output() else {
            return;
        };

        let envelope = if smooth && output.supports_ramps() {
            Envelope::Exponential { attack }
        } else {
            Envelope::Gate
        };

        if let Err(e) = output.play(&Tone::new(frequency, duration_ms), envelope) {
            log::debug!("audio: beep dropped ({e})");
        }
    }

    fn ensure_output(&mut self) -> Option<&mut Box<dyn ToneOutput>> {
        if matches!(self.output, OutputSlot::Pending) {
            self.output = match self.factory.create() {
                Ok(output) => {
                    log::info!("audio: output created");
                    OutputSlot::Ready(output)
                }
                Err(e) => {
                    log::warn!("audio: {e}, running silent");
                    OutputSlot::Unsupported
                }
            };
        }

        match &mut self.output {
            OutputSlot::Ready(output) => Some(output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::{ArcadeError, Result};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        created: u32,
        resumed: u32,
        played: Vec<(Tone, Envelope)>,
    }

    struct RecordingOutput {
        log: Rc<RefCell<Log>>,
        ramps: bool,
        reject_resume: bool,
    }

    impl ToneOutput for RecordingOutput {
        fn supports_ramps(&self) -> bool {
            self.ramps
        }

        fn resume(&mut self) -> Result<()> {
            self.log.borrow_mut().resumed += 1;
            if self.reject_resume {
                return Err(ArcadeError::AudioError("blocked by gesture policy".into()));
            }
            Ok(())
        }

        fn play(&mut self, tone: &Tone, envelope: Envelope) -> Result<()> {
            self.log.borrow_mut().played.push((*tone, envelope));
            Ok(())
        }
    }

    struct RecordingFactory {
        log: Rc<RefCell<Log>>,
        ramps: bool,
        reject_resume: bool,
    }

    impl OutputFactory for RecordingFactory {
        fn create(&mut self) -> Result<Box<dyn ToneOutput>> {
            self.log.borrow_mut().created += 1;
            Ok(Box::new(RecordingOutput {
                log: self.log.clone(),
                ramps: self.ramps,
                reject_resume: self.reject_resume,
            }))
        }
    }

    fn backend(ramps: bool) -> (AudioBackend, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let factory = RecordingFactory {
            log: log.clone(),
            ramps,
            reject_resume: false,
        };
        (
            AudioBackend::with_factory(AudioConfig::default(), Box::new(factory)),
            log,
        )
    }

    #[test]
    fn disabled_beep_creates_nothing() {
        let (mut audio, log) = backend(true);
        audio.set_enabled(false);
        audio.beep(880.0, 80);
        assert!(!audio.is_initialized());
        assert_eq!(log.borrow().created, 0);
        assert!(log.borrow().played.is_empty());
    }

    #[test]
    fn enabling_unlocks_eagerly() {
        let (mut audio, log) = backend(true);
        audio.set_enabled(true);
        assert!(audio.is_initialized());
        assert_eq!(log.borrow().created, 1);
        assert_eq!(log.borrow().resumed, 1);
    }

    #[test]
    fn output_is_created_once() {
        let (mut audio, log) = backend(true);
        audio.set_enabled(true);
        audio.beep(440.0, 50);
        audio.unlock();
        audio.beep(660.0, 50);
        assert_eq!(log.borrow().created, 1);
        assert_eq!(log.borrow().played.len(), 2);
    }

    #[test]
    fn smooth_envelope_when_supported() {
        let (mut audio, log) = backend(true);
        audio.set_enabled(true);
        audio.beep(880.0, 80);
        let (tone, envelope) = log.borrow().played[0];
        assert_eq!(tone.frequency, 880.0);
        assert_eq!(tone.duration, Duration::from_millis(80));
        assert!(matches!(envelope, Envelope::Exponential { .. }));
    }

    #[test]
    fn gate_fallback_without_ramps() {
        let (mut audio, log) = backend(false);
        audio.set_enabled(true);
        audio.beep(880.0, 80);
        assert_eq!(log.borrow().played[0].1, Envelope::Gate);
    }

    #[test]
    fn disabling_silences_existing_output() {
        let (mut audio, log) = backend(true);
        audio.set_enabled(true);
        audio.set_enabled(false);
        audio.beep(880.0, 80);
        assert!(log.borrow().played.is_empty());
    }

    #[test]
    fn rejected_resume_is_swallowed_and_retried() {
        let log = Rc::new(RefCell::new(Log::default()));
        let factory = RecordingFactory {
            log: log.clone(),
            ramps: true,
            reject_resume: true,
        };
        let mut audio = AudioBackend::with_factory(AudioConfig::default(), Box::new(factory));
        audio.set_enabled(true);
        audio.unlock();
        assert_eq!(log.borrow().resumed, 2);
        audio.beep(440.0, 20);
        assert_eq!(log.borrow().played.len(), 1);
    }

    #[test]
    fn unsupported_backend_is_silent_noop() {
        let mut audio = AudioBackend::silent();
        audio.set_enabled(true);
        audio.unlock();
        audio.beep(880.0, 80);
        assert!(audio.is_enabled());
        assert!(!audio.is_initialized());
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: AudioConfig = toml::from_str("volume = 0.5").unwrap();
        assert_eq!(config.volume, 0.5);
        assert!(config.smooth_envelopes);
        assert_eq!(config.sample_rate, 44_100);
    }
}
