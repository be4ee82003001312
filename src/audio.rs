//! Ambient soundscapes.
//!
//! [`SoundGenerator`] synthesizes each soundscape from low-passed noise,
//! a few sine partials and a slow swell. Output through the sound card lives
//! in [`AmbientPlayer`], which needs the `audio` feature on native targets.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::error::AudioError;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Soundscape {
    #[default]
    Rain,
    Ocean,
    Forest,
    Wind,
    SingingBowl,
}

/// Synthesis parameters of a soundscape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundParams {
    /// Amplitude of the noise bed
    pub noise_level: f32,
    /// One-pole low-pass coefficient in (0, 1]; lower is darker
    pub noise_cutoff: f32,
    /// Sine partials as (frequency Hz, amplitude)
    pub partials: &'static [(f32, f32)],
    /// Swell frequency in Hz
    pub lfo_hz: f32,
    /// How much the swell dips the level, in [0, 1]
    pub lfo_depth: f32,
}

impl Soundscape {
    pub const ALL: [Soundscape; 5] = [
        Soundscape::Rain,
        Soundscape::Ocean,
        Soundscape::Forest,
        Soundscape::Wind,
        Soundscape::SingingBowl,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Soundscape::Rain => "Rain",
            Soundscape::Ocean => "Ocean Waves",
            Soundscape::Forest => "Forest",
            Soundscape::Wind => "Gentle Wind",
            Soundscape::SingingBowl => "Singing Bowl",
        }
    }

    pub fn params(self) -> SoundParams {
        match self {
            Soundscape::Rain => SoundParams {
                noise_level: 0.35,
                noise_cutoff: 0.6,
                partials: &[],
                lfo_hz: 0.7,
                lfo_depth: 0.1,
            },
            Soundscape::Ocean => SoundParams {
                noise_level: 0.45,
                noise_cutoff: 0.08,
                partials: &[],
                lfo_hz: 0.1,
                lfo_depth: 0.8,
            },
            Soundscape::Forest => SoundParams {
                noise_level: 0.15,
                noise_cutoff: 0.2,
                partials: &[(2_400.0, 0.015), (3_100.0, 0.01)],
                lfo_hz: 0.35,
                lfo_depth: 0.5,
            },
            Soundscape::Wind => SoundParams {
                noise_level: 0.4,
                noise_cutoff: 0.03,
                partials: &[],
                lfo_hz: 0.05,
                lfo_depth: 0.6,
            },
            Soundscape::SingingBowl => SoundParams {
                noise_level: 0.0,
                noise_cutoff: 1.0,
                partials: &[(220.0, 0.25), (528.0, 0.12), (880.5, 0.06), (1_320.0, 0.03)],
                lfo_hz: 0.125,
                lfo_depth: 0.7,
            },
        }
    }
}

/// Sample-by-sample synthesizer for one soundscape
#[derive(Debug, Clone)]
pub struct SoundGenerator {
    soundscape: Soundscape,
    params: SoundParams,
    sample_rate: f32,
    volume: f32,
    phases: Vec<f32>,
    lfo_phase: f32,
    filtered: f32,
    rng: u32,
}

impl SoundGenerator {
    pub fn new(soundscape: Soundscape, sample_rate: u32) -> Self {
        let params = soundscape.params();
        Self {
            soundscape,
            params,
            sample_rate: sample_rate.max(1) as f32,
            volume: 0.5,
            phases: vec![0.0; params.partials.len()],
            lfo_phase: 0.0,
            filtered: 0.0,
            rng: 0x9E37_79B9,
        }
    }

    pub fn soundscape(&self) -> Soundscape {
        self.soundscape
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
    }

    /// Xorshift white noise in [-1, 1]
    fn noise(&mut self) -> f32 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    pub fn next_sample(&mut self) -> f32 {
        let p = self.params;

        let white = self.noise();
        self.filtered += p.noise_cutoff * (white - self.filtered);
        let mut sample = self.filtered * p.noise_level;

        for (phase, &(freq, amp)) in self.phases.iter_mut().zip(p.partials) {
            sample += phase.sin() * amp;
            *phase = (*phase + TAU * freq / self.sample_rate) % TAU;
        }

        // Swell between (1 - depth) and 1
        let swell = 1.0 - p.lfo_depth * 0.5 * (1.0 + self.lfo_phase.cos());
        self.lfo_phase = (self.lfo_phase + TAU * p.lfo_hz / self.sample_rate) % TAU;

        (sample * swell * self.volume).clamp(-1.0, 1.0)
    }

    /// Fill an interleaved buffer, writing the same sample to every channel
    pub fn fill(&mut self, buffer: &mut [f32], channels: usize) {
        for frame in buffer.chunks_mut(channels.max(1)) {
            let sample = self.next_sample();
            frame.fill(sample);
        }
    }
}

#[cfg(all(feature = "audio", not(target_arch = "wasm32")))]
mod backend {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
    use std::sync::Arc;

    use super::{SoundGenerator, Soundscape};
    use crate::error::AudioError;

    /// Parameters shared with the audio callback thread
    struct Shared {
        volume_bits: AtomicU32,
        playing: AtomicBool,
        soundscape: AtomicU8,
    }

    impl Shared {
        fn volume(&self) -> f32 {
            f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
        }

        fn soundscape(&self) -> Soundscape {
            Soundscape::ALL
                .get(self.soundscape.load(Ordering::Relaxed) as usize)
                .copied()
                .unwrap_or_default()
        }
    }

    fn index_of(soundscape: Soundscape) -> u8 {
        Soundscape::ALL.iter().position(|s| *s == soundscape).unwrap_or(0) as u8
    }

    pub struct AmbientPlayer {
        shared: Arc<Shared>,
        _stream: cpal::Stream,
    }

    impl AmbientPlayer {
        pub fn new(soundscape: Soundscape, volume: f32) -> Result<Self, AudioError> {
            let host = cpal::default_host();
            let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
            let supported = device
                .default_output_config()
                .map_err(|e| AudioError::Backend(e.to_string()))?;

            let sample_rate = supported.sample_rate();
            let channels = supported.channels() as usize;
            let shared = Arc::new(Shared {
                volume_bits: AtomicU32::new(volume.clamp(0.0, 1.0).to_bits()),
                playing: AtomicBool::new(false),
                soundscape: AtomicU8::new(index_of(soundscape)),
            });

            let config: cpal::StreamConfig = supported.clone().into();
            let stream = match supported.sample_format() {
                cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, sample_rate, channels, Arc::clone(&shared))?,
                cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, sample_rate, channels, Arc::clone(&shared))?,
                cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, sample_rate, channels, Arc::clone(&shared))?,
                other => return Err(AudioError::Backend(format!("unsupported sample format {other:?}"))),
            };
            stream.play().map_err(|e| AudioError::Backend(e.to_string()))?;
            log::info!("Ambient audio started at {sample_rate} Hz, {channels} channel(s)");

            Ok(Self { shared, _stream: stream })
        }

        pub fn set_playing(&self, playing: bool) {
            self.shared.playing.store(playing, Ordering::Relaxed);
        }

        pub fn is_playing(&self) -> bool {
            self.shared.playing.load(Ordering::Relaxed)
        }

        pub fn set_volume(&self, volume: f32) {
            self.shared
                .volume_bits
                .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
        }

        pub fn set_soundscape(&self, soundscape: Soundscape) {
            self.shared.soundscape.store(index_of(soundscape), Ordering::Relaxed);
        }
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        sample_rate: u32,
        channels: usize,
        shared: Arc<Shared>,
    ) -> Result<cpal::Stream, AudioError> {
        let mut generator = SoundGenerator::new(shared.soundscape(), sample_rate);
        let mut scratch: Vec<f32> = Vec::new();
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if !shared.playing.load(Ordering::Relaxed) {
                        data.iter_mut().for_each(|s| *s = T::from_sample(0.0f32));
                        return;
                    }
                    let soundscape = shared.soundscape();
                    if generator.soundscape() != soundscape {
                        generator = SoundGenerator::new(soundscape, sample_rate);
                    }
                    generator.set_volume(shared.volume());

                    scratch.resize(data.len(), 0.0);
                    generator.fill(&mut scratch, channels);
                    for (out, sample) in data.iter_mut().zip(&scratch) {
                        *out = T::from_sample(sample.clamp(-1.0, 0.999_999_9));
                    }
                },
                |err| log::error!("Audio output error: {err}"),
                None,
            )
            .map_err(|e| AudioError::Backend(e.to_string()))
    }
}

#[cfg(all(feature = "audio", not(target_arch = "wasm32")))]
pub use backend::AmbientPlayer;

/// Stand-in used when playback is not compiled in; construction always fails
#[cfg(not(all(feature = "audio", not(target_arch = "wasm32"))))]
pub struct AmbientPlayer(());

#[cfg(not(all(feature = "audio", not(target_arch = "wasm32"))))]
impl AmbientPlayer {
    pub fn new(_soundscape: Soundscape, _volume: f32) -> Result<Self, AudioError> {
        Err(AudioError::Disabled)
    }

    pub fn set_playing(&self, _playing: bool) {}

    pub fn is_playing(&self) -> bool {
        false
    }

    pub fn set_volume(&self, _volume: f32) {}

    pub fn set_soundscape(&self, _soundscape: Soundscape) {}
}

/// Audio state owned by the app: what the user picked, plus the live player if any
#[derive(Default)]
pub struct AmbientAudio {
    pub soundscape: Soundscape,
    pub volume: f32,
    player: Option<AmbientPlayer>,
    last_error: Option<String>,
}

impl AmbientAudio {
    pub fn new(soundscape: Soundscape, volume: f32) -> Self {
        Self {
            soundscape,
            volume: volume.clamp(0.0, 1.0),
            player: None,
            last_error: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(AmbientPlayer::is_playing)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start or stop playback, opening the output device on first use
    pub fn toggle(&mut self) {
        if self.is_playing() {
            if let Some(player) = &self.player {
                player.set_playing(false);
            }
            return;
        }
        if self.player.is_none() {
            match AmbientPlayer::new(self.soundscape, self.volume) {
                Ok(player) => self.player = Some(player),
                Err(err) => {
                    log::warn!("Ambient audio unavailable: {err}");
                    self.last_error = Some(err.to_string());
                    return;
                }
            }
        }
        self.last_error = None;
        self.sync();
        if let Some(player) = &self.player {
            player.set_playing(true);
        }
    }

    /// Push the chosen soundscape and volume to the live player
    pub fn sync(&self) {
        if let Some(player) = &self.player {
            player.set_soundscape(self.soundscape);
            player.set_volume(self.volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_soundscape_produces_bounded_sound() {
        for soundscape in Soundscape::ALL {
            let mut generator = SoundGenerator::new(soundscape, DEFAULT_SAMPLE_RATE);
            generator.set_volume(1.0);
            let mut buffer = vec![0.0; 4096];
            generator.fill(&mut buffer, 2);
            assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)), "{soundscape:?}");
            assert!(buffer.iter().any(|s| *s != 0.0), "{soundscape:?} is silent");
        }
    }

    #[test]
    fn channels_share_a_sample() {
        let mut generator = SoundGenerator::new(Soundscape::Rain, DEFAULT_SAMPLE_RATE);
        let mut buffer = vec![0.0; 64];
        generator.fill(&mut buffer, 2);
        for frame in buffer.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn muted_generator_is_silent() {
        let mut generator = SoundGenerator::new(Soundscape::Ocean, DEFAULT_SAMPLE_RATE);
        generator.set_volume(0.0);
        let mut buffer = vec![1.0; 256];
        generator.fill(&mut buffer, 1);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }
}
