/// Sound effects: short procedural blips played through rodio.
///
/// Buffers are synthesized once at startup as in-memory WAV files and
/// played fire-and-forget. Without the `sound` feature the engine is a
/// stub that does nothing.

use crate::sim::event::SimEvent;

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{gen_jump, gen_land, gen_swim, make_wav};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<Vec<u8>>,
        sfx_swim: Arc<Vec<u8>>,
        sfx_land: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// `None` when no output device can be opened.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(error = %e, "no audio output, sound disabled");
                    return None;
                }
            };
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump: Arc::new(make_wav(&gen_jump())),
                sfx_swim: Arc::new(make_wav(&gen_swim())),
                sfx_land: Arc::new(make_wav(&gen_land())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            if let Ok(src) = rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                sink.append(src);
                sink.detach();
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_swim(&self) { self.play(&self.sfx_swim); }
        pub fn play_land(&self) { self.play(&self.sfx_land); }
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_jump(&self) {}
    pub fn play_swim(&self) {}
    pub fn play_land(&self) {}
}

/// Play whatever the tick's events call for.
pub fn play_events(sound: Option<&SoundEngine>, events: &[SimEvent]) {
    let Some(sfx) = sound else {
        return;
    };
    for event in events {
        match event {
            SimEvent::Jumped => sfx.play_jump(),
            SimEvent::SwimStroke => sfx.play_swim(),
            SimEvent::Landed => sfx.play_land(),
            SimEvent::LadderAttached | SimEvent::LadderDetached | SimEvent::Trapped { .. } => {}
        }
    }
}

// ── Waveforms (mono f32 samples in -1..1) ──

/// Sine with a linear pitch sweep and a linear fade.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_sweep(from_hz: f32, to_hz: f32, seconds: f32, volume: f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * seconds) as usize;
    let mut phase = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = from_hz + (to_hz - from_hz) * t;
            phase += freq / SAMPLE_RATE as f32;
            (phase * std::f32::consts::TAU).sin() * (1.0 - t) * volume
        })
        .collect()
}

/// Jump: quick rising chirp.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_jump() -> Vec<f32> {
    gen_sweep(300.0, 900.0, 0.08, 0.25)
}

/// Swim stroke: two soft bubbles.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_swim() -> Vec<f32> {
    let mut samples = gen_sweep(500.0, 700.0, 0.04, 0.15);
    samples.extend(gen_sweep(650.0, 850.0, 0.04, 0.12));
    samples
}

/// Landing: low falling thump.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_land() -> Vec<f32> {
    gen_sweep(180.0, 60.0, 0.06, 0.3)
}

/// Wrap samples in a 16-bit mono PCM WAV container.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;
    let block_align = CHANNELS * BITS / 8;
    let byte_rate = SAMPLE_RATE * u32::from(block_align);
    let data_size = samples.len() as u32 * u32::from(block_align);

    let mut buf = Vec::with_capacity(44 + data_size as usize);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVEfmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&CHANNELS.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS.to_le_bytes());
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}
