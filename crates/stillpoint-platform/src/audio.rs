//! Web Audio cue player.
//!
//! Each cue is a sine tone with an exponential decay, rendered into a mono
//! buffer and played through a one-shot buffer source. Playback is
//! fire-and-forget: `play` returns as soon as the source is scheduled.

use std::cell::RefCell;
use std::f32::consts::PI;

use stillpoint_core::ports::AudioPort;
use stillpoint_types::{event::Cue, MeditationError, Result};
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState};

/// Envelope rate: amplitude falls to 1/e after half a second.
const DECAY_PER_SEC: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    pub volume: f32,
}

pub fn tone_for(cue: Cue) -> ToneSpec {
    match cue {
        Cue::Start => ToneSpec { frequency_hz: 200.0, duration_secs: 2.0, volume: 0.3 },
        Cue::Completion => ToneSpec { frequency_hz: 150.0, duration_secs: 3.0, volume: 0.3 },
        Cue::Halfway => ToneSpec { frequency_hz: 800.0, duration_secs: 1.0, volume: 0.3 },
    }
}

/// Mono PCM samples for `spec` at `sample_rate`.
pub fn render_tone(spec: ToneSpec, sample_rate: f32) -> Vec<f32> {
    let len = (sample_rate * spec.duration_secs) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * PI * spec.frequency_hz * t).sin() * spec.volume * (-t * DECAY_PER_SEC).exp()
        })
        .collect()
}

/// Plays cues through a lazily created `AudioContext`.
///
/// Browsers only allow audio after a user gesture; the first cue is the
/// start gong, which is triggered by the Begin button.
#[derive(Default)]
pub struct WebAudioCuePlayer {
    context: RefCell<Option<AudioContext>>,
}

impl WebAudioCuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&self) -> Result<AudioContext> {
        if let Some(ctx) = self.context.borrow().as_ref() {
            return Ok(ctx.clone());
        }
        let ctx = AudioContext::new().map_err(js_err)?;
        *self.context.borrow_mut() = Some(ctx.clone());
        Ok(ctx)
    }
}

impl AudioPort for WebAudioCuePlayer {
    fn play(&self, cue: Cue) -> Result<()> {
        let ctx = self.context()?;
        if ctx.state() == AudioContextState::Suspended {
            // The returned promise is not awaited; the source below queues
            // until the context is running.
            let _ = ctx.resume().map_err(js_err)?;
        }

        let sample_rate = ctx.sample_rate();
        let mut samples = render_tone(tone_for(cue), sample_rate);
        let buffer = ctx
            .create_buffer(1, samples.len() as u32, sample_rate)
            .map_err(js_err)?;
        buffer.copy_to_channel(&mut samples, 0).map_err(js_err)?;

        let source = ctx.create_buffer_source().map_err(js_err)?;
        source.set_buffer(Some(&buffer));
        source
            .connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;
        source.start().map_err(js_err)?;

        log::debug!("Playing {}", cue.label());
        Ok(())
    }
}

fn js_err(e: JsValue) -> MeditationError {
    MeditationError::Audio(format!("{:?}", e))
}
