use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

use crate::error::{Error, Result};
use crate::game::GameEvent;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Flap,
    Point,
    Death,
}

impl Effect {
    pub fn for_event(event: &GameEvent) -> Option<Effect> {
        match event {
            GameEvent::Flapped => Some(Effect::Flap),
            GameEvent::ScoreChanged(n) if *n > 0 => Some(Effect::Point),
            GameEvent::RoundOver { .. } => Some(Effect::Death),
            _ => None,
        }
    }
}

fn render(mut unit: Box<dyn AudioUnit>, secs: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

// Saw sweep 400Hz -> 80Hz over 0.4s, fading out over 0.5s
fn death_tone() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
    render(Box::new((freq >> saw()) * gain), 0.5)
}

// Short upward chirp
fn flap_tone() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(500.0, 900.0, (t / 0.08).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.1, 0.0, (t / 0.08).min(1.0)));
    render(Box::new((freq >> sine::<f32>()) * gain), 0.08)
}

// Two-note ding
fn point_tone() -> Vec<f32> {
    let freq = lfo(|t: f32| if t < 0.07 { 880.0 } else { 1320.0 });
    let gain = lfo(|t: f32| lerp(0.08, 0.0, (t / 0.18).min(1.0)));
    render(Box::new((freq >> square()) * gain), 0.18)
}

/// Sound effects, synthesized once up front and played in the background.
pub struct Sfx {
    // The stream must outlive every sink playing through its handle.
    output: Option<(OutputStream, OutputStreamHandle)>,
    flap: Vec<f32>,
    point: Vec<f32>,
    death: Vec<f32>,
}

impl Sfx {
    /// Opens the default audio device.
    pub fn open() -> Result<Self> {
        let output = OutputStream::try_default().map_err(|e| Error::Audio(e.to_string()))?;
        Ok(Self {
            output: Some(output),
            ..Self::silent()
        })
    }

    pub fn silent() -> Self {
        Self {
            output: None,
            flap: flap_tone(),
            point: point_tone(),
            death: death_tone(),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.output.is_none()
    }

    fn samples(&self, effect: Effect) -> &[f32] {
        match effect {
            Effect::Flap => &self.flap,
            Effect::Point => &self.point,
            Effect::Death => &self.death,
        }
    }

    pub fn play(&self, effect: Effect) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, self.samples(effect).to_vec()));
                sink.detach(); // Play in background
            }
            Err(e) => tracing::warn!(error = %e, ?effect, "could not play sound"),
        }
    }

    pub fn on_event(&self, event: &GameEvent) {
        if let Some(effect) = Effect::for_event(event) {
            self.play(effect);
        }
    }
}
