//! Audio cues using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. Each
//! effect is a short list of oscillator tones; the browser side only knows
//! how to play a tone.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Brick takes a hit without breaking
    BrickHit,
    BrickBreak,
    /// Ball launched or served
    Launch,
    /// Opponent scored
    PointLost,
    LifeLost,
    LevelUp,
    /// Snake ate
    Eat,
    PieceLock,
    LineClear,
    GameOver,
    HighScore,
}

impl SoundEffect {
    /// The cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let effect = match event {
            GameEvent::Launch => SoundEffect::Launch,
            GameEvent::PaddleHit => SoundEffect::PaddleHit,
            GameEvent::WallHit => SoundEffect::WallHit,
            GameEvent::BrickHit => SoundEffect::BrickHit,
            GameEvent::BrickDestroyed => SoundEffect::BrickBreak,
            GameEvent::PointLost => SoundEffect::PointLost,
            GameEvent::LifeLost { .. } => SoundEffect::LifeLost,
            GameEvent::LevelUp { .. } => SoundEffect::LevelUp,
            GameEvent::FoodEaten => SoundEffect::Eat,
            GameEvent::PieceLocked => SoundEffect::PieceLock,
            GameEvent::LinesCleared { .. } => SoundEffect::LineClear,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
            GameEvent::NewHighScore { .. } => SoundEffect::HighScore,
            // Every score already comes with its own hit/eat/clear cue
            GameEvent::Scored { .. } => return None,
        };
        Some(effect)
    }

    /// Tones making up the effect
    pub fn tones(self) -> Vec<Tone> {
        match self {
            // Solid thump
            SoundEffect::PaddleHit => vec![Tone::new(Wave::Sine, 150.0, 0.6, 0.1).sweep(60.0)],
            // Higher ping
            SoundEffect::WallHit => vec![Tone::new(Wave::Sine, 400.0, 0.3, 0.08)],
            // Soft tap
            SoundEffect::BrickHit => vec![Tone::new(Wave::Triangle, 300.0, 0.25, 0.05)],
            SoundEffect::BrickBreak => vec![
                Tone::new(Wave::Square, 600.0, 0.15, 0.1).sweep(200.0),
                Tone::new(Wave::Sine, 80.0, 0.3, 0.1),
            ],
            // Whoosh up
            SoundEffect::Launch => vec![Tone::new(Wave::Triangle, 200.0, 0.3, 0.2).sweep(600.0)],
            SoundEffect::PointLost => vec![Tone::new(Wave::Sawtooth, 220.0, 0.3, 0.3).sweep(80.0)],
            SoundEffect::LifeLost => vec![Tone::new(Wave::Sine, 300.0, 0.5, 0.8).sweep(20.0)],
            SoundEffect::LevelUp => arpeggio(Wave::Triangle, &[400.0, 500.0, 600.0, 800.0], 0.1, 0.4),
            SoundEffect::Eat => vec![Tone::new(Wave::Square, 520.0, 0.15, 0.06).sweep(880.0)],
            SoundEffect::PieceLock => vec![Tone::new(Wave::Triangle, 120.0, 0.3, 0.06)],
            SoundEffect::LineClear => arpeggio(Wave::Square, &[600.0, 900.0], 0.05, 0.15),
            // Sad descending
            SoundEffect::GameOver => arpeggio(Wave::Sine, &[400.0, 350.0, 300.0, 200.0], 0.2, 0.3),
            SoundEffect::HighScore => {
                arpeggio(Wave::Triangle, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08, 0.25)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator with an exponential fade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub freq: f32,
    /// Glide target over the tone's length
    pub end_freq: Option<f32>,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Fade length in seconds
    pub duration: f64,
    /// Start offset in seconds
    pub delay: f64,
}

impl Tone {
    pub fn new(wave: Wave, freq: f32, gain: f32, duration: f64) -> Self {
        Self {
            wave,
            freq,
            end_freq: None,
            gain,
            duration,
            delay: 0.0,
        }
    }

    pub fn sweep(mut self, end_freq: f32) -> Self {
        self.end_freq = Some(end_freq);
        self
    }

    pub fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

fn arpeggio(wave: Wave, freqs: &[f32], spacing: f64, duration: f64) -> Vec<Tone> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, freq)| Tone::new(wave, *freq, 0.3, duration).after(i as f64 * spacing))
        .collect()
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Wave};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set output volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = if self.muted { 0.0 } else { self.volume };
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                play_tone(ctx, &tone, vol);
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
        let osc_type = match tone.wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Triangle => OscillatorType::Triangle,
            Wave::Sawtooth => OscillatorType::Sawtooth,
        };
        let Some((osc, gain)) = create_osc(ctx, tone.freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;
        let end = t + tone.duration;

        gain.gain().set_value_at_time(vol * tone.gain, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        if let Some(end_freq) = tone.end_freq {
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(end_freq, end)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cue_has_tones() {
        let events = [
            GameEvent::Launch,
            GameEvent::PaddleHit,
            GameEvent::BrickDestroyed,
            GameEvent::LinesCleared { lines: 2 },
            GameEvent::NewHighScore { score: 10 },
        ];
        for event in &events {
            let effect = SoundEffect::for_event(event).expect("event has a cue");
            assert!(!effect.tones().is_empty());
        }
        assert_eq!(SoundEffect::for_event(&GameEvent::Scored { points: 5 }), None);
    }

    #[test]
    fn test_arpeggio_spacing() {
        let tones = SoundEffect::GameOver.tones();
        assert_eq!(tones.len(), 4);
        assert!((tones[3].delay - 0.6).abs() < 1e-9);
        // Exponential ramps can't target zero
        assert!(tones.iter().all(|t| t.freq > 0.0 && t.gain > 0.0));
    }
}
