//! Audio system
//!
//! Procedurally generated sound effects, no external files needed. The game
//! only talks to an [`AudioSink`]: Web Audio in the browser, silence
//! elsewhere. Every effect is fire-and-forget and schedules its own stop.

use thiserror::Error;

use crate::consts::DASH_SPEED;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player ate a fish
    Eat,
    /// Player got bitten
    Hurt,
}

impl SoundEffect {
    /// Sound that accompanies a simulation event. Game over has none: the
    /// host shuts audio down at that point.
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Eat { .. } => Some(SoundEffect::Eat),
            GameEvent::Hurt { .. } => Some(SoundEffect::Hurt),
            GameEvent::GameOver { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio context unavailable: {0}")]
    Context(String),
    #[error("audio graph error: {0}")]
    Graph(String),
}

/// Continuous swim sound parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dynamics {
    /// Low-pass cutoff (Hz)
    pub brightness: f32,
    /// Output gain (0-1)
    pub loudness: f32,
}

/// Cutoff/gain range of the swim drone
pub const MIN_BRIGHTNESS: f32 = 250.0;
pub const MAX_BRIGHTNESS: f32 = 3000.0;
pub const MIN_LOUDNESS: f32 = 0.02;
pub const MAX_LOUDNESS: f32 = 0.2;
/// Time constant for dynamics changes (s)
pub const DYNAMICS_SMOOTHING_SECS: f64 = 0.1;

/// Map player speed (px/tick) to brightness and loudness. Full scale is
/// reached at the dash threshold.
pub fn dynamics_for_speed(speed: f32, scale: f32) -> Dynamics {
    let n = (speed / (DASH_SPEED * scale.max(f32::EPSILON))).clamp(0.0, 1.0);
    Dynamics {
        brightness: MIN_BRIGHTNESS + (MAX_BRIGHTNESS - MIN_BRIGHTNESS) * n,
        loudness: MIN_LOUDNESS + (MAX_LOUDNESS - MIN_LOUDNESS) * n,
    }
}

/// Output capability used by the game loop
pub trait AudioSink {
    /// Trigger a self-contained sound
    fn play(&mut self, effect: SoundEffect);
    /// Drive the continuous swim channel
    fn set_dynamics(&mut self, dynamics: Dynamics);
    fn set_volume(&mut self, volume: f32);
    /// Release every audio resource; later calls are no-ops
    fn shutdown(&mut self);
}

/// Sink for hosts without audio (native runs, failed context creation)
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub played: Vec<SoundEffect>,
}

impl AudioSink for SilentAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("sfx {effect:?}");
        self.played.push(effect);
    }

    fn set_dynamics(&mut self, _dynamics: Dynamics) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn shutdown(&mut self) {
        self.played.clear();
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{
        AudioContext, BiquadFilterNode, BiquadFilterType, GainNode, OscillatorNode,
        OscillatorType,
    };

    use super::*;

    fn graph_err(e: wasm_bindgen::JsValue) -> AudioError {
        AudioError::Graph(format!("{e:?}"))
    }

    /// Swim drone: oscillator → low-pass → gain → destination
    struct Drone {
        osc: OscillatorNode,
        filter: BiquadFilterNode,
        gain: GainNode,
    }

    /// Audio manager backed by the Web Audio API
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        drone: Option<Drone>,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(volume: f32) -> Self {
            let ctx = match AudioContext::new() {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    log::warn!("{} - audio disabled", AudioError::Context(format!("{e:?}")));
                    None
                }
            };
            let drone = ctx.as_ref().and_then(|ctx| match Self::create_drone(ctx) {
                Ok(drone) => Some(drone),
                Err(e) => {
                    log::warn!("Swim sound unavailable: {e}");
                    None
                }
            });
            Self {
                ctx,
                drone,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        fn create_drone(ctx: &AudioContext) -> Result<Drone, AudioError> {
            let osc = ctx.create_oscillator().map_err(graph_err)?;
            let filter = ctx.create_biquad_filter().map_err(graph_err)?;
            let gain = ctx.create_gain().map_err(graph_err)?;

            osc.set_type(OscillatorType::Sawtooth);
            osc.frequency().set_value(55.0);
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(MIN_BRIGHTNESS);
            gain.gain().set_value(0.0);

            osc.connect_with_audio_node(&filter).map_err(graph_err)?;
            filter.connect_with_audio_node(&gain).map_err(graph_err)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(graph_err)?;
            osc.start().map_err(graph_err)?;

            Ok(Drone { osc, filter, gain })
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

        /// Eat - bright upward gulp
        fn play_eat(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            if let Some((osc, gain)) = Self::create_osc(ctx, 320.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.45, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                    .ok();
                osc.frequency().set_value_at_time(320.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(880.0, t + 0.12)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }
            // Sparkle on top
            if let Some((osc, gain)) = Self::create_osc(ctx, 1320.0, OscillatorType::Triangle) {
                let t = t + 0.05;
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Hurt - low crunchy bite
        fn play_hurt(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            if let Some((osc, gain)) = Self::create_osc(ctx, 180.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.frequency().set_value_at_time(180.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(45.0, t + 0.3)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }
            if let Some((osc, gain)) = Self::create_osc(ctx, 70.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Eat => Self::play_eat(ctx, vol),
                SoundEffect::Hurt => Self::play_hurt(ctx, vol),
            }
        }

        fn set_dynamics(&mut self, dynamics: Dynamics) {
            let (Some(ctx), Some(drone)) = (&self.ctx, &self.drone) else {
                return;
            };
            let t = ctx.current_time();
            drone
                .filter
                .frequency()
                .set_target_at_time(dynamics.brightness, t, DYNAMICS_SMOOTHING_SECS)
                .ok();
            drone
                .gain
                .gain()
                .set_target_at_time(dynamics.loudness * self.volume, t, DYNAMICS_SMOOTHING_SECS)
                .ok();
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn shutdown(&mut self) {
            if let Some(drone) = self.drone.take() {
                let _ = drone.osc.stop();
            }
            if let Some(ctx) = self.ctx.take() {
                if let Err(e) = ctx.close() {
                    log::warn!("{}", AudioError::Graph(format!("close failed: {e:?}")));
                } else {
                    log::info!("Audio context closed");
                }
            }
        }
    }

    impl Drop for WebAudio {
        fn drop(&mut self) {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Variant;

    #[test]
    fn test_dynamics_range() {
        let still = dynamics_for_speed(0.0, 1.0);
        assert_eq!(still.brightness, MIN_BRIGHTNESS);
        assert_eq!(still.loudness, MIN_LOUDNESS);

        let dash = dynamics_for_speed(30.0, 1.0);
        assert_eq!(dash.brightness, MAX_BRIGHTNESS);
        assert_eq!(dash.loudness, MAX_LOUDNESS);

        // Same relative speed, same sound, whatever the viewport
        let half = dynamics_for_speed(7.5, 1.0);
        let half_small = dynamics_for_speed(3.75, 0.5);
        assert!((half.brightness - half_small.brightness).abs() < 1e-3);
    }

    #[test]
    fn test_event_sounds() {
        let eat = GameEvent::Eat {
            score: 1,
            size: 2.0,
            variant: Variant::Prey,
        };
        let hurt = GameEvent::Hurt {
            variant: Variant::Titan,
            health: 40.0,
        };
        let over = GameEvent::GameOver {
            final_score: 3,
            final_size: 21.0,
            cause: Variant::Titan,
        };
        assert_eq!(SoundEffect::for_event(&eat), Some(SoundEffect::Eat));
        assert_eq!(SoundEffect::for_event(&hurt), Some(SoundEffect::Hurt));
        assert_eq!(SoundEffect::for_event(&over), None);
    }

    #[test]
    fn test_silent_sink_records_and_clears() {
        let mut sink = SilentAudio::default();
        sink.play(SoundEffect::Eat);
        sink.play(SoundEffect::Hurt);
        assert_eq!(sink.played, vec![SoundEffect::Eat, SoundEffect::Hurt]);
        sink.shutdown();
        assert!(sink.played.is_empty());
    }
}
