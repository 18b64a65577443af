//! Host-agnostic game driver
//!
//! Owns the fixed-timestep accumulator and the session lifecycle, routes
//! simulation events to audio and the leaderboard, and builds the frame.
//! The browser entry point and the native demo both drive this.

use glam::Vec2;

use crate::Viewport;
use crate::audio::{self, AudioSink, SoundEffect};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::renderer::{Scene, Vertex};
use crate::settings::Settings;
use crate::sim::{Atmosphere, GameEvent, GameState, InputSource, TickInput, tick};
use crate::tuning::Variant;

/// Largest frame delta fed to the accumulator (s)
pub const MAX_FRAME_DT: f32 = 0.1;

/// What the surrounding application shows when a session ends
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub final_score: u64,
    pub final_size: f32,
    pub cause: Variant,
    /// Leaderboard rank, if the score made the board
    pub rank: Option<usize>,
}

pub struct App<I, A> {
    pub settings: Settings,
    pub highscores: HighScores,
    pub session: Option<GameState>,
    pub atmosphere: Atmosphere,
    pub input: I,
    scene: Scene,
    audio: Option<A>,
    open_audio: fn(f32) -> A,
    viewport: Viewport,
    /// Last normalized point reported by the input source
    target: Option<Vec2>,
    accumulator: f32,
    ambient_ms: f64,
    report: Option<SessionReport>,
}

impl<I: InputSource, A: AudioSink> App<I, A> {
    pub fn new(
        viewport: Viewport,
        settings: Settings,
        highscores: HighScores,
        input: I,
        open_audio: fn(f32) -> A,
        seed: u64,
    ) -> Self {
        let atmosphere = Atmosphere::new(
            viewport,
            settings.quality.plankton_count(),
            settings.quality.bubble_count(),
            seed,
        );
        Self {
            settings,
            highscores,
            session: None,
            atmosphere,
            input,
            scene: Scene::new(),
            audio: None,
            open_audio,
            viewport,
            target: None,
            accumulator: 0.0,
            ambient_ms: 0.0,
            report: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Begin a fresh session; any previous one is discarded
    pub fn start_session(&mut self, seed: u64) {
        self.shutdown_audio();

        let mut state = GameState::new(self.viewport, seed);
        state.max_particles = self.settings.max_particles();
        state.input = self.settings.input_adapter();
        self.session = Some(state);
        self.audio = Some((self.open_audio)(self.settings.effective_volume()));
        self.accumulator = 0.0;
        self.target = None;
        self.report = None;
        log::info!("Session started with seed {seed}");
    }

    /// Return to the menu. Audio is released immediately.
    pub fn end_session(&mut self) {
        self.shutdown_audio();
        if self.session.take().is_some() {
            log::info!("Session ended");
        }
        self.sync_atmosphere();
    }

    /// Rebuild decorations that were laid out for an older viewport
    fn sync_atmosphere(&mut self) {
        if self.atmosphere.viewport != self.viewport {
            self.atmosphere.reinitialize(self.viewport);
        }
    }

    fn shutdown_audio(&mut self) {
        if let Some(mut sink) = self.audio.take() {
            sink.shutdown();
        }
    }

    pub fn audio(&self) -> Option<&A> {
        self.audio.as_ref()
    }

    /// Whether a session is running and not over
    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_playing())
    }

    /// Host viewport changed
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(state) = &mut self.session {
            state.resize(viewport);
        }
        // Decorations keep their layout while a session is being played
        if !self.is_playing() {
            self.sync_atmosphere();
        }
    }

    /// Swap preferences, rebuilding whatever depends on them
    pub fn apply_settings(&mut self, settings: Settings) {
        let quality_changed = settings.quality != self.settings.quality;
        self.settings = settings;

        if quality_changed {
            self.atmosphere = Atmosphere::new(
                self.viewport,
                self.settings.quality.plankton_count(),
                self.settings.quality.bubble_count(),
                self.ambient_ms as u64,
            );
        }
        if let Some(state) = &mut self.session {
            state.max_particles = self.settings.max_particles();
            state.input = self.settings.input_adapter();
        }
        if let Some(sink) = &mut self.audio {
            sink.set_volume(self.settings.effective_volume());
        }
        self.settings.save();
    }

    /// Advance by a frame's worth of wall time. Returns the ticks run.
    pub fn update(&mut self, dt: f32, wall_clock_ms: f64) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.ambient_ms += TICK_MS as f64;
            self.atmosphere.update(self.ambient_ms);

            if let Some(state) = &mut self.session {
                if let Some(point) = self.input.sample_input() {
                    self.target = Some(point);
                }
                tick(state, &TickInput { point: self.target });
            }

            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.dispatch_events(wall_clock_ms);
        substeps
    }

    fn dispatch_events(&mut self, wall_clock_ms: f64) {
        let Some(state) = &mut self.session else {
            return;
        };
        let events = state.drain_events();
        let dynamics = audio::dynamics_for_speed(state.player.current_speed(), state.scale);

        if let Some(sink) = &mut self.audio {
            sink.set_dynamics(dynamics);
        }

        for event in events {
            if let (Some(sink), Some(effect)) = (&mut self.audio, SoundEffect::for_event(&event)) {
                sink.play(effect);
            }
            if let GameEvent::GameOver {
                final_score,
                final_size,
                cause,
            } = event
            {
                let rank = self.highscores.record(final_score, wall_clock_ms);
                self.highscores.save();
                log::info!(
                    "Game over: score {final_score}, size {final_size:.1}, eaten by {} (rank {rank:?})",
                    cause.as_str()
                );
                self.report = Some(SessionReport {
                    final_score,
                    final_size,
                    cause,
                    rank,
                });
                self.shutdown_audio();
                self.sync_atmosphere();
            }
        }
    }

    /// Result of the last finished session, once
    pub fn take_report(&mut self) -> Option<SessionReport> {
        self.report.take()
    }

    /// Build this frame's geometry
    pub fn frame(&mut self, time_ms: f64) -> &[Vertex] {
        self.scene
            .build(self.session.as_ref(), &self.atmosphere, &self.settings, time_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::sim::{Fish, GamePhase, ScriptedInput};

    type TestApp = App<ScriptedInput, SilentAudio>;

    fn app(input: ScriptedInput) -> TestApp {
        App::new(
            Viewport::new(1024.0, 768.0),
            Settings::default(),
            HighScores::new(),
            input,
            |_| SilentAudio::default(),
            11,
        )
    }

    fn doomed(state: &mut GameState) {
        state.health = 5.0;
        let id = state.next_entity_id();
        state.enemies.push(Fish {
            id,
            pos: state.player.pos,
            vel: Vec2::ZERO,
            size: state.player.size * 3.0,
            color: [0; 3],
            speed: 1.0,
            phase: 0.0,
            variant: Variant::Titan,
        });
    }

    #[test]
    fn test_accumulator_runs_fixed_ticks() {
        let mut app = app(ScriptedInput::circle(240.0, 0.2));
        app.start_session(1);
        assert_eq!(app.update(SIM_DT * 2.5, 0.0), 2);
        // Remainder carries over
        assert_eq!(app.update(SIM_DT * 0.6, 0.0), 1);
        // Huge stalls are capped
        assert_eq!(app.update(5.0, 0.0), MAX_SUBSTEPS);
        assert_eq!(app.session.as_ref().map(|s| s.time_ticks), Some(3 + MAX_SUBSTEPS as u64));
    }

    #[test]
    fn test_target_held_between_detections() {
        // Point only on every other tick, like a 30fps camera
        let mut app = app(ScriptedInput::new(|t| (t % 2 == 0).then_some(Vec2::new(0.9, 0.5))));
        app.start_session(2);
        for _ in 0..120 {
            app.update(SIM_DT, 0.0);
        }
        let player = &app.session.as_ref().unwrap().player;
        // Mirrored: camera-right lands on screen-left
        assert!(player.pos.x < 10.0);
    }

    #[test]
    fn test_game_over_records_score_and_releases_audio() {
        let mut app = app(ScriptedInput::new(|_| None));
        app.start_session(3);
        assert!(app.audio().is_some());
        let state = app.session.as_mut().unwrap();
        state.score = 42;
        doomed(state);

        app.update(SIM_DT, 1_700_000_000_000.0);

        assert_eq!(app.session.as_ref().map(|s| s.phase), Some(GamePhase::GameOver));
        assert!(!app.is_playing());
        assert!(app.audio().is_none());
        assert_eq!(app.highscores.top_score(), Some(42));

        let report = app.take_report().unwrap();
        assert_eq!(report.final_score, 42);
        assert_eq!(report.cause, Variant::Titan);
        assert_eq!(report.rank, Some(1));
        assert!(app.take_report().is_none());
    }

    #[test]
    fn test_resize_reinitializes_ambient_only_without_session() {
        let mut app = app(ScriptedInput::new(|_| None));
        let big = Viewport::new(1920.0, 1080.0);
        app.resize(big);
        assert_eq!(app.atmosphere.viewport, big);

        app.start_session(4);
        let small = Viewport::new(640.0, 480.0);
        app.resize(small);
        let state = app.session.as_ref().unwrap();
        assert_eq!(state.viewport, small);
        assert!((state.scale - 0.6).abs() < 1e-6);
        assert_eq!(app.atmosphere.viewport, big);

        // Back on the menu the water covers the current viewport
        app.end_session();
        assert_eq!(app.atmosphere.viewport, small);
        assert!(!app.frame(0.0).is_empty());
    }

    #[test]
    fn test_resize_after_game_over_reaches_ambient() {
        let mut app = app(ScriptedInput::new(|_| None));
        app.start_session(8);
        let wide = Viewport::new(1600.0, 900.0);
        app.resize(wide);
        doomed(app.session.as_mut().unwrap());
        app.update(SIM_DT, 0.0);
        assert!(!app.is_playing());
        assert_eq!(app.atmosphere.viewport, wide);

        // Game-over screen still follows resizes
        let narrow = Viewport::new(500.0, 900.0);
        app.resize(narrow);
        assert_eq!(app.atmosphere.viewport, narrow);
    }

    #[test]
    fn test_new_session_forgets_last_target() {
        let mut app = app(ScriptedInput::new(|t| (t < 200).then_some(Vec2::new(0.9, 0.1))));
        app.start_session(9);
        for _ in 0..200 {
            app.update(SIM_DT, 0.0);
        }
        let center = app.viewport().center();
        assert!(app.session.as_ref().unwrap().player.pos.distance(center) > 100.0);

        // The script has run dry: the new fish stays where it starts
        app.start_session(10);
        for _ in 0..30 {
            app.update(SIM_DT, 0.0);
        }
        assert!(app.session.as_ref().unwrap().player.pos.distance(center) < 5.0);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut app = app(ScriptedInput::circle(120.0, 0.3));
        app.start_session(5);
        for _ in 0..300 {
            app.update(SIM_DT, 0.0);
        }
        doomed(app.session.as_mut().unwrap());
        app.update(SIM_DT, 0.0);

        app.start_session(6);
        let state = app.session.as_ref().unwrap();
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert!(app.audio().is_some());
    }

    #[test]
    fn test_menu_frame_and_settings() {
        let mut app = app(ScriptedInput::new(|_| None));
        app.update(SIM_DT * 3.0, 0.0);
        assert!(!app.frame(0.0).is_empty());

        app.start_session(7);
        let mut settings = app.settings.clone();
        settings.quality = crate::QualityPreset::High;
        settings.particles = false;
        app.apply_settings(settings);
        assert_eq!(app.session.as_ref().unwrap().max_particles, 0);
        assert_eq!(
            app.atmosphere.plankton.len(),
            crate::QualityPreset::High.plankton_count()
        );

        app.frame(0.0);
        app.end_session();
        assert!(app.session.is_none());
        assert!(app.audio().is_none());
    }
}
