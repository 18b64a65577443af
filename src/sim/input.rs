//! Input adapter and input capability interfaces
//!
//! The simulation only ever sees a normalized point in [0,1]² (or nothing).
//! Hand tracking, pointer fallback and scripted test input all plug in
//! through [`InputSource`].

use glam::{Vec2, Vec3};
use thiserror::Error;

use super::state::Fish;
use crate::Viewport;

/// Landmark used as the palm-center proxy
pub const PALM_LANDMARK: usize = 9;

/// One detected hand: ordered normalized landmarks
pub type Hand = Vec<Vec3>;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("hand detector failed: {0}")]
    Detector(String),
    #[error("hand has {found} landmarks, palm landmark 9 missing")]
    MissingLandmark { found: usize },
}

/// Anything that can produce a normalized target point for this tick
pub trait InputSource {
    fn sample_input(&mut self) -> Option<Vec2>;
}

/// External pose-estimation collaborator
pub trait HandPoseProvider {
    /// Timestamp of the newest video frame, None while no video is available
    fn frame_time_ms(&self) -> Option<f64>;
    /// Run inference on the current frame
    fn detect(&mut self, timestamp_ms: f64) -> Result<Vec<Hand>, InputError>;
}

/// Rate-limits a [`HandPoseProvider`] to one inference per new video frame
/// and reduces its output to the palm point of the first hand.
pub struct HandTracker<P> {
    provider: P,
    last_frame_ms: Option<f64>,
}

impl<P: HandPoseProvider> HandTracker<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            last_frame_ms: None,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn palm(hands: &[Hand]) -> Result<Option<Vec2>, InputError> {
        let Some(hand) = hands.first() else {
            return Ok(None);
        };
        let palm = hand.get(PALM_LANDMARK).ok_or(InputError::MissingLandmark {
            found: hand.len(),
        })?;
        Ok(Some(Vec2::new(palm.x, palm.y)))
    }
}

impl<P: HandPoseProvider> InputSource for HandTracker<P> {
    fn sample_input(&mut self) -> Option<Vec2> {
        let frame_ms = self.provider.frame_time_ms()?;
        if self.last_frame_ms.is_some_and(|last| frame_ms <= last) {
            return None;
        }
        self.last_frame_ms = Some(frame_ms);

        match self
            .provider
            .detect(frame_ms)
            .and_then(|hands| Self::palm(&hands))
        {
            Ok(point) => point,
            Err(e) => {
                log::debug!("hand detection skipped: {e}");
                None
            }
        }
    }
}

/// Mouse/touch fallback. Stores the pointer in camera space (pre-mirrored
/// when the adapter mirrors) so the adapter lands the player under it.
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    point: Option<Vec2>,
}

impl PointerInput {
    /// Record a pointer position in viewport pixels
    pub fn set_position(&mut self, x: f32, y: f32, viewport: Viewport, adapter: &InputAdapter) {
        let span = 1.0 - 2.0 * adapter.margin;
        let nx = adapter.margin + (x / viewport.width.max(1.0)) * span;
        let ny = adapter.margin + (y / viewport.height.max(1.0)) * span;
        let nx = if adapter.mirror { 1.0 - nx } else { nx };
        self.point = Some(Vec2::new(nx, ny));
    }
}

impl InputSource for PointerInput {
    fn sample_input(&mut self) -> Option<Vec2> {
        self.point
    }
}

/// Synthetic input for tests and the headless demo
pub struct ScriptedInput {
    tick: u64,
    script: Box<dyn FnMut(u64) -> Option<Vec2>>,
}

impl ScriptedInput {
    pub fn new(script: impl FnMut(u64) -> Option<Vec2> + 'static) -> Self {
        Self {
            tick: 0,
            script: Box::new(script),
        }
    }

    /// Slow circle around the middle of the camera frame
    pub fn circle(period_ticks: f32, radius: f32) -> Self {
        Self::new(move |t| {
            let a = t as f32 / period_ticks * std::f32::consts::TAU;
            Some(Vec2::new(0.5 + a.cos() * radius, 0.5 + a.sin() * radius))
        })
    }
}

impl InputSource for ScriptedInput {
    fn sample_input(&mut self) -> Option<Vec2> {
        let point = (self.script)(self.tick);
        self.tick += 1;
        point
    }
}

/// Converts a normalized hand point into smoothed player motion
#[derive(Debug, Clone)]
pub struct InputAdapter {
    /// Border of the camera frame that maps to the viewport edges
    pub margin: f32,
    /// One-pole low-pass factor per tick
    pub smoothing: f32,
    /// Front-facing camera: flip x
    pub mirror: bool,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self {
            margin: 0.1,
            smoothing: 0.2,
            mirror: true,
        }
    }
}

impl InputAdapter {
    /// Map a normalized point onto the viewport, clamped to its edges
    pub fn target(&self, point: Vec2, viewport: Viewport) -> Vec2 {
        let x = if self.mirror { 1.0 - point.x } else { point.x };
        let span = (1.0 - 2.0 * self.margin).max(f32::EPSILON);
        let nx = ((x - self.margin) / span).clamp(0.0, 1.0);
        let ny = ((point.y - self.margin) / span).clamp(0.0, 1.0);
        Vec2::new(nx * viewport.width, ny * viewport.height)
    }

    /// Ease the player toward the target; velocity is the frame delta.
    /// With no point the player holds still.
    pub fn apply(&self, player: &mut Fish, point: Option<Vec2>, viewport: Viewport) {
        let Some(point) = point else {
            player.vel = Vec2::ZERO;
            return;
        };
        let target = self.target(point, viewport);
        let next = crate::lerp_vec(player.pos, target, self.smoothing);
        player.vel = next - player.pos;
        player.pos = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(1000.0, 500.0);

    struct FakeProvider {
        frame: Option<f64>,
        calls: u32,
        fail: bool,
        hands: Vec<Hand>,
    }

    impl HandPoseProvider for FakeProvider {
        fn frame_time_ms(&self) -> Option<f64> {
            self.frame
        }

        fn detect(&mut self, _timestamp_ms: f64) -> Result<Vec<Hand>, InputError> {
            self.calls += 1;
            if self.fail {
                Err(InputError::Detector("boom".into()))
            } else {
                Ok(self.hands.clone())
            }
        }
    }

    fn hand_at(x: f32, y: f32) -> Hand {
        let mut hand = vec![Vec3::ZERO; 21];
        hand[PALM_LANDMARK] = Vec3::new(x, y, 0.0);
        hand
    }

    #[test]
    fn test_target_mirrors_and_remaps() {
        let adapter = InputAdapter::default();
        let close = |a: Vec2, b: Vec2| (a - b).length() < 1e-2;
        // Camera-left edge of the active rectangle is the screen right edge
        assert!(close(adapter.target(Vec2::new(0.1, 0.1), VIEW), Vec2::new(1000.0, 0.0)));
        assert!(close(adapter.target(Vec2::new(0.5, 0.5), VIEW), Vec2::new(500.0, 250.0)));
        // Outside the active rectangle clamps
        assert_eq!(adapter.target(Vec2::new(1.0, 1.0), VIEW), Vec2::new(0.0, 500.0));
    }

    #[test]
    fn test_apply_smooths_by_fixed_factor() {
        let adapter = InputAdapter::default();
        let mut player = Fish::player(Vec2::new(0.0, 0.0), 1.0);
        adapter.apply(&mut player, Some(Vec2::new(0.5, 0.5)), VIEW);
        assert!((player.pos - Vec2::new(100.0, 50.0)).length() < 1e-3);
        assert!((player.vel - Vec2::new(100.0, 50.0)).length() < 1e-3);
        assert!((player.current_speed() - 111.803).abs() < 1e-2);
    }

    #[test]
    fn test_apply_without_point_holds_position() {
        let adapter = InputAdapter::default();
        let mut player = Fish::player(Vec2::new(42.0, 7.0), 1.0);
        player.vel = Vec2::new(3.0, 3.0);
        adapter.apply(&mut player, None, VIEW);
        assert_eq!(player.pos, Vec2::new(42.0, 7.0));
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_tracker_only_detects_on_new_frames() {
        let mut tracker = HandTracker::new(FakeProvider {
            frame: Some(10.0),
            calls: 0,
            fail: false,
            hands: vec![hand_at(0.3, 0.4)],
        });
        assert_eq!(tracker.sample_input(), Some(Vec2::new(0.3, 0.4)));
        assert_eq!(tracker.sample_input(), None);
        assert_eq!(tracker.provider().calls, 1);

        tracker.provider.frame = Some(26.0);
        assert!(tracker.sample_input().is_some());
        assert_eq!(tracker.provider().calls, 2);
    }

    #[test]
    fn test_tracker_swallows_failures() {
        let mut tracker = HandTracker::new(FakeProvider {
            frame: Some(1.0),
            calls: 0,
            fail: true,
            hands: Vec::new(),
        });
        assert_eq!(tracker.sample_input(), None);

        let mut absent = HandTracker::new(FakeProvider {
            frame: None,
            calls: 0,
            fail: false,
            hands: Vec::new(),
        });
        assert_eq!(absent.sample_input(), None);
        assert_eq!(absent.provider().calls, 0);
    }

    #[test]
    fn test_tracker_uses_first_hand_and_rejects_short_hands() {
        let mut tracker = HandTracker::new(FakeProvider {
            frame: Some(1.0),
            calls: 0,
            fail: false,
            hands: vec![hand_at(0.2, 0.2), hand_at(0.9, 0.9)],
        });
        assert_eq!(tracker.sample_input(), Some(Vec2::new(0.2, 0.2)));

        let mut short = HandTracker::new(FakeProvider {
            frame: Some(1.0),
            calls: 0,
            fail: false,
            hands: vec![vec![Vec3::ZERO; 4]],
        });
        assert_eq!(short.sample_input(), None);
    }

    #[test]
    fn test_pointer_round_trips_through_adapter() {
        let adapter = InputAdapter::default();
        let mut pointer = PointerInput::default();
        pointer.set_position(250.0, 400.0, VIEW, &adapter);
        let point = pointer.sample_input().unwrap();
        let target = adapter.target(point, VIEW);
        assert!((target - Vec2::new(250.0, 400.0)).length() < 1e-2);

        let unmirrored = InputAdapter {
            mirror: false,
            ..InputAdapter::default()
        };
        pointer.set_position(250.0, 400.0, VIEW, &unmirrored);
        let target = unmirrored.target(pointer.sample_input().unwrap(), VIEW);
        assert!((target - Vec2::new(250.0, 400.0)).length() < 1e-2);
    }
}
