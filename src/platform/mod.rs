//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Camera hand tracking (MediaPipe landmarker on the web)
//! - Pointer fallback when no camera is available

use glam::{Vec2, Vec3};

use crate::sim::input::{Hand, HandPoseProvider, HandTracker, InputError, InputSource, PointerInput};

#[cfg(target_arch = "wasm32")]
pub mod camera;

/// Landmarks per detected hand
pub const LANDMARKS_PER_HAND: usize = 21;

/// Split a flat `[x, y, z, x, y, z, ...]` buffer into hands
pub fn parse_landmarks(flat: &[f32]) -> Result<Vec<Hand>, InputError> {
    let stride = LANDMARKS_PER_HAND * 3;
    if flat.len() % stride != 0 {
        return Err(InputError::Detector(format!(
            "landmark buffer of {} floats is not a whole number of hands",
            flat.len()
        )));
    }
    Ok(flat
        .chunks_exact(stride)
        .map(|hand| {
            hand.chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect()
        })
        .collect())
}

/// Camera tracking while video is live, pointer otherwise
pub struct HostInput<P> {
    pub tracker: HandTracker<P>,
    pub pointer: PointerInput,
}

impl<P: HandPoseProvider> HostInput<P> {
    pub fn new(provider: P) -> Self {
        Self {
            tracker: HandTracker::new(provider),
            pointer: PointerInput::default(),
        }
    }

    /// Whether the camera currently drives the player
    pub fn camera_active(&self) -> bool {
        self.tracker.provider().frame_time_ms().is_some()
    }
}

impl<P: HandPoseProvider> InputSource for HostInput<P> {
    fn sample_input(&mut self) -> Option<Vec2> {
        if self.camera_active() {
            self.tracker.sample_input()
        } else {
            self.pointer.sample_input()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;

    #[test]
    fn test_parse_two_hands() {
        let mut flat: Vec<f32> = (0..LANDMARKS_PER_HAND * 3).map(|i| i as f32).collect();
        flat.extend(std::iter::repeat_n(0.5, LANDMARKS_PER_HAND * 3));
        let hands = parse_landmarks(&flat).unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].len(), LANDMARKS_PER_HAND);
        assert_eq!(hands[0][9], Vec3::new(27.0, 28.0, 29.0));
        assert_eq!(hands[1][20], Vec3::splat(0.5));
    }

    #[test]
    fn test_parse_rejects_partial_hand() {
        assert!(parse_landmarks(&[]).unwrap().is_empty());
        assert!(matches!(
            parse_landmarks(&[0.1; 10]),
            Err(InputError::Detector(_))
        ));
    }

    /// Camera whose video can be switched on
    struct LateCamera {
        frame: f64,
        live: bool,
    }

    impl HandPoseProvider for LateCamera {
        fn frame_time_ms(&self) -> Option<f64> {
            self.live.then_some(self.frame)
        }

        fn detect(&mut self, _timestamp_ms: f64) -> Result<Vec<Hand>, InputError> {
            let mut hand = vec![Vec3::ZERO; LANDMARKS_PER_HAND];
            hand[9] = Vec3::new(0.25, 0.75, 0.0);
            Ok(vec![hand])
        }
    }

    #[test]
    fn test_pointer_until_camera_goes_live() {
        let mut input = HostInput::new(LateCamera {
            frame: 16.0,
            live: false,
        });
        let view = Viewport::new(800.0, 600.0);
        input.pointer.set_position(400.0, 300.0, view, &crate::sim::InputAdapter::default());
        assert!(!input.camera_active());
        let point = input.sample_input().unwrap();
        assert!((point - Vec2::new(0.5, 0.5)).length() < 1e-5);

        input.tracker = HandTracker::new(LateCamera {
            frame: 16.0,
            live: true,
        });
        assert!(input.camera_active());
        assert_eq!(input.sample_input(), Some(Vec2::new(0.25, 0.75)));
        // Same frame again: hold
        assert_eq!(input.sample_input(), None);
    }
}
