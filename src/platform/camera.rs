//! Browser camera + MediaPipe hand landmarker bindings
//!
//! The page is expected to expose `window.HandLandmarker` (MediaPipe Tasks
//! Vision). Everything here is best-effort: a denied camera or a missing
//! model simply leaves the provider without video.

use wasm_bindgen::prelude::*;

use super::parse_landmarks;
use crate::sim::input::{Hand, HandPoseProvider, InputError};

#[wasm_bindgen(inline_js = "
    let video = null;
    let landmarker = null;

    export async function start_camera(model_url) {
        const stream = await navigator.mediaDevices.getUserMedia({
            video: { facingMode: 'user', width: 640, height: 480 },
        });
        video = document.createElement('video');
        video.playsInline = true;
        video.muted = true;
        video.srcObject = stream;
        await video.play();

        const vision = await window.FilesetResolver.forVisionTasks(model_url);
        landmarker = await window.HandLandmarker.createFromOptions(vision, {
            baseOptions: { modelAssetPath: model_url + '/hand_landmarker.task' },
            runningMode: 'VIDEO',
            numHands: 1,
        });
    }

    export function stop_camera() {
        if (video && video.srcObject) {
            video.srcObject.getTracks().forEach((t) => t.stop());
        }
        video = null;
        if (landmarker) {
            landmarker.close();
        }
        landmarker = null;
    }

    export function camera_frame_time() {
        if (!video || !landmarker || video.readyState < 2) {
            return -1;
        }
        return video.currentTime * 1000;
    }

    export function camera_detect(timestamp_ms) {
        const result = landmarker.detectForVideo(video, timestamp_ms);
        const flat = [];
        for (const hand of result.landmarks || []) {
            for (const p of hand) {
                flat.push(p.x, p.y, p.z);
            }
        }
        return new Float32Array(flat);
    }
")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn start_camera(model_url: &str) -> Result<JsValue, JsValue>;
    fn stop_camera();
    fn camera_frame_time() -> f64;
    #[wasm_bindgen(catch)]
    fn camera_detect(timestamp_ms: f64) -> Result<Vec<f32>, JsValue>;
}

/// Hand pose provider backed by the page's webcam
#[derive(Debug, Default)]
pub struct WebCamera {
    started: bool,
}

impl WebCamera {
    /// Request the camera and load the model. Failures leave the camera
    /// inactive so the pointer fallback keeps working.
    pub async fn start(model_url: &str) -> Self {
        match start_camera(model_url).await {
            Ok(_) => {
                log::info!("Camera hand tracking started");
                Self { started: true }
            }
            Err(e) => {
                log::warn!("Camera unavailable, using pointer input: {e:?}");
                Self { started: false }
            }
        }
    }

    /// Release the video stream and the model
    pub fn stop(&mut self) {
        if self.started {
            stop_camera();
            self.started = false;
            log::info!("Camera stopped");
        }
    }
}

impl HandPoseProvider for WebCamera {
    fn frame_time_ms(&self) -> Option<f64> {
        if !self.started {
            return None;
        }
        let t = camera_frame_time();
        (t >= 0.0).then_some(t)
    }

    fn detect(&mut self, timestamp_ms: f64) -> Result<Vec<Hand>, InputError> {
        let flat = camera_detect(timestamp_ms).map_err(|e| InputError::Detector(format!("{e:?}")))?;
        parse_landmarks(&flat)
    }
}

impl Drop for WebCamera {
    fn drop(&mut self) {
        self.stop();
    }
}
