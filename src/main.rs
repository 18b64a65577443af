//! Reef Hunt entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use reef_hunt::app::{App, SessionReport};
    use reef_hunt::audio::WebAudio;
    use reef_hunt::consts::*;
    use reef_hunt::platform::HostInput;
    use reef_hunt::platform::camera::WebCamera;
    use reef_hunt::renderer::RenderState;
    use reef_hunt::sim::HandTracker;
    use reef_hunt::{HighScores, Settings, Viewport};

    /// Where the page serves the MediaPipe wasm files and model
    const MODEL_URL: &str = "./mediapipe";

    type GameApp = App<HostInput<WebCamera>, WebAudio>;

    /// Game instance holding all state
    struct Game {
        app: GameApp,
        render_state: Option<RenderState>,
        last_time: f64,
        last_score: Option<u64>,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            self.app.update(dt, js_sys::Date::now());
            if let Some(report) = self.app.take_report() {
                show_game_over(&report, &self.app.highscores);
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let vertices = self.app.frame(time);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(state) = &self.app.session else {
                return;
            };
            if self.last_score == Some(state.score) {
                return;
            }
            self.last_score = Some(state.score);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.score.to_string()));
            }
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.app.start_session(seed);
            self.last_score = None;
            set_visible("menu", false);
            set_visible("game-over", false);
            set_visible("hud", true);
        }

        fn back_to_menu(&mut self) {
            self.app.end_session();
            set_visible("game-over", false);
            set_visible("hud", false);
            set_visible("menu", true);
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let css_w = canvas.client_width().max(1);
            let css_h = canvas.client_height().max(1);
            let width = (css_w as f64 * dpr) as u32;
            let height = (css_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
                render_state.set_logical_size(css_w as f32, css_h as f32);
            }
            self.app.resize(Viewport::new(css_w as f32, css_h as f32));
        }

        fn set_pointer(&mut self, x: f32, y: f32) {
            let viewport = self.app.viewport();
            let adapter = self.app.settings.input_adapter();
            self.app.input.pointer.set_position(x, y, viewport, &adapter);
        }
    }

    fn set_visible(id: &str, visible: bool) {
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id));
        if let Some(el) = el {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_text(id: &str, text: &str) {
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id));
        if let Some(el) = el {
            el.set_text_content(Some(text));
        }
    }

    fn show_game_over(report: &SessionReport, highscores: &HighScores) {
        set_text("final-score", &report.final_score.to_string());
        set_text("final-size", &format!("{:.0}", report.final_size));
        set_text("final-cause", report.cause.as_str());
        set_text(
            "final-rank",
            &report
                .rank
                .map(|r| format!("#{r}"))
                .unwrap_or_else(|| "-".to_string()),
        );
        render_leaderboard(highscores);
        set_visible("hud", false);
        set_visible("game-over", true);
    }

    fn render_leaderboard(highscores: &HighScores) {
        let rows: Vec<String> = highscores
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}", i + 1, e.score))
            .collect();
        set_text("leaderboard", &rows.join("\n"));
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Reef Hunt starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let highscores = HighScores::load();
        render_leaderboard(&highscores);

        let seed = js_sys::Date::now() as u64;
        let app = App::new(
            Viewport::new(client_w as f32, client_h as f32),
            settings,
            highscores,
            HostInput::new(WebCamera::default()),
            WebAudio::new,
            seed,
        );
        let game = Rc::new(RefCell::new(Game {
            app,
            render_state: None,
            last_time: 0.0,
            last_score: None,
        }));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(mut render_state) => {
                render_state.set_logical_size(client_w as f32, client_h as f32);
                game.borrow_mut().render_state = Some(render_state);
            }
            Err(e) => log::error!("Renderer unavailable: {e}"),
        }

        // Camera is optional; the pointer drives the fish until it is live
        {
            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let camera = WebCamera::start(MODEL_URL).await;
                game.borrow_mut().app.input.tracker = HandTracker::new(camera);
            });
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(&canvas, game.clone());

        set_visible("menu", true);

        // Start game loop
        request_animation_frame(game);

        log::info!("Reef Hunt running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - absolute position
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .set_pointer(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().set_pointer(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: Enter/Space starts, Escape returns to the menu
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" if !g.app.is_playing() => g.start(),
                    "Escape" if g.app.session.is_some() => g.back_to_menu(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().back_to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Reef Hunt (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session driven by a scripted hand path
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use reef_hunt::app::App;
    use reef_hunt::audio::SilentAudio;
    use reef_hunt::consts::SIM_DT;
    use reef_hunt::sim::ScriptedInput;
    use reef_hunt::{HighScores, QualityPreset, Settings, Viewport};

    /// Simulated length of the demo (ticks)
    const DEMO_TICKS: u32 = 60 * 60;

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);
        let quality = args
            .next()
            .and_then(|s| QualityPreset::parse(&s))
            .unwrap_or_default();
        log::info!("Demo seed {seed}, quality {}", quality.as_str());

        let mut app = App::new(
            Viewport::new(1280.0, 720.0),
            Settings {
                quality,
                ..Settings::default()
            },
            HighScores::load(),
            ScriptedInput::circle(300.0, 0.3),
            |_| SilentAudio::default(),
            seed,
        );
        app.start_session(seed);

        let mut ticks = 0;
        let mut frame_ms = 0.0;
        let mut peak_vertices = 0;
        while ticks < DEMO_TICKS {
            ticks += app.update(SIM_DT, frame_ms);
            frame_ms += SIM_DT as f64 * 1000.0;
            peak_vertices = peak_vertices.max(app.frame(frame_ms).len());

            if let Some(report) = app.take_report() {
                log::info!(
                    "Eaten by {} after {:.1}s: score {}, size {:.1}",
                    report.cause.as_str(),
                    frame_ms / 1000.0,
                    report.final_score,
                    report.final_size
                );
                break;
            }
        }

        if let Some(state) = &app.session {
            log::info!(
                "Demo finished: {} ticks, score {}, health {:.0}, {} enemies alive, peak {} vertices/frame",
                state.time_ticks,
                state.score,
                state.health,
                state.enemies.len(),
                peak_vertices
            );
        }
        app.end_session();
    }
}
