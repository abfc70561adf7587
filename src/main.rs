//! Nitro Lane entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use nitro_lane::audio::AudioManager;
    use nitro_lane::consts::*;
    use nitro_lane::platform::{CanvasSurface, LocalStorageHighScore};
    use nitro_lane::sim::{Playfield, TickInput, TickOutcome};
    use nitro_lane::{Game, Settings, Tuning};

    /// Browser session: the game plus everything the event handlers touch
    struct App {
        game: Game<AudioManager, LocalStorageHighScore>,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        settings: Settings,
        /// Input collected since the last frame
        input: TickInput,
        /// Whether a frame is scheduled
        running: bool,
    }

    impl App {
        /// Flip background music and remember the choice
        fn toggle_music(&mut self) {
            let on = self.settings.toggle_music();
            self.settings.save();
            let audio = self.game.audio_mut();
            audio.resume();
            audio.apply_settings(&self.settings);
            log::info!("Music {}", if on { "enabled" } else { "disabled" });
            self.update_music_button();
        }

        fn update_music_button(&self) {
            if let Some(btn) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("music-btn"))
            {
                let label = if self.settings.music_enabled {
                    "MUSIC ON"
                } else {
                    "MUSIC OFF"
                };
                btn.set_text_content(Some(label));
            }
        }

        /// Run one frame and clear the one-shot inputs
        fn frame(&mut self) -> TickOutcome {
            let outcome = self.game.frame(&self.input, &mut self.surface);
            self.input.steer_to = None;
            self.input.steer_by = 0.0;
            self.input.nitro = false;
            outcome
        }

        /// Map a client x coordinate onto the playfield
        fn client_to_playfield_x(&self, client_x: f32) -> f32 {
            let rect = self.canvas.get_bounding_client_rect();
            let scale = if rect.width() > 0.0 {
                self.game.state().playfield.width / rect.width() as f32
            } else {
                1.0
            };
            (client_x - rect.left() as f32) * scale
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.game.state();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.high_score.to_string()));
            }

            // Nitro gauge fill
            if let Some(el) = document
                .get_element_by_id("nitro-gauge-fill")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let pct = (state.nitro_gauge() * 100.0).round();
                let _ = el.style().set_property("width", &format!("{}%", pct));
            }

            // Shield countdown
            if let Some(el) = document.get_element_by_id("hud-shield") {
                match state.shield_seconds() {
                    Some(secs) => {
                        let _ = el.set_attribute("class", "hud-item");
                        el.set_text_content(Some(&format!("Shield {}s", secs)));
                    }
                    None => {
                        let _ = el.set_attribute("class", "hud-item hidden");
                    }
                }
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.game.restart_available() {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&state.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Nitro Lane starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Drawing happens in playfield units; CSS scales the canvas
        let playfield = Playfield::default();
        canvas.set_width(PLAYFIELD_WIDTH as u32);
        canvas.set_height(PLAYFIELD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = Settings::load();
        let tuning = Tuning::load();

        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, playfield, tuning, audio, LocalStorageHighScore::new());
        game.screen_shake = settings.effective_screen_shake();

        let app = Rc::new(RefCell::new(App {
            game,
            surface: CanvasSurface::new(ctx),
            canvas: canvas.clone(),
            settings,
            input: TickInput::default(),
            running: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());
        app.borrow().update_music_button();

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        start_loop(app);

        log::info!("Nitro Lane running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse move - steer toward the pointer while a button is held
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.buttons() == 0 {
                    return;
                }
                let mut a = app.borrow_mut();
                let x = a.client_to_playfield_x(event.client_x() as f32);
                a.input.steer_to = Some(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move - steer toward the finger
        for event_name in ["touchstart", "touchmove"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    a.game.audio_mut().resume();
                    let x = a.client_to_playfield_x(touch.client_x() as f32);
                    a.input.steer_to = Some(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                a.game.audio_mut().resume();
                let nudge = a.game.state().player.speed * 2.0;
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => {
                        event.prevent_default();
                        a.input.steer_by -= nudge;
                    }
                    "ArrowRight" | "d" | "D" => {
                        event.prevent_default();
                        a.input.steer_by += nudge;
                    }
                    " " => {
                        event.prevent_default();
                        a.input.nitro = true;
                    }
                    "m" | "M" => a.toggle_music(),
                    "i" | "I" => {
                        a.input.idle_mode = !a.input.idle_mode;
                        log::info!("Idle mode: {}", a.input.idle_mode);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Nitro button (touch devices)
        if let Some(btn) = document.get_element_by_id("nitro-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                a.game.audio_mut().resume();
                a.input.nitro = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Music toggle
        if let Some(btn) = document.get_element_by_id("music-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().toggle_music();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let restart = {
                    let mut a = app.borrow_mut();
                    if !a.game.restart_available() {
                        false
                    } else {
                        a.game.restart();
                        let idle = a.input.idle_mode;
                        a.input = TickInput {
                            idle_mode: idle,
                            ..Default::default()
                        };
                        a.update_hud();
                        !a.running
                    }
                };
                if restart {
                    start_loop(app.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().running = true;
        request_animation_frame(app);
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        let outcome = {
            let mut a = app.borrow_mut();
            let outcome = a.frame();
            a.update_hud();
            if outcome == TickOutcome::Stop {
                a.running = false;
                log::info!("Run over, waiting for restart");
            }
            outcome
        };

        if outcome == TickOutcome::Continue {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Frames a headless run may last before giving up
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAME_LIMIT: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use nitro_lane::audio::NullAudio;
    use nitro_lane::renderer::NullSurface;
    use nitro_lane::sim::{Playfield, TickInput, TickOutcome};
    use nitro_lane::{Game, MemoryHighScore, Tuning};

    env_logger::init();
    log::info!("Nitro Lane (native) starting...");
    log::info!("Native mode runs a headless autopilot game - run with `trunk serve` for web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load_file(&path),
        None => Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut game = Game::new(
        seed,
        Playfield::default(),
        tuning,
        NullAudio,
        MemoryHighScore::default(),
    );
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut frames = 0u64;
    while game.frame(&input, &mut NullSurface) == TickOutcome::Continue {
        frames += 1;
        if frames >= HEADLESS_FRAME_LIMIT {
            log::info!("Autopilot still alive after {} frames", frames);
            break;
        }
    }

    let state = game.state();
    println!(
        "Seed {}: score {} after {} frames (game over: {})",
        seed, state.score, frames, state.game_over
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
