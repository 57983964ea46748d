//! Star Surge entry point
//!
//! Wires the browser host (canvas, DOM HUD, input events) to the
//! simulation core on wasm32; native builds run a short headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{spawn_local, JsFuture};
    use web_sys::{
        CanvasRenderingContext2d, DeviceOrientationEvent, Document, HtmlCanvasElement,
        HtmlElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use star_surge::consts::*;
    use star_surge::render;
    use star_surge::sim::{tick, GameState, InputState, RunPhase};
    use star_surge::Settings;

    // JS binding for the nonstandard iOS 13+ orientation permission
    // prompt; resolves as granted where the permission API does not exist
    #[wasm_bindgen(inline_js = "
        export function request_orientation_permission() {
            if (typeof DeviceOrientationEvent !== 'undefined' &&
                typeof DeviceOrientationEvent.requestPermission === 'function') {
                return DeviceOrientationEvent.requestPermission();
            }
            return Promise.resolve('granted');
        }
    ")]
    extern "C" {
        fn request_orientation_permission() -> js_sys::Promise;
    }

    /// Game instance holding all host-side state
    struct Game {
        state: GameState,
        input: InputState,
        ctx: CanvasRenderingContext2d,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // rAF chain bookkeeping
        loop_running: bool,
        tilt_wired: bool,
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d, settings: Settings) -> Self {
            let mut state = GameState::new(seed);
            if settings.star_count != state.star_count {
                state.star_count = settings.star_count;
                state.init_run();
            }
            let mut input = InputState::new();
            input.tilt_sensitivity = settings.tilt_sensitivity;

            Self {
                state,
                input,
                ctx,
                settings,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                loop_running: false,
                tilt_wired: false,
            }
        }

        /// Advance the sim one frame, repaint, and refresh the HUD.
        /// Returns `false` once the run has ended.
        fn frame(&mut self, time: f64) -> bool {
            let running = tick(&mut self.state, &self.input, time);

            if let Err(err) = render::draw_scene(&self.ctx, &self.state) {
                log::warn!("Draw error: {:?}", err);
            }

            self.track_fps(time);
            self.update_hud();

            if !running {
                self.show_game_over();
            }
            running
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Average over the oldest-to-newest span of the ring
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Push the run counters into the DOM readouts
        fn update_hud(&self) {
            let document = web_sys::window().unwrap().document().unwrap();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("healthValue") {
                el.set_text_content(Some(&self.state.display_health().to_string()));
            }
            if let Some(el) = document.get_element_by_id("healthFill") {
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let width = format!("{}%", self.state.display_health());
                    let _ = el.style().set_property("width", &width);
                }
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("powerup") {
                el.set_text_content(Some(self.state.power_label));
            }
            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("fps") {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }
        }

        fn show_game_over(&self) {
            let document = web_sys::window().unwrap().document().unwrap();
            if let Some(el) = document.get_element_by_id("finalScore") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            set_display(&document, "gameOverScreen", "flex");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Star Surge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context lookup failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, ctx, settings)));

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_buttons(game.clone());
        setup_touch_controls(game.clone());

        set_display(&document, "startScreen", "flex");

        log::info!("Star Surge ready");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.input.press(&event.key());

                // Space fires while a run is live
                if event.key() == " " && g.state.phase == RunPhase::Running {
                    g.state.fire();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.release(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        for id in ["startButton", "restartButton"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                start_run(&game);
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Start (or restart) a run and make sure the frame loop is going
    fn start_run(game: &Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        set_display(&document, "startScreen", "none");
        set_display(&document, "gameOverScreen", "none");

        let now = performance_now();
        game.borrow_mut().state.start(now);
        log::info!("Run started");

        wire_tilt_once(game);
        kick_loop(game);
    }

    /// Tilt steering needs a user gesture on iOS, so it is wired from the
    /// first start click rather than page load. Only once per page.
    fn wire_tilt_once(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.tilt_wired {
                return;
            }
            g.tilt_wired = true;
        }
        setup_tilt_controls(game.clone());
    }

    fn kick_loop(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_running {
                return;
            }
            g.loop_running = true;
        }
        request_animation_frame(game.clone());
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let running = game.borrow_mut().frame(time);
        if running {
            request_animation_frame(game);
        } else {
            game.borrow_mut().loop_running = false;
        }
    }

    /// On-screen SHOOT button for touch devices: fires immediately, then
    /// repeats while held
    fn setup_touch_controls(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let has_touch = js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart"))
            .unwrap_or(false);
        if !has_touch {
            return;
        }

        let document = window.document().expect("no document");
        let Some(body) = document.body() else {
            return;
        };
        let Ok(btn) = document.create_element("button") else {
            return;
        };
        btn.set_class_name("shoot-button");
        btn.set_text_content(Some("SHOOT"));

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().state.begin_autofire(performance_now());
            });
            let _ = btn
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().state.end_autofire();
            });
            let _ =
                btn.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let _ = body.append_child(&btn);
        log::info!("Touch controls enabled");
    }

    fn setup_tilt_controls(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let supported = js_sys::Reflect::has(
            window.as_ref(),
            &JsValue::from_str("DeviceOrientationEvent"),
        )
        .unwrap_or(false);
        if !supported {
            return;
        }

        {
            let game = game.clone();
            spawn_local(async move {
                match JsFuture::from(request_orientation_permission()).await {
                    Ok(response) if response.as_string().as_deref() == Some("granted") => {
                        attach_orientation_listener(game);
                    }
                    Ok(response) => {
                        log::warn!("Device orientation permission: {:?}", response);
                    }
                    Err(err) => {
                        log::warn!("Device orientation permission failed: {:?}", err);
                    }
                }
            });
        }

        // Calibration button so a tilted grip can be the rest position
        let document = window.document().expect("no document");
        if let Some(body) = document.body() {
            if let Ok(btn) = document.create_element("button") {
                btn.set_text_content(Some("Calibrate Tilt"));
                let _ = btn.set_attribute(
                    "style",
                    "position:absolute;bottom:20px;left:50%;transform:translateX(-50%);z-index:20;padding:10px 20px",
                );
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().input.calibrate();
                    log::info!("Tilt calibrated");
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
                let _ = body.append_child(&btn);
            }
        }
    }

    fn attach_orientation_listener(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
            // Desktop browsers deliver events with a null gamma; leaving
            // tilt unset keeps keyboard steering active
            if let Some(gamma) = event.gamma() {
                game.borrow_mut().input.tilt = Some(gamma as f32);
            }
        });
        let _ = window
            .add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref());
        closure.forget();
        log::info!("Tilt steering enabled");
    }

    fn set_display(document: &Document, id: &str, value: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let _ = el.style().set_property("display", value);
            }
        }
    }

    fn performance_now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Surge (native) starting...");
    log::info!("Native mode is a headless demo - serve the wasm build for the playable game");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the sim for ten simulated seconds at a nominal 60 fps and
/// report how the run went
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use star_surge::sim::{tick, GameState, InputState};

    let seed = 0x5EED;
    let mut state = GameState::new(seed);
    let mut input = InputState::new();
    input.press("ArrowLeft");
    state.start(0.0);

    let mut frames = 0u32;
    for frame in 0..600u32 {
        let now = f64::from(frame + 1) * (1000.0 / 60.0);
        // Roughly the touch autofire cadence
        if frame % 12 == 0 {
            state.fire();
        }
        frames = frame + 1;
        if !tick(&mut state, &input, now) {
            break;
        }
    }

    println!(
        "{} frames with seed {:#x}: score {}, level {}, health {}, {} enemies on field",
        frames,
        seed,
        state.score,
        state.level,
        state.display_health(),
        state.enemies.len()
    );
}
