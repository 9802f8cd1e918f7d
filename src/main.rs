//! Shield Runner entry point
//!
//! Handles platform-specific initialization, DOM wiring, and the frame loop.
//! All gameplay rules live in `shield_runner::sim`; this file only captures
//! input, schedules fixed-step ticks, and mirrors state into the DOM.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement,
        HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use shield_runner::audio::{AudioManager, SoundEffect};
    use shield_runner::consts::*;
    use shield_runner::format_time;
    use shield_runner::renderer::Renderer;
    use shield_runner::sim::{
        GameEvent, GameSession, Screen, ScreenState, TickInput, tick,
    };
    use shield_runner::stats::BestTime;
    use shield_runner::{Settings, Statistics};

    /// Game instance holding all host-side state
    struct Game {
        screens: ScreenState,
        session: Option<GameSession>,
        renderer: Option<Renderer>,
        settings: Settings,
        audio: AudioManager,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        /// Viewport size in CSS pixels
        viewport: Vec2,
        /// Pointer drag anchor while steering
        drag_anchor: Option<Vec2>,
        /// Timestamp of the last tap, for double-tap dash detection
        last_tap_ms: f64,
    }

    impl Game {
        fn new() -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_volume(settings.volume_gain());
            Self {
                screens: ScreenState::new(),
                session: None,
                renderer: None,
                settings,
                audio,
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                viewport: Vec2::new(800.0, 600.0),
                drag_anchor: None,
                last_tap_ms: 0.0,
            }
        }

        /// Start (or restart) a session and enter the Playing screen
        fn start_session(&mut self, document: &Document) {
            if !self.screens.set(Screen::Playing) {
                return;
            }
            let seed = js_sys::Date::now() as u64;
            let mut session = GameSession::new(seed, self.settings.difficulty, self.viewport);
            session.camera.set_viewport(self.viewport);
            self.session = Some(session);
            self.accumulator = 0.0;
            self.input = TickInput::default();

            show_screen(document, "gameScreen");
            self.update_hud(document);
            // Browsers gate audio behind a user gesture; starting a game is one
            self.audio.resume();
            log::info!("Session started with seed {seed}");
        }

        /// Run fixed-timestep simulation, bounded by the substep cap
        fn update(&mut self, dt: f32, document: &Document) {
            if !self.screens.is(Screen::Playing) {
                self.accumulator = 0.0;
                return;
            }

            self.accumulator += dt.min(0.1);
            let mut substeps = 0;
            while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                if let Some(session) = &mut self.session {
                    tick(session, &input);
                }
                self.accumulator -= TICK_DT;
                substeps += 1;

                // One-shot actions apply to a single tick
                self.input.use_barrier = false;
                self.input.dash = false;

                self.dispatch_events(document);
                if !self.screens.is(Screen::Playing) {
                    break;
                }
            }
        }

        /// Drain feedback events from the sim into audio/haptics/DOM
        fn dispatch_events(&mut self, document: &Document) {
            let Some(session) = &mut self.session else {
                return;
            };
            let events = session.take_events();
            for event in events {
                match event {
                    GameEvent::Collect => {
                        self.audio.play(SoundEffect::Collect);
                        self.update_hud(document);
                    }
                    GameEvent::BarrierUsed => {
                        self.audio.play(SoundEffect::Barrier);
                        self.vibrate(&[50, 50, 50]);
                        self.update_hud(document);
                    }
                    GameEvent::BarrierDenied => {
                        self.vibrate(&[50]);
                    }
                    GameEvent::Dash => {
                        self.audio.play(SoundEffect::Dash);
                        self.vibrate(&[100]);
                    }
                    GameEvent::GameOver => {
                        self.finish_session(document);
                    }
                }
            }
        }

        fn vibrate(&self, pattern: &[u32]) {
            if self.settings.vibration {
                self.audio.vibrate(pattern);
            }
        }

        /// Game over: persist records, populate the summary screen
        fn finish_session(&mut self, document: &Document) {
            let (elapsed, barriers) = match &self.session {
                Some(s) => (s.elapsed, s.player.barriers),
                None => return,
            };

            self.screens.set(Screen::GameOver);
            show_screen(document, "gameOverScreen");

            set_text(document, "finalTime", &format_time(elapsed));
            set_text(document, "finalBarriers", &barriers.to_string());

            let best = BestTime::load().max(elapsed);
            BestTime::store(best);
            set_text(document, "bestTime", &format_time(best));

            let mut stats = Statistics::load();
            stats.record_session(elapsed, barriers);
            stats.save();

            self.audio.play(SoundEffect::GameOver);
            self.vibrate(&[200, 100, 200]);
        }

        fn pause(&mut self, document: &Document) {
            if self.screens.set(Screen::Paused) {
                show_screen(document, "pauseScreen");
                if let Some(session) = &self.session {
                    set_text(document, "pauseTime", &format_time(session.elapsed));
                    set_text(document, "pauseBarriers", &session.player.barriers.to_string());
                }
            }
        }

        fn resume(&mut self, document: &Document) {
            if self.screens.set(Screen::Playing) {
                show_screen(document, "gameScreen");
            }
        }

        fn toggle_pause(&mut self, document: &Document) {
            if self.screens.is(Screen::Playing) {
                self.pause(document);
            } else if self.screens.is(Screen::Paused) {
                self.resume(document);
            }
        }

        /// Leave any session behind and land on the main menu
        fn show_menu(&mut self, document: &Document) {
            if self.screens.set(Screen::Menu) {
                self.session = None;
                show_screen(document, "mainMenu");
            }
        }

        /// Last-resort recovery when a frame fails: drop the session rather
        /// than crash the page
        fn abort_to_menu(&mut self, document: &Document) {
            log::error!("Session aborted after frame failure");
            self.show_menu(document);
        }

        fn render(&mut self) -> Result<(), JsValue> {
            if let (Some(renderer), Some(session)) = (&self.renderer, &self.session) {
                renderer.render(session)?;
            }
            Ok(())
        }

        /// Mirror timer and shield count into the HUD
        fn update_hud(&self, document: &Document) {
            let Some(session) = &self.session else {
                return;
            };
            set_text(document, "timer", &format_time(session.elapsed));

            if let Ok(indicators) = document.query_selector_all(".health-indicator") {
                for i in 0..indicators.length() {
                    let Some(el) = indicators
                        .item(i)
                        .and_then(|n| n.dyn_into::<Element>().ok())
                    else {
                        continue;
                    };
                    if i < session.player.barriers {
                        let _ = el.class_list().add_1("active");
                    } else {
                        let _ = el.class_list().remove_1("active");
                    }
                }
            }
        }

        /// Convert a pointer position into a movement intent via drag deltas
        fn steer(&mut self, point: Vec2) {
            if let Some(anchor) = self.drag_anchor {
                let delta = point - anchor;
                if delta.length() > 5.0 {
                    self.input.intent = delta.normalize_or_zero();
                }
                self.drag_anchor = Some(point);
            }
        }

        fn end_steer(&mut self) {
            self.drag_anchor = None;
            self.input.intent = Vec2::ZERO;
        }
    }

    // === DOM helpers ===

    fn document() -> Document {
        web_sys::window()
            .expect("no window")
            .document()
            .expect("no document")
    }

    /// Show one screen overlay and hide all others
    fn show_screen(document: &Document, id: &str) {
        if let Ok(screens) = document.query_selector_all(".screen") {
            for i in 0..screens.length() {
                if let Some(el) = screens.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    let _ = el.class_list().add_1("hidden");
                }
            }
        }
        match document.get_element_by_id(id) {
            Some(el) => {
                let _ = el.class_list().remove_1("hidden");
            }
            None => log::error!("Screen not found: {id}"),
        }
    }

    /// Set an element's text, quietly skipping absent elements
    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Wire a click handler, degrading with a warning if the button is missing
    fn setup_button(document: &Document, id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        match document.get_element_by_id(id) {
            Some(el) => {
                let closure = Closure::<dyn FnMut(_)>::new(handler);
                let _ = el
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            None => log::warn!("Button not found: {id}"),
        }
    }

    /// Replace the loading screen with an error panel and a reload action.
    /// Used only when essential setup fails before any session starts.
    fn show_error_screen(document: &Document, message: &str) {
        if let Some(el) = document.get_element_by_id("loadingScreen") {
            el.set_inner_html(&format!(
                "<div class=\"init-error\"><h1>ERROR</h1><p>{message}</p>\
                 <button onclick=\"location.reload()\">Reload Page</button></div>"
            ));
        }
        log::error!("Initialization failed: {message}");
    }

    // === Settings / stats screens ===

    fn load_settings_to_ui(document: &Document, settings: &Settings) {
        if let Some(el) = document
            .get_element_by_id("soundVolume")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            el.set_value(&settings.sound_volume.to_string());
        }
        set_text(document, "volumeValue", &format!("{}%", settings.sound_volume));
        if let Some(el) = document
            .get_element_by_id("gameDifficulty")
            .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
        {
            el.set_value(settings.difficulty.as_str());
        }
        if let Some(el) = document
            .get_element_by_id("vibration")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            el.set_checked(settings.vibration);
        }
    }

    /// Read the settings controls back into a Settings value.
    /// Missing controls keep their previous values (degraded, not fatal).
    fn read_settings_from_ui(document: &Document, current: &Settings) -> Settings {
        let mut settings = current.clone();

        if let Some(el) = document
            .get_element_by_id("soundVolume")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            if let Ok(volume) = el.value().parse::<u32>() {
                settings.sound_volume = volume.min(100);
            }
        }
        if let Some(el) = document
            .get_element_by_id("gameDifficulty")
            .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
        {
            if let Some(difficulty) = shield_runner::sim::Difficulty::from_str(&el.value()) {
                settings.difficulty = difficulty;
            }
        }
        if let Some(el) = document
            .get_element_by_id("vibration")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            settings.vibration = el.checked();
        }
        settings
    }

    fn load_statistics_to_ui(document: &Document) {
        let stats = Statistics::load();
        set_text(document, "statBestTime", &format_time(stats.best_time));
        set_text(document, "statTotalGames", &stats.total_games.to_string());
        set_text(document, "statTotalBarriers", &stats.total_barriers.to_string());
        set_text(document, "statTotalTime", &format_time(stats.total_time));
    }

    // === Entry point ===

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Shield Runner starting...");

        let document = document();

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        else {
            show_error_screen(&document, "Canvas not found");
            return;
        };

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
        let Some(ctx) = ctx else {
            show_error_screen(&document, "2D context unavailable");
            return;
        };

        let game = Rc::new(RefCell::new(Game::new()));

        // Size canvas and renderer before anything draws
        resize_canvas(&canvas, &game);
        {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            game.borrow_mut().renderer = Some(Renderer::new(ctx, dpr));
        }

        setup_resize_handler(canvas.clone(), game.clone());
        setup_menu_buttons(game.clone());
        setup_settings_controls(game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_keyboard(game.clone());
        setup_auto_pause(game.clone());

        // Init complete: leave the loading screen for the menu
        {
            let mut g = game.borrow_mut();
            g.show_menu(&document);
        }

        request_animation_frame(game);

        log::info!("Shield Runner running!");
    }

    fn resize_canvas(canvas: &HtmlCanvasElement, game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        let dpr = window.device_pixel_ratio();

        canvas.set_width((width * dpr) as u32);
        canvas.set_height((height * dpr) as u32);

        let mut g = game.borrow_mut();
        g.viewport = Vec2::new(width as f32, height as f32);
        if let Some(renderer) = &mut g.renderer {
            renderer.set_dpr(dpr);
        }
        // World bounds are fixed per session; only the camera viewport follows
        // a resize
        if let Some(session) = &mut g.session {
            session.camera.set_viewport(g.viewport);
        }
        log::info!("Canvas resized to {width}x{height} (dpr {dpr})");
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            resize_canvas(&canvas, &game);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let doc = document();

        {
            let game = game.clone();
            setup_button(&doc, "startBtn", move |_| {
                let doc = document();
                game.borrow_mut().start_session(&doc);
            });
        }
        {
            let game = game.clone();
            setup_button(&doc, "playAgainBtn", move |_| {
                let doc = document();
                game.borrow_mut().start_session(&doc);
            });
        }
        {
            let game = game.clone();
            setup_button(&doc, "settingsBtn", move |_| {
                let doc = document();
                let mut g = game.borrow_mut();
                if g.screens.set(Screen::Settings) {
                    show_screen(&doc, "settingsScreen");
                    load_settings_to_ui(&doc, &g.settings);
                }
            });
        }
        {
            let game = game.clone();
            setup_button(&doc, "statsBtn", move |_| {
                let doc = document();
                let mut g = game.borrow_mut();
                if g.screens.set(Screen::Stats) {
                    show_screen(&doc, "statsScreen");
                    load_statistics_to_ui(&doc);
                }
            });
        }
        {
            let game = game.clone();
            setup_button(&doc, "pauseBtn", move |_| {
                let doc = document();
                game.borrow_mut().toggle_pause(&doc);
            });
        }
        {
            let game = game.clone();
            setup_button(&doc, "resumeBtn", move |_| {
                let doc = document();
                game.borrow_mut().resume(&doc);
            });
        }
        {
            let game = game.clone();
            setup_button(&doc, "useBarrier", move |_| {
                game.borrow_mut().input.use_barrier = true;
            });
        }
        {
            let game = game.clone();
            setup_button(&doc, "dash", move |_| {
                game.borrow_mut().input.dash = true;
            });
        }
        for id in ["menuFromPause", "menuFromGameOver", "backToMenu", "backFromStats"] {
            let game = game.clone();
            setup_button(&doc, id, move |_| {
                let doc = document();
                game.borrow_mut().show_menu(&doc);
            });
        }
    }

    fn setup_settings_controls(game: Rc<RefCell<Game>>) {
        let doc = document();

        // Live-update the volume label while the slider moves
        if let Some(slider) = doc.get_element_by_id("soundVolume") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let doc = document();
                if let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                {
                    set_text(&doc, "volumeValue", &format!("{}%", input.value()));
                }
            });
            let _ =
                slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            setup_button(&doc, "saveSettings", move |_| {
                let doc = document();
                let mut g = game.borrow_mut();
                let settings = read_settings_from_ui(&doc, &g.settings);
                settings.save();
                g.audio.set_volume(settings.volume_gain());
                g.settings = settings;
                g.show_menu(&doc);
            });
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse steering
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.drag_anchor = Some(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .steer(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().end_steer();
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch steering
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let point = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                    game.borrow_mut().drag_anchor = Some(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let point = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                    game.borrow_mut().steer(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            // Touch end: stop steering; a quick second tap triggers a dash
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.end_steer();

                let now = js_sys::Date::now();
                let since_last = now - g.last_tap_ms;
                if since_last > 0.0 && since_last < 500.0 {
                    g.input.dash = true;
                }
                g.last_tap_ms = now;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Context menu would interrupt steering
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let doc = document();
            let mut g = game.borrow_mut();
            match event.code().as_str() {
                "Escape" => g.toggle_pause(&doc),
                "Space" => {
                    event.prevent_default();
                    g.input.use_barrier = true;
                }
                "ShiftLeft" | "ShiftRight" => g.input.dash = true,
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let doc = document();

        // Tab hidden or minimized
        {
            let game = game.clone();
            let doc_clone = doc.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if doc_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let doc = document();
                    let mut g = game.borrow_mut();
                    if g.screens.is(Screen::Playing) {
                        g.pause(&doc);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = doc.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Click outside the window
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let doc = document();
                let mut g = game.borrow_mut();
                if g.screens.is(Screen::Playing) {
                    g.pause(&doc);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        {
            let doc = document();
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                TICK_DT
            };
            g.last_time = time;

            g.update(dt, &doc);
            if g.screens.is(Screen::Playing) {
                g.update_hud(&doc);
            }

            // Any frame failure is fatal to the session, never to the page
            if let Err(e) = g.render() {
                log::error!("Render error: {e:?}");
                g.abort_to_menu(&doc);
            }
        }

        request_animation_frame(game);
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
    log::info!("Shield Runner (native) starting...");
    log::info!("The game targets the browser - build with trunk/wasm-pack for the web version");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
