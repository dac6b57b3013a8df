//! Arcade Loop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use arcade_loop::audio::{AudioManager, SoundEffect};
    use arcade_loop::consts::SIM_DT;
    use arcade_loop::persistence::LocalStorage;
    use arcade_loop::platform::{FixedTimestep, keys, map_key};
    use arcade_loop::renderer::{
        DrawCmd, Frame, RenderState, TextAlign, letterbox, tessellate, viewport_to_playfield,
    };
    use arcade_loop::sim::{Action, Control, InputState};
    use arcade_loop::{Game, GameKind, Session, SessionPhase, Settings, TickInput, Tuning};

    /// Everything the page keeps alive between frames
    struct App {
        session: Session<Box<dyn Game>, LocalStorage>,
        settings: Settings,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        clock: FixedTimestep,
        input: InputState,
        audio: AudioManager,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Last overlay markup, to skip redundant DOM writes
        overlay: String,
    }

    impl App {
        fn new(kind: GameKind, canvas: HtmlCanvasElement) -> Self {
            let store = LocalStorage::open();
            let settings = Settings::load(&store);
            let mut tuning = Tuning::load(&store);
            settings.apply_to(&mut tuning);

            let seed = js_sys::Date::now() as u64;
            log::info!("Building {} with seed: {}", kind.id(), seed);
            let session = Session::new(kind.build(&tuning, seed), store);

            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());

            Self {
                session,
                settings,
                render_state: None,
                canvas,
                clock: FixedTimestep::default(),
                input: InputState::new(),
                audio,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                overlay: String::new(),
            }
        }

        fn phase(&self) -> SessionPhase {
            self.session.phase()
        }

        /// Canvas size in CSS pixels
        fn viewport(&self) -> Vec2 {
            Vec2::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        /// CSS-pixel offset within the canvas to playfield coordinates
        fn to_playfield(&self, x: f32, y: f32) -> Vec2 {
            viewport_to_playfield(
                Vec2::new(x, y),
                self.session.game().playfield(),
                self.viewport(),
            )
        }

        /// Next tick's input: live controls, or the autopilot in idle mode
        fn next_input(&mut self) -> TickInput {
            let live = self.input.snapshot();
            if !self.session.is_demo() {
                return live;
            }
            TickInput {
                pause: live.pause,
                start: matches!(self.phase(), SessionPhase::Idle | SessionPhase::GameOver),
                ..self.session.autopilot_input()
            }
        }

        fn update(&mut self, dt: f32, time: f64) {
            let ticks = self.clock.advance(dt);
            for _ in 0..ticks {
                let input = self.next_input();
                let report = self.session.tick(&input);
                for event in &report.events {
                    if let Some(effect) = SoundEffect::for_event(event) {
                        self.audio.play(effect);
                    }
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest sample is the one we are about to overwrite
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let frame = self.session.render();

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&tessellate(&frame)) {
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

            self.update_overlay(&frame);
        }

        /// Text commands go to the DOM, placed over the letterboxed playfield
        fn update_overlay(&mut self, frame: &Frame) {
            let html = overlay_html(frame, self.viewport());
            if html == self.overlay {
                return;
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("overlay") {
                el.set_inner_html(&html);
            }
            self.overlay = html;
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let stats = self.session.game().stats();

            let set = |selector: &str, value: Option<String>| {
                let Some(el) = document.query_selector(selector).ok().flatten() else {
                    return;
                };
                match value {
                    Some(text) => {
                        el.set_text_content(Some(&text));
                        let _ = el.set_attribute("class", "hud-value");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hud-value hidden");
                    }
                }
            };

            set("#hud-score .hud-value", Some(stats.score.to_string()));
            set(
                "#hud-best .hud-value",
                Some(self.session.high_score().to_string()),
            );
            set("#hud-lives .hud-value", stats.lives.map(|l| l.to_string()));
            set("#hud-level .hud-value", stats.level.map(|l| l.to_string()));
            set(
                "#hud-fps .hud-value",
                self.settings.show_fps.then(|| self.fps.to_string()),
            );
        }

        /// Tab hidden or focus lost
        fn suspend(&mut self, reason: &str) {
            if self.phase() == SessionPhase::Running {
                self.input.press(Control::Act(Action::Pause));
                log::info!("Auto-paused ({})", reason);
            }
            self.input.release_all();
            self.clock.reset();
            if self.settings.mute_on_blur {
                self.audio.set_muted(true);
            }
        }

        fn resume(&mut self) {
            self.audio.set_muted(false);
            self.last_time = 0.0;
        }

        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }
    }

    /// Absolutely positioned spans for every text command in the frame
    fn overlay_html(frame: &Frame, viewport: Vec2) -> String {
        let (offset, scale) = letterbox(frame.size, viewport);
        let mut html = String::new();

        for cmd in frame.texts() {
            let DrawCmd::Text {
                pos,
                size,
                align,
                text,
                color,
            } = cmd
            else {
                continue;
            };
            let at = offset + *pos * scale;
            let shift = match align {
                TextAlign::Left => "0%",
                TextAlign::Center => "-50%",
                TextAlign::Right => "-100%",
            };
            html.push_str(&format!(
                "<span style=\"position:absolute;left:{:.1}px;top:{:.1}px;\
                 font-size:{:.1}px;transform:translate({},-50%);\
                 color:rgba({},{},{},{:.2});white-space:nowrap\">{}</span>",
                at.x,
                at.y,
                size * scale,
                shift,
                (color[0] * 255.0) as u8,
                (color[1] * 255.0) as u8,
                (color[2] * 255.0) as u8,
                color[3],
                escape(text),
            ));
        }
        html
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// Initialize and run the game
    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Arcade Loop starting...");

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
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let kind = window
            .location()
            .search()
            .ok()
            .and_then(|query| GameKind::from_query(&query))
            .unwrap_or(GameKind::Breakout);
        let app = Rc::new(RefCell::new(App::new(kind, canvas.clone())));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
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

        let playfield = app.borrow().session.game().playfield();
        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            // Keep running; the overlay text still shows the game state
            Err(e) => log::error!("No render device: {}", e),
        }

        setup_input_handlers(&canvas, app.clone());
        setup_auto_pause(app.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(app);

        log::info!("Arcade Loop running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Mouse move - absolute position mapped into the playfield
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.to_playfield(event.offset_x() as f32, event.offset_y() as f32);
                a.input.point(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - start from the title/game-over screens, otherwise primary
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                let action = match a.phase() {
                    SessionPhase::Idle | SessionPhase::GameOver => Action::Start,
                    _ => Action::Primary,
                };
                a.input.press(Control::Act(action));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let pos = a.to_playfield(x, y);
                    a.input.point(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (tap acts like a click)
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.audio.resume();
                let action = match a.phase() {
                    SessionPhase::Idle | SessionPhase::GameOver => Action::Start,
                    _ => Action::Primary,
                };
                a.input.press(Control::Act(action));
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let pos = a.to_playfield(x, y);
                    a.input.point(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                if keys::blocks_default(&key) {
                    event.prevent_default();
                }

                let mut a = app.borrow_mut();
                a.audio.resume();
                if key == "i" || key == "I" {
                    let demo = !a.session.is_demo();
                    a.session.set_demo(demo);
                    a.input.reset();
                    log::info!("Idle mode: {}", demo);
                    return;
                }

                match map_key(&key) {
                    // Held keys repeat; only directions should re-fire
                    Some(Control::Act(_)) if event.repeat() => {}
                    Some(control) => a.input.press(control),
                    None => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(control) = map_key(&event.key()) {
                    app.borrow_mut().input.release(control);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    a.suspend("tab hidden");
                } else {
                    a.resume();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().suspend("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().resume();
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade Loop (native) starting...");
    log::info!("Rendering needs the browser - run with `trunk serve` for the web version");

    println!("\nRunning autopilot demo...");
    for kind in arcade_loop::GameKind::ALL {
        autopilot_demo(kind);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one game headless on its autopilot
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_demo(kind: arcade_loop::GameKind) {
    use arcade_loop::persistence::MemoryStore;
    use arcade_loop::{Game, Session, SessionPhase, Tuning};

    // Three simulated minutes; the better autopilots never lose
    const MAX_TICKS: u64 = 60 * 180;

    let game = kind.build(&Tuning::default(), 0x5eed);
    let mut session = Session::new(game, MemoryStore::new());
    session.start();

    while session.phase() == SessionPhase::Running && session.ticks() < MAX_TICKS {
        let input = session.autopilot_input();
        session.tick(&input);
    }

    let outcome = if session.phase() == SessionPhase::GameOver {
        session.game().outcome()
    } else {
        "Still playing".to_string()
    };
    println!(
        "✓ {:<8} {:>6} ticks  score {:>6}  best {:>6}  {}",
        kind.id(),
        session.ticks(),
        session.game().score(),
        session.high_score(),
        outcome
    );
}
