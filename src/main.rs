//! Hexa Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement};

    use hexa_rush::audio::web::{AudioManager, AudioSink};
    use hexa_rush::consts::VIEW_RADIUS;
    use hexa_rush::driver::{Frame, FrameDriver};
    use hexa_rush::highscores::{LocalLeaderboard, StorageStatus};
    use hexa_rush::persistence::{self, SaveEnvelope};
    use hexa_rush::platform::dom::visibility_classes;
    use hexa_rush::platform::input::CONTROL_BUTTONS;
    use hexa_rush::platform::{PlatformStore, command_for_key};
    use hexa_rush::renderer::{RenderState, build_scene};
    use hexa_rush::sim::{FnSink, GameEvent, GamePhase, GameState};
    use hexa_rush::{Session, Settings};

    /// Checkbox id and the setting it flips
    type Toggle = (&'static str, fn(&mut Settings) -> &mut bool);

    fn hard_mode(s: &mut Settings) -> &mut bool {
        &mut s.hard_mode
    }
    fn rhythm_mode(s: &mut Settings) -> &mut bool {
        &mut s.rhythm_mode
    }
    fn muted(s: &mut Settings) -> &mut bool {
        &mut s.muted
    }
    fn reduced_motion(s: &mut Settings) -> &mut bool {
        &mut s.reduced_motion
    }
    fn show_fps(s: &mut Settings) -> &mut bool {
        &mut s.show_fps
    }

    const SETTING_TOGGLES: [Toggle; 5] = [
        ("opt-hard", hard_mode),
        ("opt-rhythm", rhythm_mode),
        ("opt-mute", muted),
        ("opt-reduced-motion", reduced_motion),
        ("opt-fps", show_fps),
    ];

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        audio: Rc<RefCell<AudioManager>>,
        settings: Settings,
        store: PlatformStore,
        /// Score modal currently open
        submission_open: bool,
        // FPS tracking
        frame_times: [f32; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let store = PlatformStore::default();
            let settings = Settings::load(&store);
            let audio = Rc::new(RefCell::new(AudioManager::new(&settings)));
            let leaderboard = LocalLeaderboard::load(PlatformStore::default());
            if let StorageStatus::Unavailable(reason) = leaderboard.status() {
                log::warn!("Scores will not persist: {reason}");
            }

            let state = GameState::with_tuning(seed, settings.tuning());
            let mut session = Session::new(state, Box::new(leaderboard));
            session.add_sink(Box::new(AudioSink(audio.clone())));
            // A finished run has nothing to continue
            session.add_sink(Box::new(FnSink(|event: &GameEvent| {
                if matches!(event, GameEvent::GameOver { .. }) {
                    if let Err(e) = persistence::clear(&mut PlatformStore::default()) {
                        log::warn!("Failed to clear save: {e}");
                    }
                }
            })));

            Self {
                session,
                render_state: None,
                audio,
                settings,
                store,
                submission_open: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn command(&mut self, command: hexa_rush::sim::Command) {
            self.audio.borrow().resume();
            self.session.command(command);
        }

        fn save_game(&mut self) {
            match self.session.save_to(&mut self.store, js_sys::Date::now()) {
                Ok(true) => log::info!("Game saved"),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to save game: {e}"),
            }
        }

        fn continue_from(&mut self, save: SaveEnvelope) {
            self.session.resume(save);
            if self.session.state().phase == GamePhase::Playing {
                self.audio.borrow_mut().start_music();
            }
        }

        fn apply_settings(&mut self) {
            self.settings.save(&mut self.store);
            self.audio.borrow_mut().apply_settings(&self.settings);
            if !self.session.set_tuning(self.settings.tuning()) {
                log::info!("Mode change applies from the next run");
            }
        }

        fn track_fps(&mut self, dt: f32) {
            self.frame_times[self.frame_index] = dt;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();
            let total: f32 = self.frame_times.iter().sum();
            if total > 0.0 {
                self.fps = (self.frame_times.len() as f32 / total).round() as u32;
            }
        }

        fn update_hud(&mut self) {
            let Some(document) = current_document() else { return };
            let state = self.session.state();

            let elapsed = state.elapsed;
            set_text(&document, "hud-time", &format!("{elapsed:.1}"));
            if let Some(el) = document.get_element_by_id("hud-time") {
                let color = if elapsed < state.tuning.difficulty_threshold_secs {
                    "color: #4CAF50"
                } else {
                    "color: #F44336"
                };
                let _ = el.set_attribute("style", color);
            }
            set_text(&document, "hud-lives", &state.player.lives.to_string());
            set_visible(
                &document,
                "difficulty-banner",
                state.difficulty_message_frames > 0,
            );
            set_visible(&document, "start-prompt", state.phase == GamePhase::Waiting);

            let game_over = state.phase == GamePhase::GameOver;
            set_visible(&document, "game-over", game_over);
            if game_over {
                set_text(&document, "final-time", &format!("{:.1}", state.score()));
            }

            set_visible(&document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(&document, "hud-fps", &format!("{} FPS", self.fps));
            }

            // Open the name prompt once per qualifying run
            let pending = self.session.pending_submission();
            if pending.is_some() != self.submission_open {
                self.submission_open = pending.is_some();
                set_visible(&document, "score-modal", self.submission_open);
                if let Some(score) = pending {
                    set_text(&document, "modal-score", &format!("{score:.1}"));
                    self.audio
                        .borrow()
                        .play(hexa_rush::audio::SoundEffect::HighScore);
                    if let Some(input) = input_element(&document, "player-name") {
                        let _ = input.focus();
                    }
                }
            }
        }

        fn refresh_leaderboard(&self) {
            let Some(document) = current_document() else { return };
            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            list.set_text_content(None);
            for (rank, entry) in self.session.leaderboard().entries().iter().enumerate() {
                let Ok(item) = document.create_element("li") else {
                    continue;
                };
                item.set_text_content(Some(&format!(
                    "{}. {} {:.1}s ({})",
                    rank + 1,
                    entry.player_name,
                    entry.score,
                    entry.date
                )));
                let _ = list.append_child(&item);
            }
        }
    }

    impl Frame for Game {
        fn update(&mut self, dt: f32) {
            self.track_fps(dt);
            self.session.update(dt);
            self.audio.borrow_mut().update_music(dt);
        }

        fn render(&mut self) {
            let vertices = build_scene(self.session.state(), self.settings.effects_enabled());
            if let Some(rs) = &mut self.render_state {
                match rs.render(&vertices) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let (w, h) = rs.size;
                        rs.resize(w, h);
                    }
                    Err(e) => log::error!("Render error: {:?}", e),
                }
            }
            self.update_hud();
        }
    }

    fn current_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_class_name(&visibility_classes(&el.class_name(), visible));
        }
    }

    fn input_element(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Everything one animation frame callback needs
    #[derive(Clone)]
    struct FrameLoop {
        game: Rc<RefCell<Game>>,
        driver: Rc<RefCell<FrameDriver>>,
        /// Pending requestAnimationFrame id
        raf_id: Rc<Cell<Option<i32>>>,
    }

    impl FrameLoop {
        fn schedule(self) {
            let Some(window) = web_sys::window() else { return };
            let raf_id = self.raf_id.clone();
            let closure = Closure::once(move |time: f64| self.run(time));
            match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                Ok(id) => raf_id.set(Some(id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
            closure.forget();
        }

        fn run(self, time: f64) {
            self.raf_id.set(None);
            let running = {
                let mut game = self.game.borrow_mut();
                self.driver.borrow_mut().step(&mut *game, time)
            };
            if running {
                self.schedule();
            }
        }

        fn cancel(&self) {
            self.driver.borrow().handle().stop();
            if let (Some(id), Some(window)) = (self.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Hexa Rush starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        set_visible(&document, "loading", false);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height, VIEW_RADIUS).await
                        {
                            Ok(rs) => game.borrow_mut().render_state = Some(rs),
                            Err(e) => log::error!("Failed to create device: {e}"),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {e}"),
                }
            }
            Err(e) => log::error!("Failed to create surface: {e}"),
        }

        // Offer to continue a run left in progress
        let saved = match persistence::load(&PlatformStore::default()) {
            Ok(save) => save,
            Err(e) => {
                log::warn!("Discarding saved game: {e}");
                let _ = persistence::clear(&mut PlatformStore::default());
                None
            }
        };
        if let Some(save) = &saved {
            set_text(&document, "continue-time", &format!("{:.1}", save.state.elapsed));
            set_visible(&document, "continue-prompt", true);
            log::info!("Found saved game at {:.1}s", save.state.elapsed);
        }

        {
            let g = game.borrow();
            g.refresh_leaderboard();
            for (id, field) in SETTING_TOGGLES {
                if let Some(input) = input_element(&document, id) {
                    let mut settings = g.settings.clone();
                    input.set_checked(*field(&mut settings));
                }
            }
        }

        let frame_loop = FrameLoop {
            game: game.clone(),
            driver: Rc::new(RefCell::new(FrameDriver::new())),
            raf_id: Rc::new(Cell::new(None)),
        };

        setup_input_handlers(&document, game.clone());
        setup_score_modal(&document, game.clone());
        setup_settings(&document, game.clone());
        setup_continue_prompt(&document, game.clone(), saved);
        setup_lifecycle(&document, frame_loop.clone());

        set_visible(&document, "hud", true);

        frame_loop.schedule();

        log::info!("Hexa Rush running!");
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        // Keyboard
        if let Some(window) = web_sys::window() {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Typing a name must not steer
                if g.submission_open {
                    return;
                }
                if event.code() == "KeyI" {
                    g.session.autopilot = !g.session.autopilot;
                    log::info!("Autopilot: {}", g.session.autopilot);
                    return;
                }
                if let Some(command) = command_for_key(&event.code()) {
                    event.prevent_default();
                    g.command(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // On-screen controls
        for (id, command) in CONTROL_BUTTONS {
            let game = game.clone();
            on_click(document, id, move |_| game.borrow_mut().command(command));
        }

        {
            let game = game.clone();
            on_click(document, "clear-scores-btn", move |_| {
                let mut g = game.borrow_mut();
                g.session.leaderboard_mut().clear();
                g.refresh_leaderboard();
            });
        }
    }

    fn setup_score_modal(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "submit-score-btn", move |_| {
                let name = current_document()
                    .and_then(|d| input_element(&d, "player-name"))
                    .map(|input| input.value())
                    .unwrap_or_default();
                let mut g = game.borrow_mut();
                match g.session.submit_score(&name) {
                    Some(rank) => log::info!("Score recorded at rank {rank}"),
                    None => log::info!("Score fell off the board"),
                }
                g.refresh_leaderboard();
            });
        }

        on_click(document, "skip-score-btn", move |_| {
            game.borrow_mut().session.dismiss_submission();
        });
    }

    fn setup_settings(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, field) in SETTING_TOGGLES {
            let Some(input) = input_element(document, id) else {
                continue;
            };
            let game = game.clone();
            let target = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                *field(&mut g.settings) = target.checked();
                g.apply_settings();
            });
            let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_continue_prompt(document: &Document, game: Rc<RefCell<Game>>, saved: Option<SaveEnvelope>) {
        let saved = Rc::new(RefCell::new(saved));

        {
            let game = game.clone();
            let saved = saved.clone();
            on_click(document, "continue-btn", move |_| {
                if let Some(save) = saved.borrow_mut().take() {
                    game.borrow_mut().continue_from(save);
                }
                if let Some(document) = current_document() {
                    set_visible(&document, "continue-prompt", false);
                }
            });
        }

        on_click(document, "new-game-btn", move |_| {
            saved.borrow_mut().take();
            let mut g = game.borrow_mut();
            if let Err(e) = persistence::clear(&mut g.store) {
                log::warn!("Failed to clear save: {e}");
            }
            if let Some(document) = current_document() {
                set_visible(&document, "continue-prompt", false);
            }
        });
    }

    fn setup_lifecycle(document: &Document, frame_loop: FrameLoop) {
        let Some(window) = web_sys::window() else { return };

        // Save when the tab is hidden, drop the stale timestamp when it returns
        {
            let frame_loop = frame_loop.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    frame_loop.game.borrow_mut().save_game();
                } else {
                    frame_loop.driver.borrow_mut().reset_clock();
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
            let game = frame_loop.game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let g = game.borrow();
                if g.settings.mute_on_blur {
                    g.audio.borrow().suspend();
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Unmount: save and stop the loop for good
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                frame_loop.game.borrow_mut().save_game();
                frame_loop.cancel();
            });
            let _ =
                window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
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
mod headless {
    use hexa_rush::driver::{Frame, FrameDriver};
    use hexa_rush::platform::MemoryStore;
    use hexa_rush::renderer::build_scene;
    use hexa_rush::sim::{Command, FnSink, GameEvent, GamePhase, GameState};
    use hexa_rush::{LocalLeaderboard, Session};

    /// Autopilot run without a window
    struct Headless {
        session: Session,
        triangles: usize,
    }

    impl Frame for Headless {
        fn update(&mut self, dt: f32) {
            self.session.update(dt);
        }

        fn render(&mut self) {
            self.triangles = build_scene(self.session.state(), true).len() / 3;
        }
    }

    pub fn run(seed: u64, frames: u64) {
        let board = LocalLeaderboard::load(MemoryStore::new());
        let mut session = Session::new(GameState::new(seed), Box::new(board));
        session.autopilot = true;
        session.add_sink(Box::new(FnSink(|event: &GameEvent| match event {
            GameEvent::TimeUpdate(_) | GameEvent::PlayerMove { .. } => {}
            other => log::info!("{other:?}"),
        })));
        session.command(Command::Start);

        let mut frame = Headless {
            session,
            triangles: 0,
        };
        let mut driver = FrameDriver::new();
        let frame_ms = 1000.0 / hexa_rush::consts::REFERENCE_HZ as f64;

        for i in 0..frames {
            driver.step(&mut frame, i as f64 * frame_ms);
            if frame.session.state().phase == GamePhase::GameOver {
                break;
            }
        }

        let state = frame.session.state();
        println!(
            "seed {seed}: {:?} after {} frames, {:.1}s survived, {} rings, {} lives, {} triangles",
            state.phase,
            driver.frames(),
            state.score(),
            state.rings_spawned,
            state.player.lives,
            frame.triangles
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hexa Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| hexa_rush::platform::time::now_ms() as u64);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60);

    headless::run(seed, frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
