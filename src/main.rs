//! Cabin Runner entry point
//!
//! In the browser this mounts the secret area (puzzle, reveal, runner) and
//! drives it from `requestAnimationFrame`. Natively it plays a short
//! headless demo so the simulation can be watched through the log.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use cabin_runner::consts::*;
    use cabin_runner::gate::{
        PuzzleEvent, RevealSequencer, Screen, ScreenFlow, TILE_FRONT, UnlockPuzzle, Verdict,
    };
    use cabin_runner::i18n::{Catalog, Locale, TextKey, TextSource};
    use cabin_runner::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use cabin_runner::platform::{self, InputModality};
    use cabin_runner::renderer::{self, Align, FrameView, RenderState, TextLine, VertexSurface};
    use cabin_runner::tuning::{PuzzleTuning, RevealTuning, RunnerTuning};
    use cabin_runner::{Runner, Settings};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    type Store = Box<dyn KeyValueStore>;

    /// Browser storage, or a throwaway map when it is blocked
    fn open_store() -> Store {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; nothing will persist this visit", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    /// Everything the secret page owns
    struct App {
        document: Document,
        flow: ScreenFlow,
        puzzle: UnlockPuzzle,
        reveal: RevealSequencer,
        runner: Option<Runner<Store, Pcg32>>,
        render_state: Option<RenderState>,
        surface: VertexSurface,
        overlay: Vec<TextLine>,
        settings: Settings,
        catalog: Catalog,
        modality: InputModality,
        last_time: f64,
        press: bool,
        raf_handle: Option<i32>,
    }

    impl App {
        fn new(document: Document) -> Self {
            let settings = Settings::load(&open_store());
            Self {
                document,
                flow: ScreenFlow::new(),
                puzzle: UnlockPuzzle::new(PuzzleTuning::default()),
                reveal: RevealSequencer::new(RevealTuning::default()),
                runner: None,
                render_state: None,
                surface: VertexSurface::new(),
                overlay: Vec::new(),
                settings,
                catalog: Catalog::new(settings.locale),
                modality: InputModality::detect(),
                last_time: 0.0,
                press: false,
                raf_handle: None,
            }
        }

        fn element(&self, id: &str) -> Option<Element> {
            self.document.get_element_by_id(id)
        }

        fn set_text(&self, id: &str, key: TextKey) {
            if let Some(el) = self.element(id) {
                el.set_text_content(Some(self.catalog.text(key)));
            }
        }

        fn set_class(&self, id: &str, class: &str, on: bool) {
            if let Some(el) = self.element(id) {
                let list = el.class_list();
                let _ = if on { list.add_1(class) } else { list.remove_1(class) };
            }
        }

        /// Fill every static label in the current language
        fn apply_locale(&mut self) {
            self.catalog = Catalog::new(self.settings.locale);
            self.set_text("puzzle-title", TextKey::PasswordTitle);
            self.set_text("puzzle-submit", TextKey::Submit);
            self.set_text("puzzle-hint", TextKey::Hint);
            self.set_text("reveal-start", TextKey::RevealStart);
            self.set_text("game-title", TextKey::GameTitle);
            self.set_text("back-link", TextKey::Back);
            if let Some(el) = self.element("lang-toggle") {
                let other = match self.settings.locale {
                    Locale::En => "ES",
                    Locale::Es => "EN",
                };
                el.set_text_content(Some(other));
            }
            self.sync_puzzle();
            self.sync_reveal();
            self.overlay.clear();
        }

        fn toggle_locale(&mut self) {
            self.settings.locale = match self.settings.locale {
                Locale::En => Locale::Es,
                Locale::Es => Locale::En,
            };
            self.settings.save(&mut open_store());
            log::info!("Language set to {}", self.settings.locale.as_tag());
            self.apply_locale();
        }

        fn show_screen(&self, screen: Screen) {
            self.set_class("puzzle-screen", "hidden", screen != Screen::Puzzle);
            self.set_class("reveal-screen", "hidden", screen != Screen::Reveal);
            self.set_class("game-screen", "hidden", screen != Screen::Game);
        }

        // === Puzzle ===

        fn sync_puzzle(&self) {
            for cell in self.puzzle.cells() {
                self.set_class(&format!("cell-{}", cell), "selected", self.puzzle.is_selected(cell));
            }
            self.set_class("puzzle-grid", "shake", self.puzzle.is_shaking());
            self.set_class("puzzle-screen", "flash", self.puzzle.is_flashing());
            if let Some(el) = self.element("puzzle-denied") {
                let text = if self.puzzle.is_denied() {
                    self.catalog.text(TextKey::Denied)
                } else {
                    ""
                };
                el.set_text_content(Some(text));
            }
        }

        fn toggle_cell(&mut self, cell: u8) {
            if self.puzzle.toggle(cell).is_some() {
                self.sync_puzzle();
            }
        }

        fn submit(&mut self) {
            if self.puzzle.submit(platform::now_ms()) != Verdict::Ignored {
                self.sync_puzzle();
            }
        }

        // === Reveal ===

        fn sync_reveal(&self) {
            for index in 0..self.reveal.tile_count() {
                self.set_class(&format!("tile-{}", index), "flipped", self.reveal.is_flipped(index));
            }
            let status = if self.reveal.is_complete() {
                TextKey::RevealComplete
            } else {
                TextKey::RevealLoading
            };
            self.set_text("reveal-status", status);
            self.set_class("reveal-grid", "glow", self.reveal.is_complete());
            if let Some(el) = self.element("reveal-start") {
                let _ = if self.reveal.is_start_enabled() {
                    el.remove_attribute("disabled")
                } else {
                    el.set_attribute("disabled", "")
                };
            }
        }

        fn start_game(&mut self) {
            if !self.reveal.start() {
                return;
            }
            if let Some(screen) = self.flow.revealed() {
                self.reveal.teardown();
                self.show_screen(screen);
                let seed = js_sys::Date::now() as u64;
                self.runner = Some(Runner::new(
                    RunnerTuning::default(),
                    open_store(),
                    Pcg32::seed_from_u64(seed),
                ));
                self.last_time = 0.0;
                self.press = false;
                log::info!("Runner mounted with seed {}", seed);
            }
        }

        // === Frame ===

        fn frame(&mut self, time: f64) {
            match self.flow.screen() {
                Screen::Puzzle => {
                    let events = self.puzzle.update(time);
                    if events.is_empty() {
                        return;
                    }
                    if events.contains(&PuzzleEvent::Unlocked) {
                        if let Some(screen) = self.flow.unlocked() {
                            self.puzzle.teardown();
                            self.show_screen(screen);
                            self.reveal.activate(time);
                            return;
                        }
                    }
                    self.sync_puzzle();
                }
                Screen::Reveal => {
                    if !self.reveal.update(time).is_empty() {
                        self.sync_reveal();
                    }
                }
                Screen::Game => self.frame_game(time),
                Screen::Left => {}
            }
        }

        fn frame_game(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                FIRST_FRAME_DT
            };
            self.last_time = time;

            let Some(runner) = self.runner.as_mut() else {
                return;
            };
            runner.frame(dt, std::mem::take(&mut self.press));

            self.surface.clear();
            let view = FrameView {
                modality: self.modality,
                text: &self.catalog,
            };
            renderer::render(runner.state(), &view, &mut self.surface);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.surface.vertices) {
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
            self.update_overlay();
        }

        /// Mirror the scene's text lines into the DOM overlay
        fn update_overlay(&mut self) {
            if self.surface.text == self.overlay {
                return;
            }
            let Some(root) = self.element("overlay") else {
                return;
            };
            root.set_inner_html("");
            for line in &self.surface.text {
                let Ok(el) = self.document.create_element("div") else {
                    continue;
                };
                let shift = match line.align {
                    Align::Left => "0",
                    Align::Center => "-50%",
                    Align::Right => "-100%",
                };
                let [r, g, b, a] = line.color;
                let style = format!(
                    "left:{}%;top:{}%;font-size:{}cqw;color:rgba({},{},{},{});transform:translate({},-100%)",
                    line.pos.x / CANVAS_W * 100.0,
                    line.pos.y / CANVAS_H * 100.0,
                    line.size / CANVAS_W * 100.0,
                    (r * 255.0) as u8,
                    (g * 255.0) as u8,
                    (b * 255.0) as u8,
                    a,
                    shift,
                );
                let _ = el.set_attribute("class", "overlay-line");
                let _ = el.set_attribute("style", &style);
                el.set_text_content(Some(&line.text));
                let _ = root.append_child(&el);
            }
            self.overlay = self.surface.text.clone();
        }

        /// Leave the secret page: stop every timer and the frame loop
        fn leave(&mut self) {
            if self.flow.leave().is_none() {
                return;
            }
            self.puzzle.teardown();
            self.reveal.teardown();
            if let Some(runner) = self.runner.as_mut() {
                runner.teardown();
            }
            if let (Some(handle), Some(window)) = (self.raf_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
            log::info!("Left the secret page");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Cabin Runner starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document; nothing to mount");
            return;
        };

        let app = Rc::new(RefCell::new(App::new(document.clone())));
        {
            let mut a = app.borrow_mut();
            build_puzzle_grid(&a);
            build_reveal_grid(&a);
            a.apply_locale();
            a.show_screen(Screen::Puzzle);
            if let Some(el) = a.element("loading") {
                let _ = el.set_attribute("class", "hidden");
            }
        }

        let canvas = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        match canvas {
            Some(canvas) => {
                canvas.set_width(CANVAS_W as u32);
                canvas.set_height(CANVAS_H as u32);
                match init_gpu(&canvas).await {
                    Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
                    Err(e) => log::error!("WebGPU unavailable, runner will not draw: {}", e),
                }
                setup_game_input(&canvas, app.clone());
            }
            None => log::error!("No #canvas element; runner disabled"),
        }

        setup_gate_input(app.clone());
        setup_back_link(app.clone());

        request_animation_frame(app);

        log::info!("Cabin Runner running!");
    }

    async fn init_gpu(canvas: &HtmlCanvasElement) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, CANVAS_W as u32, CANVAS_H as u32)
            .await
            .map_err(|e| e.to_string())
    }

    /// One button per cell, numbered row by row from 1
    fn build_puzzle_grid(app: &App) {
        let Some(grid) = app.element("puzzle-grid") else {
            return;
        };
        for cell in app.puzzle.cells() {
            let Ok(button) = app.document.create_element("button") else {
                continue;
            };
            let _ = button.set_attribute("id", &format!("cell-{}", cell));
            let _ = button.set_attribute("class", "cell");
            let _ = button.set_attribute("data-cell", &cell.to_string());
            button.set_text_content(Some(&UnlockPuzzle::cell_label(cell)));
            let _ = grid.append_child(&button);
        }
    }

    /// Tiles whose back face shows one slice of the character image
    fn build_reveal_grid(app: &App) {
        let Some(grid) = app.element("reveal-grid") else {
            return;
        };
        let tuning = app.reveal.tuning();
        for index in 0..app.reveal.tile_count() {
            let slice = app.reveal.tile(index);
            let (Ok(tile), Ok(front), Ok(back), Ok(img)) = (
                app.document.create_element("div"),
                app.document.create_element("div"),
                app.document.create_element("div"),
                app.document.create_element("img"),
            ) else {
                continue;
            };
            let _ = tile.set_attribute("id", &format!("tile-{}", index));
            let _ = tile.set_attribute("class", "tile");
            let _ = tile.set_attribute(
                "style",
                &format!("width:{}px;height:{}px", slice.width, slice.height),
            );
            let _ = front.set_attribute("class", "tile-front");
            front.set_text_content(Some(TILE_FRONT));
            let _ = back.set_attribute("class", "tile-back");
            let _ = img.set_attribute("src", "character.png");
            let _ = img.set_attribute("alt", "");
            let _ = img.set_attribute(
                "style",
                &format!(
                    "width:{}px;height:{}px;left:{}px;top:{}px",
                    tuning.asset_width, tuning.asset_height, slice.offset_x, slice.offset_y
                ),
            );
            let _ = back.append_child(&img);
            let _ = tile.append_child(&front);
            let _ = tile.append_child(&back);
            let _ = grid.append_child(&tile);
        }
    }

    /// Walk from the event target to the root, collecting tag names
    fn ancestor_tags(event: &web_sys::Event) -> Vec<String> {
        let mut tags = Vec::new();
        let mut node = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok());
        while let Some(el) = node {
            tags.push(el.tag_name());
            node = el.parent_element();
        }
        tags
    }

    fn setup_game_input(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Keyboard
        if let Some(window) = web_sys::window() {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if a.flow.screen() == Screen::Game && platform::is_jump_key(&event.code()) {
                    event.prevent_default();
                    a.press = true;
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start; not passive so the page does not scroll or zoom
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let tags = ancestor_tags(&event);
                if !platform::is_press_target(tags.iter().map(String::as_str)) {
                    return;
                }
                event.prevent_default();
                app.borrow_mut().press = true;
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().press = true;
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_gate_input(app: Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();

        // Cell toggles, delegated from the grid
        if let Some(grid) = document.get_element_by_id("puzzle-grid") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let cell = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.get_attribute("data-cell"))
                    .and_then(|v| v.parse::<u8>().ok());
                if let Some(cell) = cell {
                    app.borrow_mut().toggle_cell(cell);
                }
            });
            let _ = grid.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("puzzle-submit") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().submit();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reveal-start") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().start_game();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("lang-toggle") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().toggle_locale();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// The link navigates away on its own; we only tear down first
    fn setup_back_link(app: Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();
        if let Some(link) = document.get_element_by_id("back-link") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().leave();
            });
            let _ = link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle_app = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        if let Ok(handle) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            handle_app.borrow_mut().raf_handle = Some(handle);
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.raf_handle = None;
            if a.flow.screen() == Screen::Left {
                return;
            }
            a.frame(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cabin Runner (native) starting...");
    log::info!("The page itself needs a browser - build for wasm32 and serve index.html");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless walk through the gate and a few auto-played runs
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use cabin_runner::consts::FIRST_FRAME_DT;
    use cabin_runner::gate::{PuzzleEvent, RevealEvent, RevealSequencer, ScreenFlow, UnlockPuzzle};
    use cabin_runner::i18n::{Catalog, Locale};
    use cabin_runner::persistence::FileStore;
    use cabin_runner::platform::InputModality;
    use cabin_runner::renderer::{FrameView, VertexSurface, render};
    use cabin_runner::sim::{Mode, RunnerEvent};
    use cabin_runner::tuning::{PuzzleTuning, RevealTuning, RunnerTuning};
    use cabin_runner::{Runner, Settings};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Runs to auto-play
    const RUNS: usize = 3;
    /// Frames before an unfinished run is abandoned
    const MAX_FRAMES: usize = 60 * 120;
    /// Distance to an obstacle at which the bot jumps
    const JUMP_DISTANCE: f32 = 40.0;

    pub fn run() {
        let path = std::env::var("CABIN_RUNNER_STORE")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("cabin-runner.json"));
        let mut store = FileStore::open(&path);
        log::info!("Using store {}", store.path().display());
        let settings = Settings::load(&store);
        settings.save(&mut store);

        let mut flow = ScreenFlow::new();
        let mut clock = 0.0;

        // Gate: the known answer, then the reveal
        let tuning = PuzzleTuning::default();
        let mut puzzle = UnlockPuzzle::new(tuning.clone());
        for &cell in &tuning.secret {
            puzzle.toggle(cell);
        }
        puzzle.submit(clock);
        while !puzzle.update(clock).contains(&PuzzleEvent::Unlocked) {
            clock += 1000.0 / 60.0;
        }
        flow.unlocked();
        log::info!("Puzzle unlocked at {:.0} ms", clock);

        let mut reveal = RevealSequencer::new(RevealTuning::default());
        reveal.activate(clock);
        while !reveal.is_start_enabled() {
            clock += 1000.0 / 60.0;
            for event in reveal.update(clock) {
                if event == RevealEvent::Completed {
                    log::info!("Reveal complete at {:.0} ms", clock);
                }
            }
        }
        reveal.start();
        flow.revealed();

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut runner = Runner::new(RunnerTuning::default(), store, Pcg32::seed_from_u64(seed));
        let catalog = Catalog::new(Locale::En);
        let mut surface = VertexSurface::new();
        log::info!("Runner seeded with {} (best {})", seed, runner.high_scores().best());

        for run in 1..=RUNS {
            let mut press = true;
            for _ in 0..MAX_FRAMES {
                let events = runner.frame(FIRST_FRAME_DT, press);
                press = should_jump(&runner);
                if let Some(RunnerEvent::GameOver { score, .. }) = events
                    .iter()
                    .find(|e| matches!(e, RunnerEvent::GameOver { .. }))
                {
                    log::info!("Run {} ended with {}", run, score);
                    break;
                }
            }
            if runner.mode() == Mode::Playing {
                log::info!("Run {} still going, moving on", run);
            }
        }

        surface.clear();
        let view = FrameView {
            modality: InputModality::detect(),
            text: &catalog,
        };
        render(runner.state(), &view, &mut surface);
        for line in &surface.text {
            log::info!("{}", line.text);
        }
        log::debug!("Last frame: {} vertices", surface.vertices.len());

        runner.teardown();
        flow.leave();
    }

    /// Jump when the nearest obstacle ahead is close and we are grounded
    fn should_jump<S: cabin_runner::persistence::KeyValueStore, R: rand::Rng>(
        runner: &Runner<S, R>,
    ) -> bool {
        let state = runner.state();
        if state.mode != Mode::Playing || !state.on_ground() {
            return false;
        }
        let px = state.player.pos.x + state.tuning().player_w;
        state
            .obstacles
            .iter()
            .any(|o| o.x > px - 4.0 && o.x - px < JUMP_DISTANCE + state.game_speed * 4.0)
    }
}
