//! Spin Wheel entry point
//!
//! In the browser this wires the roster form, the spin button and the winner
//! modal to the engine and drives it from requestAnimationFrame. Natively it
//! runs a single headless spin.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement,
        HtmlTextAreaElement,
    };

    use spin_wheel::audio::AudioFeedback;
    use spin_wheel::persistence::RosterStore;
    use spin_wheel::renderer::{Framebuffer, WheelRenderState, WheelRenderer};
    use spin_wheel::spin::RngDelta;
    use spin_wheel::{Entrant, Roster, Settings, SpinEngine};

    #[wasm_bindgen(inline_js = "
        export function copy_text(text) {
            if (navigator.clipboard && navigator.clipboard.writeText) {
                navigator.clipboard.writeText(text)
                    .catch(e => console.warn('Clipboard write failed:', e));
                return true;
            }
            return false;
        }
    ")]
    extern "C" {
        fn copy_text(text: &str) -> bool;
    }

    const SPIN_LABEL: &str = "INICIAR SORTEIO";
    const SPINNING_LABEL: &str = "A PROCESSAR...";
    const EMPTY_LIST_LABEL: &str = "A aguardar entrada de dados...";

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn by_id<T: JsCast>(id: &str) -> Option<T> {
        document()?.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = by_id::<Element>(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// App instance holding all state
    struct WheelApp {
        roster: Roster,
        engine: SpinEngine,
        settings: Settings,
        store: RosterStore,
        painter: WheelRenderer,
        wheel: Framebuffer,
        render_state: Option<WheelRenderState>,
        audio: AudioFeedback,
        /// Winner channel of the spin in flight
        pending: Option<oneshot::Receiver<Entrant>>,
        /// Spin clicked; starts on the next frame so it shares the rAF clock
        spin_requested: bool,
        /// Roster changed since the wheel texture was painted
        wheel_dirty: bool,
    }

    impl WheelApp {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let store = RosterStore;
            let mut roster = Roster::new(seed);
            store.load(&mut roster);

            Self {
                engine: SpinEngine::new(RngDelta::seeded(seed.wrapping_add(1)), settings.spin),
                painter: WheelRenderer::from_settings(&settings),
                wheel: Framebuffer::new(settings.wheel_size, settings.wheel_size),
                audio: AudioFeedback::new(&settings),
                roster,
                settings,
                store,
                render_state: None,
                pending: None,
                spin_requested: false,
                wheel_dirty: true,
            }
        }

        fn busy(&self) -> bool {
            self.engine.is_spinning() || self.spin_requested
        }

        fn add_names(&mut self, raw: &str) {
            if self.busy() {
                log::warn!("Roster is locked while the wheel spins");
                return;
            }
            let added = self.roster.add_lines(raw);
            if added > 0 {
                log::info!("Added {} entrants ({} total)", added, self.roster.len());
                self.roster_changed();
            }
        }

        fn remove(&mut self, id: &str) {
            if self.busy() {
                return;
            }
            if self.roster.remove(id) {
                self.roster_changed();
            }
        }

        fn roster_changed(&mut self) {
            self.store.save(self.roster.entrants());
            self.wheel_dirty = true;
            self.render_list();
            self.update_controls();
        }

        fn request_spin(&mut self) {
            if self.busy() || self.roster.is_empty() {
                return;
            }
            self.spin_requested = true;
            self.update_controls();
        }

        fn toggle_audio(&mut self) {
            let enabled = self.settings.toggle_audio();
            self.audio.set_enabled(enabled);
            self.settings.save();
            self.update_audio_button();
        }

        /// Advance, draw and collect the winner for one display refresh
        fn frame(&mut self, now: f64) {
            if self.spin_requested {
                self.spin_requested = false;
                if let Some(receiver) = self.engine.spin(self.roster.entrants(), now) {
                    log::info!("Spinning {} entrants", self.roster.len());
                    self.pending = Some(receiver);
                }
                self.update_controls();
            }

            self.engine.advance(now, &mut self.audio);

            if let Some(render_state) = self.render_state.as_mut() {
                if self.wheel_dirty {
                    self.painter.paint(self.roster.entrants(), &mut self.wheel);
                    render_state.upload_wheel(&self.wheel);
                    self.wheel_dirty = false;
                }
                render_state.set_rotation(self.engine.rotation_degrees());

                match render_state.render() {
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

            self.poll_winner();
        }

        fn poll_winner(&mut self) {
            let Some(receiver) = self.pending.as_mut() else {
                return;
            };
            match receiver.try_recv() {
                Ok(Some(winner)) => {
                    self.pending = None;
                    self.show_winner(&winner.name);
                    self.update_controls();
                }
                Ok(None) => {}
                Err(_) => {
                    log::warn!("Spin ended without a winner");
                    self.pending = None;
                    self.update_controls();
                }
            }
        }

        fn show_winner(&self, name: &str) {
            if let Some(el) = by_id::<Element>("winnerName") {
                el.set_text_content(Some(name));
            }
            set_hidden("winnerModal", false);
        }

        fn update_controls(&self) {
            if let Some(btn) = by_id::<HtmlButtonElement>("spinBtn") {
                let busy = self.busy();
                btn.set_disabled(busy || self.roster.is_empty());
                btn.set_text_content(Some(if busy { SPINNING_LABEL } else { SPIN_LABEL }));
            }
        }

        fn update_audio_button(&self) {
            let enabled = self.audio.is_enabled();
            if let Some(el) = by_id::<Element>("audioStatus") {
                el.set_text_content(Some(if enabled {
                    "ÁUDIO ARCADE ON"
                } else {
                    "ÁUDIO ARCADE OFF"
                }));
            }
            if let Some(el) = by_id::<Element>("audioIcon") {
                el.set_text_content(Some(if enabled { "🔊" } else { "🔇" }));
            }
            if let Some(btn) = by_id::<Element>("toggleAudio") {
                let _ = btn.class_list().toggle_with_force("muted", !enabled);
            }
        }

        /// Rebuild the roster list. Names go in as text, never as markup.
        fn render_list(&self) {
            let (Some(document), Some(list)) = (document(), by_id::<Element>("nameList")) else {
                return;
            };
            list.set_inner_html("");

            if self.roster.is_empty() {
                if let Ok(placeholder) = document.create_element("div") {
                    placeholder.set_class_name("empty-state");
                    placeholder.set_text_content(Some(EMPTY_LIST_LABEL));
                    let _ = list.append_child(&placeholder);
                }
                return;
            }

            for entrant in self.roster.entrants() {
                let (Ok(row), Ok(name), Ok(remove)) = (
                    document.create_element("div"),
                    document.create_element("span"),
                    document.create_element("button"),
                ) else {
                    continue;
                };
                row.set_class_name("entrant");
                name.set_class_name("entrant-name");
                name.set_text_content(Some(&entrant.name));
                remove.set_class_name("entrant-remove");
                remove.set_text_content(Some("✕"));
                let _ = remove.set_attribute("data-id", &entrant.id);
                let _ = remove.set_attribute("aria-label", "Remover");
                let _ = row.append_child(&name);
                let _ = row.append_child(&remove);
                let _ = list.append_child(&row);
            }
        }
    }

    /// Size the canvas backing store to its CSS box times the pixel ratio
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Spin Wheel starting...");

        let canvas: HtmlCanvasElement =
            by_id("wheel").ok_or_else(|| JsValue::from_str("no #wheel canvas"))?;
        let (width, height) = fit_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(WheelApp::new(seed)));
        log::info!("Wheel initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let wheel_size = app.borrow().settings.wheel_size;
        let render_state = WheelRenderState::new(surface, &adapter, width, height, wheel_size)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;
        app.borrow_mut().render_state = Some(render_state);

        {
            let app = app.borrow();
            app.render_list();
            app.update_controls();
            app.update_audio_button();
        }

        setup_name_form(app.clone());
        setup_name_list(app.clone());
        setup_spin_button(app.clone());
        setup_audio_toggle(app.clone());
        setup_share_button(app.clone());
        setup_winner_modal();
        setup_resize(canvas, app.clone());

        request_animation_frame(app);

        log::info!("Spin Wheel running!");
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<WheelApp>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<WheelApp>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }

    fn setup_name_form(app: Rc<RefCell<WheelApp>>) {
        let Some(form) = by_id::<Element>("nameForm") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::SubmitEvent| {
            event.prevent_default();
            let Some(input) = by_id::<HtmlTextAreaElement>("nameInput") else {
                return;
            };
            let mut app = app.borrow_mut();
            app.audio.resume();
            if app.busy() {
                return;
            }
            app.add_names(&input.value());
            input.set_value("");
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One delegated listener for every remove button in the list
    fn setup_name_list(app: Rc<RefCell<WheelApp>>) {
        let Some(list) = by_id::<Element>("nameList") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let id = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-id]").ok().flatten())
                .and_then(|el| el.get_attribute("data-id"));
            if let Some(id) = id {
                app.borrow_mut().remove(&id);
            }
        });
        let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_spin_button(app: Rc<RefCell<WheelApp>>) {
        let Some(btn) = by_id::<Element>("spinBtn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut app = app.borrow_mut();
            app.audio.resume();
            app.request_spin();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_audio_toggle(app: Rc<RefCell<WheelApp>>) {
        let Some(btn) = by_id::<Element>("toggleAudio") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut app = app.borrow_mut();
            app.audio.resume();
            app.toggle_audio();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_share_button(app: Rc<RefCell<WheelApp>>) {
        let Some(btn) = by_id::<HtmlButtonElement>("copyBtn") else {
            return;
        };
        let button = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let app = app.borrow();
            let Some(url) = app.store.share_url(app.roster.entrants()) else {
                return;
            };

            // Always expose the link so it can be copied by hand
            if let Some(field) = by_id::<HtmlInputElement>("shareLink") {
                field.set_value(&url);
                field.select();
            }
            if !copy_text(&url) {
                log::warn!("Clipboard unavailable, link left in the share field");
                return;
            }

            let original = button.text_content().unwrap_or_default();
            button.set_text_content(Some("LINK COPIADO!"));
            let restore_btn = button.clone();
            let restore = Closure::once(move || {
                restore_btn.set_text_content(Some(&original));
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    restore.as_ref().unchecked_ref(),
                    2000,
                );
            }
            restore.forget();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_winner_modal() {
        let Some(btn) = by_id::<Element>("closeModal") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            set_hidden("winnerModal", true);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<WheelApp>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&canvas);
            if let Some(render_state) = app.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless single spin
#[cfg(not(target_arch = "wasm32"))]
mod native_demo {
    use std::path::PathBuf;

    use clap::Parser;
    use spin_wheel::feedback::Tee;
    use spin_wheel::persistence::decode_names;
    use spin_wheel::renderer::{Framebuffer, WheelRenderer, colors};
    use spin_wheel::spin::{FixedRateClock, run_until_idle};
    use spin_wheel::{LogFeedback, Roster, Settings, SpinEngine, SpinEvent};

    /// Names used when none are given
    const DEMO_NAMES: [&str; 3] = ["Ana", "Bruno", "Carla"];

    /// Spin a wheel once and print the winner
    #[derive(Parser, Debug, PartialEq)]
    #[command(name = "spin-wheel")]
    #[command(version, about = "Spin a prize wheel once and print the winner", long_about = None)]
    pub struct DemoArgs {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Write the stopped wheel to this file as a binary PPM
        #[arg(long)]
        pub snapshot: Option<PathBuf>,

        /// Entrant names; comma-separated lists are split
        pub names: Vec<String>,
    }

    pub fn run(args: DemoArgs) -> Result<(), String> {
        let seed = args.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });
        let settings = Settings::load();

        let mut roster = Roster::new(seed);
        for arg in &args.names {
            decode_names(arg, &mut roster);
        }
        if roster.is_empty() {
            for name in DEMO_NAMES {
                roster.add(name);
            }
        }
        log::info!("Spinning {} entrants with seed {}", roster.len(), seed);

        let mut engine = SpinEngine::seeded(seed);
        engine.set_tuning(settings.spin);

        let mut clock = FixedRateClock::from_hz(0.0, 60.0);
        let mut receiver = engine
            .spin(roster.entrants(), clock.peek())
            .ok_or("engine refused to spin")?;

        let mut feedback = Tee(LogFeedback::new(), Vec::<SpinEvent>::new());
        let frames = run_until_idle(&mut engine, &mut clock, &mut feedback);

        let winner = receiver
            .try_recv()
            .map_err(|_| "spin finished without a winner".to_string())?
            .ok_or("spin did not finish")?;
        let crossings = feedback
            .1
            .iter()
            .filter(|event| matches!(event, SpinEvent::SegmentCrossed { .. }))
            .count();
        log::info!(
            "Stopped at {:.1} degrees after {} frames and {} segment crossings",
            engine.rotation_degrees(),
            frames,
            crossings
        );
        println!("Winner: {}", winner.name);

        if let Some(path) = args.snapshot {
            let mut wheel = Framebuffer::new(settings.wheel_size, settings.wheel_size);
            WheelRenderer::from_settings(&settings).paint(roster.entrants(), &mut wheel);
            let frame = wheel.rotated(engine.rotation_degrees() as f32);
            std::fs::write(&path, frame.to_ppm(colors::BACKGROUND))
                .map_err(|e| format!("could not write {}: {}", path.display(), e))?;
            log::info!("Snapshot written to {}", path.display());
        }

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(list: &[&str]) -> Result<DemoArgs, clap::Error> {
            DemoArgs::try_parse_from(std::iter::once("spin-wheel").chain(list.iter().copied()))
        }

        #[test]
        fn test_parse_names_and_flags() {
            let parsed = parse(&["--seed", "42", "Ana", "--snapshot", "w.ppm", "Bruno"]).unwrap();
            assert_eq!(parsed.seed, Some(42));
            assert_eq!(parsed.snapshot, Some(PathBuf::from("w.ppm")));
            assert_eq!(parsed.names, vec!["Ana", "Bruno"]);
        }

        #[test]
        fn test_parse_equals_and_separator_forms() {
            let parsed = parse(&["--seed=5", "Ana"]).unwrap();
            assert_eq!(parsed.seed, Some(5));
            assert_eq!(parsed.names, vec!["Ana"]);

            let parsed = parse(&["--", "--Zed"]).unwrap();
            assert_eq!(parsed.seed, None);
            assert_eq!(parsed.names, vec!["--Zed"]);
        }

        #[test]
        fn test_parse_rejects_bad_input() {
            assert!(parse(&["--seed"]).is_err());
            assert!(parse(&["--seed", "abc"]).is_err());
            assert!(parse(&["--verbose"]).is_err());
        }

        #[test]
        fn test_seeded_run_completes() {
            let parsed = parse(&["--seed", "7", "Ana,Bruno", "Carla"]).unwrap();
            assert!(run(parsed).is_ok());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = native_demo::DemoArgs::parse();
    log::info!("Spin Wheel (native) starting...");

    match native_demo::run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            std::process::ExitCode::FAILURE
        }
    }
}
