//! Abyss Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};

    use abyss_runner::platform::FrameTicket;
    use abyss_runner::platform::input::suppress_default;
    use abyss_runner::renderer::theme::css;
    use abyss_runner::renderer::{DrawCmd, build_scene};
    use abyss_runner::sim::GamePhase;
    use abyss_runner::{Session, Settings};

    /// Horizontal padding between the container and the canvas
    const CONTAINER_PADDING: f64 = 40.0;

    /// Game instance holding all state
    struct Game {
        session: Session,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        document: Document,
        /// Phase shown by the DOM, to detect transitions
        shown_phase: GamePhase,
    }

    impl Game {
        fn container_width(&self) -> Option<f64> {
            self.document
                .query_selector(".game-container")
                .ok()
                .flatten()
                .map(|el| el.client_width() as f64 - CONTAINER_PADDING)
        }

        fn sync_canvas_size(&self) {
            let viewport = self.session.state().viewport;
            self.canvas.set_width(viewport.width as u32);
            self.canvas.set_height(viewport.height as u32);
        }

        /// Replay the frame's draw list on the 2D context
        fn render(&self, time: f64) {
            let snapshot = self.session.snapshot(time);
            let ctx = &self.ctx;
            ctx.set_font("12px monospace");

            for cmd in build_scene(&snapshot, self.session.settings()) {
                match cmd {
                    DrawCmd::Gradient {
                        x,
                        y,
                        w,
                        h,
                        top,
                        bottom,
                    } => {
                        let gradient = ctx.create_linear_gradient(0.0, y, 0.0, y + h);
                        let _ = gradient.add_color_stop(0.0, &css(top));
                        let _ = gradient.add_color_stop(1.0, &css(bottom));
                        ctx.set_fill_style_canvas_gradient(&gradient);
                        ctx.fill_rect(x, y, w, h);
                    }
                    DrawCmd::FillRect { x, y, w, h, color } => {
                        ctx.set_fill_style_str(&css(color));
                        ctx.fill_rect(x, y, w, h);
                    }
                    DrawCmd::Glow {
                        x,
                        y,
                        w,
                        h,
                        color,
                        blur,
                    } => {
                        let halo = [color[0], color[1], color[2], 0.35];
                        ctx.set_shadow_color(&css(color));
                        ctx.set_shadow_blur(blur);
                        ctx.set_fill_style_str(&css(halo));
                        ctx.fill_rect(x, y, w, h);
                        ctx.set_shadow_blur(0.0);
                    }
                    DrawCmd::Triangle { points, color } => {
                        ctx.set_fill_style_str(&css(color));
                        ctx.begin_path();
                        ctx.move_to(points[0][0], points[0][1]);
                        ctx.line_to(points[1][0], points[1][1]);
                        ctx.line_to(points[2][0], points[2][1]);
                        ctx.close_path();
                        ctx.fill();
                    }
                    DrawCmd::Text { x, y, text, color } => {
                        ctx.set_fill_style_str(&css(color));
                        let _ = ctx.fill_text(&text, x, y);
                    }
                }
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_display(&self, selector: &str, visible: bool) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                let style = if visible { "display: block" } else { "display: none" };
                let _ = el.set_attribute("style", style);
            }
        }

        /// Update HUD elements in DOM
        fn update_dom(&mut self) {
            let hud = self.session.hud();
            self.set_text("checkpoint-count", &hud.artifact_counter());
            self.set_text("game-status", hud.status);
            self.set_text("footer-mode", hud.footer);

            let phase = self.session.phase();
            if phase != self.shown_phase {
                let playing = phase.is_running();
                self.set_display(".start-screen", !playing);
                self.set_display(".game-container", playing);
                self.shown_phase = phase;
            }

            match self.session.notification() {
                Some(note) => {
                    let screen = self.document.query_selector(".checkpoint-screen");
                    if let Some(el) = screen.ok().flatten() {
                        el.set_inner_html(&format!(
                            "<h2>{}</h2><p>{}</p><p>{}</p>",
                            note.headline, note.message, note.detail
                        ));
                    }
                    self.set_display(".checkpoint-screen", true);
                }
                None => self.set_display(".checkpoint-screen", false),
            }
        }
    }

    /// Cancel invalidated requests and ask for the next frame if one is due
    fn pump(game: &Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let mut g = game.borrow_mut();

        for handle in g.session.take_cancelled_handles() {
            let _ = window.cancel_animation_frame(handle);
        }

        if let Some(ticket) = g.session.next_frame_request() {
            let game = game.clone();
            let closure = Closure::once(move |time: f64| {
                game_loop(game, ticket, time);
            });
            match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                Ok(handle) => {
                    g.session.frame_requested(handle);
                    closure.forget();
                }
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    g.session.frame_request_failed();
                }
            }
        }
    }

    fn game_loop(game: Rc<RefCell<Game>>, ticket: FrameTicket, time: f64) {
        {
            let mut g = game.borrow_mut();
            if !g.session.frame(ticket, time) {
                return;
            }
            g.render(time);
            g.update_dom();
        }

        pump(&game);
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let document = game.borrow().document.clone();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    // Container must be visible before it can be measured
                    g.set_display(".start-screen", false);
                    g.set_display(".game-container", true);
                    let width = g.container_width();
                    g.session.start(width);
                    g.sync_canvas_size();
                    g.update_dom();
                }
                pump(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down: controls and commands
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if suppress_default(&key) {
                    event.prevent_default();
                }
                {
                    let mut g = game.borrow_mut();
                    g.session.key_down(&key);
                    g.update_dom();
                }
                pump(&game);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().session.key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize: re-measure and restart the frame loop
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                {
                    let mut g = game.borrow_mut();
                    if !g.session.phase().is_running() {
                        return;
                    }
                    if let Some(width) = g.container_width() {
                        g.session.resize(width);
                        g.sync_canvas_size();
                    }
                }
                pump(&game);
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // No context menu on the canvas
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Abyss Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        // Write back so stored settings pick up newly added keys
        settings.save();
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(settings),
            canvas: canvas.clone(),
            ctx,
            document,
            shown_phase: GamePhase::Ready,
        }));

        {
            let mut g = game.borrow_mut();
            g.sync_canvas_size();
            g.update_dom();
        }

        setup_start_button(game.clone());
        setup_input_handlers(&canvas, game);

        log::info!("Abyss Runner ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use abyss_runner::consts::SIM_DT;
    use clap::Parser;
    use abyss_runner::platform::{Control, InputEvent};
    use abyss_runner::sim::{GamePhase, LevelLayout};
    use abyss_runner::{Session, Settings};

    /// Headless scripted run of the built-in (or a loaded) level
    #[derive(Debug, Parser)]
    #[command(name = "abyss-runner")]
    #[command(about = "Play a level headless with a run-right autopilot")]
    pub struct Options {
        /// Settings JSON file
        #[arg(long)]
        pub settings: Option<PathBuf>,
        /// Level layout JSON file
        #[arg(long)]
        pub level: Option<PathBuf>,
        /// Tick budget before giving up
        #[arg(long, default_value_t = 3600)]
        pub ticks: u32,
        /// Write the effective settings to this file before playing
        #[arg(long)]
        pub write_settings: Option<PathBuf>,
    }

    /// Play the level with a simple autopilot: run right, jump whenever possible
    pub fn run(options: &Options) -> Result<(), String> {
        let settings = options
            .settings
            .as_deref()
            .map(Settings::load_from)
            .unwrap_or_default();

        if let Some(path) = &options.write_settings {
            settings
                .save_to(path)
                .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
        }

        let level = match &options.level {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
                LevelLayout::from_json(&json).map_err(|e| format!("{}: {}", path.display(), e))?
            }
            None => LevelLayout::default(),
        };

        let mut session = Session::with_level(settings, &level);
        session.start(None);
        session.handle_input(InputEvent::KeyDown(Control::MoveRight));
        session.handle_input(InputEvent::KeyDown(Control::JumpSecondary));

        let mut shown = None;
        for i in 0..options.ticks {
            session.step(i as f64 * SIM_DT * 1000.0);

            if let Some(note) = session.notification() {
                if shown.as_ref() != Some(&note.message) {
                    log::info!("{} - {} ({})", note.headline, note.message, note.detail);
                    shown = Some(note.message.clone());
                }
            }

            if session.phase() == GamePhase::Victory {
                log::info!("Victory after {} ticks", i + 1);
                break;
            }
        }

        let summary = serde_json::json!({
            "phase": session.hud().status,
            "ticks": session.state().time_ticks,
            "hud": session.hud(),
            "camera_offset": session.state().camera.offset,
        });
        println!("{}", serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let options = Options::try_parse_from(["abyss-runner"]).unwrap();
            assert_eq!(options.ticks, 3600);
            assert!(options.settings.is_none());
            assert!(options.level.is_none());
        }

        #[test]
        fn test_equals_and_separate_forms() {
            let options = Options::try_parse_from(["abyss-runner", "--ticks=100"]).unwrap();
            assert_eq!(options.ticks, 100);

            let options =
                Options::try_parse_from(["abyss-runner", "--level", "deep.json", "--ticks", "7"])
                    .unwrap();
            assert_eq!(options.level, Some(PathBuf::from("deep.json")));
            assert_eq!(options.ticks, 7);
        }

        #[test]
        fn test_rejects_bad_ticks() {
            assert!(Options::try_parse_from(["abyss-runner", "--ticks", "lots"]).is_err());
            assert!(Options::try_parse_from(["abyss-runner", "--bogus"]).is_err());
        }

        #[test]
        fn test_written_settings_load_back() {
            let dir = tempfile::tempdir().unwrap();
            let source = dir.path().join("in.json");
            let written = dir.path().join("out.json");
            std::fs::write(&source, r#"{ "viewport_width": 960.0, "starfield": false }"#).unwrap();

            let args: Vec<std::ffi::OsString> = vec![
                "abyss-runner".into(),
                "--settings".into(),
                source.clone().into(),
                "--write-settings".into(),
                written.clone().into(),
                "--ticks".into(),
                "1".into(),
            ];
            let options = Options::try_parse_from(args).unwrap();
            run(&options).unwrap();

            let loaded = Settings::load_from(&written);
            assert_eq!(loaded, Settings::load_from(&source));
            assert_eq!(loaded.viewport_width, 960.0);
            assert!(!loaded.starfield);
        }

        #[test]
        fn test_short_run_on_builtin_level() {
            let options = Options::try_parse_from(["abyss-runner", "--ticks", "30"]).unwrap();
            assert!(run(&options).is_ok());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Abyss Runner (native) starting headless run...");
    log::info!("Interactive play needs the web build - run with `trunk serve`");

    let options = headless::Options::parse();
    if let Err(e) = headless::run(&options) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
