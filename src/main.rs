//! Biome Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use biome_dash::Session;
    use biome_dash::audio::AudioManager;
    use biome_dash::persistence::LocalStore;
    use biome_dash::renderer::CanvasPainter;
    use biome_dash::sim::Viewport;

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStore, AudioManager>,
        painter: CanvasPainter,
        /// Cleared on teardown; the loop stops requesting frames
        running: bool,
        /// Browsers only allow audio after a user gesture
        music_started: bool,
    }

    impl Game {
        fn jump(&mut self) {
            if !self.running {
                return;
            }
            if !self.music_started {
                self.session.start();
                self.music_started = true;
            }
            self.session.jump(now_secs());
        }
    }

    /// Monotonic host time in seconds
    fn now_secs() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or_else(|| js_sys::Date::now() / 1000.0)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Biome Dash starting...");

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

        // Backing store at device resolution, simulation in CSS pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        canvas.set_width((client_w as f64 * dpr) as u32);
        canvas.set_height((client_h as f64 * dpr) as u32);

        let painter = CanvasPainter::new(&canvas, dpr).expect("no 2d context");

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(
            Viewport::new(client_w as f32, client_h as f32),
            seed,
            LocalStore::new(),
            AudioManager::new(),
        );
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            painter,
            running: true,
            music_started: false,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_lifecycle(game.clone());

        request_animation_frame(game);

        log::info!("Biome Dash running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Tap / click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                match event.key().as_str() {
                    " " | "ArrowUp" | "Enter" => {
                        event.prevent_default();
                        game.borrow_mut().jump();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.session.pause();
                    log::info!("Paused (tab hidden)");
                } else {
                    g.session.resume();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Page going away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.running {
                    g.running = false;
                    g.session.dispose();
                }
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if !g.running {
                return;
            }
            g.session.frame(time / 1000.0);
            g.painter.draw(&g.session.view());
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
    log::info!("Biome Dash (native) starting...");
    log::info!("Native mode runs a headless autopilot - serve the wasm build to play");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use biome_dash::Session;
    use biome_dash::audio::SilentAudio;
    use biome_dash::persistence::MemoryStore;
    use biome_dash::sim::{GameState, Viewport};

    const FRAME: f64 = 1.0 / 60.0;
    const SIMULATED_SECONDS: f64 = 180.0;
    /// Jump when the supporting platform ends within this distance
    const EDGE_LEAD: f32 = 24.0;

    /// Whether a simple bot would press jump now
    fn wants_jump(state: &GameState) -> bool {
        let player = &state.player;
        let (left, right) = (player.pos.x, player.pos.x + player.size.x);
        let support = state
            .platforms
            .iter()
            .filter(|p| p.pos.x < right && p.right() > left)
            .map(|p| p.right())
            .fold(f32::MIN, f32::max);

        if player.on_ground {
            support - right < EDGE_LEAD
        } else {
            // Falling with nothing below: spend the double jump
            player.vy > 0.0 && player.double_jump && support == f32::MIN
        }
    }

    pub fn run() {
        let seed = rand::random::<u64>();
        let mut session = Session::new(
            Viewport::new(800.0, 600.0),
            seed,
            MemoryStore::new(),
            SilentAudio,
        );
        log::info!("Headless run with seed: {}", seed);
        session.start();

        let mut runs = 0u32;
        let mut now = 0.0;
        while now < SIMULATED_SECONDS {
            if session.state().game_over {
                runs += 1;
                session.jump(now);
            } else if wants_jump(session.state()) {
                session.jump(now);
            }
            session.frame(now);
            now += FRAME;
        }

        let state = session.state();
        println!(
            "Simulated {:.0}s over {} finished run(s): current score {}, best {}",
            SIMULATED_SECONDS,
            runs,
            state.score,
            session.scores().get_best_score()
        );
        session.dispose();
    }
}
