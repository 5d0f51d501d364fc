//! Ring Bloom entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, HtmlCanvasElement};

    use ring_bloom::audio::AudioManager;
    use ring_bloom::platform::{Clock, PerformanceClock};
    use ring_bloom::renderer::CanvasRenderer;
    use ring_bloom::{Settings, Simulation};

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        renderer: CanvasRenderer,
        audio: AudioManager,
        running: bool,
        frame_handle: Option<i32>,
    }

    impl Game {
        /// One animation frame: ticks, sounds, draw
        fn frame(&mut self, now: f64) {
            let Game {
                sim,
                renderer,
                audio,
                ..
            } = self;
            sim.frame(now, renderer, audio);
        }
    }

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
    type Listener = (EventTarget, &'static str, Closure<dyn FnMut(web_sys::Event)>);

    /// Owns the frame loop and the input listeners used to unlock audio
    pub struct WebHost {
        game: Rc<RefCell<Game>>,
        frame_cb: FrameCallback,
        listeners: Vec<Listener>,
    }

    impl WebHost {
        fn new(game: Game) -> Self {
            Self {
                game: Rc::new(RefCell::new(game)),
                frame_cb: Rc::new(RefCell::new(None)),
                listeners: Vec::new(),
            }
        }

        /// Register the frame loop and the audio unlock listeners
        pub fn start(&mut self) {
            if self.game.borrow().running {
                return;
            }
            self.game.borrow_mut().running = true;

            if let Some(window) = web_sys::window() {
                let target: EventTarget = window.into();
                for event in ["click", "touchstart"] {
                    let game = self.game.clone();
                    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                        game.borrow_mut().audio.unlock();
                    });
                    if target
                        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
                        .is_ok()
                    {
                        self.listeners.push((target.clone(), event, closure));
                    }
                }
            }

            let game = self.game.clone();
            let frame_cb = self.frame_cb.clone();
            let clock = PerformanceClock;
            *self.frame_cb.borrow_mut() = Some(Closure::new(move |_time: f64| {
                let mut g = game.borrow_mut();
                if !g.running {
                    return;
                }
                g.frame(clock.now());
                g.frame_handle = request_frame(&frame_cb);
            }));

            let handle = request_frame(&self.frame_cb);
            self.game.borrow_mut().frame_handle = handle;
            log::info!("Ring Bloom running!");
        }

        /// Cancel the frame loop and release the input listeners
        pub fn stop(&mut self) {
            let mut g = self.game.borrow_mut();
            if !g.running {
                return;
            }
            g.running = false;
            if let (Some(window), Some(handle)) = (web_sys::window(), g.frame_handle.take()) {
                let _ = window.cancel_animation_frame(handle);
            }
            g.sim.pause_clock();
            drop(g);

            // Drops the closure and breaks its Rc cycle
            self.frame_cb.borrow_mut().take();
            for (target, event, closure) in self.listeners.drain(..) {
                let _ = target
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
            log::info!("Ring Bloom stopped");
        }
    }

    fn request_frame(frame_cb: &FrameCallback) -> Option<i32> {
        let window = web_sys::window()?;
        let cb = frame_cb.borrow();
        let closure = cb.as_ref()?;
        window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok()
    }

    thread_local! {
        static HOST: RefCell<Option<WebHost>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        // Fails only if a logger is already installed
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Ring Bloom starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element - cannot start");
            return;
        };
        let Some(renderer) = CanvasRenderer::new(canvas) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let game = Game {
            sim: Simulation::new(seed),
            renderer,
            audio: AudioManager::new(&settings),
            running: false,
            frame_handle: None,
        };

        let mut host = WebHost::new(game);
        host.start();
        HOST.with(|h| *h.borrow_mut() = Some(host));
    }

    pub fn start() {
        HOST.with(|h| {
            if let Some(host) = h.borrow_mut().as_mut() {
                host.start();
            }
        });
    }

    pub fn stop() {
        HOST.with(|h| {
            if let Some(host) = h.borrow_mut().as_mut() {
                host.stop();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Resume the frame loop after `stop_game`
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_game() {
    wasm_game::start();
}

/// Stop the frame loop and release input listeners
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_game() {
    wasm_game::stop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use ring_bloom::Snapshot;
    use ring_bloom::platform::Renderer;

    /// Renderer that logs a one-line summary every `every` frames
    pub struct LogRenderer {
        every: u64,
        frames: u64,
    }

    impl LogRenderer {
        pub fn new(every: u64) -> Self {
            Self {
                every: every.max(1),
                frames: 0,
            }
        }
    }

    impl Renderer for LogRenderer {
        fn draw(&mut self, snapshot: &Snapshot<'_>) {
            self.frames += 1;
            if self.frames % self.every != 0 {
                return;
            }
            log::info!(
                "round {} | red {} balls ({} rounds) | blue {} balls ({} rounds) | {:?}",
                snapshot.round,
                snapshot.red_count,
                snapshot.red_score,
                snapshot.blue_count,
                snapshot.blue_score,
                snapshot.phase
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
const USAGE: &str = "usage: ring-bloom [--json] [--realtime] [SETTINGS.json]";

/// Seed used when settings don't pin one, so headless runs are repeatable
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 0x5EED;

/// Simulated time limit for headless runs (seconds)
#[cfg(not(target_arch = "wasm32"))]
const MAX_RUN_SECONDS: f64 = 3600.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ring_bloom::platform::{Clock, LogSound, SystemClock};
    use ring_bloom::{Settings, Simulation};

    env_logger::init();
    log::info!("Ring Bloom (headless) starting...");

    let mut json = false;
    let mut realtime = false;
    let mut settings_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--realtime" => realtime = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return;
            }
            _ if arg.starts_with('-') => {
                eprintln!("unknown option {}\n{}", arg, USAGE);
                std::process::exit(2);
            }
            _ => settings_path = Some(std::path::PathBuf::from(arg)),
        }
    }

    let settings = settings_path
        .map(|path| Settings::load_from(&path))
        .unwrap_or_default();
    let seed = settings.seed.unwrap_or(DEFAULT_SEED);

    let mut sim = Simulation::new(seed);
    let mut renderer = headless::LogRenderer::new(60);
    let mut sound = LogSound;

    if realtime {
        let clock = SystemClock::default();
        while !sim.is_match_over() && clock.now() < MAX_RUN_SECONDS {
            sim.frame(clock.now(), &mut renderer, &mut sound);
            std::thread::sleep(std::time::Duration::from_millis(16));
        }
    } else {
        // Synthetic 60 fps clock: run as fast as the CPU allows
        let mut now = 0.0;
        while !sim.is_match_over() && now < MAX_RUN_SECONDS {
            sim.frame(now, &mut renderer, &mut sound);
            now += 1.0 / 60.0;
        }
    }

    let snapshot = sim.snapshot();
    match snapshot.final_winner {
        Some(team) => log::info!(
            "{} wins {}-{} after {} rounds",
            team.as_str(),
            snapshot.red_score,
            snapshot.blue_score,
            snapshot.round
        ),
        None => log::warn!("Time limit reached without a winner"),
    }

    if json {
        match serde_json::to_string(&snapshot) {
            Ok(out) => println!("{}", out),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
    }
}
