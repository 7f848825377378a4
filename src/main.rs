//! Dot Countdown entry point
//!
//! On the web the countdown is driven by `setInterval` and drawn into the
//! `#countdown` element. Natively it fast-forwards a headless run and logs
//! what each second change did.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_clock {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::Window;

    use dot_countdown::Settings;
    use dot_countdown::platform::{BrowserClock, Clock, web};
    use dot_countdown::renderer::DomSurface;
    use dot_countdown::sim::{CountdownState, tick};

    /// Element the dots are drawn into
    const ROOT_ID: &str = "countdown";
    /// Attribute on the root element holding the target (Unix ms)
    const TARGET_ATTR: &str = "data-target";

    struct App {
        state: CountdownState,
        surface: DomSurface,
        clock: BrowserClock,
        interval: Option<i32>,
    }

    impl App {
        fn update(&mut self) {
            let summary = tick(&mut self.state, self.clock.now_ms(), &mut self.surface);
            if summary.built > 0 {
                log::debug!(
                    "Built {} digits, {} retiring, {} particles, {} elements",
                    summary.built,
                    summary.retiring,
                    summary.particles,
                    self.surface.len()
                );
            }
        }

        /// Re-read the page furniture the dots bounce off
        fn load_obstacles(&mut self, window: &Window) {
            let rects = web::obstacles(window, self.surface.root());
            self.state.clear_obstacles();
            for rect in &rects {
                self.state.add_obstacle(*rect);
            }
            log::info!("{} obstacles", rects.len());
        }

        fn resize(&mut self, window: &Window) {
            let viewport = web::viewport(window, self.surface.root());
            self.state.resize(&viewport);
            self.load_obstacles(window);
        }

        fn shutdown(&mut self, window: &Window) {
            if let Some(handle) = self.interval.take() {
                window.clear_interval_with_handle(handle);
            }
            self.state.teardown(&mut self.surface);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Dot Countdown starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let root = document
            .get_element_by_id(ROOT_ID)
            .ok_or("no #countdown element")?;

        let mut settings = Settings::load();
        if let Some(value) = root.get_attribute(TARGET_ATTR) {
            match settings.set_target_from(&value) {
                Ok(()) => {
                    log::info!("Target {} from {}", settings.target_timestamp_ms, TARGET_ATTR);
                    settings.save();
                }
                Err(e) => log::warn!("Ignoring {}: {}", TARGET_ATTR, e),
            }
        }
        let interval_ms = settings.tick_interval_ms as i32;
        let viewport = web::viewport(&window, &root);
        let state = CountdownState::new(settings, &viewport)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let app = Rc::new(RefCell::new(App {
            state,
            surface: DomSurface::new(document, root),
            clock: BrowserClock,
            interval: None,
        }));
        app.borrow_mut().load_obstacles(&window);

        // Tick driver
        {
            let app_tick = app.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                app_tick.borrow_mut().update();
            });
            let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                interval_ms,
            )?;
            closure.forget();
            app.borrow_mut().interval = Some(handle);
        }

        // Resize moves the ground and the cull bounds
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    app.borrow_mut().resize(&window);
                }
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Page going away
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    app.borrow_mut().shutdown(&window);
                }
            });
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        log::info!("Dot Countdown running every {}ms", interval_ms);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = web_clock::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

/// Upper bound on ticks in a headless run (one simulated minute at 30ms)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_TICKS: usize = 2000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dot_countdown::Settings;
    use dot_countdown::platform::{Clock, ManualClock, SystemClock, Viewport};
    use dot_countdown::renderer::RecordingSurface;
    use dot_countdown::sim::{CountdownState, format_remaining, tick};

    env_logger::init();
    log::info!("Dot Countdown (headless) starting...");

    let start = SystemClock.now_ms();
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_from(std::path::Path::new(&path)),
        None => Settings {
            target_timestamp_ms: start + 5000.0,
            ..Settings::default()
        },
    };

    let target = settings.target_timestamp_ms;
    let day_digits = settings.day_digits;
    let interval = settings.tick_interval_ms as f64;
    let mut state = match CountdownState::new(settings, &Viewport::default()) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut clock = ManualClock::new(start);
    let mut surface = RecordingSurface::new();
    for _ in 0..HEADLESS_TICKS {
        let summary = tick(&mut state, clock.now_ms(), &mut surface);
        if summary.built > 0 {
            log::info!(
                "{} | built {} reused {} retiring {} particles {} sprites {} ({} lit)",
                format_remaining(target - clock.now_ms(), day_digits),
                summary.built,
                summary.reused,
                summary.retiring,
                summary.particles,
                surface.len(),
                surface.sprites().filter(|s| s.lit).count()
            );
        }
        if clock.now_ms() >= target && summary.retiring == 0 {
            break;
        }
        clock.advance(interval);
    }

    state.teardown(&mut surface);
    log::info!(
        "Done after {} ticks: {} digits built, {} sprites left",
        state.time_ticks,
        state.digits_built,
        surface.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main
}
