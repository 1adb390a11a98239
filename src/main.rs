//! Lottery Wheel entry point
//!
//! Browser: wires DOM events and timers to a [`Lottery`].
//! Native: a small terminal front end over file-backed storage.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, BeforeUnloadEvent, Document, Element, ErrorEvent, Event,
        EventTarget, HtmlElement, HtmlMetaElement, VisibilityState,
    };

    use lottery_wheel::Lottery;
    use lottery_wheel::platform::web::{DomDisplay, LocalStorage, seed, set_timeout};
    use lottery_wheel::settings::Settings;
    use lottery_wheel::wheel::reference_options;

    type WebLottery = Lottery<LocalStorage, DomDisplay, Pcg32>;

    const VIEWPORT: &str =
        "width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no";
    /// Touches inside these never scroll or zoom the page
    const TOUCH_LOCKED: &str = ".wheel-wrapper, .spin-button, .clear-button";

    /// Attach a listener for the page's lifetime
    fn listen(target: &EventTarget, name: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        if target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not listen for {}", name);
        }
        closure.forget();
    }

    pub fn start() {
        console_error_panic_hook::set_once();
        // Already initialized on hot reload
        let _ = console_log::init_with_level(log::Level::Info);

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, nothing to do");
            return;
        };

        if document.ready_state() == "loading" {
            let closure = Closure::once_into_js(run);
            let _ = document
                .add_event_listener_with_callback("DOMContentLoaded", closure.unchecked_ref());
        } else {
            run();
        }
    }

    fn run() {
        log::info!("Lottery wheel starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let settings = Settings::load(&LocalStorage::open());
        let double_tap_ms = settings.double_tap_window_ms;

        let display = match DomDisplay::from_document(window.clone(), document.clone()) {
            Ok(d) => d,
            Err(e) => {
                log::error!("Page is missing wheel elements: {}", e);
                return;
            }
        };
        let options = reference_options();
        display.paint_wheel(&options);

        let rng = Pcg32::seed_from_u64(seed());
        let lottery = match Lottery::new(settings, options, LocalStorage::open(), display, rng) {
            Ok(l) => Rc::new(RefCell::new(l)),
            Err(e) => {
                log::error!("Invalid wheel configuration: {}", e);
                return;
            }
        };

        setup_spin_button(&document, lottery.clone());
        setup_clear_button(&document, lottery.clone());
        setup_touch_guards(&document, double_tap_ms);
        setup_visibility(&document, lottery.clone());
        setup_error_hook(&window);
        setup_leave_warning(&window, lottery);

        log::info!("Lottery wheel ready");
    }

    fn spin(lottery: &Rc<RefCell<WebLottery>>) {
        let Some(spin) = lottery.borrow_mut().spin() else {
            return;
        };
        let lottery = lottery.clone();
        set_timeout(spin.duration_ms, move || {
            lottery.borrow_mut().finish_spin();
        });
    }

    /// Click and tap both trigger; touchstart is swallowed so no ghost click follows
    fn bind_trigger(button: &HtmlElement, action: impl Fn() + 'static) {
        let action = Rc::new(action);
        {
            let action = action.clone();
            listen(button, "click", move |_| action());
        }
        listen(button, "touchend", move |event| {
            event.prevent_default();
            action();
        });
        listen(button, "touchstart", |event| event.prevent_default());
        add_touch_feedback(button);
    }

    fn add_touch_feedback(element: &HtmlElement) {
        {
            let el = element.clone();
            listen(element, "touchstart", move |_| {
                let style = el.style();
                let _ = style.set_property("transform", "scale(0.95)");
                let _ = style.set_property("transition", "transform 0.1s ease");
            });
        }
        for name in ["touchend", "touchcancel"] {
            let el = element.clone();
            listen(element, name, move |_| {
                let _ = el.style().set_property("transform", "scale(1)");
            });
        }
    }

    fn find_button(document: &Document, id: &str) -> Option<HtmlElement> {
        let el = document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok();
        if el.is_none() {
            log::warn!("#{} not found", id);
        }
        el
    }

    fn setup_spin_button(document: &Document, lottery: Rc<RefCell<WebLottery>>) {
        if let Some(btn) = find_button(document, "spinBtn") {
            bind_trigger(&btn, move || spin(&lottery));
        }
    }

    fn setup_clear_button(document: &Document, lottery: Rc<RefCell<WebLottery>>) {
        if let Some(btn) = find_button(document, "clearHistory") {
            bind_trigger(&btn, move || {
                lottery.borrow_mut().clear_history();
            });
        }
    }

    fn setup_touch_guards(document: &Document, double_tap_ms: u32) {
        // Scrolling/pinching over the wheel and buttons (must be non-passive)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let locked = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(TOUCH_LOCKED).ok().flatten())
                    .is_some();
                if locked {
                    event.prevent_default();
                }
            });
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Double-tap zoom
        {
            let last_touch_end = Cell::new(0.0f64);
            listen(document, "touchend", move |event| {
                let now = js_sys::Date::now();
                if now - last_touch_end.get() <= double_tap_ms as f64 {
                    event.prevent_default();
                }
                last_touch_end.set(now);
            });
        }

        // iOS Safari pinch zoom
        listen(document, "gesturestart", |event| event.prevent_default());

        // Viewport without user scaling
        let viewport = document
            .query_selector("meta[name=\"viewport\"]")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlMetaElement>().ok())
            .or_else(|| {
                let meta = document
                    .create_element("meta")
                    .ok()?
                    .dyn_into::<HtmlMetaElement>()
                    .ok()?;
                meta.set_name("viewport");
                document.head()?.append_child(&meta).ok()?;
                Some(meta)
            });
        match viewport {
            Some(meta) => meta.set_content(VIEWPORT),
            None => log::warn!("Could not set viewport meta tag"),
        }
    }

    fn setup_visibility(document: &Document, lottery: Rc<RefCell<WebLottery>>) {
        let doc = document.clone();
        listen(document, "visibilitychange", move |_| {
            let hidden = doc.visibility_state() == VisibilityState::Hidden;
            lottery.borrow_mut().set_hidden(hidden);
        });
    }

    fn setup_error_hook(window: &web_sys::Window) {
        listen(window, "error", |event| {
            match event.dyn_ref::<ErrorEvent>() {
                Some(e) => log::error!(
                    "Uncaught error: {} ({}:{}:{})",
                    e.message(),
                    e.filename(),
                    e.lineno(),
                    e.colno()
                ),
                None => log::error!("Uncaught error event: {:?}", event.type_()),
            }
        });
    }

    fn setup_leave_warning(window: &web_sys::Window, lottery: Rc<RefCell<WebLottery>>) {
        listen(window, "beforeunload", move |event| {
            let Ok(lottery) = lottery.try_borrow() else {
                return;
            };
            if let Some(message) = lottery.leave_warning() {
                event.prevent_default();
                if let Some(e) = event.dyn_ref::<BeforeUnloadEvent>() {
                    e.set_return_value(message);
                }
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::start();
}

#[cfg(not(target_arch = "wasm32"))]
mod native_app {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use lottery_wheel::Lottery;
    use lottery_wheel::platform::native::{FileStorage, TerminalDisplay};
    use lottery_wheel::settings::Settings;
    use lottery_wheel::wheel::reference_options;

    const USAGE: &str = "usage: lottery-wheel [spin [N] | history | clear] [-y]

environment:
  LOTTERY_HOME   storage directory (default .lottery)
  LOTTERY_SEED   fixed RNG seed for reproducible draws";

    pub fn run() -> i32 {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let args: Vec<String> = std::env::args().skip(1).collect();
        let assume_yes = args.iter().any(|a| a == "-y" || a == "--yes");
        let positional: Vec<&str> = args
            .iter()
            .map(String::as_str)
            .filter(|a| !a.starts_with('-'))
            .collect();
        let command = positional.first().copied().unwrap_or("spin");

        let root = std::env::var("LOTTERY_HOME").unwrap_or_else(|_| ".lottery".to_string());
        let storage = match FileStorage::open(&root) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Cannot open storage at {}: {}", root, e);
                return 1;
            }
        };
        let settings = Settings::load(&storage);

        let rng = match std::env::var("LOTTERY_SEED").ok().and_then(|s| s.parse().ok()) {
            Some(seed) => {
                log::info!("Using fixed seed {}", seed);
                Pcg32::seed_from_u64(seed)
            }
            None => Pcg32::from_rng(&mut rand::rng()),
        };

        let show_history = matches!(command, "history" | "clear");
        let display = TerminalDisplay::new(assume_yes, show_history);
        let mut lottery = match Lottery::new(settings, reference_options(), storage, display, rng)
        {
            Ok(l) => l,
            Err(e) => {
                log::error!("Invalid wheel configuration: {}", e);
                return 1;
            }
        };

        match command {
            "spin" => {
                let count: u32 = match positional.get(1).map(|n| n.parse()) {
                    None => 1,
                    Some(Ok(n)) => n,
                    Some(Err(_)) => {
                        eprintln!("{}", USAGE);
                        return 2;
                    }
                };
                for _ in 0..count {
                    if let Some(spin) = lottery.spin() {
                        log::info!("Settling delay {} ms (not waited)", spin.duration_ms);
                        lottery.finish_spin();
                    }
                }
            }
            // Rendered on startup
            "history" => {}
            "clear" => {
                if !lottery.clear_history() {
                    println!("History unchanged");
                }
            }
            _ => {
                eprintln!("{}", USAGE);
                return 2;
            }
        }
        0
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    std::process::exit(native_app::run());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
