//! Browser platform: LocalStorage and the DOM display surface
//!
//! Expected page structure:
//! - `#wheel` (rotated element), inside `.wheel-wrapper`
//! - `#spinBtn.spin-button` with `.button-text` and `.button-icon` children
//! - `#resultValue` inside `.result-container`
//! - `#history` list, `#clearHistory.clear-button`

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use super::display::{ButtonState, DisplaySurface};
use super::storage::Storage;
use crate::error::StorageError;
use crate::history::HistoryView;
use crate::wheel::{WheelOption, conic_gradient, label_position, sector_center_deg};

/// Deceleration curve for the spin transition
const SPIN_EASING: &str = "cubic-bezier(0.17, 0.67, 0.12, 0.99)";
/// Label distance from the wheel center, as a fraction of the wheel width
const LABEL_RADIUS_FRACTION: f32 = 0.34;

/// Best-effort text for a thrown JS value
fn js_error_text(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Run `f` once after `ms` milliseconds on the event loop
pub fn set_timeout(ms: u32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window, dropping timer");
        return;
    };
    let callback = Closure::once_into_js(f);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        ms.min(i32::MAX as u32) as i32,
    ) {
        log::warn!("setTimeout failed: {}", js_error_text(&e));
    }
}

/// RNG seed from the platform CSPRNG, falling back to the clock
pub fn seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::fill(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(e) => {
            log::warn!("getrandom failed ({}), seeding from clock", e);
            js_sys::Date::now() as u64
        }
    }
}

/// `window.localStorage`
///
/// Missing storage (private browsing, disabled cookies) turns every call
/// into `StorageError::Unavailable`.
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable, history will not persist");
        }
        Self { inner }
    }

    fn inner(&self) -> Result<&web_sys::Storage, StorageError> {
        self.inner
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("window.localStorage".to_string()))
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(js_error_text(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner()?
            .set_item(key, value)
            .map_err(|e| StorageError::WriteRejected {
                key: key.to_string(),
                reason: js_error_text(&e),
            })
    }
}

fn html_element(document: &Document, id: &str) -> Result<HtmlElement, String> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("missing #{}", id))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("#{} is not an HTML element", id))
}

/// Display surface backed by the page's DOM
pub struct DomDisplay {
    window: Window,
    document: Document,
    wheel: HtmlElement,
    spin_button: HtmlElement,
    result_value: HtmlElement,
    result_container: Option<Element>,
    history: HtmlElement,
}

impl DomDisplay {
    /// Look up the page elements
    pub fn from_document(window: Window, document: Document) -> Result<Self, String> {
        Ok(Self {
            wheel: html_element(&document, "wheel")?,
            spin_button: html_element(&document, "spinBtn")?,
            result_value: html_element(&document, "resultValue")?,
            result_container: document.query_selector(".result-container").ok().flatten(),
            history: html_element(&document, "history")?,
            window,
            document,
        })
    }

    /// Paint sector colors and labels from the option set
    pub fn paint_wheel(&self, options: &[WheelOption]) {
        let style = self.wheel.style();
        let _ = style.set_property("background", &conic_gradient(options));

        // Drop labels from a previous paint
        if let Ok(old) = self.wheel.query_selector_all(".wheel-label") {
            for i in 0..old.length() {
                if let Some(node) = old.item(i) {
                    let _ = self.wheel.remove_child(&node);
                }
            }
        }

        let radius = self.wheel.client_width() as f32 * LABEL_RADIUS_FRACTION;
        let n = options.len();
        for (i, option) in options.iter().enumerate() {
            let Ok(label) = self.document.create_element("span") else {
                continue;
            };
            label.set_class_name("wheel-label");
            label.set_text_content(Some(&option.value));

            let pos = label_position(i, n, radius);
            let transform = format!(
                "translate(-50%, -50%) translate({:.1}px, {:.1}px) rotate({:.1}deg)",
                pos.x,
                pos.y,
                sector_center_deg(i, n)
            );
            if let Some(label) = label.dyn_ref::<HtmlElement>() {
                let s = label.style();
                let _ = s.set_property("position", "absolute");
                let _ = s.set_property("left", "50%");
                let _ = s.set_property("top", "50%");
                let _ = s.set_property("transform", &transform);
            }
            let _ = self.wheel.append_child(&label);
        }
    }

    fn flash_classes(&self, flash_ms: u32) {
        let button = self.spin_button.clone();
        let container = self.result_container.clone();

        let _ = button.class_list().add_1("button-glow");
        if let Some(c) = &container {
            let _ = c.class_list().add_1("result-animation");
        }

        set_timeout(flash_ms, move || {
            let _ = button.class_list().remove_1("button-glow");
            if let Some(c) = container {
                let _ = c.class_list().remove_1("result-animation");
            }
        });
    }

    fn restart_pulse(&self) {
        let _ = self.result_value.style().set_property("animation", "none");
        let value = self.result_value.clone();
        // Next frame, so the browser sees the animation reset
        set_timeout(10, move || {
            let _ = value
                .style()
                .set_property("animation", "pulse 0.6s ease-in-out");
        });
    }
}

impl DisplaySurface for DomDisplay {
    fn rotate_to(&mut self, angle_deg: f64, duration_ms: u32) {
        let style = self.wheel.style();
        let _ = style.set_property(
            "transition",
            &format!("transform {}ms {}", duration_ms, SPIN_EASING),
        );
        let _ = style.set_property("transform", &format!("rotate({}deg)", angle_deg));
    }

    fn set_button(&mut self, state: &ButtonState, spinning: bool) {
        if state.disabled {
            let _ = self.spin_button.set_attribute("disabled", "");
        } else {
            let _ = self.spin_button.remove_attribute("disabled");
        }
        if let Ok(Some(text)) = self.spin_button.query_selector(".button-text") {
            text.set_text_content(Some(&state.text));
        }
        if let Ok(Some(icon)) = self.spin_button.query_selector(".button-icon") {
            icon.set_text_content(Some(&state.icon));
        }

        let classes = self.spin_button.class_list();
        let _ = if spinning {
            classes.add_1("spinning")
        } else {
            classes.remove_1("spinning")
        };
    }

    fn show_result(&mut self, value: &str, flash_ms: u32) {
        self.result_value.set_text_content(Some(value));
        self.restart_pulse();
        self.flash_classes(flash_ms);
    }

    fn render_history(&mut self, view: &HistoryView) {
        self.history.set_text_content(None);

        let make = |class: &str, text: &str| -> Option<Element> {
            let el = self.document.create_element("span").ok()?;
            el.set_class_name(class);
            el.set_text_content(Some(text));
            Some(el)
        };

        match view {
            HistoryView::Empty { placeholder } => {
                if let Ok(empty) = self.document.create_element("div") {
                    empty.set_class_name("history-empty");
                    empty.set_text_content(Some(placeholder));
                    let _ = self.history.append_child(&empty);
                }
            }
            HistoryView::Rows(rows) => {
                for row in rows {
                    let Ok(item) = self.document.create_element("div") else {
                        continue;
                    };
                    item.set_class_name("history-item");
                    if let Some(result) = make("history-result", &row.result) {
                        let _ = item.append_child(&result);
                    }
                    if let Some(time) = make("history-time", &row.time) {
                        let _ = item.append_child(&time);
                    }
                    let _ = self.history.append_child(&item);
                }
            }
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or_else(|e| {
            log::warn!("confirm() failed: {}", js_error_text(&e));
            false
        })
    }

    fn set_paused(&mut self, paused: bool) {
        let state = if paused { "paused" } else { "running" };
        let _ = self
            .wheel
            .style()
            .set_property("animation-play-state", state);
    }
}
