//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input modality (keyboard vs touch), which picks the overlay wording
//! - Mapping raw key codes and touch targets to game presses
//! - The monotonic clock used by timers

/// How the player is expected to give input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputModality {
    #[default]
    Keyboard,
    Touch,
}

impl InputModality {
    pub fn is_touch(&self) -> bool {
        matches!(self, InputModality::Touch)
    }

    /// Browser probe: `ontouchstart` on window or any touch points
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::Keyboard;
        };
        let has_ontouch =
            js_sys::Reflect::has(&window, &wasm_bindgen::JsValue::from_str("ontouchstart"))
                .unwrap_or(false);
        let touch_points = window.navigator().max_touch_points();
        Self::from_probe(has_ontouch, touch_points)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::Keyboard
    }

    pub fn from_probe(has_ontouchstart: bool, max_touch_points: i32) -> Self {
        if has_ontouchstart || max_touch_points > 0 {
            Self::Touch
        } else {
            Self::Keyboard
        }
    }
}

/// `KeyboardEvent.code` values that count as a press. The browser default
/// for these (page scroll) must be suppressed.
pub fn is_jump_key(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp")
}

/// Touches on links are left alone so the back link keeps working.
/// `ancestor_tags` runs from the touch target up to the root.
pub fn is_press_target<'a>(mut ancestor_tags: impl Iterator<Item = &'a str>) -> bool {
    !ancestor_tags.any(|tag| tag.eq_ignore_ascii_case("a"))
}

/// Milliseconds on the page's monotonic clock
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Milliseconds since the first call
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}
