// Network Information API probing

use wasm_bindgen::JsValue;
use web_sys::Window;

/// navigator.connection.effectiveType, when the API exists
pub fn effective_type(window: &Window) -> Option<String> {
    let navigator = window.navigator();
    let connection = js_sys::Reflect::get(&navigator, &JsValue::from_str("connection")).ok()?;
    if connection.is_undefined() || connection.is_null() {
        return None;
    }
    js_sys::Reflect::get(&connection, &JsValue::from_str("effectiveType"))
        .ok()?
        .as_string()
}

pub fn idle_callback_supported(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("requestIdleCallback")).unwrap_or(false)
}
