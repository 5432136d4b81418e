// Event listener and timer helpers

use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget, Window};

use crate::portfolio::errors::PortfolioError;

/// Listener kept for the lifetime of the page
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), PortfolioError>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Passive listener (scroll), kept for the lifetime of the page
pub fn listen_passive<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), PortfolioError>
where
    F: FnMut(Event) + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    closure.forget();
    Ok(())
}

/// Listener that fires at most once and is released afterwards
pub fn listen_once<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), PortfolioError>
where
    F: FnOnce(Event) + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let callback = Closure::once_into_js(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.unchecked_ref(),
        &options,
    )?;
    Ok(())
}

pub fn set_timeout<F>(window: &Window, delay: Duration, task: F) -> Result<i32, PortfolioError>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(task);
    let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay.as_millis().min(i32::MAX as u128) as i32,
    )?;
    Ok(handle)
}

/// requestIdleCallback(task, { timeout }); callers check support first
pub fn request_idle<F>(window: &Window, timeout: Duration, task: F) -> Result<(), PortfolioError>
where
    F: FnOnce() + 'static,
{
    let request = js_sys::Reflect::get(window, &JsValue::from_str("requestIdleCallback"))?;
    let request: js_sys::Function = request.dyn_into()?;

    let options = js_sys::Object::new();
    js_sys::Reflect::set(
        &options,
        &JsValue::from_str("timeout"),
        &JsValue::from_f64(timeout.as_millis() as f64),
    )?;

    let callback = Closure::once_into_js(move |_deadline: JsValue| task());
    request.call2(window, &callback, &options)?;
    Ok(())
}

pub fn request_frame<F>(window: &Window, task: F) -> Result<i32, PortfolioError>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(move |_timestamp: JsValue| task());
    let handle = window.request_animation_frame(callback.unchecked_ref())?;
    Ok(handle)
}
