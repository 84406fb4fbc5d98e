pub mod pointer;
pub mod resize;

use hero_core::Subscription;
use wasm_bindgen::closure::{Closure, WasmClosure};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Add `closure` as a `kind` listener on `target`. Unsubscribing removes the
/// listener and drops the closure.
pub fn listen<T>(target: &web::EventTarget, kind: &'static str, closure: Closure<T>) -> Subscription
where
    T: ?Sized + WasmClosure + 'static,
{
    if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
        log::warn!("[events] {} listener not added: {:?}", kind, e);
    }
    let target = target.clone();
    Subscription::new(kind, move || {
        _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        drop(closure);
    })
}
