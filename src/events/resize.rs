use crate::constants::EV_RESIZE;
use crate::events::listen;
use crate::surface::WebSurface;
use hero_core::{Renderer, SharedHero, Subscription};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use web_sys as web;

pub fn subscribe_resize<R: Renderer + 'static>(
    window: &web::Window,
    hero: &SharedHero<R>,
    surface: &Rc<WebSurface>,
) -> Subscription {
    let hero = hero.clone();
    let surface = surface.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let Ok(mut hero) = hero.try_borrow_mut() else {
            return;
        };
        if !hero.is_alive() {
            return;
        }
        let (w, h) = surface.sync_size();
        hero.resized(w, h);
    }) as Box<dyn FnMut(web::Event)>);
    listen(window, EV_RESIZE, closure)
}
