use crate::constants::{EV_POINTER_DOWN, EV_POINTER_MOVE, EV_POINTER_UP};
use crate::dom;
use crate::events::listen;
use crate::input;
use crate::surface::WebSurface;
use hero_core::{PointerSample, Renderer, SharedHero, Subscription, Surface};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use web_sys as web;

/// Window-scoped pointer listeners feeding the hero.
pub fn subscribe_pointer<R: Renderer + 'static>(
    window: &web::Window,
    hero: &SharedHero<R>,
    surface: &Rc<WebSurface>,
) -> Vec<Subscription> {
    vec![
        wire_pointermove(window, hero),
        wire_pointerdown(window, hero, surface),
        wire_pointerup(window, hero, surface),
    ]
}

fn sample(window: &web::Window, ev: &web::PointerEvent) -> PointerSample {
    let (w, h) = dom::viewport_size(window);
    input::pointer_sample(ev.client_x() as f64, ev.client_y() as f64, w, h)
}

fn wire_pointermove<R: Renderer + 'static>(window: &web::Window, hero: &SharedHero<R>) -> Subscription {
    let hero = hero.clone();
    let win = window.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let s = sample(&win, &ev);
        if let Ok(mut hero) = hero.try_borrow_mut() {
            hero.pointer_moved(&s);
        }
    }) as Box<dyn FnMut(web::PointerEvent)>);
    listen(window, EV_POINTER_MOVE, closure)
}

fn wire_pointerdown<R: Renderer + 'static>(
    window: &web::Window,
    hero: &SharedHero<R>,
    surface: &Rc<WebSurface>,
) -> Subscription {
    let hero = hero.clone();
    let surface = surface.clone();
    let win = window.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let s = sample(&win, &ev);
        let on_surface = surface.contains(ev.target());
        let cursor = match hero.try_borrow_mut() {
            Ok(mut hero) => hero.pointer_pressed(&s, on_surface),
            Err(_) => None,
        };
        if let Some(cursor) = cursor {
            surface.set_cursor(cursor);
        }
    }) as Box<dyn FnMut(web::PointerEvent)>);
    listen(window, EV_POINTER_DOWN, closure)
}

fn wire_pointerup<R: Renderer + 'static>(
    window: &web::Window,
    hero: &SharedHero<R>,
    surface: &Rc<WebSurface>,
) -> Subscription {
    let hero = hero.clone();
    let surface = surface.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        let cursor = match hero.try_borrow_mut() {
            Ok(mut hero) => hero.pointer_released(),
            Err(_) => None,
        };
        if let Some(cursor) = cursor {
            surface.set_cursor(cursor);
        }
    }) as Box<dyn FnMut(web::PointerEvent)>);
    listen(window, EV_POINTER_UP, closure)
}
