use crate::render::GpuRenderer;
use hero_core::{CancelToken, FrameLoop, Renderer, SharedHero};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub async fn init_gpu(canvas: &web::HtmlCanvasElement, shadow_map_size: u32) -> Option<GpuRenderer> {
    match GpuRenderer::new(canvas, shadow_map_size).await {
        Ok(r) => Some(r),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Drive `hero.frame()` from `requestAnimationFrame` until cancelled or the
/// hero's lifetime ends.
pub fn start_loop<R: Renderer + 'static>(hero: &SharedHero<R>) -> FrameLoop {
    let token = CancelToken::new();
    let tick: Tick = Rc::new(RefCell::new(None));
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let tick_clone = tick.clone();
    let pending_tick = pending.clone();
    let token_tick = token.clone();
    let hero_tick = hero.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_tick.set(None);
        if token_tick.is_cancelled() {
            return;
        }
        let alive = match hero_tick.try_borrow_mut() {
            Ok(mut hero) => {
                hero.frame();
                hero.is_alive()
            }
            Err(_) => true,
        };
        if alive {
            pending_tick.set(request_frame(&tick_clone));
        }
    }) as Box<dyn FnMut()>));
    pending.set(request_frame(&tick));

    FrameLoop::new(token, move || {
        if let (Some(id), Some(w)) = (pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        // breaks the closure's reference to itself
        tick.borrow_mut().take();
    })
}

fn request_frame(tick: &Tick) -> Option<i32> {
    let window = web::window()?;
    let tick = tick.borrow();
    let closure = tick.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}
