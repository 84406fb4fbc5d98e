#![cfg(target_arch = "wasm32")]
use hero_core::{activate, HeroParams, Lifetime, Mount, Renderer, Surface};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod constants;
mod dom;
mod events;
mod frame;
mod host;
mod input;
mod loader;
mod render;
mod surface;

use render::GpuRenderer;
use surface::WebSurface;

type WebMount = Mount<GpuRenderer, WebSurface>;
type MountSlot = Rc<RefCell<Option<WebMount>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hero-web starting");
    Ok(())
}

/// A mounted hero scene. The page calls `destroy()` when the component
/// unmounts.
#[wasm_bindgen]
pub struct HeroHandle {
    lifetime: Lifetime,
    surface: Rc<WebSurface>,
    mount: MountSlot,
}

#[wasm_bindgen]
impl HeroHandle {
    /// Tear the scene down. Safe to call more than once, and before the
    /// renderer has finished initializing.
    pub fn destroy(&self) {
        let mount = self.mount.borrow_mut().take();
        match mount {
            Some(mut mount) => mount.teardown(),
            None => {
                if self.lifetime.end() {
                    if let Err(e) = self.surface.detach() {
                        log::debug!("[mount] surface detach skipped: {}", e);
                    }
                    log::info!("[mount] destroyed before activation");
                }
            }
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.lifetime.is_alive()
    }
}

/// Mount the hero into the element with id `container_id`. Returns nothing
/// when the element does not exist.
#[wasm_bindgen]
pub fn mount_hero(container_id: &str) -> Option<HeroHandle> {
    let document = dom::window_document()?;
    let Some(container) = dom::container(&document, container_id) else {
        log::debug!("[mount] no container #{}", container_id);
        return None;
    };
    let params = dom::read_params(&container);
    let surface = match WebSurface::attach(&document, container) {
        Ok(s) => Rc::new(s),
        Err(e) => {
            log::error!("[mount] {:?}", e);
            return None;
        }
    };
    let lifetime = Lifetime::new();
    let mount: MountSlot = Rc::new(RefCell::new(None));
    spawn_local(setup(params, lifetime.clone(), surface.clone(), mount.clone()));
    Some(HeroHandle {
        lifetime,
        surface,
        mount,
    })
}

async fn setup(params: HeroParams, lifetime: Lifetime, surface: Rc<WebSurface>, slot: MountSlot) {
    let (width, height) = surface.sync_size();
    let Some(mut renderer) = frame::init_gpu(surface.canvas(), params.lighting.shadow_map_size).await
    else {
        return;
    };
    if !lifetime.is_alive() {
        log::debug!("[mount] unmounted during renderer setup");
        renderer.release();
        return;
    }
    let Some(mut host) = host::WebHost::new(surface.clone()) else {
        renderer.release();
        return;
    };
    let mount = activate(&mut host, lifetime, params, renderer, surface, width, height);
    *slot.borrow_mut() = Some(mount);
}
