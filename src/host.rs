use crate::events;
use crate::frame;
use crate::loader;
use crate::render::GpuRenderer;
use crate::surface::WebSurface;
use hero_core::{FrameLoop, Host, SharedHero, Subscription};
use std::rc::Rc;
use web_sys as web;

/// Browser services for one activation.
pub struct WebHost {
    window: web::Window,
    surface: Rc<WebSurface>,
}

impl WebHost {
    pub fn new(surface: Rc<WebSurface>) -> Option<Self> {
        Some(Self {
            window: web::window()?,
            surface,
        })
    }
}

impl Host for WebHost {
    type Renderer = GpuRenderer;
    type Surface = WebSurface;

    fn subscribe_input(
        &mut self,
        hero: &SharedHero<GpuRenderer>,
        surface: &Rc<WebSurface>,
    ) -> Vec<Subscription> {
        events::pointer::subscribe_pointer(&self.window, hero, surface)
    }

    fn subscribe_resize(&mut self, hero: &SharedHero<GpuRenderer>) -> Subscription {
        events::resize::subscribe_resize(&self.window, hero, &self.surface)
    }

    fn start_frames(&mut self, hero: &SharedHero<GpuRenderer>) -> FrameLoop {
        frame::start_loop(hero)
    }

    fn request_model(&mut self, path: &str, hero: &SharedHero<GpuRenderer>) {
        loader::spawn_model_load(path.to_string(), hero);
    }
}
