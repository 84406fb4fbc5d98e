//! Activation and teardown.
//!
//! [`activate`] builds a [`Hero`], asks the [`Host`] for input and resize
//! subscriptions, a frame loop and the model request, and returns a [`Mount`]
//! owning all of them. Dropping or tearing down the mount undoes everything
//! in a fixed order.

use crate::hero::Hero;
use crate::interaction::Cursor;
use crate::params::HeroParams;
use crate::render::{Renderer, Surface};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type SharedHero<R> = Rc<RefCell<Hero<R>>>;

/// Flag shared by every callback of one activation. Starts alive, ends once.
#[derive(Clone, Debug)]
pub struct Lifetime {
    alive: Rc<Cell<bool>>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self {
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// End the lifetime. Returns `true` only for the call that ended it.
    pub fn end(&self) -> bool {
        self.alive.replace(false)
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellation flag checked by a scheduled task on every run.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// A registered listener. Unsubscribing runs its removal hook once.
pub struct Subscription {
    label: &'static str,
    remove: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(label: &'static str, remove: impl FnOnce() + 'static) -> Self {
        Self {
            label,
            remove: Some(Box::new(remove)),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_active(&self) -> bool {
        self.remove.is_some()
    }

    pub fn unsubscribe(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
            log::debug!("[lifecycle] unsubscribed {}", self.label);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Handle to a running per-frame task.
///
/// The task checks [`FrameLoop::token`] before doing any work and stops
/// rescheduling once it is cancelled; `on_cancel` lets the host also drop a
/// request that is already queued.
pub struct FrameLoop {
    token: CancelToken,
    on_cancel: Option<Box<dyn FnOnce()>>,
}

impl FrameLoop {
    pub fn new(token: CancelToken, on_cancel: impl FnOnce() + 'static) -> Self {
        Self {
            token,
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn cancel(&mut self) {
        self.token.cancel();
        if let Some(hook) = self.on_cancel.take() {
            hook();
            log::debug!("[lifecycle] frame loop cancelled");
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Environment services an activation needs. The web front-end implements
/// this with DOM listeners, `requestAnimationFrame` and `fetch`.
pub trait Host {
    type Renderer: Renderer + 'static;
    type Surface: Surface + 'static;

    /// Pointer move/down/up listeners feeding `hero`.
    fn subscribe_input(
        &mut self,
        hero: &SharedHero<Self::Renderer>,
        surface: &Rc<Self::Surface>,
    ) -> Vec<Subscription>;

    /// Viewport resize listener feeding `hero`.
    fn subscribe_resize(&mut self, hero: &SharedHero<Self::Renderer>) -> Subscription;

    /// Start calling [`Hero::frame`] once per display refresh.
    fn start_frames(&mut self, hero: &SharedHero<Self::Renderer>) -> FrameLoop;

    /// Begin loading the model at `path`; the result goes to
    /// [`Hero::model_loaded`] whenever it arrives.
    fn request_model(&mut self, path: &str, hero: &SharedHero<Self::Renderer>);
}

/// Everything one activation owns.
pub struct Mount<R: Renderer, S: Surface> {
    lifetime: Lifetime,
    hero: SharedHero<R>,
    surface: Rc<S>,
    subscriptions: Vec<Subscription>,
    frames: Option<FrameLoop>,
    torn_down: bool,
}

impl<R: Renderer, S: Surface> Mount<R, S> {
    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    pub fn hero(&self) -> &SharedHero<R> {
        &self.hero
    }

    pub fn surface(&self) -> &Rc<S> {
        &self.surface
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_active()).count()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Undo the activation: end the lifetime, remove listeners, stop the
    /// frame loop, detach the surface, then dispose scene resources and the
    /// renderer. Never fails; a second call does nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.lifetime.end();

        for sub in &mut self.subscriptions {
            sub.unsubscribe();
        }
        self.subscriptions.clear();

        if let Some(mut frames) = self.frames.take() {
            frames.cancel();
        }

        if let Err(e) = self.surface.detach() {
            log::debug!("[lifecycle] surface detach skipped: {}", e);
        }

        match self.hero.try_borrow_mut() {
            Ok(mut hero) => hero.dispose(),
            Err(_) => log::warn!("[lifecycle] scene busy during teardown; resources dropped with it"),
        }
        log::info!("[lifecycle] teardown complete");
    }
}

impl<R: Renderer, S: Surface> Drop for Mount<R, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Build the scene and wire it to `host`.
///
/// `lifetime` is created by the caller so work started before activation
/// (renderer setup) can be checked against the same flag.
pub fn activate<H: Host>(
    host: &mut H,
    lifetime: Lifetime,
    params: HeroParams,
    renderer: H::Renderer,
    surface: Rc<H::Surface>,
    width: u32,
    height: u32,
) -> Mount<H::Renderer, H::Surface> {
    let path = params.model.path.clone();
    let hero = Rc::new(RefCell::new(Hero::new(
        params,
        lifetime.clone(),
        renderer,
        width,
        height,
    )));
    surface.set_cursor(Cursor::Grab);

    let mut subscriptions = host.subscribe_input(&hero, &surface);
    subscriptions.push(host.subscribe_resize(&hero));
    let frames = host.start_frames(&hero);
    host.request_model(&path, &hero);

    log::info!(
        "[lifecycle] activated {}x{} with {} subscriptions",
        width,
        height,
        subscriptions.len()
    );
    Mount {
        lifetime,
        hero,
        surface,
        subscriptions,
        frames: Some(frames),
        torn_down: false,
    }
}
