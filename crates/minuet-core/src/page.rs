//! Page definition and mounted page instances.
//!
//! A [`PageDefinition`] describes a page: an optional setup function plus
//! optional definition-level lifecycle handlers. [`Page::mount`] attaches a
//! definition to a host (anything implementing [`Host`]); the host then
//! drives the instance through its lifecycle entry points (`load`, `ready`,
//! …, `unload`) and invokes bound methods via [`Page::call`].
//!
//! `load` runs setup under an active instance context, classifies the
//! returned bindings, pushes the initial snapshot synchronously, and wires
//! one synchronization effect whose re-runs are batched through the job
//! queue — N reactive mutations within a tick collapse into one host update.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};
use smallvec::SmallVec;

use minuet_reactive::Effect;

use crate::binding::{self, Bindings, Method};
use crate::context::{self, ContextGuard};
use crate::error::BindingError;
use crate::hooks::{HookCallback, HookRegistry, HookSlot, ShareHook};
use crate::scheduler::{self, Job};

/// The host update primitive: receives the data snapshot and is responsible
/// for diffing and rendering it.
pub trait Host {
    fn update(&self, data: Map<String, Value>);
}

/// Instance metadata handed to setup alongside the load query.
#[derive(Clone, Debug)]
pub struct PageMeta {
    /// Identifier of the page kind.
    pub is: String,
    /// Route string the host resolved this instance from.
    pub route: String,
    /// Parsed route options.
    pub options: Value,
}

impl PageMeta {
    pub fn new(is: impl Into<String>, route: impl Into<String>, options: Value) -> Self {
        Self {
            is: is.into(),
            route: route.into(),
            options,
        }
    }
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            is: String::new(),
            route: String::new(),
            options: Value::Object(Map::new()),
        }
    }
}

type SetupFn = Box<dyn Fn(&Value, &PageMeta) -> Option<Bindings>>;

/// Builder for a page: setup plus definition-level handlers.
///
/// Definition-level handlers are the first entry of their slot's callback
/// sequence; callbacks injected during setup follow in registration order.
#[derive(Default)]
pub struct PageDefinition {
    setup: Option<SetupFn>,
    on_load: Option<HookCallback>,
    handlers: HashMap<HookSlot, HookCallback>,
    share: Option<ShareHook>,
    listen_page_scroll: bool,
}

impl PageDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(mut self, f: impl Fn(&Value, &PageMeta) -> Option<Bindings> + 'static) -> Self {
        self.setup = Some(Box::new(f));
        self
    }

    pub fn on_load(mut self, f: impl Fn(&Value) + 'static) -> Self {
        self.on_load = Some(Rc::new(f));
        self
    }

    pub fn on_ready(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::Ready, f)
    }

    pub fn on_show(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::Show, f)
    }

    pub fn on_hide(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::Hide, f)
    }

    pub fn on_unload(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::Unload, f)
    }

    pub fn on_pull_down_refresh(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::PullDownRefresh, f)
    }

    pub fn on_reach_bottom(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::ReachBottom, f)
    }

    pub fn on_resize(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::Resize, f)
    }

    pub fn on_tab_item_tap(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::TabItemTap, f)
    }

    pub fn on_page_scroll(self, f: impl Fn(&Value) + 'static) -> Self {
        self.handler(HookSlot::PageScroll, f)
    }

    pub fn on_share_app_message(mut self, f: impl Fn(&Value) -> Value + 'static) -> Self {
        self.share = Some(Rc::new(f));
        self
    }

    /// Allow `on_page_scroll` injection during setup even without a
    /// definition-level page_scroll handler.
    pub fn listen_page_scroll(mut self, listen: bool) -> Self {
        self.listen_page_scroll = listen;
        self
    }

    fn handler(mut self, slot: HookSlot, f: impl Fn(&Value) + 'static) -> Self {
        self.handlers.insert(slot, Rc::new(f));
        self
    }
}

pub(crate) struct PageInner {
    definition: PageDefinition,
    host: Rc<dyn Host>,
    meta: PageMeta,
    pub(crate) hooks: RefCell<HookRegistry>,
    methods: RefCell<HashMap<String, Method>>,
    effects: RefCell<Vec<Effect>>,
    sync_job: RefCell<Option<Job>>,
    alive: Cell<bool>,
}

impl PageInner {
    pub(crate) fn listens_page_scroll(&self) -> bool {
        self.definition.listen_page_scroll
            || self.definition.handlers.contains_key(&HookSlot::PageScroll)
    }

    pub(crate) fn has_definition_share(&self) -> bool {
        self.definition.share.is_some()
    }

    fn bind(self: &Rc<Self>, bindings: Bindings) -> Result<(), BindingError> {
        binding::validate(&bindings)?;

        for (name, method) in binding::methods(&bindings) {
            self.methods.borrow_mut().insert(name, method);
        }

        let bindings = Rc::new(bindings);
        let effect = Effect::new({
            let bindings = bindings.clone();
            let host = self.host.clone();
            move || host.update(binding::snapshot(&bindings))
        });
        let job = Job::new({
            let effect = effect.clone();
            move || effect.run()
        });
        effect.set_scheduler({
            let job = job.clone();
            move || scheduler::queue_job(&job)
        });
        // Initial snapshot is synchronous: the first render reflects setup
        // state without waiting a tick.
        effect.run();

        self.effects.borrow_mut().push(effect);
        *self.sync_job.borrow_mut() = Some(job);
        Ok(())
    }

    fn teardown(&self) {
        self.alive.set(false);
        if let Some(job) = self.sync_job.borrow_mut().take() {
            job.deactivate();
        }
        for effect in self.effects.borrow_mut().drain(..) {
            effect.stop();
        }
        self.hooks.borrow_mut().clear();
    }
}

/// A mounted page instance. The host owns one per loaded page and calls its
/// lifecycle entry points.
pub struct Page {
    inner: Rc<PageInner>,
}

impl Page {
    pub fn mount(definition: PageDefinition, host: Rc<dyn Host>, meta: PageMeta) -> Page {
        Page {
            inner: Rc::new(PageInner {
                definition,
                host,
                meta,
                hooks: RefCell::new(HookRegistry::default()),
                methods: RefCell::new(HashMap::new()),
                effects: RefCell::new(Vec::new()),
                sync_job: RefCell::new(None),
                alive: Cell::new(true),
            }),
        }
    }

    /// Load entry point. Runs the definition-level load handler, then setup
    /// under an active instance context, then binds the setup result.
    ///
    /// Fails synchronously — with no partial host update — if the setup
    /// result contains an unsupported leaf.
    pub fn load(&self, query: &Value) -> Result<(), BindingError> {
        if let Some(on_load) = &self.inner.definition.on_load {
            on_load(query);
        }
        let bindings = {
            let _ctx = ContextGuard::enter(self.inner.clone());
            match &self.inner.definition.setup {
                Some(setup) => setup(query, &self.inner.meta),
                None => None,
            }
        };
        if let Some(bindings) = bindings {
            self.inner.bind(bindings)?;
        }
        Ok(())
    }

    pub fn ready(&self) {
        self.dispatch(HookSlot::Ready, &Value::Null);
    }

    pub fn show(&self) {
        self.dispatch(HookSlot::Show, &Value::Null);
    }

    pub fn hide(&self) {
        self.dispatch(HookSlot::Hide, &Value::Null);
    }

    pub fn pull_down_refresh(&self) {
        self.dispatch(HookSlot::PullDownRefresh, &Value::Null);
    }

    pub fn reach_bottom(&self) {
        self.dispatch(HookSlot::ReachBottom, &Value::Null);
    }

    pub fn resize(&self, arg: &Value) {
        self.dispatch(HookSlot::Resize, arg);
    }

    pub fn tab_item_tap(&self, arg: &Value) {
        self.dispatch(HookSlot::TabItemTap, arg);
    }

    pub fn page_scroll(&self, arg: &Value) {
        self.dispatch(HookSlot::PageScroll, arg);
    }

    /// Unload entry point: fires unload callbacks, then releases every hook
    /// collection and synchronization effect. Mutations to previously bound
    /// cells produce no further host updates, and already queued jobs become
    /// no-ops.
    pub fn unload(&self) {
        self.dispatch(HookSlot::Unload, &Value::Null);
        self.inner.teardown();
    }

    /// Share-content entry point. The last handler returning a usable
    /// (non-null) value wins; an empty object when none is registered.
    pub fn share_app_message(&self, arg: &Value) -> Value {
        let mut content = Value::Object(Map::new());
        if !self.inner.alive.get() {
            return content;
        }
        if let Some(share) = &self.inner.definition.share {
            let value = share(arg);
            if !value.is_null() {
                content = value;
            }
        }
        if let Some(share) = self.inner.hooks.borrow().share() {
            let value = share(arg);
            if !value.is_null() {
                content = value;
            }
        }
        content
    }

    /// Invoke a bound method by name. `None` when no such method exists.
    pub fn call(&self, name: &str, arg: &Value) -> Option<Value> {
        let method = self.inner.methods.borrow().get(name).cloned();
        method.map(|m| m(arg))
    }

    /// Number of live effects attached to this instance (the
    /// synchronization effect plus setup-created watchers).
    pub fn effect_count(&self) -> usize {
        self.inner.effects.borrow().len()
    }

    fn dispatch(&self, slot: HookSlot, arg: &Value) {
        // Stale host invocation paths after unload are no-ops.
        if !self.inner.alive.get() {
            return;
        }
        if let Some(handler) = self.inner.definition.handlers.get(&slot) {
            handler(arg);
        }
        let injected: SmallVec<[HookCallback; 2]> = self.inner.hooks.borrow().callbacks(slot);
        for callback in injected {
            callback(arg);
        }
    }
}

/// Stop handle for a watcher created during setup.
pub struct WatchHandle {
    effect: Effect,
    page: Weak<PageInner>,
}

impl WatchHandle {
    /// Idempotent. Also detaches the watcher from its owning page.
    pub fn stop(&self) {
        self.effect.stop();
        if let Some(page) = self.page.upgrade() {
            page.effects
                .borrow_mut()
                .retain(|e| !e.ptr_eq(&self.effect));
        }
    }
}

/// A dependency-tracked watcher flushed through the job queue.
///
/// Runs once immediately to establish its dependency set; re-runs are
/// batched per tick. The watcher's job allows recursion, so a watcher that
/// mutates its own dependencies re-runs within the same flush cycle rather
/// than deadlocking the queue (convergence is the caller's responsibility).
///
/// Created during setup, the watcher is attached to the current instance and
/// stopped automatically on unload.
pub fn watch(f: impl Fn() + 'static) -> WatchHandle {
    let effect = Effect::new(f);
    let job = Job::allow_recurse({
        let effect = effect.clone();
        move || effect.run()
    });
    effect.set_scheduler({
        let job = job.clone();
        move || scheduler::queue_job(&job)
    });
    effect.run();

    let page = match context::current_page() {
        Some(page) => {
            page.effects.borrow_mut().push(effect.clone());
            Rc::downgrade(&page)
        }
        None => Weak::new(),
    };
    WatchHandle { effect, page }
}
