//! Lifecycle hook slots and setup-scoped registration.
//!
//! During setup, the free functions below attach callbacks to the page
//! currently being initialized (see `context`). The page's own
//! definition-level handler for a slot always runs first, followed by
//! injected callbacks in registration order, each receiving the host's
//! original argument unchanged.
//!
//! Registration outside setup is invalid usage: it warns and the callback is
//! discarded. `share_app_message` is a singleton slot — one injected callback
//! per page, and never alongside a definition-level handler. `page_scroll`
//! injection requires the page to listen for scroll events (a definition
//! handler or the `listen_page_scroll` flag).

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use smallvec::SmallVec;

use crate::context;

pub type HookCallback = Rc<dyn Fn(&Value)>;
pub type ShareHook = Rc<dyn Fn(&Value) -> Value>;

/// Named lifecycle events a host can drive. `share_app_message` is handled
/// separately because its callbacks return a value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum HookSlot {
    Ready,
    Show,
    Hide,
    Unload,
    PullDownRefresh,
    ReachBottom,
    Resize,
    TabItemTap,
    PageScroll,
}

impl HookSlot {
    pub(crate) fn name(self) -> &'static str {
        match self {
            HookSlot::Ready => "on_ready",
            HookSlot::Show => "on_show",
            HookSlot::Hide => "on_hide",
            HookSlot::Unload => "on_unload",
            HookSlot::PullDownRefresh => "on_pull_down_refresh",
            HookSlot::ReachBottom => "on_reach_bottom",
            HookSlot::Resize => "on_resize",
            HookSlot::TabItemTap => "on_tab_item_tap",
            HookSlot::PageScroll => "on_page_scroll",
        }
    }

    /// Slots that exist only on page instances get a distinct diagnostic
    /// when injected with no instance context.
    fn page_scoped(self) -> bool {
        !matches!(self, HookSlot::Ready | HookSlot::Resize)
    }
}

/// Per-instance ordered callback collections, one sequence per slot.
#[derive(Default)]
pub(crate) struct HookRegistry {
    slots: HashMap<HookSlot, SmallVec<[HookCallback; 2]>>,
    share: Option<ShareHook>,
}

impl HookRegistry {
    pub(crate) fn append(&mut self, slot: HookSlot, cb: HookCallback) {
        self.slots.entry(slot).or_default().push(cb);
    }

    pub(crate) fn callbacks(&self, slot: HookSlot) -> SmallVec<[HookCallback; 2]> {
        self.slots.get(&slot).cloned().unwrap_or_default()
    }

    pub(crate) fn share(&self) -> Option<ShareHook> {
        self.share.clone()
    }

    pub(crate) fn set_share(&mut self, hook: ShareHook) -> bool {
        if self.share.is_some() {
            return false;
        }
        self.share = Some(hook);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.share = None;
    }
}

fn register(slot: HookSlot, cb: HookCallback) {
    let Some(page) = context::current_page() else {
        if slot.page_scoped() {
            log::warn!(
                "page lifecycle hook {}() injected outside any page setup(); ignored",
                slot.name()
            );
        } else {
            log::warn!("{}() hook can only be called during setup(); ignored", slot.name());
        }
        return;
    };
    if slot == HookSlot::PageScroll && !page.listens_page_scroll() {
        log::warn!(
            "on_page_scroll() hook only works when the page declares a page_scroll \
             handler or enables listen_page_scroll; ignored"
        );
        return;
    }
    page.hooks.borrow_mut().append(slot, cb);
}

pub fn on_ready(f: impl Fn(&Value) + 'static) {
    register(HookSlot::Ready, Rc::new(f));
}

pub fn on_show(f: impl Fn(&Value) + 'static) {
    register(HookSlot::Show, Rc::new(f));
}

pub fn on_hide(f: impl Fn(&Value) + 'static) {
    register(HookSlot::Hide, Rc::new(f));
}

pub fn on_unload(f: impl Fn(&Value) + 'static) {
    register(HookSlot::Unload, Rc::new(f));
}

pub fn on_pull_down_refresh(f: impl Fn(&Value) + 'static) {
    register(HookSlot::PullDownRefresh, Rc::new(f));
}

pub fn on_reach_bottom(f: impl Fn(&Value) + 'static) {
    register(HookSlot::ReachBottom, Rc::new(f));
}

pub fn on_resize(f: impl Fn(&Value) + 'static) {
    register(HookSlot::Resize, Rc::new(f));
}

pub fn on_tab_item_tap(f: impl Fn(&Value) + 'static) {
    register(HookSlot::TabItemTap, Rc::new(f));
}

pub fn on_page_scroll(f: impl Fn(&Value) + 'static) {
    register(HookSlot::PageScroll, Rc::new(f));
}

/// Singleton slot: at most one injected provider per page, and only when no
/// definition-level provider exists. The provider's return value is handed
/// back to the host.
pub fn on_share_app_message(f: impl Fn(&Value) -> Value + 'static) {
    let Some(page) = context::current_page() else {
        log::warn!(
            "page lifecycle hook on_share_app_message() injected outside any page setup(); ignored"
        );
        return;
    };
    if page.has_definition_share() {
        log::warn!(
            "on_share_app_message() hook only works when no definition-level \
             on_share_app_message handler is provided; ignored"
        );
        return;
    }
    if !page.hooks.borrow_mut().set_share(Rc::new(f)) {
        log::warn!("on_share_app_message() hook can only be registered once per page; ignored");
    }
}
