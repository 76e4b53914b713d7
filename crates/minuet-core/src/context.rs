//! The ambient "currently initializing page" pointer.
//!
//! Set only while a setup function executes synchronously; hook registration
//! reads it to find the instance it should attach to. The guard restores the
//! previous value on drop, so nested setups and panicking setups both leave
//! the context as they found it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::page::PageInner;

thread_local! {
    static CURRENT_PAGE: RefCell<Option<Rc<PageInner>>> = const { RefCell::new(None) };
}

pub(crate) struct ContextGuard {
    prev: Option<Rc<PageInner>>,
}

impl ContextGuard {
    pub(crate) fn enter(page: Rc<PageInner>) -> Self {
        let prev = CURRENT_PAGE.with(|c| c.borrow_mut().replace(page));
        Self { prev }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let prev = self.prev.take();
        CURRENT_PAGE.with(|c| *c.borrow_mut() = prev);
    }
}

pub(crate) fn current_page() -> Option<Rc<PageInner>> {
    CURRENT_PAGE.with(|c| c.borrow().clone())
}
