//! # Minuet page runtime
//!
//! Minuet projects reactive state onto a host UI framework's imperative page
//! object. A page describes its state with reactive cells
//! ([`Signal`], [`Computed`]) inside a setup function; minuet walks the
//! returned binding tree, pushes an initial snapshot to the host
//! synchronously, and re-pushes — at most once per tick — whenever a bound
//! cell changes.
//!
//! Three pieces cooperate:
//!
//! - the **job queue** (`scheduler`) — deduplicating, order-preserving,
//!   flushed once per tick via [`next_tick`];
//! - the **lifecycle hook registry** (`hooks`) — setup-scoped registration
//!   of callbacks (`on_ready`, `on_show`, …) against the page instance
//!   currently initializing;
//! - the **binding synchronizer** (`binding` + `page`) — classifies a setup
//!   result, exposes function leaves as host-callable methods, and wires one
//!   batched synchronization effect per instance.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use serde_json::{Map, Value, json};
//!
//! use minuet_core::*;
//!
//! struct DemoHost {
//!     data: RefCell<Map<String, Value>>,
//! }
//!
//! impl Host for DemoHost {
//!     fn update(&self, data: Map<String, Value>) {
//!         self.data.borrow_mut().extend(data);
//!     }
//! }
//!
//! let host = Rc::new(DemoHost { data: RefCell::new(Map::new()) });
//!
//! let definition = PageDefinition::new().setup(|_query, _meta| {
//!     let count = signal(0);
//!     let double = Computed::new({
//!         let count = count.clone();
//!         move || count.get() * 2
//!     });
//!
//!     let mut bindings = Bindings::new();
//!     bindings.set("count", &count);
//!     bindings.set("double", &double);
//!     bindings.set(
//!         "increment",
//!         Binding::action(move || count.update(|v| *v += 1)),
//!     );
//!     Some(bindings)
//! });
//!
//! let page = Page::mount(definition, host.clone(), PageMeta::default());
//! page.load(&json!({})).unwrap();
//! assert_eq!(host.data.borrow()["count"], json!(0));
//!
//! page.call("increment", &Value::Null);
//! page.call("increment", &Value::Null);
//! next_tick(); // both mutations collapse into one host update
//! assert_eq!(host.data.borrow()["count"], json!(2));
//! assert_eq!(host.data.borrow()["double"], json!(4));
//!
//! page.unload(); // stops synchronization; further mutations are inert
//! ```
//!
//! Unloading a page releases its hook collections and synchronization
//! effects synchronously: cells the page observed can still be mutated by
//! external holders, but no further host updates happen, and jobs already
//! queued for the instance become no-ops.

pub mod binding;
mod context;
pub mod error;
pub mod hooks;
pub mod page;
pub mod prelude;
pub mod scheduler;

pub use binding::{Binding, Bindings, Method};
pub use error::BindingError;
pub use hooks::{
    HookSlot, on_hide, on_page_scroll, on_pull_down_refresh, on_reach_bottom, on_ready, on_resize,
    on_share_app_message, on_show, on_tab_item_tap, on_unload,
};
pub use page::{Host, Page, PageDefinition, PageMeta, WatchHandle, watch};
pub use scheduler::{Job, next_tick, next_tick_then, queue_job};

pub use minuet_reactive::{Computed, Effect, ReadSignal, Signal, signal, untracked};
