pub use crate::binding::{Binding, Bindings, Method};
pub use crate::error::BindingError;
pub use crate::hooks::{
    HookSlot, on_hide, on_page_scroll, on_pull_down_refresh, on_reach_bottom, on_ready, on_resize,
    on_share_app_message, on_show, on_tab_item_tap, on_unload,
};
pub use crate::page::{Host, Page, PageDefinition, PageMeta, WatchHandle, watch};
pub use crate::scheduler::{Job, next_tick, next_tick_then, queue_job};
pub use minuet_reactive::{Computed, Effect, ReadSignal, Signal, signal, untracked};
