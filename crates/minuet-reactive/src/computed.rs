use std::cell::RefCell;
use std::rc::Rc;

use crate::Effect;
use crate::graph::{self, SourceId};

/// Lazily cached derived cell.
///
/// The compute closure runs under tracking on first read; a dependency
/// change invalidates the cache and notifies readers of the computed, and
/// the next `get()` recomputes.
pub struct Computed<T: 'static>(Rc<ComputedInner<T>>);

struct ComputedInner<T> {
    id: SourceId,
    compute: Rc<dyn Fn() -> T>,
    cache: Rc<RefCell<Option<T>>>,
    effect: Effect,
}

impl<T: Clone + 'static> Computed<T> {
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        let id = graph::new_source();
        let compute: Rc<dyn Fn() -> T> = Rc::new(compute);
        let cache: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));

        let run = {
            let compute = compute.clone();
            let cache = cache.clone();
            move || {
                let value = compute();
                *cache.borrow_mut() = Some(value);
            }
        };
        // Invalidate instead of recomputing eagerly; downstream readers are
        // notified once per fresh-to-dirty transition.
        let scheduler = {
            let cache = cache.clone();
            move || {
                let was_fresh = cache.borrow_mut().take().is_some();
                if was_fresh {
                    graph::trigger(id);
                }
            }
        };
        let effect = Effect::with_scheduler(run, scheduler);

        Self(Rc::new(ComputedInner {
            id,
            compute,
            cache,
            effect,
        }))
    }

    pub fn get(&self) -> T {
        graph::track(self.0.id);
        if self.0.cache.borrow().is_none() {
            self.0.effect.run();
        }
        if let Some(value) = self.0.cache.borrow().as_ref() {
            return value.clone();
        }
        // Effect was stopped out from under us; compute directly, untracked.
        graph::untracked(|| (self.0.compute)())
    }
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Drop for ComputedInner<T> {
    fn drop(&mut self) {
        self.effect.stop();
        graph::drop_source(self.id);
    }
}
