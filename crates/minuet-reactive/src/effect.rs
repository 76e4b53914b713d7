use std::cell::Cell;
use std::rc::Rc;

use crate::graph::{self, EffectId};

/// Handle to a dependency-tracked recompute unit.
///
/// Creating an effect registers it but does not run it; call [`Effect::run`]
/// once to establish the initial dependency set. Cloning shares the handle,
/// so stopping any clone stops the effect.
#[derive(Clone)]
pub struct Effect {
    id: Rc<Cell<Option<EffectId>>>,
}

impl Effect {
    /// Effect that re-runs synchronously when a dependency changes.
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self {
            id: Rc::new(Cell::new(Some(graph::new_effect(Rc::new(f), None)))),
        }
    }

    /// Effect whose dependency changes invoke `scheduler` instead of the
    /// closure; the scheduler decides when `run()` happens.
    pub fn with_scheduler(f: impl Fn() + 'static, scheduler: impl Fn() + 'static) -> Self {
        Self {
            id: Rc::new(Cell::new(Some(graph::new_effect(
                Rc::new(f),
                Some(Rc::new(scheduler)),
            )))),
        }
    }

    /// Replace the flush mode of an existing effect. Used when the scheduler
    /// closure needs to capture a handle to this effect.
    pub fn set_scheduler(&self, scheduler: impl Fn() + 'static) {
        if let Some(id) = self.id.get() {
            graph::set_scheduler(id, Rc::new(scheduler));
        }
    }

    /// Run now, under tracking. No-op once stopped.
    pub fn run(&self) {
        if let Some(id) = self.id.get() {
            graph::run_effect(id);
        }
    }

    /// Remove the effect from the graph. Idempotent.
    pub fn stop(&self) {
        if let Some(id) = self.id.take() {
            graph::remove_effect(id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.id.get().is_some()
    }

    /// Whether two handles refer to the same effect.
    pub fn ptr_eq(&self, other: &Effect) -> bool {
        Rc::ptr_eq(&self.id, &other.id)
    }
}
