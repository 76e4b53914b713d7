use std::cell::RefCell;
use std::rc::Rc;

use crate::graph::{self, SourceId};

/// Observable, reactive value. Cloning shares the underlying cell.
pub struct Signal<T: 'static>(Rc<SignalInner<T>>);

struct SignalInner<T> {
    id: SourceId,
    value: RefCell<T>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(SignalInner {
            id: graph::new_source(),
            value: RefCell::new(value),
        }))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        graph::track(self.0.id);
        self.0.value.borrow().clone()
    }

    /// Read without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        graph::track(self.0.id);
        f(&self.0.value.borrow())
    }

    pub fn set(&self, value: T) {
        {
            *self.0.value.borrow_mut() = value;
        }
        graph::trigger(self.0.id);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            f(&mut self.0.value.borrow_mut());
        }
        graph::trigger(self.0.id);
    }

    /// Read-only handle to the same cell.
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal(self.clone())
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Drop for SignalInner<T> {
    fn drop(&mut self) {
        graph::drop_source(self.id);
    }
}

/// Read half of a [`Signal`]. Reads still register dependencies.
pub struct ReadSignal<T: 'static>(Signal<T>);

impl<T> ReadSignal<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

pub fn signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}
