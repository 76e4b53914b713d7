//! # Signals, computed values, and effects
//!
//! Minuet's reactive cells live here. There are three pieces:
//!
//! - `Signal<T>` — observable, reactive value.
//! - `Computed<T>` — lazily cached value derived from other cells.
//! - `Effect` — a recompute unit that re-runs when its dependencies change.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use minuet_reactive::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Reads participate in a dependency graph: when you call `get()` inside a
//! running effect, future writes will automatically re-run that effect.
//!
//! ## Computed values
//!
//! `Computed<T>` caches its result and recomputes only after a dependency
//! changed, and only when read again:
//!
//! ```rust
//! use minuet_reactive::*;
//!
//! let count = signal(2);
//! let double = Computed::new({
//!     let count = count.clone();
//!     move || count.get() * 2
//! });
//! assert_eq!(double.get(), 4);
//!
//! count.set(5);
//! assert_eq!(double.get(), 10);
//! ```
//!
//! ## Effects and flush modes
//!
//! An `Effect` created with [`Effect::new`] re-runs synchronously when a
//! dependency changes. One created with [`Effect::with_scheduler`] (or
//! retargeted via [`Effect::set_scheduler`]) instead hands control to the
//! scheduler callback, which decides when `run()` happens. This is the seam
//! a batching job queue plugs into: the scheduler enqueues a job, and the
//! job calls `run()` at flush time.
//!
//! `Effect::stop` removes the effect from the graph; it is idempotent and
//! a stopped effect never triggers again.
//!
//! The graph is thread-local. All cells and effects are single-threaded
//! (`Rc`-based) by design.

pub mod computed;
pub mod effect;
pub mod graph;
pub mod signal;
pub mod tests;

pub use computed::Computed;
pub use effect::Effect;
pub use graph::untracked;
pub use signal::{ReadSignal, Signal, signal};
