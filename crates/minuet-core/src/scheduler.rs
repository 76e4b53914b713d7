//! Deduplicating job queue flushed once per tick.
//!
//! Update work is expressed as [`Job`]s. Enqueuing the same job twice within
//! a tick runs it once; jobs enqueued while a flush is in progress are folded
//! into the same cycle, so a watcher that re-triggers itself converges
//! without waiting for another tick.
//!
//! There is no ambient microtask queue in Rust, so the tick boundary is an
//! explicit primitive: the host (or a test) calls [`next_tick`] to run the
//! pending flush. Until then, enqueued jobs sit in the queue.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[cfg(debug_assertions)]
const RECURSION_LIMIT: u32 = 100;

/// A schedulable unit of deferred work. Cloning shares the job; dedupe and
/// identity are by reference.
#[derive(Clone)]
pub struct Job(Rc<JobInner>);

struct JobInner {
    run: Box<dyn Fn()>,
    active: Cell<bool>,
    allow_recurse: bool,
}

impl Job {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(JobInner {
            run: Box::new(f),
            active: Cell::new(true),
            allow_recurse: false,
        }))
    }

    /// A job that may re-enqueue itself during its own execution and run
    /// again within the same flush cycle. Watcher callbacks use this; it is
    /// the caller's responsibility not to loop forever.
    pub fn allow_recurse(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(JobInner {
            run: Box::new(f),
            active: Cell::new(true),
            allow_recurse: true,
        }))
    }

    /// Permanently disable the job. A queued but not yet flushed job becomes
    /// a no-op rather than running against torn-down state.
    pub fn deactivate(&self) {
        self.0.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.0.active.get()
    }

    fn allows_recurse(&self) -> bool {
        self.0.allow_recurse
    }

    fn invoke(&self) {
        (self.0.run)()
    }

    fn same(a: &Job, b: &Job) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    #[cfg(debug_assertions)]
    fn key(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

#[derive(Default)]
struct Scheduler {
    queue: Vec<Job>,
    flush_index: usize,
    is_flushing: bool,
    is_flush_pending: bool,
}

thread_local! {
    static SCHEDULER: RefCell<Scheduler> = RefCell::new(Scheduler::default());
}

/// Enqueue `job` unless it is already queued at or after the dedupe cursor.
///
/// While a flush is running, the cursor is the currently executing position,
/// or one past it for jobs that allow recursion — so an ordinary job cannot
/// duplicate itself within the unprocessed part of the cycle, while a
/// recursing watcher can append itself once more.
pub fn queue_job(job: &Job) {
    SCHEDULER.with(|s| {
        let mut s = s.borrow_mut();
        let start = if s.is_flushing {
            if job.allows_recurse() {
                s.flush_index + 1
            } else {
                s.flush_index
            }
        } else {
            0
        };
        let queued = s
            .queue
            .get(start..)
            .unwrap_or(&[])
            .iter()
            .any(|q| Job::same(q, job));
        if !queued {
            s.queue.push(job.clone());
        }
        // Idempotent: one pending flush at a time, and never while flushing.
        if !s.is_flushing && !s.is_flush_pending {
            s.is_flush_pending = true;
        }
    });
}

/// Run the pending flush cycle, if any. Returns once every queued job
/// (including jobs appended mid-cycle) has executed. No-op when idle.
pub fn next_tick() {
    let pending = SCHEDULER.with(|s| s.borrow().is_flush_pending);
    if pending {
        flush_jobs();
    }
}

/// [`next_tick`], then `f`. The callback observes post-flush state.
pub fn next_tick_then<R>(f: impl FnOnce() -> R) -> R {
    next_tick();
    f()
}

/// Resets the scheduler on the way out of a flush cycle, panic or not.
struct FlushGuard;

impl Drop for FlushGuard {
    fn drop(&mut self) {
        SCHEDULER.with(|s| {
            let mut s = s.borrow_mut();
            s.flush_index = 0;
            s.queue.clear();
            s.is_flushing = false;
        });
    }
}

fn flush_jobs() {
    SCHEDULER.with(|s| {
        let mut s = s.borrow_mut();
        s.is_flush_pending = false;
        s.is_flushing = true;
        s.flush_index = 0;
    });
    let _guard = FlushGuard;

    #[cfg(debug_assertions)]
    let mut seen: std::collections::HashMap<usize, u32> = std::collections::HashMap::new();

    loop {
        // Re-read the live queue each step: jobs enqueued during the flush
        // land beyond the cursor and still run in this cycle.
        let job = SCHEDULER.with(|s| {
            let s = s.borrow();
            s.queue.get(s.flush_index).cloned()
        });
        let Some(job) = job else { break };

        if job.is_active() {
            #[cfg(debug_assertions)]
            let skip = check_recursive_updates(&mut seen, &job);
            #[cfg(not(debug_assertions))]
            let skip = false;

            if !skip {
                job.invoke();
            }
        }

        SCHEDULER.with(|s| s.borrow_mut().flush_index += 1);
    }
}

#[cfg(debug_assertions)]
fn check_recursive_updates(seen: &mut std::collections::HashMap<usize, u32>, job: &Job) -> bool {
    let count = seen.entry(job.key()).or_insert(0);
    if *count > RECURSION_LIMIT {
        log::warn!(
            "maximum recursive updates exceeded; a reactive effect is mutating its own \
             dependencies and recursively triggering itself"
        );
        return true;
    }
    *count += 1;
    false
}

#[cfg(test)]
pub(crate) fn queue_len() -> usize {
    SCHEDULER.with(|s| s.borrow().queue.len())
}
