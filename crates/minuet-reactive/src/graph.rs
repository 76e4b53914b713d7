use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use slotmap::{SecondaryMap, SlotMap, new_key_type};

new_key_type! {
    pub struct SourceId;
    pub struct EffectId;
}

struct EffectEntry {
    run: Rc<dyn Fn()>,
    scheduler: Option<Rc<dyn Fn()>>,
    running: bool,
}

#[derive(Default)]
struct Graph {
    // source -> effects that read it during their last run
    sources: SlotMap<SourceId, HashSet<EffectId>>,
    effects: SlotMap<EffectId, EffectEntry>,
    // effect -> sources it read during its last run
    deps: SecondaryMap<EffectId, HashSet<SourceId>>,
}

thread_local! {
    static GRAPH: RefCell<Graph> = RefCell::new(Graph::default());
    static ACTIVE: Cell<Option<EffectId>> = const { Cell::new(None) };
}

pub(crate) fn new_source() -> SourceId {
    GRAPH.with(|g| g.borrow_mut().sources.insert(HashSet::new()))
}

pub(crate) fn drop_source(id: SourceId) {
    // May run from a Drop impl during thread teardown, after the graph
    // itself has been destroyed.
    let _ = GRAPH.try_with(|g| {
        let mut g = g.borrow_mut();
        if let Some(subs) = g.sources.remove(id) {
            for e in subs {
                if let Some(d) = g.deps.get_mut(e) {
                    d.remove(&id);
                }
            }
        }
    });
}

/// Record a read of `id` by the currently running effect, if any.
pub(crate) fn track(id: SourceId) {
    let Some(effect) = ACTIVE.get() else { return };
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        if let Some(subs) = g.sources.get_mut(id) {
            subs.insert(effect);
        }
        if let Some(deps) = g.deps.get_mut(effect) {
            deps.insert(id);
        }
    });
}

/// Notify every effect subscribed to `id`. Effects with a scheduler are
/// deferred through it; plain effects re-run synchronously. An effect that
/// is already running is not re-entered.
pub(crate) fn trigger(id: SourceId) {
    let subs: Vec<EffectId> = GRAPH.with(|g| {
        g.borrow()
            .sources
            .get(id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    });
    for effect in subs {
        let scheduler = GRAPH.with(|g| {
            g.borrow()
                .effects
                .get(effect)
                .map(|e| (e.scheduler.clone(), e.running))
        });
        match scheduler {
            Some((Some(scheduler), _)) => scheduler(),
            Some((None, false)) => run_effect(effect),
            _ => {}
        }
    }
}

pub(crate) fn new_effect(run: Rc<dyn Fn()>, scheduler: Option<Rc<dyn Fn()>>) -> EffectId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.effects.insert(EffectEntry {
            run,
            scheduler,
            running: false,
        });
        g.deps.insert(id, HashSet::new());
        id
    })
}

pub(crate) fn set_scheduler(id: EffectId, scheduler: Rc<dyn Fn()>) {
    GRAPH.with(|g| {
        if let Some(e) = g.borrow_mut().effects.get_mut(id) {
            e.scheduler = Some(scheduler);
        }
    });
}

pub(crate) fn remove_effect(id: EffectId) {
    // Drop the removed entry after releasing the borrow: its destructor may
    // own other effects and re-enter remove_effect.
    let entry = GRAPH.try_with(|g| {
        let mut g = g.borrow_mut();
        let entry = g.effects.remove(id);
        let old = g.deps.remove(id).unwrap_or_default();
        for s in old {
            if let Some(subs) = g.sources.get_mut(s) {
                subs.remove(&id);
            }
        }
        entry
    });
    drop(entry);
}

/// Run an effect under dependency tracking. Previous edges are cleared
/// first so the dependency set always reflects the latest run.
pub(crate) fn run_effect(id: EffectId) {
    let run = GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let run = match g.effects.get_mut(id) {
            Some(e) if !e.running => {
                e.running = true;
                e.run.clone()
            }
            _ => return None,
        };
        let old: Vec<SourceId> = g
            .deps
            .get_mut(id)
            .map(|d| d.drain().collect())
            .unwrap_or_default();
        for s in old {
            if let Some(subs) = g.sources.get_mut(s) {
                subs.remove(&id);
            }
        }
        Some(run)
    });
    let Some(run) = run else { return };

    let prev = ACTIVE.replace(Some(id));
    run();
    ACTIVE.set(prev);

    GRAPH.with(|g| {
        if let Some(e) = g.borrow_mut().effects.get_mut(id) {
            e.running = false;
        }
    });
}

/// Run `f` with dependency tracking suspended.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let prev = ACTIVE.replace(None);
    let result = f();
    ACTIVE.set(prev);
    result
}
