#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::computed::Computed;
    use crate::effect::Effect;
    use crate::graph::untracked;
    use crate::signal::signal;

    #[test]
    fn signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn signal_with_borrows() {
        let sig = signal(String::from("ab"));
        let len = sig.with(|s| s.len());
        assert_eq!(len, 2);
    }

    #[test]
    fn effect_reruns_on_write() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let effect = Effect::new({
            let sig = sig.clone();
            let seen = seen.clone();
            move || seen.borrow_mut().push(sig.get())
        });
        effect.run();
        assert_eq!(*seen.borrow(), vec![0]);

        sig.set(1);
        sig.set(2);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn effect_stop_is_idempotent() {
        let sig = signal(0);
        let runs = Rc::new(Cell::new(0));

        let effect = Effect::new({
            let sig = sig.clone();
            let runs = runs.clone();
            move || {
                sig.get();
                runs.set(runs.get() + 1);
            }
        });
        effect.run();
        assert_eq!(runs.get(), 1);

        effect.stop();
        effect.stop();
        assert!(!effect.is_active());

        sig.set(5);
        assert_eq!(runs.get(), 1, "stopped effect must not re-run");
    }

    #[test]
    fn effect_retracks_each_run() {
        let gate = signal(true);
        let a = signal(1);
        let b = signal(10);
        let runs = Rc::new(Cell::new(0));

        let effect = Effect::new({
            let (gate, a, b, runs) = (gate.clone(), a.clone(), b.clone(), runs.clone());
            move || {
                runs.set(runs.get() + 1);
                let _ = if gate.get() { a.get() } else { b.get() };
            }
        });
        effect.run();
        assert_eq!(runs.get(), 1);

        gate.set(false); // now depends on b, not a
        assert_eq!(runs.get(), 2);

        a.set(2);
        assert_eq!(runs.get(), 2, "stale dependency must not trigger");

        b.set(20);
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn scheduled_effect_defers_to_scheduler() {
        let sig = signal(0);
        let runs = Rc::new(Cell::new(0));
        let pending = Rc::new(Cell::new(0));

        let effect = Effect::with_scheduler(
            {
                let sig = sig.clone();
                let runs = runs.clone();
                move || {
                    sig.get();
                    runs.set(runs.get() + 1);
                }
            },
            {
                let pending = pending.clone();
                move || pending.set(pending.get() + 1)
            },
        );
        effect.run();
        assert_eq!(runs.get(), 1);

        sig.set(1);
        sig.set(2);
        assert_eq!(runs.get(), 1, "writes must not run the effect directly");
        assert_eq!(pending.get(), 2);

        effect.run();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn computed_caches_until_invalidated() {
        let count = signal(2);
        let computes = Rc::new(Cell::new(0));

        let double = Computed::new({
            let count = count.clone();
            let computes = computes.clone();
            move || {
                computes.set(computes.get() + 1);
                count.get() * 2
            }
        });
        assert_eq!(double.get(), 4);
        assert_eq!(double.get(), 4);
        assert_eq!(computes.get(), 1, "second read must hit the cache");

        count.set(3);
        assert_eq!(computes.get(), 1, "invalidation alone must not recompute");
        assert_eq!(double.get(), 6);
        assert_eq!(computes.get(), 2);
    }

    #[test]
    fn computed_notifies_downstream_effects() {
        let count = signal(1);
        let double = Computed::new({
            let count = count.clone();
            move || count.get() * 2
        });
        let seen = Rc::new(RefCell::new(Vec::new()));

        let effect = Effect::new({
            let double = double.clone();
            let seen = seen.clone();
            move || seen.borrow_mut().push(double.get())
        });
        effect.run();

        count.set(4);
        assert_eq!(*seen.borrow(), vec![2, 8]);
    }

    #[test]
    fn computed_chain() {
        let count = signal(1);
        let double = Computed::new({
            let count = count.clone();
            move || count.get() * 2
        });
        let quad = Computed::new({
            let double = double.clone();
            move || double.get() * 2
        });
        assert_eq!(quad.get(), 4);

        count.set(3);
        assert_eq!(quad.get(), 12);
    }

    #[test]
    fn untracked_reads_do_not_subscribe() {
        let sig = signal(0);
        let runs = Rc::new(Cell::new(0));

        let effect = Effect::new({
            let sig = sig.clone();
            let runs = runs.clone();
            move || {
                untracked(|| sig.get());
                runs.set(runs.get() + 1);
            }
        });
        effect.run();
        assert_eq!(runs.get(), 1);

        sig.set(1);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn read_only_handle_tracks() {
        let sig = signal(7);
        let read = sig.read_only();
        assert_eq!(read.get(), 7);

        let seen = Rc::new(Cell::new(0));
        let effect = Effect::new({
            let read = read.clone();
            let seen = seen.clone();
            move || seen.set(read.get())
        });
        effect.run();

        sig.set(9);
        assert_eq!(seen.get(), 9);
    }
}
