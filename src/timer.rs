//! One-shot deferred tasks with explicit cancellation handles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use gloo::timers::callback::Timeout;

/// Identifies a scheduled task. Cancelling a fired or unknown handle is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle;
    fn cancel(&self, handle: TimerHandle);
    fn is_pending(&self, handle: TimerHandle) -> bool;
}

// ---------------- Browser -----------------

/// Schedules on `window.setTimeout`. Dropping a pending `Timeout` clears it
/// and frees its closure, so cancelled tasks release what they captured.
#[derive(Clone, Default)]
pub struct BrowserScheduler {
    next_id: Rc<RefCell<u64>>,
    pending: Rc<RefCell<BTreeMap<u64, Timeout>>>,
    after_fire: Option<Rc<dyn Fn()>>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `hook` after every fired task, e.g. to request a re-render.
    pub fn with_after_fire(mut self, hook: impl Fn() + 'static) -> Self {
        self.after_fire = Some(Rc::new(hook));
        self
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            *next
        };
        // Weak: the map owns the timeout, which owns this closure.
        let pending = Rc::downgrade(&self.pending);
        let hook = self.after_fire.clone();
        let ms = delay.as_millis().min(u32::MAX as u128) as u32;
        let timeout = Timeout::new(ms, move || {
            let Some(pending) = pending.upgrade() else {
                return;
            };
            let fired = pending.borrow_mut().remove(&id);
            if fired.is_some() {
                task();
                if let Some(hook) = hook {
                    hook();
                }
            }
        });
        tracing::trace!("timer {} scheduled in {}ms", id, ms);
        self.pending.borrow_mut().insert(id, timeout);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let removed = self.pending.borrow_mut().remove(&handle.0);
        if let Some(timeout) = removed {
            tracing::trace!("timer {} cancelled", handle.0);
            drop(timeout);
        }
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.borrow().contains_key(&handle.0)
    }
}

// ---------------- Virtual clock -----------------

struct ManualTask {
    due: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<u64, ManualTask>,
}

/// Scheduler driven by an explicit clock, for headless hosts and tests.
/// Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Moves the clock forward, running due tasks in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.borrow().now + by;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .tasks
                    .iter()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(id, t)| (t.due, **id))
                    .map(|(id, _)| *id);
                due.and_then(|id| inner.tasks.remove(&id)).map(|t| {
                    inner.now = t.due;
                    t.task
                })
            };
            // Borrow released: the task may schedule or cancel.
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        let due = inner.now + delay;
        inner.tasks.insert(id, ManualTask { due, task });
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.inner.borrow_mut().tasks.remove(&handle.0);
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.inner.borrow().tasks.contains_key(&handle.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tasks_fire_once_when_due() {
        let clock = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let handle = clock.schedule(Duration::from_millis(3000), Box::new(move || h.set(h.get() + 1)));

        clock.advance(Duration::from_millis(2999));
        assert_eq!(hits.get(), 0);
        assert!(clock.is_pending(handle));

        clock.advance(Duration::from_millis(1));
        assert_eq!(hits.get(), 1);
        assert!(!clock.is_pending(handle));

        clock.advance(Duration::from_secs(10));
        assert_eq!(hits.get(), 1);
        assert_eq!(clock.now(), Duration::from_millis(13000));
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let clock = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let handle = clock.schedule(Duration::from_millis(10), Box::new(move || h.set(1)));
        clock.cancel(handle);
        clock.cancel(handle);
        clock.advance(Duration::from_secs(1));
        assert_eq!(hits.get(), 0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn tasks_run_in_deadline_order() {
        let clock = ManualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (name, ms) in [("late", 30u64), ("early", 10), ("mid", 20)] {
            let order = order.clone();
            clock.schedule(Duration::from_millis(ms), Box::new(move || order.borrow_mut().push(name)));
        }
        clock.advance(Duration::from_millis(100));
        assert_eq!(*order.borrow(), vec!["early", "mid", "late"]);
    }
}
