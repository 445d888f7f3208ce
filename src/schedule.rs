//! Delayed callbacks. The browser runs them on `setTimeout`; tests drive a
//! [`VirtualClock`] by hand.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask;
}

/// Handle to a pending task. Cancelling is idempotent; a cancelled task never runs.
#[derive(Debug, Clone, Default)]
pub struct ScheduledTask {
    cancelled: Rc<Cell<bool>>,
}

impl ScheduledTask {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    fn guard(&self, task: Task) -> impl FnOnce() + 'static {
        let cancelled = self.cancelled.clone();
        move || {
            if !cancelled.get() {
                task();
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        let handle = ScheduledTask::default();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, handle.guard(task)).forget();
        handle
    }
}

struct PendingTask {
    due: Duration,
    seq: u64,
    run: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

/// Manually advanced clock. Tasks fire in due order, ties in scheduling order.
#[derive(Clone, Default)]
pub struct VirtualClock {
    state: Rc<RefCell<ClockState>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Moves time forward by `by`, running every task that comes due on the
    /// way. Tasks scheduled by a running task are honored if they fall inside
    /// the window.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due_index = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.due <= target)
                    .min_by_key(|(_, task)| (task.due, task.seq))
                    .map(|(index, _)| index);
                match due_index {
                    Some(index) => {
                        let task = state.pending.swap_remove(index);
                        state.now = task.due;
                        Some(task)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            match next {
                Some(task) => (task.run)(),
                None => break,
            }
        }
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        let handle = ScheduledTask::default();
        let mut state = self.state.borrow_mut();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.now + delay;
        state.pending.push(PendingTask {
            due,
            seq,
            run: Box::new(handle.guard(task)),
        });
        handle
    }
}
