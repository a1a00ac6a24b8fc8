use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

pub trait PendingTimer {
    fn cancel(self: Box<Self>);
}

/// One-shot timers for debouncing.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Box<dyn PendingTimer>;
}

struct ManualQueue {
    now: Cell<f64>,
    next_id: Cell<u64>,
    tasks: RefCell<Vec<(u64, f64, Box<dyn FnOnce()>)>>,
}

/// Virtual clock that only moves when [`ManualScheduler::advance`] is called.
#[derive(Clone)]
pub struct ManualScheduler {
    queue: Rc<ManualQueue>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(ManualQueue {
                now: Cell::new(0.0),
                next_id: Cell::new(0),
                tasks: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Moves the clock forward, running every task that comes due on the way
    /// in due order.
    pub fn advance(&self, ms: u32) {
        let target = self.queue.now.get() + f64::from(ms);
        loop {
            let next = {
                let mut tasks = self.queue.tasks.borrow_mut();
                let position = tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, due, _))| *due <= target)
                    .min_by(|(_, a), (_, b)| {
                        a.1.partial_cmp(&b.1)
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then(a.0.cmp(&b.0))
                    })
                    .map(|(position, _)| position);
                position.map(|position| tasks.remove(position))
            };
            match next {
                Some((_, due, task)) => {
                    self.queue.now.set(due);
                    task();
                }
                None => break,
            }
        }
        self.queue.now.set(target);
    }

    pub fn pending(&self) -> usize {
        self.queue.tasks.borrow().len()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

struct ManualTimer {
    id: u64,
    queue: Weak<ManualQueue>,
}

impl PendingTimer for ManualTimer {
    fn cancel(self: Box<Self>) {
        if let Some(queue) = self.queue.upgrade() {
            queue.tasks.borrow_mut().retain(|(id, _, _)| *id != self.id);
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Box<dyn PendingTimer> {
        let id = self.queue.next_id.get();
        self.queue.next_id.set(id + 1);
        let due = self.queue.now.get() + f64::from(delay_ms);
        self.queue.tasks.borrow_mut().push((id, due, task));
        Box::new(ManualTimer {
            id,
            queue: Rc::downgrade(&self.queue),
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct WebScheduler;

#[cfg(target_arch = "wasm32")]
struct WebTimer(gloo_timers::callback::Timeout);

#[cfg(target_arch = "wasm32")]
impl PendingTimer for WebTimer {
    fn cancel(self: Box<Self>) {
        drop(self.0.cancel());
    }
}

#[cfg(target_arch = "wasm32")]
impl Scheduler for WebScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Box<dyn PendingTimer> {
        Box::new(WebTimer(gloo_timers::callback::Timeout::new(delay_ms, task)))
    }
}
