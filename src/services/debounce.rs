use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::services::scheduler::{PendingTimer, Scheduler};

struct State<A> {
    timer: Option<Box<dyn PendingTimer>>,
    args: Option<A>,
}

struct Shared<A> {
    action: Box<dyn Fn(A)>,
    delay_ms: u32,
    immediate: bool,
    scheduler: Rc<dyn Scheduler>,
    state: RefCell<State<A>>,
}

impl<A: 'static> Shared<A> {
    fn arm(self: &Rc<Self>) -> Box<dyn PendingTimer> {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.scheduler.schedule(
            self.delay_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.expire();
                }
            }),
        )
    }

    fn expire(&self) {
        let args = {
            let mut state = self.state.borrow_mut();
            state.timer = None;
            state.args.take()
        };
        if let Some(args) = args {
            (self.action)(args);
        }
    }
}

/// Collapses bursts of calls into a single invocation of the wrapped action.
///
/// Every call restarts the quiet period. The action runs once the period
/// elapses without another call, with the arguments of the most recent one.
/// With `immediate` the action runs on the first call of a burst instead and
/// the rest of the burst is swallowed. Dropping the wrapper cancels whatever
/// is pending.
pub struct Debounced<A: 'static> {
    shared: Rc<Shared<A>>,
}

pub fn wrap<A: 'static>(
    action: impl Fn(A) + 'static,
    delay_ms: u32,
    immediate: bool,
    scheduler: Rc<dyn Scheduler>,
) -> Debounced<A> {
    Debounced::new(action, delay_ms, immediate, scheduler)
}

impl<A: 'static> Debounced<A> {
    pub fn new(
        action: impl Fn(A) + 'static,
        delay_ms: u32,
        immediate: bool,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                action: Box::new(action),
                delay_ms,
                immediate,
                scheduler,
                state: RefCell::new(State {
                    timer: None,
                    args: None,
                }),
            }),
        }
    }

    pub fn call(&self, args: A) {
        let call_now = {
            let mut state = self.shared.state.borrow_mut();
            let call_now = self.shared.immediate && state.timer.is_none();
            if let Some(timer) = state.timer.take() {
                timer.cancel();
            }
            state.timer = Some(self.shared.arm());
            if self.shared.immediate {
                // Nothing trails a leading-edge burst, not even on flush.
                state.args = None;
                call_now.then_some(args)
            } else {
                state.args = Some(args);
                None
            }
        };
        if let Some(args) = call_now {
            (self.shared.action)(args);
        }
    }

    pub fn cancel(&self) {
        let mut state = self.shared.state.borrow_mut();
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
        state.args = None;
    }

    /// Runs the pending invocation right away and stops the timer.
    pub fn flush(&self) {
        let args = {
            let mut state = self.shared.state.borrow_mut();
            match state.timer.take() {
                Some(timer) => {
                    timer.cancel();
                    state.args.take()
                }
                None => None,
            }
        };
        if let Some(args) = args {
            (self.shared.action)(args);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.shared.state.borrow().timer.is_some()
    }
}

impl<A: 'static> Drop for Debounced<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scheduler::ManualScheduler;

    fn recorder(
        scheduler: &ManualScheduler,
        immediate: bool,
    ) -> (Debounced<u32>, Rc<RefCell<Vec<u32>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let c = calls.clone();
        let debounced = wrap(
            move |n| c.borrow_mut().push(n),
            500,
            immediate,
            Rc::new(scheduler.clone()),
        );
        (debounced, calls)
    }

    #[test]
    fn burst_collapses_into_one_trailing_call() {
        let scheduler = ManualScheduler::new();
        let (debounced, calls) = recorder(&scheduler, false);

        for n in 1..=5 {
            debounced.call(n);
            scheduler.advance(100);
        }
        assert!(calls.borrow().is_empty());

        scheduler.advance(499);
        assert!(calls.borrow().is_empty());
        scheduler.advance(1);
        assert_eq!(*calls.borrow(), vec![5]);
        assert!(!debounced.is_pending());
    }

    #[test]
    fn separate_quiet_periods_fire_separately() {
        let scheduler = ManualScheduler::new();
        let (debounced, calls) = recorder(&scheduler, false);

        debounced.call(1);
        scheduler.advance(600);
        debounced.call(2);
        scheduler.advance(600);
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn flush_runs_pending_call_now() {
        let scheduler = ManualScheduler::new();
        let (debounced, calls) = recorder(&scheduler, false);

        debounced.call(1);
        debounced.call(2);
        debounced.flush();
        assert_eq!(*calls.borrow(), vec![2]);
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(1000);
        debounced.flush();
        assert_eq!(*calls.borrow(), vec![2]);
    }

    #[test]
    fn cancel_discards_pending_call() {
        let scheduler = ManualScheduler::new();
        let (debounced, calls) = recorder(&scheduler, false);

        debounced.call(7);
        debounced.cancel();
        scheduler.advance(1000);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn immediate_fires_leading_edge_only() {
        let scheduler = ManualScheduler::new();
        let (debounced, calls) = recorder(&scheduler, true);

        debounced.call(1);
        debounced.call(2);
        debounced.call(3);
        assert_eq!(*calls.borrow(), vec![1]);

        scheduler.advance(500);
        assert_eq!(*calls.borrow(), vec![1]);

        debounced.call(4);
        assert_eq!(*calls.borrow(), vec![1, 4]);
    }

    #[test]
    fn flush_in_immediate_mode_only_reopens_the_edge() {
        let scheduler = ManualScheduler::new();
        let (debounced, calls) = recorder(&scheduler, true);

        debounced.call(1);
        debounced.call(2);
        debounced.flush();
        assert_eq!(*calls.borrow(), vec![1]);
        assert!(!debounced.is_pending());
        assert_eq!(scheduler.pending(), 0);

        debounced.call(3);
        assert_eq!(*calls.borrow(), vec![1, 3]);
    }

    #[test]
    fn dropping_cancels_timer() {
        let scheduler = ManualScheduler::new();
        let (debounced, calls) = recorder(&scheduler, false);

        debounced.call(1);
        drop(debounced);
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(1000);
        assert!(calls.borrow().is_empty());
    }
}
