use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::{Scheduler, TaskId};

const TICK: Duration = Duration::from_secs(1);

pub type TickCallback = Rc<dyn Fn(u32)>;

struct TimerInner {
    seconds: u32,
    task: Option<TaskId>,
    on_tick: TickCallback,
}

/// Whole-second stopwatch driven by a [`Scheduler`].
pub struct Timer {
    scheduler: Rc<dyn Scheduler>,
    inner: Rc<RefCell<TimerInner>>,
}

impl Timer {
    pub fn new(scheduler: Rc<dyn Scheduler>, on_tick: impl Fn(u32) + 'static) -> Self {
        Timer {
            scheduler,
            inner: Rc::new(RefCell::new(TimerInner {
                seconds: 0,
                task: None,
                on_tick: Rc::new(on_tick),
            })),
        }
    }

    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let id = self.scheduler.schedule_repeating(
            TICK,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let (seconds, on_tick) = {
                    let mut inner = inner.borrow_mut();
                    inner.seconds = inner.seconds.saturating_add(1);
                    (inner.seconds, inner.on_tick.clone())
                };
                on_tick(seconds);
            }),
        );
        self.inner.borrow_mut().task = Some(id);
    }

    pub fn stop(&self) {
        let task = self.inner.borrow_mut().task.take();
        if let Some(id) = task {
            self.scheduler.cancel(id);
        }
    }

    /// Stops and zeroes the clock without calling the tick callback.
    pub fn rewind(&self) {
        self.stop();
        self.inner.borrow_mut().seconds = 0;
    }

    pub fn reset(&self) {
        self.rewind();
        let on_tick = self.inner.borrow().on_tick.clone();
        on_tick(0);
    }

    pub fn elapsed(&self) -> u32 {
        self.inner.borrow().seconds
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().task.is_some()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `MM:SS`, minutes are not wrapped at the hour.
pub fn format_seconds(total_seconds: u32) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}
