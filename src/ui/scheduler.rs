use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gtk4::glib;
use memorama_core::{OnceTask, RepeatingTask, Scheduler, TaskId};

/// Runs game timers as GLib main-loop sources.
///
/// `SourceId::remove` panics on a source that already finished, so one-shot
/// sources drop their own entry when they fire and `cancel` only removes
/// what is still registered.
#[derive(Default)]
pub struct GlibScheduler {
    next_id: Cell<u64>,
    sources: Rc<RefCell<HashMap<TaskId, glib::SourceId>>>,
}

impl GlibScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> TaskId {
        let raw = self.next_id.get();
        self.next_id.set(raw + 1);
        TaskId::from_raw(raw)
    }
}

impl Scheduler for GlibScheduler {
    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TaskId {
        let id = self.allocate();
        let sources = Rc::downgrade(&self.sources);
        let source = glib::timeout_add_local_once(delay, move || {
            if let Some(sources) = sources.upgrade() {
                sources.borrow_mut().remove(&id);
            }
            task();
        });
        self.sources.borrow_mut().insert(id, source);
        id
    }

    fn schedule_repeating(&self, period: Duration, mut task: RepeatingTask) -> TaskId {
        let id = self.allocate();
        let source = glib::timeout_add_local(period.max(Duration::from_millis(1)), move || {
            task();
            glib::ControlFlow::Continue
        });
        self.sources.borrow_mut().insert(id, source);
        id
    }

    fn cancel(&self, id: TaskId) {
        let source = self.sources.borrow_mut().remove(&id);
        if let Some(source) = source {
            source.remove();
        }
    }
}

impl Drop for GlibScheduler {
    fn drop(&mut self) {
        for (_, source) in self.sources.borrow_mut().drain() {
            source.remove();
        }
    }
}
