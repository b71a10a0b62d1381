//! Deferred work on a single-threaded event loop.

use std::cell::RefCell;
use std::time::Duration;

pub type OnceTask = Box<dyn FnOnce()>;
pub type RepeatingTask = Box<dyn FnMut()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn from_raw(raw: u64) -> Self {
        TaskId(raw)
    }
}

/// Source of timed callbacks. Tasks always run on the thread that owns the
/// scheduler, never re-entrantly from `schedule_*` or `cancel`.
pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TaskId;
    fn schedule_repeating(&self, period: Duration, task: RepeatingTask) -> TaskId;
    /// Unknown or finished ids are ignored.
    fn cancel(&self, id: TaskId);
}

enum TaskKind {
    Once(OnceTask),
    Repeating { period: Duration, task: RepeatingTask },
}

struct Entry {
    due: Duration,
    seq: u64,
    id: TaskId,
    kind: TaskKind,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry>,
    running: Option<TaskId>,
    running_cancelled: bool,
}

impl ManualInner {
    fn push(&mut self, due: Duration, id: TaskId, kind: TaskKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { due, seq, id, kind });
    }

    fn take_next_due(&mut self, until: Duration) -> Option<Entry> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(idx, _)| idx)?;
        Some(self.entries.swap_remove(position))
    }
}

/// Virtual clock: nothing happens until [`ManualScheduler::advance`].
#[derive(Default)]
pub struct ManualScheduler {
    inner: RefCell<ManualInner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Moves the clock forward, running every task that falls due on the way
    /// in due-time order. Tasks scheduled while advancing run too if they
    /// fall inside the window.
    pub fn advance(&self, by: Duration) {
        let until = self.inner.borrow().now + by;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let next = inner.take_next_due(until);
                if let Some(entry) = &next {
                    inner.now = entry.due;
                    inner.running = Some(entry.id);
                    inner.running_cancelled = false;
                }
                next
            };
            let Some(entry) = next else {
                break;
            };

            match entry.kind {
                TaskKind::Once(task) => {
                    task();
                    let mut inner = self.inner.borrow_mut();
                    inner.running = None;
                }
                TaskKind::Repeating { period, mut task } => {
                    task();
                    let mut inner = self.inner.borrow_mut();
                    inner.running = None;
                    if !inner.running_cancelled {
                        inner.push(entry.due + period, entry.id, TaskKind::Repeating { period, task });
                    }
                }
            }
        }
        self.inner.borrow_mut().now = until;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    fn allocate(&self) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        TaskId(inner.next_id)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TaskId {
        let id = self.allocate();
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + delay;
        inner.push(due, id, TaskKind::Once(task));
        id
    }

    fn schedule_repeating(&self, period: Duration, task: RepeatingTask) -> TaskId {
        let period = period.max(Duration::from_millis(1));
        let id = self.allocate();
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + period;
        inner.push(due, id, TaskKind::Repeating { period, task });
        id
    }

    fn cancel(&self, id: TaskId) {
        let mut inner = self.inner.borrow_mut();
        if inner.running == Some(id) {
            inner.running_cancelled = true;
        }
        inner.entries.retain(|entry| entry.id != id);
    }
}
