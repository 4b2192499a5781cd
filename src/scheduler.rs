//! Timer abstraction.
//!
//! Components never call `setTimeout`/`setInterval` directly. They take an
//! `Rc<dyn Scheduler>`: in the browser that is `browser::BrowserScheduler`, in
//! tests a [`ManualScheduler`] whose virtual clock is stepped explicitly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Opaque id of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub(crate) u64);

pub trait Scheduler {
    /// Run `task` once after `delay_ms`.
    fn schedule_once(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle;
    /// Run `task` every `period_ms` until cancelled.
    fn schedule_repeating(&self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskHandle;
    /// Cancel a pending or repeating task. Unknown handles are ignored.
    fn cancel(&self, handle: TaskHandle);
}

/// A repeating task that can be started and stopped. Stops on drop.
pub struct RepeatingTask {
    scheduler: Rc<dyn Scheduler>,
    period_ms: u32,
    task: Rc<RefCell<dyn FnMut()>>,
    handle: Option<TaskHandle>,
}

impl RepeatingTask {
    pub fn new(scheduler: Rc<dyn Scheduler>, period_ms: u32, task: impl FnMut() + 'static) -> Self {
        Self {
            scheduler,
            period_ms,
            task: Rc::new(RefCell::new(task)),
            handle: None,
        }
    }

    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let task = self.task.clone();
        let handle = self.scheduler.schedule_repeating(
            self.period_ms,
            Box::new(move || (&mut *task.borrow_mut())()),
        );
        self.handle = Some(handle);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.stop();
    }
}

// --- Deterministic scheduler -------------------------------------------------

enum Job {
    Once(Box<dyn FnOnce()>),
    Every { period: u32, task: Box<dyn FnMut()> },
}

struct Entry {
    id: u64,
    due: u64,
    seq: u64, // tie-break: scheduling order
    job: Job,
}

/// Virtual-time scheduler. Nothing runs until [`ManualScheduler::advance`].
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    next_id: Cell<u64>,
    next_seq: Cell<u64>,
    queue: RefCell<Vec<Entry>>,
    running: Cell<Option<u64>>,
    running_cancelled: Cell<bool>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in ms.
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Advance virtual time by `ms`, running every task that falls due, in due
    /// order. Tasks scheduled while advancing run too if they fall inside the
    /// window.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        while let Some(entry) = self.pop_due(target) {
            self.now.set(entry.due);
            match entry.job {
                Job::Once(task) => task(),
                Job::Every { period, mut task } => {
                    self.running.set(Some(entry.id));
                    self.running_cancelled.set(false);
                    task();
                    self.running.set(None);
                    if !self.running_cancelled.get() {
                        let seq = self.bump_seq();
                        self.queue.borrow_mut().push(Entry {
                            id: entry.id,
                            due: entry.due + u64::from(period.max(1)),
                            seq,
                            job: Job::Every { period, task },
                        });
                    }
                }
            }
        }
        self.now.set(target);
    }

    fn pop_due(&self, target: u64) -> Option<Entry> {
        let mut queue = self.queue.borrow_mut();
        let idx = queue
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= target)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        Some(queue.remove(idx))
    }

    fn bump_seq(&self) -> u64 {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        seq
    }

    fn push(&self, delay_ms: u32, job: Job) -> TaskHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let seq = self.bump_seq();
        self.queue.borrow_mut().push(Entry {
            id,
            due: self.now.get() + u64::from(delay_ms),
            seq,
            job,
        });
        TaskHandle(id)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
        self.push(delay_ms, Job::Once(task))
    }

    fn schedule_repeating(&self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskHandle {
        self.push(
            period_ms.max(1),
            Job::Every {
                period: period_ms,
                task,
            },
        )
    }

    fn cancel(&self, handle: TaskHandle) {
        if self.running.get() == Some(handle.0) {
            self.running_cancelled.set(true);
        }
        self.queue.borrow_mut().retain(|e| e.id != handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journal() -> Rc<RefCell<Vec<(u64, &'static str)>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn once_tasks_run_in_due_order() {
        let sched = Rc::new(ManualScheduler::new());
        let seen = journal();
        for (delay, name) in [(30u32, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let seen = seen.clone();
            let s = sched.clone();
            sched.schedule_once(delay, Box::new(move || seen.borrow_mut().push((s.now(), name))));
        }
        sched.advance(25);
        assert_eq!(*seen.borrow(), vec![(10, "a"), (10, "a2"), (20, "b")]);
        assert_eq!(sched.now(), 25);
        sched.advance(5);
        assert_eq!(seen.borrow().last(), Some(&(30, "c")));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn tasks_scheduled_during_advance_run_in_same_window() {
        let sched = Rc::new(ManualScheduler::new());
        let seen = journal();
        let (s, inner_seen) = (sched.clone(), seen.clone());
        sched.schedule_once(
            10,
            Box::new(move || {
                let (s2, seen2) = (s.clone(), inner_seen.clone());
                s.schedule_once(5, Box::new(move || seen2.borrow_mut().push((s2.now(), "nested"))));
            }),
        );
        sched.advance(20);
        assert_eq!(*seen.borrow(), vec![(15, "nested")]);
    }

    #[test]
    fn repeating_task_runs_every_period_until_stopped() {
        let sched: Rc<ManualScheduler> = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let mut task = RepeatingTask::new(sched.clone(), 100, move || c.set(c.get() + 1));
        assert!(!task.is_running());
        task.start();
        task.start(); // second start is a no-op
        sched.advance(350);
        assert_eq!(count.get(), 3);
        task.stop();
        assert!(!task.is_running());
        sched.advance(1000);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn drop_stops_repeating_task() {
        let sched: Rc<ManualScheduler> = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));
        {
            let c = count.clone();
            let mut task = RepeatingTask::new(sched.clone(), 10, move || c.set(c.get() + 1));
            task.start();
            sched.advance(20);
        }
        sched.advance(100);
        assert_eq!(count.get(), 2);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn repeating_task_can_cancel_itself() {
        let sched = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));
        let handle: Rc<Cell<Option<TaskHandle>>> = Rc::new(Cell::new(None));
        let (s, c, h) = (sched.clone(), count.clone(), handle.clone());
        let id = sched.schedule_repeating(
            10,
            Box::new(move || {
                c.set(c.get() + 1);
                if c.get() == 2 {
                    if let Some(h) = h.get() {
                        s.cancel(h);
                    }
                }
            }),
        );
        handle.set(Some(id));
        sched.advance(100);
        assert_eq!(count.get(), 2);
    }
}
