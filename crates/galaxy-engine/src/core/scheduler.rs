//! Cooperative frame scheduler.
//!
//! Models the host's animation-frame and timeout queues so every recurring
//! behavior is an explicit, cancelable task. Frame tasks are one-shot like
//! `requestAnimationFrame`: a task that wants another frame must request it
//! again while running. Timers fire on the first frame at or after their
//! deadline.

/// Kinds of work the view schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Task {
    /// Debounced resize application (timer).
    ResizeSettle,
    /// One step of the zoom transition.
    ZoomStep,
    /// The main per-frame update and draw.
    RenderLoop,
}

/// Cancellation token for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    handle: TaskHandle,
    task: Task,
    /// `None` for frame tasks, deadline in ms for timers.
    due_ms: Option<f64>,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    entries: Vec<Scheduled>,
    next_id: u64,
    requested: u64,
    cancelled: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, task: Task, due_ms: Option<f64>) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        self.entries.push(Scheduled { handle, task, due_ms });
        handle
    }

    /// Run `task` on the next frame.
    pub fn request_frame(&mut self, task: Task) -> TaskHandle {
        self.push(task, None)
    }

    /// Run `task` on the first frame at or after `now_ms + delay_ms`.
    pub fn set_timeout(&mut self, task: Task, delay_ms: f64, now_ms: f64) -> TaskHandle {
        self.push(task, Some(now_ms + delay_ms))
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if let Some(idx) = self.entries.iter().position(|e| e.handle == handle) {
            self.entries.remove(idx);
            self.cancelled += 1;
            true
        } else {
            false
        }
    }

    /// Cancel everything still pending. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        self.cancelled += n as u64;
        n
    }

    /// Remove and return the tasks due at `now_ms`, ordered timers first,
    /// then zoom steps, then the render loop.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(TaskHandle, Task)> {
        let mut due = Vec::new();
        self.entries.retain(|e| {
            let ready = e.due_ms.map_or(true, |d| d <= now_ms);
            if ready {
                due.push((e.handle, e.task));
            }
            !ready
        });
        due.sort_by_key(|(_, task)| *task);
        due
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Number of pending tasks of one kind.
    pub fn pending_of(&self, task: Task) -> usize {
        self.entries.iter().filter(|e| e.task == task).count()
    }

    /// Whether the host needs to request another animation frame.
    pub fn wants_frame(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Total tasks ever scheduled.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total tasks cancelled before running.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}
