//! FIFO queue of pending tasks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::Task;

/// Shared, mutex-guarded FIFO of tasks waiting to run.
///
/// Cloning the queue clones the handle, not the contents: the dispatcher side
/// pushes and the scheduler pops through the same underlying sequence. Every
/// operation runs under the single lock, so no caller ever observes a
/// half-applied push or pop.
///
/// ## Examples
///
/// ```
/// use std::time::Duration;
/// use timer_lib::{Task, TaskQueue};
///
/// let queue = TaskQueue::new();
/// queue.push(Task::new("first", Duration::from_secs(1)));
/// queue.push(Task::new("second", Duration::from_secs(2)));
///
/// assert_eq!(queue.pop_front().unwrap().name(), "first");
/// assert_eq!(queue.pop_front().unwrap().name(), "second");
/// assert!(queue.pop_front().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    inner: Arc<Mutex<VecDeque<Task>>>,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task to the tail.
    pub fn push(&self, task: Task) {
        self.lock().push_back(task);
    }

    /// Removes and returns the head, or `None` when the queue is empty.
    pub fn pop_front(&self) -> Option<Task> {
        self.lock().pop_front()
    }

    /// Returns true if no tasks are waiting.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of tasks waiting.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // A panic while holding the lock cannot leave the deque half-mutated, so
    // a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
