//! Thread-safe task queues shared by render workers.
//!
//! Producers push every task and then call `finish`. Consumers block in
//! `pop` until a task arrives, and get `None` once the queue is finished
//! and drained.

use crate::RenderTask;
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

pub trait TaskQueue: Send + Sync {
    /// Enqueue a task. Tasks pushed after `finish` are dropped.
    fn push(&self, task: RenderTask);

    /// Next task in FIFO order, blocking while the queue is empty but not
    /// finished.
    fn pop(&self) -> Option<RenderTask>;

    /// Mark that no more tasks will be pushed and wake all waiting workers.
    fn finish(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which queue implementation a parallel render uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueKind {
    /// Mutex + condition variable
    #[default]
    Blocking,
    /// Unbounded MPMC channel
    Channel,
}

impl QueueKind {
    pub fn create(self) -> Box<dyn TaskQueue> {
        match self {
            QueueKind::Blocking => Box::new(BlockingTaskQueue::new()),
            QueueKind::Channel => Box::new(ChannelTaskQueue::new()),
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    tasks: VecDeque<RenderTask>,
    finished: bool,
}

/// FIFO guarded by a mutex, with a condition variable for waiting workers.
#[derive(Debug, Default)]
pub struct BlockingTaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl BlockingTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // Tasks are plain data, so a panicked holder cannot leave them torn
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskQueue for BlockingTaskQueue {
    fn push(&self, task: RenderTask) {
        let mut state = self.lock();
        if state.finished {
            log::warn!("Dropping task {} pushed after finish", task.id);
            return;
        }
        state.tasks.push_back(task);
        drop(state);
        self.available.notify_one();
    }

    fn pop(&self) -> Option<RenderTask> {
        let state = self.lock();
        let mut state = self
            .available
            .wait_while(state, |s| s.tasks.is_empty() && !s.finished)
            .unwrap_or_else(PoisonError::into_inner);
        state.tasks.pop_front()
    }

    fn finish(&self) {
        self.lock().finished = true;
        self.available.notify_all();
    }

    fn len(&self) -> usize {
        self.lock().tasks.len()
    }
}

/// Queue backed by a crossbeam channel. `finish` drops the sender, which
/// disconnects the channel once it is drained.
#[derive(Debug)]
pub struct ChannelTaskQueue {
    sender: Mutex<Option<Sender<RenderTask>>>,
    receiver: Receiver<RenderTask>,
}

impl ChannelTaskQueue {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
        }
    }

    fn sender(&self) -> MutexGuard<'_, Option<Sender<RenderTask>>> {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChannelTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue for ChannelTaskQueue {
    fn push(&self, task: RenderTask) {
        match self.sender().as_ref() {
            // The receiver lives as long as self, so send cannot fail
            Some(sender) => {
                let _ = sender.send(task);
            }
            None => log::warn!("Dropping task {} pushed after finish", task.id),
        }
    }

    fn pop(&self) -> Option<RenderTask> {
        self.receiver.recv().ok()
    }

    fn finish(&self) {
        self.sender().take();
    }

    fn len(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    const KINDS: [QueueKind; 2] = [QueueKind::Blocking, QueueKind::Channel];

    fn task(id: usize) -> RenderTask {
        RenderTask::new(id, 0, 0, 1, 1)
    }

    #[test]
    fn test_fifo_order() {
        for kind in KINDS {
            let queue = kind.create();
            for id in 0..5 {
                queue.push(task(id));
            }
            assert_eq!(queue.len(), 5);
            queue.finish();

            let ids: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|t| t.id).collect();
            assert_eq!(ids, vec![0, 1, 2, 3, 4]);
            assert!(queue.is_empty());
        }
    }

    #[test]
    fn test_pop_after_finish_returns_none() {
        for kind in KINDS {
            let queue = kind.create();
            queue.finish();
            assert_eq!(queue.pop(), None);
            queue.push(task(9));
            assert_eq!(queue.pop(), None);
        }
    }

    #[test]
    fn test_waiting_worker_wakes_on_push() {
        for kind in KINDS {
            let queue = kind.create();
            thread::scope(|s| {
                let waiter = s.spawn(|| queue.pop());
                thread::sleep(Duration::from_millis(20));
                queue.push(task(3));
                assert_eq!(waiter.join().unwrap(), Some(task(3)));
            });
        }
    }

    #[test]
    fn test_waiting_workers_wake_on_finish() {
        for kind in KINDS {
            let queue = kind.create();
            thread::scope(|s| {
                let waiters: Vec<_> = (0..4).map(|_| s.spawn(|| queue.pop())).collect();
                thread::sleep(Duration::from_millis(20));
                queue.finish();
                for waiter in waiters {
                    assert_eq!(waiter.join().unwrap(), None);
                }
            });
        }
    }

    #[test]
    fn test_each_task_consumed_once() {
        for kind in KINDS {
            let queue = kind.create();
            let consumed = AtomicUsize::new(0);
            let id_sum = AtomicUsize::new(0);
            let n = 1000;

            thread::scope(|s| {
                for _ in 0..4 {
                    s.spawn(|| {
                        while let Some(t) = queue.pop() {
                            consumed.fetch_add(1, Ordering::Relaxed);
                            id_sum.fetch_add(t.id, Ordering::Relaxed);
                        }
                    });
                }
                for id in 0..n {
                    queue.push(task(id));
                }
                queue.finish();
            });

            assert_eq!(consumed.load(Ordering::Relaxed), n);
            assert_eq!(id_sum.load(Ordering::Relaxed), n * (n - 1) / 2);
        }
    }
}
