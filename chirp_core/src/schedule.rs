use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

/// A spawned task that is aborted when cancelled or dropped.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Send `value` on `sender` once `delay` has passed.
    pub fn after<T: Send + 'static>(delay: Duration, sender: mpsc::UnboundedSender<T>, value: T) -> Self {
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            // The receiver is gone when the owner shut down; nothing left to notify.
            let _ = sender.send(value);
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Delivers only the last value scheduled within a quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    sender: mpsc::UnboundedSender<T>,
    pending: Option<ScheduledTask>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, sender: mpsc::UnboundedSender<T>) -> Self {
        Self {
            delay,
            sender,
            pending: None,
        }
    }

    /// Schedule `value`, cancelling whatever was pending.
    pub fn schedule(&mut self, value: T) {
        self.pending = Some(ScheduledTask::after(self.delay, self.sender.clone(), value));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}
