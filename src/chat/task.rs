use tokio::task::{JoinError, JoinHandle};

/// Owns a spawned task and aborts it when dropped.
///
/// Every background task the session starts is held in one of these, so
/// replacing or clearing the field is all it takes to stop the task.
#[derive(Debug)]
pub(crate) struct TaskGuard<T = ()> {
    handle: JoinHandle<T>,
}

impl<T> TaskGuard<T> {
    pub(crate) fn new(handle: JoinHandle<T>) -> Self {
        Self { handle }
    }

    /// Waits for the task to finish.  A panic inside the task comes back as
    /// an `Err` instead of unwinding into the caller.
    pub(crate) async fn join(&mut self) -> Result<T, JoinError> {
        (&mut self.handle).await
    }
}

impl<T> Drop for TaskGuard<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn dropping_guard_aborts_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = Arc::clone(&ran);
        let guard = TaskGuard::new(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            ran_clone.store(true, Ordering::Relaxed);
        }));
        drop(guard);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!ran.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn join_reports_panics() {
        let mut guard = TaskGuard::new(tokio::spawn(async {
            panic!("backend blew up");
        }));
        let err = guard.join().await.unwrap_err();
        assert!(err.is_panic());
    }

    #[tokio::test]
    async fn join_returns_output() {
        let mut guard = TaskGuard::new(tokio::spawn(async { 7 }));
        assert_eq!(guard.join().await.unwrap(), 7);
    }
}
