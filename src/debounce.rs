//! Run only the last of a burst of calls, once the calls have stopped for a
//! quiet period.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::task::JoinHandle;

/// How long the memo search box must be still before the list is queried.
pub const MEMO_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Schedules at most one pending task, replacing it on every new call.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer that waits for `delay` of quiet before running a task.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Run `task` after the quiet period, cancelling the task scheduled by
    /// any earlier call that has not run yet.
    pub fn call<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        // The guarded value is only ever replaced whole, so a poisoned lock is still usable.
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Drop the pending task, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(MEMO_SEARCH_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use tokio::time::sleep;

    use super::{Debouncer, MEMO_SEARCH_DEBOUNCE};

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<AtomicUsize>,
        last_value: Arc<Mutex<Option<String>>>,
    }

    impl Recorder {
        fn record(&self, value: &str) -> impl Future<Output = ()> + Send + 'static {
            let recorder = self.clone();
            let value = value.to_owned();

            async move {
                recorder.calls.fetch_add(1, Ordering::SeqCst);
                *recorder.last_value.lock().unwrap() = Some(value);
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_value(&self) -> Option<String> {
            self.last_value.lock().unwrap().clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_calls_runs_last_call_once() {
        let debouncer = Debouncer::new(MEMO_SEARCH_DEBOUNCE);
        let recorder = Recorder::default();

        debouncer.call(recorder.record("k"));
        sleep(Duration::from_millis(20)).await;
        debouncer.call(recorder.record("ko"));
        sleep(Duration::from_millis(20)).await;
        debouncer.call(recorder.record("kon"));
        sleep(Duration::from_millis(400)).await;

        assert_eq!(recorder.calls(), 1);
        assert_eq!(recorder.last_value().as_deref(), Some("kon"));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_runs_before_quiet_period() {
        let debouncer = Debouncer::new(MEMO_SEARCH_DEBOUNCE);
        let recorder = Recorder::default();

        debouncer.call(recorder.record("a"));
        sleep(Duration::from_millis(299)).await;

        assert_eq!(recorder.calls(), 0);

        sleep(Duration::from_millis(2)).await;

        assert_eq!(recorder.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_calls_each_run() {
        let debouncer = Debouncer::new(MEMO_SEARCH_DEBOUNCE);
        let recorder = Recorder::default();

        debouncer.call(recorder.record("first"));
        sleep(Duration::from_millis(400)).await;
        debouncer.call(recorder.record("second"));
        sleep(Duration::from_millis(400)).await;

        assert_eq!(recorder.calls(), 2);
        assert_eq!(recorder.last_value().as_deref(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_call() {
        let debouncer = Debouncer::new(MEMO_SEARCH_DEBOUNCE);
        let recorder = Recorder::default();

        debouncer.call(recorder.record("typo"));
        debouncer.cancel();
        sleep(Duration::from_millis(400)).await;

        assert_eq!(recorder.calls(), 0);
    }
}
