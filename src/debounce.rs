//! デバウンスタイマー
//!
//! `schedule` は保留中のアクションを取り消してから新しく仕掛ける。
//! 1つのタイマーに保留中のアクションは常に高々1つ。

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct DebounceTimer {
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `delay` 経過後に `action` を実行する
    ///
    /// `action` は発火時に呼ばれるので、その時点の状態を読める。
    /// 発火後のアクションは独立したタスクで動き、以降の `schedule` / `cancel` では止まらない。
    pub fn schedule<F, Fut>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action());
        }));
    }

    /// 保留中のアクションを発火させずに破棄する。破棄したら `true`
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_schedules_fire_last_once() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut timer = DebounceTimer::new();

        for i in 0..5 {
            let fired = fired.clone();
            timer.schedule(Duration::from_millis(300), move || async move {
                fired.lock().unwrap().push(i);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(250)).await;
        settle().await;
        assert_eq!(*fired.lock().unwrap(), vec![4]);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let fired = Arc::new(Mutex::new(0));
        let mut timer = DebounceTimer::new();

        let counter = fired.clone();
        timer.schedule(Duration::from_millis(300), move || async move {
            *counter.lock().unwrap() += 1;
        });
        assert!(timer.is_pending());
        assert!(timer.cancel());
        assert!(!timer.cancel());

        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(*fired.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_after_fire() {
        let fired = Arc::new(Mutex::new(0));
        let mut timer = DebounceTimer::new();

        for _ in 0..2 {
            let counter = fired.clone();
            timer.schedule(Duration::from_millis(300), move || async move {
                *counter.lock().unwrap() += 1;
            });
            tokio::time::sleep(Duration::from_millis(301)).await;
            settle().await;
        }
        assert_eq!(*fired.lock().unwrap(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_burst_within_window_fires_once(gaps in proptest::collection::vec(0u64..300, 1..10)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();
            let fired = rt.block_on(async {
                let fired = Arc::new(Mutex::new(Vec::new()));
                let mut timer = DebounceTimer::new();
                for (i, gap) in gaps.iter().enumerate() {
                    let fired = fired.clone();
                    timer.schedule(Duration::from_millis(300), move || async move {
                        fired.lock().unwrap().push(i);
                    });
                    tokio::time::sleep(Duration::from_millis(*gap)).await;
                }
                tokio::time::sleep(Duration::from_millis(400)).await;
                settle().await;
                let result = fired.lock().unwrap().clone();
                result
            });
            prop_assert_eq!(fired, vec![gaps.len() - 1]);
        }
    }
}
