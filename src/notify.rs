//! 通知センター
//!
//! 一時的な状態メッセージを表示し、TTLが設定されていれば自動で消す。
//! すべてのコンポーネントが操作結果の報告にこれを使う。

use crate::config::Config;
use crate::ui::NotificationSink;
use dreamdrape_common::Severity;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    /// `None` なら手動で閉じるまで残る
    pub ttl: Option<Duration>,
}

#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

struct Inner {
    sink: Arc<dyn NotificationSink>,
    ttl: Option<Duration>,
    active: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
}

impl NotificationCenter {
    pub fn new(sink: Arc<dyn NotificationSink>, ttl: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Inner {
                sink,
                ttl,
                active: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// ストアフロント用: 設定のTTLで自動的に消える
    pub fn storefront(sink: Arc<dyn NotificationSink>, config: &Config) -> Self {
        Self::new(sink, Some(config.notification_ttl()))
    }

    /// 管理画面用: `admin_auto_dismiss` が無効なら手動で閉じるまで残る
    pub fn admin(sink: Arc<dyn NotificationSink>, config: &Config) -> Self {
        Self::new(sink, config.admin_auto_dismiss.then(|| config.notification_ttl()))
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            ttl: self.inner.ttl,
        };
        debug!(?id, severity = severity.as_str(), message = %notification.message, "notify");

        self.inner.sink.show(&notification);
        self.lock_active().push(notification);

        if let Some(ttl) = self.inner.ttl {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let center = self.clone();
                    handle.spawn(async move {
                        tokio::time::sleep(ttl).await;
                        center.dismiss(id);
                    });
                }
                Err(_) => warn!(?id, "no runtime, notification will not auto-dismiss"),
            }
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Info)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Warning)
    }

    /// 通知を閉じる。既に閉じていれば `false`
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut active = self.lock_active();
            let before = active.len();
            active.retain(|n| n.id != id);
            active.len() != before
        };
        if removed {
            self.inner.sink.dismiss(id);
        }
        removed
    }

    /// 表示中の通知（古い順）
    pub fn active(&self) -> Vec<Notification> {
        self.lock_active().clone()
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.inner.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}
