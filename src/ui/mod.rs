//! 描画ポート
//!
//! 状態機械（デバウンス、並べ替え、選択、検証）と描画面を切り離すための最小限のトレイト群。
//! コンポーネントは表示モデルを渡すだけで、マークアップは組み立てない。

pub mod terminal;

use crate::notify::{Notification, NotificationId};
use dreamdrape_common::{ChartKind, DashboardView};

/// 検索候補1件の表示モデル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRow {
    pub name: String,
    pub price_label: String,
}

/// カート件数バッジ。件数0のときは非表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartBadge {
    pub count: u32,
    pub visible: bool,
}

impl CartBadge {
    pub fn from_count(count: u32) -> Self {
        Self { count, visible: count > 0 }
    }
}

pub trait NotificationSink: Send + Sync {
    fn show(&self, notification: &Notification);
    fn dismiss(&self, id: NotificationId);
}

pub trait SuggestionView: Send + Sync {
    fn render(&self, rows: &[SuggestionRow]);
    fn clear(&self);
}

pub trait CartBadgeView: Send + Sync {
    fn render(&self, badge: CartBadge);
}

/// ページ遷移
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
    fn reload(&self);
}

/// 対話的な確認
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// 操作をブロックする読み込み表示
pub trait LoadingIndicator: Send + Sync {
    fn show(&self, message: &str);
    fn hide(&self);
}

pub trait FieldErrorView: Send + Sync {
    fn show_error(&self, field: &str, message: &str);
    fn clear_error(&self, field: &str);
}

pub trait DashboardSurface: Send + Sync {
    fn render(&self, view: &DashboardView);
}

/// 外部のチャート描画。データは加工せずそのまま渡す
pub trait ChartSink: Send + Sync {
    fn render(&self, kind: ChartKind, data: &serde_json::Value);
}

/// スコープを抜けると必ず読み込み表示を消す
pub struct LoadingGuard<'a> {
    indicator: &'a dyn LoadingIndicator,
}

impl<'a> LoadingGuard<'a> {
    pub fn show(indicator: &'a dyn LoadingIndicator, message: &str) -> Self {
        indicator.show(message);
        Self { indicator }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}
