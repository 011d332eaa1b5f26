//! ダッシュボード表示モデル
//!
//! 集計値（カウンタ）と条件付きバッジを、描画境界へ渡す形に変換する。

use crate::types::DashboardStats;
use serde::Serialize;

/// カウンタ表示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterView {
    pub key: &'static str,
    pub value: Option<u64>,
}

/// バッジ表示。`visible == false` のときは描画しない
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub key: &'static str,
    pub value: u64,
    pub visible: bool,
}

impl BadgeView {
    /// 値が無い、またはゼロなら非表示
    pub fn from_value(key: &'static str, value: Option<u64>) -> Self {
        match value {
            Some(v) if v > 0 => Self { key, value: v, visible: true },
            _ => Self { key, value: 0, visible: false },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub counters: Vec<CounterView>,
    pub badges: Vec<BadgeView>,
}

impl From<&DashboardStats> for DashboardView {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            counters: vec![
                CounterView { key: "total_products", value: stats.total_products },
                CounterView { key: "total_users", value: stats.total_users },
                CounterView { key: "total_orders", value: stats.total_orders },
            ],
            badges: vec![
                BadgeView::from_value("pending_orders", stats.pending_orders),
                BadgeView::from_value("pending_reviews", stats.pending_reviews),
                BadgeView::from_value("unread_messages", stats.unread_messages),
            ],
        }
    }
}

/// チャート用データセット（初期化時に1回ずつ取得）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    SalesOverview,
    OrderStatus,
    ProductCategories,
    WeeklyRevenue,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::SalesOverview,
        ChartKind::OrderStatus,
        ChartKind::ProductCategories,
        ChartKind::WeeklyRevenue,
    ];

    /// `/admin/api/` 以下のエンドポイント名
    pub fn endpoint(&self) -> &'static str {
        match self {
            ChartKind::SalesOverview => "sales_overview",
            ChartKind::OrderStatus => "order_status",
            ChartKind::ProductCategories => "product_categories",
            ChartKind::WeeklyRevenue => "weekly_revenue",
        }
    }
}
