//! 管理コンソール
//!
//! - bulk: 一括操作
//! - dashboard: 集計ポーリングとチャートデータ
//! - export: データのエクスポート
//! - sidebar: サイドバー開閉状態の永続化
//!
//! テーブルの並べ替え・絞り込み・選択は `dreamdrape_common::table` にある。

pub mod bulk;
pub mod dashboard;
pub mod export;
pub mod sidebar;

pub use bulk::{BulkAction, BulkActionDispatcher, BulkOutcome};
pub use dashboard::DashboardStatsPoller;
pub use export::ExportRunner;
pub use sidebar::SidebarState;
