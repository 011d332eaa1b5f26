//! 一括操作
//!
//! テーブルの選択集合と操作名から、1回のまとめたリクエストを送る。
//! - 選択が空なら警告だけ出してリクエストしない
//! - 削除は件数を示して確認を取る
//! - 送信中は読み込み表示を出し、結果にかかわらず消す
//! - 成功したら画面を再読込（サーバーが正）、失敗したらメッセージを通知して画面はそのまま

use crate::api::StorefrontApi;
use crate::error::{ClientError, Result};
use crate::notify::NotificationCenter;
use crate::ui::{Confirm, LoadingGuard, LoadingIndicator, Navigator};
use dreamdrape_common::{AdminTable, BulkActionRequest, RowId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    /// 状態変更（注文ステータスなど）。対象ステータスを追加パラメータで送る
    UpdateStatus(String),
    Other(String),
}

impl BulkAction {
    /// CLIなどの文字列指定から組み立てる
    pub fn parse(action: &str, status: Option<&str>) -> Self {
        match (action, status) {
            ("delete", _) => BulkAction::Delete,
            ("update_status", Some(status)) => BulkAction::UpdateStatus(status.to_string()),
            (other, _) => BulkAction::Other(other.to_string()),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            BulkAction::Delete => "delete",
            BulkAction::UpdateStatus(_) => "update_status",
            BulkAction::Other(name) => name,
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, BulkAction::Delete)
    }

    pub fn extra_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let BulkAction::UpdateStatus(status) = self {
            params.insert("status".to_string(), status.clone());
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    Applied { message: Option<String> },
    /// 確認で取り消された
    Cancelled,
}

pub struct BulkActionDispatcher {
    api: Arc<dyn StorefrontApi>,
    notifier: NotificationCenter,
    confirm: Arc<dyn Confirm>,
    loading: Arc<dyn LoadingIndicator>,
    navigator: Arc<dyn Navigator>,
}

impl BulkActionDispatcher {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        notifier: NotificationCenter,
        confirm: Arc<dyn Confirm>,
        loading: Arc<dyn LoadingIndicator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { api, notifier, confirm, loading, navigator }
    }

    /// テーブルの現在の選択で実行する
    pub async fn dispatch_selection(&self, table: &AdminTable, action: &BulkAction) -> Result<BulkOutcome> {
        let selection = table.selection();
        self.dispatch(&selection, action).await
    }

    pub async fn dispatch(&self, ids: &[RowId], action: &BulkAction) -> Result<BulkOutcome> {
        if ids.is_empty() {
            self.notifier.warning("Please select at least one item");
            return Err(ClientError::NoSelection);
        }

        if action.is_destructive() {
            let message = format!(
                "Are you sure you want to {} {} selected item(s)?",
                action.identifier(),
                ids.len()
            );
            if !self.confirm.confirm(&message) {
                debug!(action = action.identifier(), "bulk action declined");
                return Ok(BulkOutcome::Cancelled);
            }
        }

        let request = BulkActionRequest::new(action.identifier(), ids.to_vec(), action.extra_params());

        let result = {
            let _loading = LoadingGuard::show(self.loading.as_ref(), "Processing...");
            self.api.bulk_action(&request).await
        };

        match result {
            Ok(resp) if resp.success => {
                info!(action = %request.action, count = request.ids.len(), "bulk action applied");
                self.navigator.reload();
                Ok(BulkOutcome::Applied { message: resp.message })
            }
            Ok(resp) => {
                let message = resp
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Bulk action failed".to_string());
                warn!(action = %request.action, %message, "bulk action rejected");
                self.notifier.error(message.clone());
                Err(ClientError::ServerRejection(message))
            }
            Err(e) => {
                self.notifier
                    .error(e.user_message("An error occurred while processing the request"));
                Err(e)
            }
        }
    }
}
