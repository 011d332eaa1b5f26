//! ストアフロントAPIのワイヤ型
//!
//! サーバーとの間でやり取りされるJSONの形:
//! - SuggestionItem: 検索候補（`/api/search_suggestions`）
//! - CartCount: カート件数（`/api/cart_count`）
//! - BulkActionRequest / BulkActionResponse: 管理画面の一括操作
//! - FormResponse: 管理フォームの非同期送信結果
//! - ExportResponse: エクスポート結果
//! - DashboardStats: ダッシュボード集計

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 検索候補。サーバーが返した順序のまま表示する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub price: f64,
}

/// `/api/cart_count` のレスポンス
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCount {
    pub count: u32,
}

/// カート追加リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCart {
    pub product_id: u64,
    pub quantity: u32,
    pub size: String,
    pub color: String,
}

impl AddToCart {
    /// 数量が未指定・不正（0以下）の場合は1にする。サイズ・色は空文字が既定
    pub fn new(product_id: u64, quantity: Option<i64>, size: Option<&str>, color: Option<&str>) -> Self {
        let quantity = match quantity {
            Some(q) if q >= 1 => u32::try_from(q).unwrap_or(u32::MAX),
            _ => 1,
        };
        Self {
            product_id,
            quantity,
            size: size.unwrap_or_default().to_string(),
            color: color.unwrap_or_default().to_string(),
        }
    }
}

/// テーブル行の識別子。並べ替え・絞り込みの前後で変わらない
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub String);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RowId {
    fn from(id: u64) -> Self {
        RowId(id.to_string())
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        RowId(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        RowId(id)
    }
}

/// 一括操作リクエストで `extra_params` に使えないキー
pub const RESERVED_BULK_KEYS: [&str; 2] = ["action", "ids"];

/// 一括操作リクエスト（`POST /admin/bulk-action`）
///
/// `extra_params` は本体と同じ階層に展開される。組み立ては `new` を使う
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkActionRequest {
    pub action: String,
    pub ids: Vec<RowId>,
    #[serde(flatten)]
    pub extra_params: BTreeMap<String, String>,
}

impl BulkActionRequest {
    /// 予約キー（`action`, `ids`）と重なる追加パラメータは捨てる
    pub fn new(action: &str, ids: Vec<RowId>, mut extra_params: BTreeMap<String, String>) -> Self {
        extra_params.retain(|key, _| !RESERVED_BULK_KEYS.contains(&key.as_str()));
        Self {
            action: action.to_string(),
            ids,
            extra_params,
        }
    }
}

/// 一括操作レスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// 管理フォームの非同期送信結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
    /// フィールド名 → エラーメッセージ
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

/// エクスポート結果（`POST /admin/export/{type}`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// ダッシュボード集計（`/admin/api/stats`）
///
/// キーが欠けている場合は `None`。バッジはゼロ表示せず非表示にする。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_products: Option<u64>,
    pub total_users: Option<u64>,
    pub total_orders: Option<u64>,
    pub pending_orders: Option<u64>,
    pub pending_reviews: Option<u64>,
    pub unread_messages: Option<u64>,
}

/// 通知の重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_without_id() {
        let items: Vec<SuggestionItem> =
            serde_json::from_str(r#"[{"name": "Saree Red", "price": 1200.5}]"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, None);
        assert_eq!(items[0].name, "Saree Red");
    }

    #[test]
    fn test_add_to_cart_defaults() {
        let req = AddToCart::new(7, None, None, None);
        assert_eq!(req.quantity, 1);
        assert_eq!(req.size, "");
        assert_eq!(req.color, "");

        assert_eq!(AddToCart::new(7, Some(0), None, None).quantity, 1);
        assert_eq!(AddToCart::new(7, Some(-3), None, None).quantity, 1);
        assert_eq!(AddToCart::new(7, Some(4), Some("M"), Some("Red")).quantity, 4);
    }

    #[test]
    fn test_bulk_request_flattens_extra_params() {
        let mut extra = BTreeMap::new();
        extra.insert("status".to_string(), "shipped".to_string());
        let req = BulkActionRequest::new("update_status", vec![RowId::from(1u64), RowId::from(2u64)], extra);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["action"], "update_status");
        assert_eq!(json["ids"][1], "2");
        assert_eq!(json["status"], "shipped");
    }

    #[test]
    fn test_bulk_request_drops_reserved_keys() {
        let mut extra = BTreeMap::new();
        extra.insert("action".to_string(), "delete".to_string());
        extra.insert("ids".to_string(), "1,2,3".to_string());
        extra.insert("status".to_string(), "shipped".to_string());
        let req = BulkActionRequest::new("update_status", vec![RowId::from(7u64)], extra);

        assert_eq!(req.extra_params.keys().collect::<Vec<_>>(), vec!["status"]);

        // 各キーは1回だけ出力される
        let body = serde_json::to_string(&req).unwrap();
        assert_eq!(body.matches("\"action\"").count(), 1);
        assert_eq!(body.matches("\"ids\"").count(), 1);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["action"], "update_status");
        assert_eq!(json["ids"], serde_json::json!(["7"]));
    }

    #[test]
    fn test_dashboard_stats_missing_keys() {
        let stats: DashboardStats =
            serde_json::from_str(r#"{"total_products": 12, "pending_orders": 3}"#).unwrap();
        assert_eq!(stats.total_products, Some(12));
        assert_eq!(stats.pending_orders, Some(3));
        assert_eq!(stats.pending_reviews, None);
    }

    #[test]
    fn test_form_response_errors() {
        let resp: FormResponse = serde_json::from_str(
            r#"{"success": false, "message": "Invalid", "errors": {"email": "Taken"}}"#,
        )
        .unwrap();
        assert!(!resp.success);
        assert_eq!(resp.errors.get("email").map(String::as_str), Some("Taken"));
        assert_eq!(resp.redirect, None);
    }
}
