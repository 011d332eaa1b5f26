//! ストアフロントAPI
//!
//! コンポーネントはこのトレイト越しにサーバーと通信する。
//! 本番は `HttpApi`（reqwest）、テストは記録用のフェイク実装を使う。

mod http;

pub use http::HttpApi;

use crate::error::Result;
use async_trait::async_trait;
use dreamdrape_common::{
    AddToCart, BulkActionRequest, BulkActionResponse, CartCount, ChartKind, DashboardStats,
    ExportResponse, FormResponse, FormValues, SuggestionItem,
};

/// ページ遷移を伴うリクエストの遷移先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self { location: location.into() }
    }
}

#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /api/search_suggestions?q=`
    async fn search_suggestions(&self, query: &str) -> Result<Vec<SuggestionItem>>;

    /// `GET /api/cart_count`
    async fn cart_count(&self) -> Result<CartCount>;

    /// `POST /add_to_cart`（multipart）
    async fn add_to_cart(&self, request: &AddToCart) -> Result<()>;

    /// `GET /remove_from_cart/{item_id}`
    async fn remove_from_cart(&self, item_id: u64) -> Result<Redirect>;

    /// `POST /update_cart`
    async fn update_cart(&self, item_id: u64, quantity: u32) -> Result<Redirect>;

    /// `GET /add_to_wishlist/{product_id}`
    async fn add_to_wishlist(&self, product_id: u64) -> Result<()>;

    /// `GET /remove_from_wishlist/{product_id}`
    async fn remove_from_wishlist(&self, product_id: u64) -> Result<Redirect>;

    /// `POST /newsletter_signup`
    async fn newsletter_signup(&self, email: &str) -> Result<()>;

    /// `POST /admin/bulk-action`
    async fn bulk_action(&self, request: &BulkActionRequest) -> Result<BulkActionResponse>;

    /// `GET /admin/api/stats`
    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    /// `GET /admin/api/{sales_overview|order_status|product_categories|weekly_revenue}`
    async fn chart_data(&self, kind: ChartKind) -> Result<serde_json::Value>;

    /// `POST /admin/export/{export_type}`
    async fn export(&self, export_type: &str, format: &str) -> Result<ExportResponse>;

    /// 管理フォームの非同期送信（JSONレスポンス）
    async fn submit_form(&self, action: &str, values: &FormValues) -> Result<FormResponse>;

    /// 通常のフォームPOST。遷移先を返す
    async fn post_form(&self, action: &str, values: &FormValues) -> Result<Redirect>;
}
