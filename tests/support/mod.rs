//! 結合テスト用のフェイク
//!
//! - `FakeApi`: エンドポイントごとに応答（遅延つき）を積んでおき、呼び出しを記録する
//! - `RecordingUi`: すべての描画ポートを実装し、イベントを文字列で記録する

#![allow(dead_code)]

use async_trait::async_trait;
use dreamdrape_client::api::{Redirect, StorefrontApi};
use dreamdrape_client::notify::{Notification, NotificationId};
use dreamdrape_client::ui::{
    CartBadge, CartBadgeView, ChartSink, Confirm, DashboardSurface, FieldErrorView,
    LoadingIndicator, Navigator, NotificationSink, SuggestionRow, SuggestionView,
};
use dreamdrape_client::{ClientError, Result};
use dreamdrape_common::{
    AddToCart, BulkActionRequest, BulkActionResponse, CartCount, ChartKind, DashboardStats,
    DashboardView, ExportResponse, FormResponse, FormValues, SuggestionItem,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// フェイクの応答
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    /// サーバーがメッセージつきで失敗を返す
    Reject(String),
    /// 到達できない
    Fail,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Reject(message) => Err(ClientError::ServerRejection(message)),
            Reply::Fail => Err(ClientError::Network("connection refused".into())),
        }
    }
}

struct Script<T> {
    queue: Mutex<VecDeque<(Duration, Reply<T>)>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self { queue: Mutex::new(VecDeque::new()) }
    }
}

impl<T: Send> Script<T> {
    fn push(&self, delay: Duration, reply: Reply<T>) {
        self.queue.lock().unwrap().push_back((delay, reply));
    }

    /// 積まれた応答を1つ取り出す。空なら `fallback`
    async fn next(&self, fallback: impl FnOnce() -> T) -> Result<T> {
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some((delay, reply)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply.into_result()
            }
            None => Ok(fallback()),
        }
    }
}

pub fn suggestion(name: &str, price: f64) -> SuggestionItem {
    SuggestionItem { id: None, name: name.to_string(), price }
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    bulk_requests: Mutex<Vec<BulkActionRequest>>,
    form_posts: Mutex<Vec<(String, FormValues)>>,
    suggestions: Script<Vec<SuggestionItem>>,
    cart_count: Script<CartCount>,
    add_to_cart: Script<()>,
    remove_from_cart: Script<Redirect>,
    update_cart: Script<Redirect>,
    add_to_wishlist: Script<()>,
    remove_from_wishlist: Script<Redirect>,
    newsletter: Script<()>,
    bulk: Script<BulkActionResponse>,
    stats: Script<DashboardStats>,
    charts: Mutex<HashMap<ChartKind, Reply<serde_json::Value>>>,
    export: Script<ExportResponse>,
    submit_form: Script<FormResponse>,
    post_form: Script<Redirect>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録された呼び出し（`endpoint:引数` 形式）
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c == endpoint || c.starts_with(&format!("{}:", endpoint)))
            .collect()
    }

    pub fn bulk_requests(&self) -> Vec<BulkActionRequest> {
        self.bulk_requests.lock().unwrap().clone()
    }

    pub fn form_posts(&self) -> Vec<(String, FormValues)> {
        self.form_posts.lock().unwrap().clone()
    }

    pub fn reply_suggestions(&self, delay: Duration, reply: Reply<Vec<SuggestionItem>>) {
        self.suggestions.push(delay, reply);
    }

    pub fn reply_cart_count(&self, reply: Reply<CartCount>) {
        self.cart_count.push(Duration::ZERO, reply);
    }

    pub fn reply_add_to_cart(&self, reply: Reply<()>) {
        self.add_to_cart.push(Duration::ZERO, reply);
    }

    pub fn reply_remove_from_cart(&self, reply: Reply<Redirect>) {
        self.remove_from_cart.push(Duration::ZERO, reply);
    }

    pub fn reply_add_to_wishlist(&self, reply: Reply<()>) {
        self.add_to_wishlist.push(Duration::ZERO, reply);
    }

    pub fn reply_newsletter(&self, reply: Reply<()>) {
        self.newsletter.push(Duration::ZERO, reply);
    }

    pub fn reply_bulk(&self, reply: Reply<BulkActionResponse>) {
        self.bulk.push(Duration::ZERO, reply);
    }

    pub fn reply_stats(&self, delay: Duration, reply: Reply<DashboardStats>) {
        self.stats.push(delay, reply);
    }

    pub fn reply_chart(&self, kind: ChartKind, reply: Reply<serde_json::Value>) {
        self.charts.lock().unwrap().insert(kind, reply);
    }

    pub fn reply_export(&self, reply: Reply<ExportResponse>) {
        self.export.push(Duration::ZERO, reply);
    }

    pub fn reply_submit_form(&self, reply: Reply<FormResponse>) {
        self.submit_form.push(Duration::ZERO, reply);
    }

    pub fn reply_post_form(&self, reply: Reply<Redirect>) {
        self.post_form.push(Duration::ZERO, reply);
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StorefrontApi for FakeApi {
    async fn search_suggestions(&self, query: &str) -> Result<Vec<SuggestionItem>> {
        self.record(format!("search_suggestions:{}", query));
        self.suggestions.next(Vec::new).await
    }

    async fn cart_count(&self) -> Result<CartCount> {
        self.record("cart_count".into());
        self.cart_count.next(CartCount::default).await
    }

    async fn add_to_cart(&self, request: &AddToCart) -> Result<()> {
        self.record(format!("add_to_cart:{}x{}", request.product_id, request.quantity));
        self.add_to_cart.next(|| ()).await
    }

    async fn remove_from_cart(&self, item_id: u64) -> Result<Redirect> {
        self.record(format!("remove_from_cart:{}", item_id));
        self.remove_from_cart.next(|| Redirect::to("/cart")).await
    }

    async fn update_cart(&self, item_id: u64, quantity: u32) -> Result<Redirect> {
        self.record(format!("update_cart:{}x{}", item_id, quantity));
        self.update_cart.next(|| Redirect::to("/cart")).await
    }

    async fn add_to_wishlist(&self, product_id: u64) -> Result<()> {
        self.record(format!("add_to_wishlist:{}", product_id));
        self.add_to_wishlist.next(|| ()).await
    }

    async fn remove_from_wishlist(&self, product_id: u64) -> Result<Redirect> {
        self.record(format!("remove_from_wishlist:{}", product_id));
        self.remove_from_wishlist.next(|| Redirect::to("/wishlist")).await
    }

    async fn newsletter_signup(&self, email: &str) -> Result<()> {
        self.record(format!("newsletter_signup:{}", email));
        self.newsletter.next(|| ()).await
    }

    async fn bulk_action(&self, request: &BulkActionRequest) -> Result<BulkActionResponse> {
        self.record(format!("bulk_action:{}", request.action));
        self.bulk_requests.lock().unwrap().push(request.clone());
        self.bulk
            .next(|| BulkActionResponse { success: true, message: None })
            .await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.record("dashboard_stats".into());
        self.stats.next(DashboardStats::default).await
    }

    async fn chart_data(&self, kind: ChartKind) -> Result<serde_json::Value> {
        self.record(format!("chart_data:{}", kind.endpoint()));
        let reply = self.charts.lock().unwrap().remove(&kind);
        match reply {
            Some(reply) => reply.into_result(),
            None => Ok(serde_json::json!([])),
        }
    }

    async fn export(&self, export_type: &str, format: &str) -> Result<ExportResponse> {
        self.record(format!("export:{}:{}", export_type, format));
        self.export.next(ExportResponse::default).await
    }

    async fn submit_form(&self, action: &str, values: &FormValues) -> Result<FormResponse> {
        self.record(format!("submit_form:{}", action));
        self.form_posts.lock().unwrap().push((action.to_string(), values.clone()));
        self.submit_form
            .next(|| FormResponse { success: true, ..Default::default() })
            .await
    }

    async fn post_form(&self, action: &str, values: &FormValues) -> Result<Redirect> {
        self.record(format!("post_form:{}", action));
        self.form_posts.lock().unwrap().push((action.to_string(), values.clone()));
        let location = action.to_string();
        self.post_form.next(move || Redirect::to(location)).await
    }
}

/// すべての描画ポートを記録する
pub struct RecordingUi {
    events: Mutex<Vec<String>>,
    dashboards: Mutex<Vec<DashboardView>>,
    answer: AtomicBool,
}

impl Default for RecordingUi {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            dashboards: Mutex::new(Vec::new()),
            answer: AtomicBool::new(true),
        }
    }
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 確認ダイアログの応答
    pub fn answer_confirm(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_with(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }

    pub fn dashboards(&self) -> Vec<DashboardView> {
        self.dashboards.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl NotificationSink for RecordingUi {
    fn show(&self, notification: &Notification) {
        self.push(format!("notify:{}:{}", notification.severity.as_str(), notification.message));
    }

    fn dismiss(&self, _id: NotificationId) {
        self.push("notify-dismiss".into());
    }
}

impl SuggestionView for RecordingUi {
    fn render(&self, rows: &[SuggestionRow]) {
        let rows: Vec<String> = rows
            .iter()
            .map(|r| format!("{}={}", r.name, r.price_label))
            .collect();
        self.push(format!("suggest:{}", rows.join("|")));
    }

    fn clear(&self) {
        self.push("suggest-clear".into());
    }
}

impl CartBadgeView for RecordingUi {
    fn render(&self, badge: CartBadge) {
        self.push(format!("badge:{}:{}", badge.count, badge.visible));
    }
}

impl Navigator for RecordingUi {
    fn navigate(&self, location: &str) {
        self.push(format!("navigate:{}", location));
    }

    fn reload(&self) {
        self.push("reload".into());
    }
}

impl Confirm for RecordingUi {
    fn confirm(&self, message: &str) -> bool {
        self.push(format!("confirm:{}", message));
        self.answer.load(Ordering::SeqCst)
    }
}

impl LoadingIndicator for RecordingUi {
    fn show(&self, message: &str) {
        self.push(format!("loading:{}", message));
    }

    fn hide(&self) {
        self.push("loading-hide".into());
    }
}

impl FieldErrorView for RecordingUi {
    fn show_error(&self, field: &str, message: &str) {
        self.push(format!("field:{}:{}", field, message));
    }

    fn clear_error(&self, field: &str) {
        self.push(format!("field-clear:{}", field));
    }
}

impl DashboardSurface for RecordingUi {
    fn render(&self, view: &DashboardView) {
        self.dashboards.lock().unwrap().push(view.clone());
        self.push("dashboard".into());
    }
}

impl ChartSink for RecordingUi {
    fn render(&self, kind: ChartKind, data: &serde_json::Value) {
        self.push(format!("chart:{}:{}", kind.endpoint(), data));
    }
}

/// 起床済みタスクを走らせる
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
