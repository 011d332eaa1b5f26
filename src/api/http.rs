//! reqwestによるStorefrontApi実装
//!
//! リダイレクトは追跡しない。遷移先はNavigatorに渡し、
//! ログイン画面へのリダイレクトは `AuthRequired` として扱う。

use super::{Redirect, StorefrontApi};
use crate::config::Config;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use dreamdrape_common::{
    AddToCart, BulkActionRequest, BulkActionResponse, CartCount, ChartKind, DashboardStats,
    ExportResponse, FormResponse, FormValues, SuggestionItem,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

pub struct HttpApi {
    client: Client,
    base_url: String,
    login_path: String,
}

/// 失敗レスポンスのボディ（`{"message": ...}` があれば拾う）
#[derive(Deserialize)]
struct RejectionBody {
    message: Option<String>,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ClientError::Config(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn is_login_location(&self, location: &str) -> bool {
        is_login_location(location, &self.login_path)
    }

    /// ステータスを分類する
    ///
    /// - 2xx: そのまま返す
    /// - 3xx: ログイン画面行きなら `AuthRequired`、それ以外はそのまま返す
    /// - それ以外: ボディにメッセージがあれば `ServerRejection`、なければ `Network`
    async fn check(&self, resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status.is_redirection() {
            let location = location_of(&resp).unwrap_or_default();
            if self.is_login_location(&location) {
                debug!(%location, "redirected to login");
                return Err(ClientError::AuthRequired);
            }
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(rejection_from(status.as_u16(), &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .client
            .get(self.url(path))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(resp.json::<T>().await?)
    }

    /// 遷移を伴うGET。リダイレクト先（無ければリクエストしたパス）を返す
    async fn navigate_get(&self, path: &str) -> Result<Redirect> {
        let resp = self.client.get(self.url(path)).send().await?;
        let resp = self.check(resp).await?;
        Ok(Redirect::to(location_of(&resp).unwrap_or_else(|| path.to_string())))
    }
}

fn location_of(resp: &Response) -> Option<String> {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn is_login_location(location: &str, login_path: &str) -> bool {
    !login_path.is_empty() && location.contains(login_path)
}

fn rejection_from(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<RejectionBody>(body) {
        Ok(RejectionBody { message: Some(message) }) if !message.trim().is_empty() => {
            ClientError::ServerRejection(message)
        }
        _ => ClientError::Network(format!("HTTP {}", status)),
    }
}

#[async_trait]
impl StorefrontApi for HttpApi {
    #[instrument(skip(self))]
    async fn search_suggestions(&self, query: &str) -> Result<Vec<SuggestionItem>> {
        let resp = self
            .client
            .get(self.url("/api/search_suggestions"))
            .query(&[("q", query)])
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn cart_count(&self) -> Result<CartCount> {
        self.get_json("/api/cart_count").await
    }

    #[instrument(skip(self))]
    async fn add_to_cart(&self, request: &AddToCart) -> Result<()> {
        let form = reqwest::multipart::Form::new()
            .text("product_id", request.product_id.to_string())
            .text("quantity", request.quantity.to_string())
            .text("size", request.size.clone())
            .text("color", request.color.clone());
        let resp = self
            .client
            .post(self.url("/add_to_cart"))
            .multipart(form)
            .send()
            .await?;
        self.check(resp).await?;
        Ok(())
    }

    async fn remove_from_cart(&self, item_id: u64) -> Result<Redirect> {
        self.navigate_get(&format!("/remove_from_cart/{}", item_id)).await
    }

    async fn update_cart(&self, item_id: u64, quantity: u32) -> Result<Redirect> {
        let resp = self
            .client
            .post(self.url("/update_cart"))
            .form(&[("item_id", item_id.to_string()), ("quantity", quantity.to_string())])
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(Redirect::to(location_of(&resp).unwrap_or_else(|| "/cart".to_string())))
    }

    async fn add_to_wishlist(&self, product_id: u64) -> Result<()> {
        let resp = self
            .client
            .get(self.url(&format!("/add_to_wishlist/{}", product_id)))
            .send()
            .await?;
        self.check(resp).await?;
        Ok(())
    }

    async fn remove_from_wishlist(&self, product_id: u64) -> Result<Redirect> {
        self.navigate_get(&format!("/remove_from_wishlist/{}", product_id)).await
    }

    async fn newsletter_signup(&self, email: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.url("/newsletter_signup"))
            .form(&[("email", email)])
            .send()
            .await?;
        self.check(resp).await?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(action = %request.action, count = request.ids.len()))]
    async fn bulk_action(&self, request: &BulkActionRequest) -> Result<BulkActionResponse> {
        let resp = self
            .client
            .post(self.url("/admin/bulk-action"))
            .json(request)
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_json("/admin/api/stats").await
    }

    async fn chart_data(&self, kind: ChartKind) -> Result<serde_json::Value> {
        self.get_json(&format!("/admin/api/{}", kind.endpoint())).await
    }

    async fn export(&self, export_type: &str, format: &str) -> Result<ExportResponse> {
        let resp = self
            .client
            .post(self.url(&format!("/admin/export/{}", export_type)))
            .json(&serde_json::json!({ "format": format }))
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn submit_form(&self, action: &str, values: &FormValues) -> Result<FormResponse> {
        let resp = self
            .client
            .post(self.url(action))
            .header(ACCEPT, "application/json")
            .form(values)
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn post_form(&self, action: &str, values: &FormValues) -> Result<Redirect> {
        let resp = self.client.post(self.url(action)).form(values).send().await?;
        let resp = self.check(resp).await?;
        Ok(Redirect::to(location_of(&resp).unwrap_or_else(|| action.to_string())))
    }
}
