//! データのエクスポート（注文、商品、ユーザーなど）

use crate::api::StorefrontApi;
use crate::error::{ClientError, Result};
use crate::notify::NotificationCenter;
use crate::ui::{LoadingGuard, LoadingIndicator, Navigator};
use dreamdrape_common::ExportResponse;
use std::sync::Arc;
use tracing::info;

pub struct ExportRunner {
    api: Arc<dyn StorefrontApi>,
    notifier: NotificationCenter,
    loading: Arc<dyn LoadingIndicator>,
    navigator: Arc<dyn Navigator>,
}

impl ExportRunner {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        notifier: NotificationCenter,
        loading: Arc<dyn LoadingIndicator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { api, notifier, loading, navigator }
    }

    /// エクスポートを要求し、成功したらダウンロードURLへ遷移する
    pub async fn export(&self, export_type: &str, format: &str) -> Result<ExportResponse> {
        let result = {
            let _loading = LoadingGuard::show(self.loading.as_ref(), "Generating export...");
            self.api.export(export_type, format).await
        };

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                self.notifier.error(e.user_message("Export failed"));
                return Err(e);
            }
        };

        match (&resp.success, &resp.download_url) {
            (true, Some(url)) => {
                let filename = resp.filename.as_deref().unwrap_or(url.as_str());
                info!(export_type, format, %filename, "export ready");
                self.notifier.success(format!("Export ready: {}", filename));
                self.navigator.navigate(url);
                Ok(resp)
            }
            _ => {
                let message = resp
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Export failed".to_string());
                self.notifier.error(message.clone());
                Err(ClientError::ServerRejection(message))
            }
        }
    }
}
