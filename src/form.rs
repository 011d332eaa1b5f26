//! フォーム送信
//!
//! フォーカスアウト時にフィールドを検証し、送信時に全フィールドを再検証する。
//! 不合格があれば送信を取り消し、合格なら宣言された方法（通常POST / 非同期POST）で送る。

use crate::api::StorefrontApi;
use crate::config::Config;
use crate::debounce::DebounceTimer;
use crate::error::{ClientError, Result};
use crate::notify::NotificationCenter;
use crate::ui::{FieldErrorView, Navigator};
use dreamdrape_common::{FieldValidationResult, FormReport, FormValidator, FormValues, SubmitMode};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 通常POSTの遷移先
    Navigated(String),
    /// 非同期POSTが受理された
    Accepted {
        message: Option<String>,
        redirect: Option<String>,
    },
}

pub struct FormController {
    validator: FormValidator,
    action: String,
    api: Arc<dyn StorefrontApi>,
    notifier: NotificationCenter,
    fields: Arc<dyn FieldErrorView>,
    navigator: Arc<dyn Navigator>,
}

impl FormController {
    pub fn new(
        validator: FormValidator,
        action: &str,
        api: Arc<dyn StorefrontApi>,
        notifier: NotificationCenter,
        fields: Arc<dyn FieldErrorView>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            validator,
            action: action.to_string(),
            api,
            notifier,
            fields,
            navigator,
        }
    }

    pub fn on_blur(&self, field: &str, values: &FormValues) -> Result<FieldValidationResult> {
        let result = self.validator.validate_field(field, values)?;
        self.render_field(field, &result);
        Ok(result)
    }

    /// 入力ごとの再検証。確認欄以外は何もしない
    pub fn on_input(&self, field: &str, values: &FormValues) -> Result<Option<FieldValidationResult>> {
        if !self.validator.rechecks_on_input(field) {
            return Ok(None);
        }
        self.on_blur(field, values).map(Some)
    }

    pub async fn submit(&self, values: &FormValues) -> Result<SubmitOutcome> {
        let report = self.validator.validate_all(values);
        self.render_report(&report);
        if !report.is_valid() {
            let failing: Vec<&str> = report.failures().into_iter().map(|(name, _)| name).collect();
            debug!(?failing, "form submission cancelled");
            self.notifier.error("Please correct the errors in the form");
            return Err(ClientError::Validation(failing.join(", ")));
        }

        match self.validator.mode() {
            SubmitMode::Navigational => self.submit_navigational(values).await,
            SubmitMode::Async => self.submit_async(values).await,
        }
    }

    async fn submit_navigational(&self, values: &FormValues) -> Result<SubmitOutcome> {
        match self.api.post_form(&self.action, values).await {
            Ok(redirect) => {
                self.navigator.navigate(&redirect.location);
                Ok(SubmitOutcome::Navigated(redirect.location))
            }
            Err(e) => {
                self.notifier.error(e.user_message("Error submitting form"));
                Err(e)
            }
        }
    }

    async fn submit_async(&self, values: &FormValues) -> Result<SubmitOutcome> {
        let resp = match self.api.submit_form(&self.action, values).await {
            Ok(resp) => resp,
            Err(e) => {
                self.notifier.error(e.user_message("Error submitting form"));
                return Err(e);
            }
        };

        if resp.success {
            info!(action = %self.action, "form accepted");
            self.notifier
                .success(resp.message.clone().unwrap_or_else(|| "Saved successfully".to_string()));
            if let Some(location) = &resp.redirect {
                self.navigator.navigate(location);
            }
            return Ok(SubmitOutcome::Accepted {
                message: resp.message,
                redirect: resp.redirect,
            });
        }

        // サーバー側のフィールドエラーを該当フィールドに戻す
        for (field, message) in &resp.errors {
            self.fields.show_error(field, message);
        }
        let message = resp
            .message
            .unwrap_or_else(|| "Please correct the errors in the form".to_string());
        self.notifier.error(message.clone());
        Err(ClientError::ServerRejection(message))
    }

    fn render_report(&self, report: &FormReport) {
        for (field, result) in &report.fields {
            self.render_field(field, result);
        }
    }

    fn render_field(&self, field: &str, result: &FieldValidationResult) {
        match (&result.valid, &result.message) {
            (false, Some(message)) => self.fields.show_error(field, message),
            (false, None) => self.fields.show_error(field, "Invalid value"),
            (true, _) => self.fields.clear_error(field),
        }
    }
}

/// 下書きの自動保存
///
/// 変更のたびにデバウンスし、入力が止まった時点の値を非同期POSTで保存する。
/// 保存の成否は通知せずログに残すだけ。
pub struct AutoSaver {
    timer: DebounceTimer,
    delay: Duration,
    draft: Arc<Draft>,
}

struct Draft {
    api: Arc<dyn StorefrontApi>,
    action: String,
    latest: Mutex<FormValues>,
}

impl AutoSaver {
    pub fn new(api: Arc<dyn StorefrontApi>, action: &str, delay: Duration) -> Self {
        Self {
            timer: DebounceTimer::new(),
            delay,
            draft: Arc::new(Draft {
                api,
                action: action.to_string(),
                latest: Mutex::new(FormValues::new()),
            }),
        }
    }

    /// 保存間隔は `autosave_delay_ms` に従う
    pub fn from_config(api: Arc<dyn StorefrontApi>, action: &str, config: &Config) -> Self {
        Self::new(api, action, config.autosave_delay())
    }

    pub fn on_change(&mut self, values: &FormValues) {
        *self.draft.latest.lock().unwrap_or_else(|e| e.into_inner()) = values.clone();
        let draft = self.draft.clone();
        self.timer.schedule(self.delay, move || draft.save());
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}

impl Draft {
    async fn save(self: Arc<Self>) {
        let values = self.latest.lock().unwrap_or_else(|e| e.into_inner()).clone();
        match self.api.submit_form(&self.action, &values).await {
            Ok(resp) if resp.success => debug!(action = %self.action, "draft saved"),
            Ok(resp) => warn!(action = %self.action, message = ?resp.message, "draft rejected"),
            Err(e) => warn!(action = %self.action, error = %e, "draft save failed"),
        }
    }
}
