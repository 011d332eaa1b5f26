use crate::error::{ClientError, Result};
use dreamdrape_common::{AdminTable, Column, SelectAllScope};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const BASE_URL_ENV: &str = "DREAMDRAPE_BASE_URL";
const SESSION_ENV: &str = "DREAMDRAPE_SESSION";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// ログイン済みセッションのCookie（`session=...`）
    pub session_cookie: Option<String>,
    pub request_timeout_secs: u64,
    pub search_debounce_ms: u64,
    /// 下書き自動保存のデバウンス
    pub autosave_delay_ms: u64,
    pub min_query_chars: usize,
    pub notification_ttl_ms: u64,
    /// 管理画面の通知も自動で消すか
    pub admin_auto_dismiss: bool,
    pub login_path: String,
    pub auth_redirect_delay_ms: u64,
    pub stats_poll_interval_secs: u64,
    pub currency_symbol: String,
    pub quantity_min: u32,
    pub quantity_max: u32,
    pub select_all_scope: SelectAllScope,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            session_cookie: None,
            request_timeout_secs: 30,
            search_debounce_ms: 300,
            autosave_delay_ms: 1000,
            min_query_chars: 2,
            notification_ttl_ms: 5000,
            admin_auto_dismiss: false,
            login_path: "/auth/login".into(),
            auth_redirect_delay_ms: 2000,
            stats_poll_interval_secs: 30,
            currency_symbol: "₹".into(),
            quantity_min: 1,
            quantity_max: 10,
            select_all_scope: SelectAllScope::AllRows,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// 指定パスから読み込み。ファイルが無ければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ClientError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("dreamdrape"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 環境変数を優先
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Ok(session) = std::env::var(SESSION_ENV) {
            self.session_cookie = Some(session);
        }
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!("base URL must be http(s): {}", url)));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        self.save()
    }

    /// 全選択の対象範囲を設定に合わせた管理テーブル
    pub fn admin_table(&self, columns: Vec<Column>) -> AdminTable {
        AdminTable::new(columns, self.select_all_scope)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn auth_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.auth_redirect_delay_ms)
    }

    pub fn stats_poll_interval(&self) -> Duration {
        Duration::from_secs(self.stats_poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
