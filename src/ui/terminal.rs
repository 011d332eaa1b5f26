//! ターミナル向けの描画ポート実装（CLI用）

use super::{
    CartBadge, CartBadgeView, ChartSink, Confirm, DashboardSurface, FieldErrorView,
    LoadingIndicator, Navigator, NotificationSink, SuggestionRow, SuggestionView,
};
use crate::notify::{Notification, NotificationId};
use dreamdrape_common::{ChartKind, DashboardView, Severity};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

pub struct TerminalUi {
    base_url: String,
    assume_yes: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalUi {
    pub fn new(base_url: &str, assume_yes: bool) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            assume_yes,
            spinner: Mutex::new(None),
        }
    }

    fn absolute(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            format!("{}{}", self.base_url, location)
        }
    }
}

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✔",
        Severity::Error => "✗",
        Severity::Info => "ℹ",
        Severity::Warning => "⚠",
    }
}

impl NotificationSink for TerminalUi {
    fn show(&self, notification: &Notification) {
        let time = chrono::Local::now().format("%H:%M:%S");
        println!("{} {} {}", time, icon(notification.severity), notification.message);
    }

    fn dismiss(&self, id: NotificationId) {
        debug!(?id, "notification dismissed");
    }
}

impl SuggestionView for TerminalUi {
    fn render(&self, rows: &[SuggestionRow]) {
        println!("候補:");
        for row in rows {
            println!("  {}  {}", row.name, row.price_label);
        }
    }

    fn clear(&self) {
        debug!("suggestions cleared");
    }
}

impl CartBadgeView for TerminalUi {
    fn render(&self, badge: CartBadge) {
        if badge.visible {
            println!("カート: {}件", badge.count);
        } else {
            println!("カート: 空");
        }
    }
}

impl Navigator for TerminalUi {
    fn navigate(&self, location: &str) {
        println!("→ {}", self.absolute(location));
    }

    fn reload(&self) {
        println!("↻ 再読込");
    }
}

impl Confirm for TerminalUi {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

impl LoadingIndicator for TerminalUi {
    fn show(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.lock().unwrap_or_else(|e| e.into_inner()) = Some(spinner);
    }

    fn hide(&self) {
        if let Some(spinner) = self.spinner.lock().unwrap_or_else(|e| e.into_inner()).take() {
            spinner.finish_and_clear();
        }
    }
}

impl FieldErrorView for TerminalUi {
    fn show_error(&self, field: &str, message: &str) {
        eprintln!("  ✗ {}: {}", field, message);
    }

    fn clear_error(&self, field: &str) {
        debug!(field, "field error cleared");
    }
}

impl DashboardSurface for TerminalUi {
    fn render(&self, view: &DashboardView) {
        println!("集計:");
        for counter in &view.counters {
            match counter.value {
                Some(value) => println!("  {}: {}", counter.key, value),
                None => println!("  {}: -", counter.key),
            }
        }
        for badge in view.badges.iter().filter(|b| b.visible) {
            println!("  [{}] {}", badge.key, badge.value);
        }
    }
}

impl ChartSink for TerminalUi {
    fn render(&self, kind: ChartKind, data: &serde_json::Value) {
        println!("{}: {}", kind.endpoint(), data);
    }
}
