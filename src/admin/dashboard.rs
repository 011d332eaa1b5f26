//! ダッシュボード集計のポーリング
//!
//! 一定間隔で集計を取得して描画する。統計チャネルにもトークンを使い、
//! 後から届いた古いレスポンスで新しい表示を上書きしない。
//! チャート用の4データセットは初期化時に1回だけ取得し、加工せず渡す。

use crate::api::StorefrontApi;
use crate::error::Result;
use crate::ui::{ChartSink, DashboardSurface};
use dreamdrape_common::{ChartKind, DashboardStats, DashboardView, RequestSequencer};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

const MIN_INTERVAL: Duration = Duration::from_secs(1);

pub struct DashboardStatsPoller {
    api: Arc<dyn StorefrontApi>,
    surface: Arc<dyn DashboardSurface>,
    charts: Arc<dyn ChartSink>,
    interval: Duration,
    requests: Mutex<RequestSequencer>,
}

impl DashboardStatsPoller {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        surface: Arc<dyn DashboardSurface>,
        charts: Arc<dyn ChartSink>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            surface,
            charts,
            interval: interval.max(MIN_INTERVAL),
            requests: Mutex::new(RequestSequencer::new()),
        }
    }

    /// 1回分の取得と描画。古いレスポンスだった場合は `Ok(None)`
    pub async fn poll_once(&self) -> Result<Option<DashboardStats>> {
        let token = self.lock_requests().issue();

        let stats = match self.api.dashboard_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "stats fetch failed");
                return Err(e);
            }
        };

        if !self.lock_requests().is_current(token) {
            debug!(channel = "stats", token = token.value(), "discarding stale response");
            return Ok(None);
        }
        self.surface.render(&DashboardView::from(&stats));
        Ok(Some(stats))
    }

    /// チャートデータを取得して描画する。描画できた件数を返す
    pub async fn load_charts(&self) -> usize {
        let (sales, status, categories, weekly) = tokio::join!(
            self.api.chart_data(ChartKind::SalesOverview),
            self.api.chart_data(ChartKind::OrderStatus),
            self.api.chart_data(ChartKind::ProductCategories),
            self.api.chart_data(ChartKind::WeeklyRevenue),
        );

        let mut rendered = 0;
        for (kind, result) in ChartKind::ALL.into_iter().zip([sales, status, categories, weekly]) {
            match result {
                Ok(data) => {
                    self.charts.render(kind, &data);
                    rendered += 1;
                }
                Err(e) => warn!(chart = kind.endpoint(), error = %e, "chart fetch failed"),
            }
        }
        rendered
    }

    /// 定期ポーリングを開始する（最初の取得は即時）。ページを閉じるまで続く
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let poller = self.clone();
                tokio::spawn(async move {
                    // 失敗は poll_once 内でログ済み
                    let _ = poller.poll_once().await;
                });
            }
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, RequestSequencer> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}
