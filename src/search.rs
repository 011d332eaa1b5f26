//! 検索候補
//!
//! 状態遷移: `Idle → Pending(query) → {Displaying(suggestions) | Idle}`
//!
//! - 入力が短ければタイマーを止めて候補を消す
//! - それ以外はデバウンス後、発火時点の入力値で1回だけ取得する
//! - 取得ごとにトークンを発行し、最新でないレスポンスは捨てる
//!   （閉じた後に遅れて届いたレスポンスで候補が復活しない）
//! - 候補が描画されているのは `Displaying` の間だけ。抜けるときは必ず消す

use crate::api::StorefrontApi;
use crate::config::Config;
use crate::debounce::DebounceTimer;
use crate::ui::{Navigator, SuggestionRow, SuggestionView};
use dreamdrape_common::{format_price, RequestSequencer, SuggestionItem};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Pending(String),
    Displaying(Vec<SuggestionItem>),
}

pub struct SearchSuggester {
    shared: Arc<Shared>,
    timer: DebounceTimer,
    delay: Duration,
}

struct Shared {
    api: Arc<dyn StorefrontApi>,
    view: Arc<dyn SuggestionView>,
    navigator: Arc<dyn Navigator>,
    currency_symbol: String,
    min_chars: usize,
    state: Mutex<SearchState>,
}

struct SearchState {
    text: String,
    phase: SearchPhase,
    requests: RequestSequencer,
}

impl SearchSuggester {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        view: Arc<dyn SuggestionView>,
        navigator: Arc<dyn Navigator>,
        config: &Config,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                api,
                view,
                navigator,
                currency_symbol: config.currency_symbol.clone(),
                min_chars: config.min_query_chars,
                state: Mutex::new(SearchState {
                    text: String::new(),
                    phase: SearchPhase::Idle,
                    requests: RequestSequencer::new(),
                }),
            }),
            timer: DebounceTimer::new(),
            delay: config.search_debounce(),
        }
    }

    /// 入力欄の変更
    pub fn on_input(&mut self, text: &str) {
        let long_enough = self.shared.is_long_enough(text);
        let was_displaying = {
            let mut state = self.shared.lock();
            let was_displaying = matches!(state.phase, SearchPhase::Displaying(_));
            state.text = text.to_string();
            if long_enough {
                state.phase = SearchPhase::Pending(text.trim().to_string());
            } else {
                state.phase = SearchPhase::Idle;
                state.requests.invalidate();
            }
            was_displaying
        };

        if long_enough {
            // 表示中の候補は Displaying の間だけ残す
            if was_displaying {
                self.shared.view.clear();
            }
            let shared = self.shared.clone();
            self.timer.schedule(self.delay, move || shared.fetch_current());
        } else {
            self.timer.cancel();
            self.shared.view.clear();
        }
    }

    /// 外側クリックまたはEscape。取得中のリクエストは止めず、結果だけ無視する
    pub fn dismiss(&mut self) {
        {
            let mut state = self.shared.lock();
            state.requests.invalidate();
            state.phase = SearchPhase::Idle;
        }
        self.shared.view.clear();
    }

    /// 候補の選択。入力値を候補名にして検索を実行し、その検索語を返す
    pub fn select(&mut self, index: usize) -> Option<String> {
        let name = {
            let mut state = self.shared.lock();
            let name = match &state.phase {
                SearchPhase::Displaying(items) => items.get(index)?.name.clone(),
                _ => return None,
            };
            state.text = name.clone();
            state.phase = SearchPhase::Idle;
            state.requests.invalidate();
            name
        };
        self.timer.cancel();
        self.shared.view.clear();
        self.shared.navigator.navigate(&search_location(&name));
        Some(name)
    }

    /// Enterでの検索実行
    pub fn submit(&mut self) -> String {
        let text = {
            let mut state = self.shared.lock();
            state.phase = SearchPhase::Idle;
            state.requests.invalidate();
            state.text.trim().to_string()
        };
        self.timer.cancel();
        self.shared.view.clear();
        self.shared.navigator.navigate(&search_location(&text));
        text
    }

    pub fn phase(&self) -> SearchPhase {
        self.shared.lock().phase.clone()
    }

    pub fn text(&self) -> String {
        self.shared.lock().text.clone()
    }

    pub fn is_debouncing(&self) -> bool {
        self.timer.is_pending()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_long_enough(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.min_chars
    }

    /// デバウンス発火時: その時点の入力値で取得する
    async fn fetch_current(self: Arc<Self>) {
        let (query, token) = {
            let mut state = self.lock();
            let query = state.text.trim().to_string();
            if query.chars().count() < self.min_chars {
                return;
            }
            (query, state.requests.issue())
        };
        debug!(%query, token = token.value(), "fetching suggestions");

        let result = self.api.search_suggestions(&query).await;

        let mut state = self.lock();
        if !state.requests.is_current(token) {
            debug!(channel = "search", token = token.value(), "discarding stale response");
            return;
        }
        match result {
            Ok(items) if items.is_empty() => {
                state.phase = SearchPhase::Idle;
                drop(state);
                self.view.clear();
            }
            Ok(items) => {
                let rows = self.rows(&items);
                state.phase = SearchPhase::Displaying(items);
                drop(state);
                self.view.render(&rows);
            }
            Err(e) => {
                // 通知は出さない
                warn!(error = %e, %query, "suggestion fetch failed");
                state.phase = SearchPhase::Idle;
                drop(state);
                self.view.clear();
            }
        }
    }

    fn rows(&self, items: &[SuggestionItem]) -> Vec<SuggestionRow> {
        items
            .iter()
            .map(|item| SuggestionRow {
                name: item.name.clone(),
                price_label: format_price(item.price, &self.currency_symbol),
            })
            .collect()
    }
}

/// 商品一覧の検索URL
pub fn search_location(query: &str) -> String {
    match reqwest::Url::parse_with_params("http://localhost/products", &[("search", query)]) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => "/products".to_string(),
    }
}
