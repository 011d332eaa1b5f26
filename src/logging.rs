//! `tracing` によるログ出力
//!
//! - `warn`: 通知を出さずに握りつぶしたネットワーク失敗
//! - `info`: サーバー往復の結果
//! - `debug`: 状態遷移、古いレスポンスの破棄
//!
//! `RUST_LOG` が設定されていれば `-v` の指定より優先する。

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `-v` の回数からログレベルを決める
pub fn level_from_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // 外部クレートはwarnに抑える
        EnvFilter::new(format!(
            "warn,dreamdrape={level},dreamdrape_client={level},dreamdrape_common={level}",
            level = level
        ))
    })
}

/// 標準エラーへのログ出力を初期化する。二重初期化はエラー
pub fn init_logging(verbose: u8) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_env_filter(level_from_verbosity(verbose));
    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2);

    tracing_subscriber::registry().with(filter).with(layer).try_init()
}
