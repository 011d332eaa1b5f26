use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// リクエストが拒否された、または到達できない
    #[error("Network error: {0}")]
    Network(String),

    /// サーバーが失敗を返した（メッセージつき）
    #[error("Server rejected request: {0}")]
    ServerRejection(String),

    /// ログインが必要（ウィッシュリスト操作）
    #[error("Login required")]
    AuthRequired,

    /// クライアント側の入力検証エラー
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 一括操作で行が選択されていない
    #[error("No items selected")]
    NoSelection,

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] dreamdrape_common::Error),
}

impl ClientError {
    /// 通知に表示する文言。サーバーのメッセージがあればそれを、なければ既定文言を使う
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::ServerRejection(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
