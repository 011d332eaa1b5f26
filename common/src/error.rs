//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown column: {0}")]
    UnknownColumn(usize),

    #[error("Unknown row: {0}")]
    UnknownRow(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_table() {
        assert_eq!(format!("{}", Error::UnknownColumn(7)), "Unknown column: 7");
        assert_eq!(format!("{}", Error::UnknownRow("42".into())), "Unknown row: 42");
        assert_eq!(
            format!("{}", Error::UnknownField("email".into())),
            "Unknown field: email"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
