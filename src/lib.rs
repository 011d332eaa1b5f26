//! Dream-Drape storefront client
//!
//! ストアフロントと管理コンソールの対話状態層。
//! 検索候補、カート件数、管理テーブルの一括操作、フォーム検証、ダッシュボード集計を
//! 非同期HTTPでサーバーと同期する。

pub mod admin;
pub mod api;
pub mod cart;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod form;
pub mod logging;
pub mod notify;
pub mod search;
pub mod store;
pub mod ui;

pub use error::{ClientError, Result};
