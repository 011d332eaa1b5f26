//! Dream-Drape Common Library
//!
//! ストアフロントクライアントの状態機械とワイヤ型。
//! 非同期ランタイムに依存しないので、描画面なしで単体テストできる。

pub mod types;
pub mod error;
pub mod sequencer;
pub mod table;
pub mod validation;
pub mod quantity;
pub mod format;
pub mod dashboard;

pub use types::{
    AddToCart, BulkActionRequest, BulkActionResponse, CartCount, DashboardStats,
    ExportResponse, FormResponse, RowId, Severity, SuggestionItem,
};
pub use error::{Error, Result};
pub use sequencer::{RequestSequencer, RequestToken};
pub use table::{AdminTable, Column, HeaderCheckbox, SelectAllScope, SortDirection, SortState, TableRow};
pub use validation::{FieldSpec, FieldValidationResult, FormReport, FormValidator, FormValues, Rule, SubmitMode};
pub use quantity::QuantityInput;
pub use format::format_price;
pub use dashboard::{BadgeView, ChartKind, CounterView, DashboardView};
