//! 管理画面テーブル
//!
//! 描画済みの行に対して、クライアント側で以下を行う:
//! - 列ヘッダクリックによる並べ替え（数値として比較できれば数値比較、それ以外は文字列比較）
//! - 行テキスト全体に対する部分一致フィルタ（大文字小文字を区別しない）
//! - 行ごとの選択と、ヘッダの三状態チェックボックス
//!
//! 行の同一性は `RowId` で保持するので、並べ替えや絞り込みで選択がずれることはない。

use crate::error::{Error, Result};
use crate::types::RowId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 列定義。`sortable == false` の列（チェックボックス列、操作列など）はクリックしても並べ替えない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub sortable: bool,
}

impl Column {
    pub fn sortable(label: &str) -> Self {
        Self { label: label.to_string(), sortable: true }
    }

    pub fn exempt(label: &str) -> Self {
        Self { label: label.to_string(), sortable: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// 現在の並べ替え状態。テーブルごとに1列のみ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// ヘッダチェックボックスの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckbox {
    Unchecked,
    Checked,
    Indeterminate,
}

/// 「全選択」が対象にする行の範囲
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectAllScope {
    /// フィルタで非表示の行も含めてすべて
    #[default]
    AllRows,
    /// 表示中の行のみ。ヘッダの状態も表示中の行から算出する
    VisibleOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: RowId,
    pub cells: Vec<String>,
    selected: bool,
    visible: bool,
}

impl TableRow {
    pub fn new(id: impl Into<RowId>, cells: Vec<String>) -> Self {
        Self { id: id.into(), cells, selected: false, visible: true }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// 行の全文（フィルタ対象）
    pub fn text(&self) -> String {
        self.cells.join(" ")
    }

    fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct AdminTable {
    columns: Vec<Column>,
    rows: Vec<TableRow>,
    sort: Option<SortState>,
    filter: String,
    scope: SelectAllScope,
}

impl AdminTable {
    pub fn new(columns: Vec<Column>, scope: SelectAllScope) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            sort: None,
            filter: String::new(),
            scope,
        }
    }

    pub fn with_rows(mut self, rows: Vec<TableRow>) -> Self {
        self.replace_rows(rows);
        self
    }

    /// 行を差し替える（再読込後など）
    ///
    /// 新しい行集合に残っているIDだけ選択を引き継ぎ、現在のフィルタを再適用する。
    pub fn replace_rows(&mut self, rows: Vec<TableRow>) {
        let previously_selected = self.selection();
        self.rows = rows;
        for row in &mut self.rows {
            row.selected = row.selected || previously_selected.contains(&row.id);
        }
        let filter = std::mem::take(&mut self.filter);
        self.set_filter(&filter);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// 現在の並び順の行ID（非表示行を含む）
    pub fn order(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id.clone()).collect()
    }

    pub fn visible_ids(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .filter(|r| r.visible)
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn scope(&self) -> SelectAllScope {
        self.scope
    }

    // =============================================
    // 並べ替え
    // =============================================

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// 列ヘッダのクリック
    ///
    /// 同じ列なら昇順⇔降順を切り替え、別の列なら昇順から始める。
    /// 並べ替え対象外の列では何もせず `Ok(None)` を返す。
    pub fn sort_by(&mut self, column: usize) -> Result<Option<SortState>> {
        let col = self.columns.get(column).ok_or(Error::UnknownColumn(column))?;
        if !col.sortable {
            return Ok(None);
        }

        let direction = match self.sort {
            Some(current) if current.column == column => current.direction.toggled(),
            _ => SortDirection::Ascending,
        };
        let state = SortState { column, direction };

        // Vec::sort_by は安定ソート
        self.rows.sort_by(|a, b| {
            let ord = compare_cells(a.cell(column), b.cell(column));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });

        self.sort = Some(state);
        Ok(Some(state))
    }

    // =============================================
    // フィルタ
    // =============================================

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// フィルタ文字列を適用し、表示行数を返す。選択状態は変更しない
    pub fn set_filter(&mut self, query: &str) -> usize {
        self.filter = query.to_string();
        let needle = query.to_lowercase();
        for row in &mut self.rows {
            row.visible = needle.is_empty() || row.text().to_lowercase().contains(&needle);
        }
        self.visible_count()
    }

    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|r| r.visible).count()
    }

    // =============================================
    // 選択
    // =============================================

    pub fn set_selected(&mut self, id: &RowId, selected: bool) -> Result<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| Error::UnknownRow(id.to_string()))?;
        row.selected = selected;
        Ok(())
    }

    /// 行のチェックボックスを切り替え、新しい状態を返す
    pub fn toggle(&mut self, id: &RowId) -> Result<bool> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| Error::UnknownRow(id.to_string()))?;
        row.selected = !row.selected;
        Ok(row.selected)
    }

    /// ヘッダチェックボックスの操作。対象範囲は `SelectAllScope` に従う
    pub fn set_all(&mut self, selected: bool) {
        let scope = self.scope;
        for row in self.rows.iter_mut().filter(|r| in_scope(scope, r)) {
            row.selected = selected;
        }
    }

    /// ヘッダチェックボックスのクリック。全選択済みなら全解除、それ以外は全選択
    pub fn toggle_all(&mut self) -> HeaderCheckbox {
        let select = self.header_state() != HeaderCheckbox::Checked;
        self.set_all(select);
        self.header_state()
    }

    pub fn header_state(&self) -> HeaderCheckbox {
        let (selected, total) = self
            .rows
            .iter()
            .filter(|r| in_scope(self.scope, r))
            .fold((0usize, 0usize), |(s, t), r| (s + usize::from(r.selected), t + 1));

        if selected == 0 {
            HeaderCheckbox::Unchecked
        } else if selected == total {
            HeaderCheckbox::Checked
        } else {
            HeaderCheckbox::Indeterminate
        }
    }

    /// 選択中の行ID（現在の並び順）
    pub fn selection(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .filter(|r| r.selected)
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.rows.iter().filter(|r| r.selected).count()
    }
}

fn in_scope(scope: SelectAllScope, row: &TableRow) -> bool {
    match scope {
        SelectAllScope::AllRows => true,
        SelectAllScope::VisibleOnly => row.visible,
    }
}

/// セルを数値として解釈する（通貨記号・桁区切りは無視）
fn parse_numeric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim().trim_start_matches(|c| c == '₹' || c == '$');
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 両方が数値なら数値比較、それ以外は大文字小文字を無視した文字列比較
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.trim().to_lowercase().cmp(&b.trim().to_lowercase()),
    }
}
