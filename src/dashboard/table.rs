use super::layout::{default_columns, layout_columns, normalize_rows, Column};
use crate::config::{ColumnDef, TableCatalog};
use crate::engine::{inferred_column_names, record_cell, Record, TypedResource};
use serde_json::Value;

/// Columns shown for the well-known collections when no table is configured for them.
fn builtin_column_names(resource: TypedResource) -> &'static [&'static str] {
    match resource {
        TypedResource::Definitions => &["key", "name", "version", "resource"],
        TypedResource::Instances => &["id", "definitionId", "businessKey", "startTime"],
        TypedResource::Variables => &["name", "value", "type"],
    }
}

/// Visible column definitions for a resource: configured, built in, or inferred from the
/// first record, in that order.
pub fn column_defs_for(catalog: &TableCatalog, resource: &str, records: &[Record]) -> Vec<ColumnDef> {
    if let Some(table) = catalog.find(resource) {
        let visible = table
            .visible_columns()
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        if !visible.is_empty() {
            return visible;
        }
    }
    if let Some(typed) = TypedResource::from_name(resource) {
        return builtin_column_names(typed)
            .iter()
            .map(|name| ColumnDef::new(name))
            .collect();
    }
    inferred_column_names(records)
        .iter()
        .map(|name| ColumnDef::new(name))
        .collect()
}

/// Rendered table contents. Rows are derived from the records and always match the column
/// count; the cursor always points at an existing row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    defs: Vec<ColumnDef>,
    records: Vec<Record>,
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    cursor: usize,
    width: u16,
    generation: u64,
}

impl TableData {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Fetch generation the contents came from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when there is no real record behind the rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replaces the columns; rows already present are re-normalized to the new count.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        let rows = std::mem::take(&mut self.rows);
        self.rows = normalize_rows(rows, self.columns.len());
    }

    pub fn set_rows(&mut self, rows: Vec<Vec<String>>) {
        self.rows = normalize_rows(rows, self.columns.len());
        self.set_cursor(self.cursor);
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.rows.len().saturating_sub(1));
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let cursor = self.cursor.saturating_add_signed(delta);
        self.set_cursor(cursor);
    }

    pub fn cursor_to_end(&mut self) {
        self.set_cursor(usize::MAX);
    }

    /// Lays out `defs` against `width` and renders `records` into rows.
    pub fn load(&mut self, defs: Vec<ColumnDef>, records: Vec<Record>, width: u16, generation: u64) {
        self.defs = defs;
        self.records = records;
        self.generation = generation;
        self.relayout(width);
    }

    /// Recomputes columns for a new width and re-renders the rows from the records.
    pub fn relayout(&mut self, width: u16) {
        self.width = width;
        let columns = if self.defs.is_empty() {
            default_columns(1, width)
        } else {
            layout_columns(&self.defs, width)
        };
        self.set_columns(columns);
        self.set_rows(self.render_rows());
    }

    fn render_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .map(|column| record_cell(record, &column.key))
                    .collect()
            })
            .collect()
    }

    /// Applies a saved snapshot: columns first, then rows, then the cursor.
    pub fn restore(&mut self, snapshot: TableData) {
        let TableData {
            defs,
            records,
            columns,
            rows,
            cursor,
            width,
            generation,
        } = snapshot;
        self.defs = defs;
        self.records = records;
        self.width = width;
        self.generation = generation;
        self.set_columns(columns);
        self.set_rows(rows);
        self.set_cursor(cursor);
    }

    /// Position of a column among the rendered columns, ignoring case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.key.eq_ignore_ascii_case(name))
    }

    pub fn selected_row(&self) -> Option<&[String]> {
        if self.is_empty() {
            return None;
        }
        self.rows.get(self.cursor).map(Vec::as_slice)
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.records.get(self.cursor)
    }

    pub fn record(&self, row: usize) -> Option<&Record> {
        self.records.get(row)
    }

    /// Writes a new value into a record and re-renders its row.
    pub fn update_cell(&mut self, row: usize, key: &str, value: Value) -> bool {
        let Some(record) = self.records.get_mut(row) else {
            return false;
        };
        let field = record
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(key))
            .cloned()
            .unwrap_or_else(|| key.to_string());
        record.insert(field, value);
        self.set_rows(self.render_rows());
        true
    }

    /// Drops every record whose `key` field renders as `value`.
    pub fn remove_where(&mut self, key: &str, value: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record_cell(record, key) != value);
        if self.records.len() == before {
            return false;
        }
        self.set_rows(self.render_rows());
        true
    }
}
