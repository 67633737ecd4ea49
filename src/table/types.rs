use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Rows are JSON objects; cells are looked up by column key.
pub type Row = Value;

/// Turns a cell (and its row, for composite columns) into its display string.
pub type CellRenderer = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

#[derive(Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    render: Option<CellRenderer>,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into(), sortable: true, render: None }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(f));
        self
    }

    pub fn cell<'a>(&self, row: &'a Row) -> &'a Value {
        row.get(&self.key).unwrap_or(&Value::Null)
    }

    /// Display string of this column for `row`; also what search matches against.
    pub fn display(&self, row: &Row) -> String {
        let cell = self.cell(row);
        match &self.render {
            Some(render) => render(cell, row),
            None => stringify(cell),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("render", &self.render.is_some())
            .finish()
    }
}

pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

// Pages serialize as numbers, gaps as "..."
impl Serialize for PageItem {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => s.serialize_u64(*n as u64),
            PageItem::Ellipsis => s.serialize_str("..."),
        }
    }
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("…"),
        }
    }
}

/// The three pieces of state every view is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub search: String,
    pub sort: Option<SortConfig>,
    pub current_page: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self { search: String::new(), sort: None, current_page: 1 }
    }
}

/// One computed page of a table.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub rows: Vec<&'a Row>,
    pub total_rows: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub pages: Vec<PageItem>,
}

impl TableView<'_> {
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}
