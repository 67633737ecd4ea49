use serde::{Deserialize, Serialize};

use super::table::DataTable;
use super::types::{Column, PageItem, Row, SortDirection};

/// Table controls carried in a list endpoint's query string,
/// e.g. `?search=alami&sort=nom&dir=desc&page=2&per_page=20`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TableQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// A single page plus the metadata needed to draw the pager.
#[derive(Debug, Clone, Serialize)]
pub struct TablePage {
    pub rows: Vec<Row>,
    pub total_rows: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub per_page: usize,
    pub pages: Vec<PageItem>,
}

impl TableQuery {
    /// True when the caller asked for any table processing at all.
    pub fn is_active(&self) -> bool {
        self.search.is_some() || self.sort.is_some() || self.page.is_some() || self.per_page.is_some()
    }

    pub fn apply(&self, columns: Vec<Column>, rows: &[Row], default_per_page: usize, max_per_page: usize) -> TablePage {
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, max_per_page.max(1));
        let mut table = DataTable::new(columns, per_page);
        if let Some(term) = &self.search {
            table.set_search(term.clone());
        }
        if let Some(key) = &self.sort {
            table.set_sort(key, self.dir.unwrap_or_default());
        }
        if let Some(page) = self.page {
            table.set_page(page);
        }

        let view = table.view(rows);
        TablePage {
            rows: view.rows.into_iter().cloned().collect(),
            total_rows: view.total_rows,
            total_pages: view.total_pages,
            current_page: view.current_page,
            per_page,
            pages: view.pages,
        }
    }
}
