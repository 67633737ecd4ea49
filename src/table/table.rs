use super::pagination;
use super::table_order::TableOrder;
use super::table_search::TableSearch;
use super::types::{Column, Row, SortConfig, SortDirection, TableState, TableView};

/// Client-side table: search, single-key sort and fixed-size pages over an
/// in-memory row array. Only the search term, sort config and current page
/// are stored; every view is recomputed from them.
#[derive(Debug, Clone)]
pub struct DataTable {
    columns: Vec<Column>,
    items_per_page: usize,
    state: TableState,
}

impl DataTable {
    pub fn new(columns: Vec<Column>, items_per_page: usize) -> Self {
        Self { columns, items_per_page: items_per_page.max(1), state: TableState::default() }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Changing the term always returns to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) -> &mut Self {
        self.state.search = term.into();
        self.state.current_page = 1;
        self
    }

    /// Same column toggles direction, another column starts ascending.
    /// Unknown or unsortable columns leave the sort untouched.
    pub fn request_sort(&mut self, key: &str) -> &mut Self {
        let sortable = self.columns.iter().any(|c| c.key == key && c.sortable);
        if !sortable {
            return self;
        }

        let direction = match &self.state.sort {
            Some(current) if current.key == key => current.direction.toggle(),
            _ => SortDirection::Asc,
        };
        self.state.sort = Some(SortConfig { key: key.to_string(), direction });
        self
    }

    /// Pin a sort directly (used when the sort comes from a query string).
    pub fn set_sort(&mut self, key: &str, direction: SortDirection) -> &mut Self {
        if self.columns.iter().any(|c| c.key == key && c.sortable) {
            self.state.sort = Some(SortConfig { key: key.to_string(), direction });
        }
        self
    }

    /// Stored as requested; clamped against the data when a view is computed.
    pub fn set_page(&mut self, page: usize) -> &mut Self {
        self.state.current_page = page.max(1);
        self
    }

    pub fn next_page(&mut self, data: &[Row]) -> &mut Self {
        let total = pagination::total_pages(self.process(data).len(), self.items_per_page);
        let page = pagination::clamp_page(self.state.current_page, total);
        self.state.current_page = (page + 1).min(total);
        self
    }

    pub fn previous_page(&mut self) -> &mut Self {
        self.state.current_page = self.state.current_page.saturating_sub(1).max(1);
        self
    }

    /// Filtered then sorted rows, before pagination.
    pub fn process<'a>(&self, data: &'a [Row]) -> Vec<&'a Row> {
        let mut rows = TableSearch::filter(data, &self.columns, &self.state.search);
        if let Some(sort) = &self.state.sort {
            TableOrder::sort(&mut rows, sort);
        }
        rows
    }

    pub fn view<'a>(&self, data: &'a [Row]) -> TableView<'a> {
        let processed = self.process(data);
        let total_rows = processed.len();
        let total_pages = pagination::total_pages(total_rows, self.items_per_page);
        let current_page = pagination::clamp_page(self.state.current_page, total_pages);
        let (start, end) = pagination::page_bounds(current_page, self.items_per_page, total_rows);

        TableView {
            rows: processed[start..end].to_vec(),
            total_rows,
            total_pages,
            current_page,
            pages: pagination::page_items(current_page, total_pages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn students() -> Vec<Row> {
        (1..=23)
            .map(|i| json!({
                "id": i,
                "nom": format!("Etudiant {:02}", i),
                "filiere": if i % 2 == 0 { "GI" } else { "GC" },
            }))
            .collect()
    }

    fn table(per_page: usize) -> DataTable {
        DataTable::new(
            vec![
                Column::new("nom", "Nom"),
                Column::new("filiere", "Filière"),
                Column::new("actions", "").unsortable(),
            ],
            per_page,
        )
    }

    fn ids(rows: &[&Row]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn sort_toggles_on_same_column_and_resets_on_another() {
        let mut t = table(10);
        t.request_sort("nom");
        assert_eq!(t.state().sort.as_ref().unwrap().direction, SortDirection::Asc);
        t.request_sort("nom");
        assert_eq!(t.state().sort.as_ref().unwrap().direction, SortDirection::Desc);
        t.request_sort("filiere");
        assert_eq!(t.state().sort, Some(SortConfig { key: "filiere".into(), direction: SortDirection::Asc }));
    }

    #[test]
    fn unsortable_column_is_ignored() {
        let mut t = table(10);
        t.request_sort("actions");
        assert!(t.state().sort.is_none());
    }

    #[test]
    fn search_resets_to_first_page() {
        let data = students();
        let mut t = table(5);
        t.set_page(3);
        assert_eq!(t.view(&data).current_page, 3);
        t.set_search("gi");
        let view = t.view(&data);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.total_rows, 11);
    }

    #[test]
    fn filtered_rows_all_contain_the_term() {
        let data = students();
        let mut t = table(50);
        t.set_search("ETUDIANT 1");
        let view = t.view(&data);
        assert!(!view.is_empty());
        for row in &view.rows {
            assert!(t.columns().iter().any(|c| c.display(row).to_lowercase().contains("etudiant 1")));
        }
    }

    #[test]
    fn pages_partition_the_processed_rows() {
        let data = students();
        let mut t = table(4);
        t.request_sort("filiere");
        let expected = ids(&t.process(&data));

        let total_pages = t.view(&data).total_pages;
        assert_eq!(total_pages, 6);
        let mut seen = Vec::new();
        for page in 1..=total_pages {
            t.set_page(page);
            let view = t.view(&data);
            assert!(view.rows.len() <= 4);
            seen.extend(ids(&view.rows));
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let data = students();
        let mut t = table(10);
        t.set_page(99);
        let view = t.view(&data);
        assert_eq!(view.current_page, 3);
        assert_eq!(view.rows.len(), 3);
        assert!(!view.has_next());
    }

    #[test]
    fn navigation_stays_in_range() {
        let data = students();
        let mut t = table(10);
        t.next_page(&data).next_page(&data).next_page(&data);
        assert_eq!(t.view(&data).current_page, 3);
        t.previous_page().previous_page().previous_page();
        assert_eq!(t.view(&data).current_page, 1);
    }

    #[test]
    fn empty_data_has_one_empty_page() {
        let data: Vec<Value> = vec![];
        let view = table(10).view(&data);
        assert_eq!(view.total_pages, 1);
        assert!(view.rows.is_empty());
    }
}
