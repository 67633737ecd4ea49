use super::types::{Column, Row};

pub struct TableSearch;

impl TableSearch {
    /// Rows whose rendered value in at least one column contains `term`,
    /// case-insensitively. An empty or blank term keeps every row.
    pub fn filter<'a>(rows: &'a [Row], columns: &[Column], term: &str) -> Vec<&'a Row> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return rows.iter().collect();
        }
        rows.iter().filter(|row| Self::matches(row, columns, &needle)).collect()
    }

    /// `needle` must already be lowercased.
    pub fn matches(row: &Row, columns: &[Column], needle: &str) -> bool {
        columns.iter().any(|col| col.display(row).to_lowercase().contains(needle))
    }
}
