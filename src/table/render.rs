use super::table::DataTable;
use super::types::TableView;

const MAX_CELL_WIDTH: usize = 40;

/// Fixed-width text grid for terminal output: header (with sort arrow),
/// separator, one line per row, and a pager footer.
pub fn render_text(table: &DataTable, view: &TableView<'_>) -> String {
    let columns = table.columns();
    let cells: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| columns.iter().map(|c| truncate(&c.display(row))).collect())
        .collect();

    let headers: Vec<String> = columns
        .iter()
        .map(|c| match &table.state().sort {
            Some(sort) if sort.key == c.key => format!("{} {}", c.label, sort.direction.arrow()),
            _ => c.label.clone(),
        })
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|i| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(headers[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&line(&headers, &widths));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    out.push('\n');

    if view.is_empty() {
        out.push_str("Aucun résultat\n");
    }
    for row in &cells {
        out.push_str(&line(row, &widths));
        out.push('\n');
    }

    let mut pager: Vec<String> = view.pages.iter().map(|p| p.to_string()).collect();
    if view.has_previous() {
        pager.insert(0, "«".to_string());
    }
    if view.has_next() {
        pager.push("»".to_string());
    }
    out.push_str(&format!(
        "Page {}/{} [{}] · {} résultat(s)\n",
        view.current_page,
        view.total_pages,
        pager.join(" "),
        view.total_rows
    ));
    out
}

fn line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn truncate(s: &str) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use serde_json::json;

    #[test]
    fn renders_header_rows_and_pager() {
        let rows = vec![json!({"nom": "Alami", "role": 2}), json!({"nom": "Bennani", "role": 0})];
        let mut table = DataTable::new(vec![Column::new("nom", "Nom"), Column::new("role", "Rôle")], 10);
        table.request_sort("nom");
        let out = render_text(&table, &table.view(&rows));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Nom ▲"));
        assert!(lines[2].starts_with("Alami"));
        assert!(lines[3].starts_with("Bennani"));
        assert!(out.contains("Page 1/1 [1] · 2 résultat(s)"));
    }

    #[test]
    fn pager_marks_neighbouring_pages() {
        let rows: Vec<_> = (1..=25).map(|i| json!({ "id": i })).collect();
        let mut table = DataTable::new(vec![Column::new("id", "Id")], 10);

        let first = render_text(&table, &table.view(&rows));
        assert!(first.contains("Page 1/3 [1 2 3 »] · 25 résultat(s)"));

        table.set_page(2);
        let middle = render_text(&table, &table.view(&rows));
        assert!(middle.contains("Page 2/3 [« 1 2 3 »]"));

        table.set_page(3);
        let last = render_text(&table, &table.view(&rows));
        assert!(last.contains("Page 3/3 [« 1 2 3] · 25 résultat(s)"));
    }

    #[test]
    fn empty_table_says_so() {
        let table = DataTable::new(vec![Column::new("id", "Id")], 10);
        let out = render_text(&table, &table.view(&[]));
        assert!(out.contains("Aucun résultat"));
        assert!(out.contains("Page 1/1 [1] · 0 résultat(s)"));
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(100);
        assert_eq!(truncate(&long).chars().count(), MAX_CELL_WIDTH);
    }
}
