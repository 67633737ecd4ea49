use super::types::PageItem;

/// Page lists longer than this collapse with ellipses.
pub const MAX_VISIBLE_PAGES: usize = 5;

pub fn total_pages(total_rows: usize, items_per_page: usize) -> usize {
    let per_page = items_per_page.max(1);
    ((total_rows + per_page - 1) / per_page).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Half-open index range of `page` (1-based) within `total_rows` rows.
pub fn page_bounds(page: usize, items_per_page: usize, total_rows: usize) -> (usize, usize) {
    let per_page = items_per_page.max(1);
    let start = (page.max(1) - 1).saturating_mul(per_page).min(total_rows);
    let end = start.saturating_add(per_page).min(total_rows);
    (start, end)
}

/// First page, last page and a one-page window around `current`,
/// with an ellipsis wherever pages are skipped.
pub fn page_items(current: usize, total: usize) -> Vec<PageItem> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total.max(1)).map(PageItem::Page).collect();
    }

    let current = clamp_page(current, total);
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}
