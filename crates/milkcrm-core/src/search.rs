//! Local filtering and pagination of a loaded collection.

use crate::entity::EntityKind;

/// Page sizes offered by the list screens.
pub const PAGE_SIZES: [usize; 3] = [5, 10, 20];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Case-insensitive substring match against any of `fields`.
/// An empty term matches everything.
pub fn matches_term(fields: &[&str], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records whose designated searchable fields contain `term`, in original order.
pub fn filter<'a, K: EntityKind>(records: &'a [K::Record], term: &str) -> Vec<&'a K::Record> {
    records
        .iter()
        .filter(|record| matches_term(&K::search_fields(record), term))
        .collect()
}

/// One page of a filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    /// Zero-based index, clamped to the last page.
    pub index: usize,
    /// Always at least 1, even for an empty view.
    pub count: usize,
    /// Offset of `rows[0]` within the whole view.
    pub offset: usize,
}

pub fn paginate<T>(rows: &[T], index: usize, size: usize) -> Page<'_, T> {
    let size = size.max(1);
    let count = rows.len().div_ceil(size).max(1);
    let index = index.min(count - 1);
    let offset = index * size;
    let end = (offset + size).min(rows.len());

    Page {
        rows: &rows[offset.min(rows.len())..end],
        index,
        count,
        offset,
    }
}

/// Snap an arbitrary page size to the nearest offered one.
pub fn normalize_page_size(size: usize) -> usize {
    if PAGE_SIZES.contains(&size) {
        size
    } else {
        DEFAULT_PAGE_SIZE
    }
}
