//! Transient grid state
//!
//! [`TableView`] owns the row collection, the filter cache handle, the
//! loading and add-form flags, sorting and pagination. It is owned
//! exclusively by one synchronizer and never persisted.

use crate::error::GridError;
use grid_column::ResolvedColumn;
use grid_filter::value::{as_number, as_timestamp, is_truthy};
use grid_filter::SharedFilterCache;
use grid_spec::{value_text, DataType, ModelSpec, RowRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Active single-column sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub order: SortOrder,
}

impl SortState {
    #[inline]
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }
}

/// Page window over the visible rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    rows_per_page: usize,
    page: usize,
    options: Vec<usize>,
}

impl Pagination {
    /// Create pagination on the first page
    #[must_use]
    pub fn new(rows_per_page: usize, mut options: Vec<usize>) -> Self {
        options.retain(|&rows| rows > 0);
        Self {
            rows_per_page: rows_per_page.max(1),
            page: 0,
            options,
        }
    }

    #[inline]
    #[must_use]
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Zero-based current page
    #[inline]
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &[usize] {
        &self.options
    }

    /// Change page size and return to the first page
    ///
    /// # Errors
    /// `InvalidPageSize` when `rows` is zero or not among the offered sizes.
    pub fn set_rows_per_page(&mut self, rows: usize) -> Result<(), GridError> {
        if rows == 0 || !self.options.contains(&rows) {
            return Err(GridError::InvalidPageSize(rows));
        }
        self.rows_per_page = rows;
        self.page = 0;
        Ok(())
    }

    /// Number of pages for `total` rows; an empty grid still has one page
    #[inline]
    #[must_use]
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.rows_per_page).max(1)
    }

    /// Move to `page`, clamped to the last page
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.page = page.min(self.page_count(total) - 1);
    }

    /// Rows of the current page (clamped when the collection shrank)
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.page.min(self.page_count(items.len()) - 1);
        let start = (page * self.rows_per_page).min(items.len());
        let end = (start + self.rows_per_page).min(items.len());
        &items[start..end]
    }

    pub(crate) fn reset(&mut self) {
        self.page = 0;
    }
}

/// Row collection plus interaction state
#[derive(Debug, Clone)]
pub struct TableView {
    rows: Vec<RowRecord>,
    filters: SharedFilterCache,
    loading: bool,
    add_form_visible: bool,
    sort: Option<SortState>,
    pagination: Pagination,
}

impl TableView {
    /// Empty view with default filters and the initial sort
    #[must_use]
    pub fn new(model: &ModelSpec, pagination: Pagination) -> Self {
        Self {
            rows: Vec::new(),
            filters: SharedFilterCache::new(model),
            loading: false,
            add_form_visible: false,
            sort: initial_sort(model),
            pagination,
        }
    }

    /// Full collection in server order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    #[inline]
    pub(crate) fn rows_mut(&mut self) -> &mut Vec<RowRecord> {
        &mut self.rows
    }

    pub(crate) fn replace_rows(&mut self, rows: Vec<RowRecord>) {
        self.rows = rows;
        self.pagination.reset();
    }

    /// Filter cache shared with the columns
    #[inline]
    #[must_use]
    pub fn filters(&self) -> &SharedFilterCache {
        &self.filters
    }

    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    #[inline]
    #[must_use]
    pub fn is_add_form_visible(&self) -> bool {
        self.add_form_visible
    }

    pub(crate) fn set_add_form_visible(&mut self, visible: bool) {
        self.add_form_visible = visible;
    }

    #[inline]
    #[must_use]
    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Cycle a column's sort: ascending, descending, unsorted
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = match self.sort.take() {
            Some(SortState {
                field: current,
                order: SortOrder::Ascending,
            }) if current == field => Some(SortState {
                field: current,
                order: SortOrder::Descending,
            }),
            Some(SortState {
                field: current,
                order: SortOrder::Descending,
            }) if current == field => None,
            _ => Some(SortState::ascending(field)),
        };
    }

    #[inline]
    #[must_use]
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    #[inline]
    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    /// Rebuild filters and sort for a different model
    pub(crate) fn reset(&mut self, model: &ModelSpec) {
        self.rows.clear();
        self.filters.reset(model);
        self.sort = initial_sort(model);
        self.add_form_visible = false;
        self.pagination.reset();
    }

    /// Rows passing the applied filters, in sort order
    #[must_use]
    pub fn visible_rows(&self, columns: &[ResolvedColumn]) -> Vec<&RowRecord> {
        let applied = self.filters.applied();
        let mut rows: Vec<&RowRecord> = self.rows.iter().filter(|row| applied.matches(row)).collect();

        if let Some(sort) = &self.sort {
            let data_type = columns
                .iter()
                .find(|c| c.field == sort.field)
                .map_or(DataType::Text, |c| c.data_type);
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field), data_type);
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    /// Visible rows on the current page
    #[must_use]
    pub fn page_rows(&self, columns: &[ResolvedColumn]) -> Vec<&RowRecord> {
        let visible = self.visible_rows(columns);
        self.pagination.slice(visible.as_slice()).to_vec()
    }
}

fn initial_sort(model: &ModelSpec) -> Option<SortState> {
    model.display_name().map(SortState::ascending)
}

/// Order two cell values by data type
///
/// Missing values sort first, then values of the column's type, then values
/// that do not parse as that type (compared as lowercase text).
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, data_type: DataType) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    let typed = match data_type {
        DataType::Numeric => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => Some(x.total_cmp(&y)),
            (Some(_), None) => Some(Ordering::Less),
            (None, Some(_)) => Some(Ordering::Greater),
            (None, None) => None,
        },
        DataType::Date => match (as_timestamp(a), as_timestamp(b)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            (Some(_), None) => Some(Ordering::Less),
            (None, Some(_)) => Some(Ordering::Greater),
            (None, None) => None,
        },
        DataType::Boolean => Some(is_truthy(a).cmp(&is_truthy(b))),
        DataType::Text | DataType::Multiselect | DataType::Dropdown => None,
    };
    typed.unwrap_or_else(|| value_text(a).to_lowercase().cmp(&value_text(b).to_lowercase()))
}
