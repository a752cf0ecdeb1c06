//! Client-side table utilities
//!
//! Filtering, sorting and pagination of fetched rows, as the list views do
//! before rendering. All three operate on borrowed rows; nothing is cloned.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Page sizes offered by the list views
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A sortable/filterable cell value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Text(String),
    Number(i64),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl SortKey {
    pub fn text(value: impl Into<String>) -> Self {
        SortKey::Text(value.into())
    }

    /// Text form used by the filter
    pub fn as_filter_text(&self) -> String {
        match self {
            SortKey::Text(text) => text.to_lowercase(),
            SortKey::Number(n) => n.to_string(),
            SortKey::Date(date) => date.format("%Y-%m-%d").to_string(),
            SortKey::DateTime(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::DateTime(a), SortKey::DateTime(b)) => a.cmp(b),
            (a, b) => a.as_filter_text().cmp(&b.as_filter_text()),
        }
    }
}

/// A row that can be shown in a list view
pub trait TableRow {
    /// Column names, in display order
    fn columns() -> &'static [&'static str];

    /// Value of `column`, or `None` when the cell is empty or unknown
    fn cell(&self, column: &str) -> Option<SortKey>;
}

/// Rows whose text contains `filter` in any column (case-insensitive)
pub fn filter_rows<'a, T: TableRow>(rows: &'a [T], filter: &str) -> Vec<&'a T> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|row| {
            T::columns().iter().any(|column| {
                row.cell(column)
                    .is_some_and(|value| value.as_filter_text().contains(&needle))
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A sort column the rows do not have
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort column '{column}' (available: {})", .available.join(", "))]
pub struct UnknownColumn {
    pub column: String,
    pub available: &'static [&'static str],
}

/// Active sort of a list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Next state after clicking the header of `column`
    ///
    /// Cycles none → ascending → descending → none; a different column
    /// always starts ascending.
    pub fn toggle(current: Option<&SortState>, column: &str) -> Option<SortState> {
        match current {
            Some(state) if state.column == column => match state.direction {
                SortDirection::Asc => Some(SortState::desc(column)),
                SortDirection::Desc => None,
            },
            _ => Some(SortState::asc(column)),
        }
    }

    /// Check the column against the columns of `T`
    pub fn check_column<T: TableRow>(&self) -> Result<(), UnknownColumn> {
        if T::columns().contains(&self.column.as_str()) {
            Ok(())
        } else {
            Err(UnknownColumn {
                column: self.column.clone(),
                available: T::columns(),
            })
        }
    }

    /// Parse `column` or `column:asc|desc`
    pub fn parse(spec: &str) -> Result<Self, String> {
        let (column, direction) = match spec.split_once(':') {
            Some((column, direction)) => (column, Some(direction)),
            None => (spec, None),
        };
        let column = column.trim();
        if column.is_empty() {
            return Err("sort column cannot be empty".to_string());
        }
        match direction.map(|d| d.trim().to_lowercase()).as_deref() {
            None | Some("asc") => Ok(SortState::asc(column)),
            Some("desc") => Ok(SortState::desc(column)),
            Some(other) => Err(format!("invalid sort direction '{}'", other)),
        }
    }
}

/// Stable sort of `rows` by `sort`; rows without a value go last
pub fn sort_rows<T: TableRow>(rows: &mut [&T], sort: &SortState) {
    rows.sort_by(|a, b| {
        match (a.cell(&sort.column), b.cell(&sort.column)) {
            (Some(a), Some(b)) => {
                let ordering = a.compare(&b);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Page selection of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    /// Sizes outside [`PAGE_SIZE_OPTIONS`] fall back to the default
    pub fn new(page_index: usize, page_size: usize) -> Self {
        let page_size = if PAGE_SIZE_OPTIONS.contains(&page_size) {
            page_size
        } else {
            tracing::debug!("Unsupported page size {}, using {}", page_size, DEFAULT_PAGE_SIZE);
            DEFAULT_PAGE_SIZE
        };
        Self {
            page_index,
            page_size,
        }
    }

    /// Slice out the selected page; an out-of-range index shows the last page
    pub fn page<'a, T>(&self, rows: Vec<&'a T>) -> Page<'a, T> {
        let total = rows.len();
        let page_count = total.div_ceil(self.page_size).max(1);
        let page_index = self.page_index.min(page_count - 1);
        let rows = rows
            .into_iter()
            .skip(page_index * self.page_size)
            .take(self.page_size)
            .collect();

        Page {
            rows,
            page_index,
            page_count,
            total,
        }
    }
}

/// One rendered page of a list
#[derive(Debug)]
pub struct Page<'a, T> {
    pub rows: Vec<&'a T>,
    pub page_index: usize,
    pub page_count: usize,
    /// Row count after filtering, before pagination
    pub total: usize,
}

/// Filter, sort and pagination state of a list view
#[derive(Debug, Clone, Default)]
pub struct TableView {
    pub filter: String,
    pub sort: Option<SortState>,
    pub paginator: Paginator,
}

impl TableView {
    /// Check that the sort, if any, names one of the columns of `T`
    pub fn check<T: TableRow>(&self) -> Result<(), UnknownColumn> {
        match &self.sort {
            Some(sort) => sort.check_column::<T>(),
            None => Ok(()),
        }
    }

    pub fn apply<'a, T: TableRow>(&self, rows: &'a [T]) -> Page<'a, T> {
        let mut visible = filter_rows(rows, &self.filter);
        if let Some(sort) = &self.sort {
            sort_rows(&mut visible, sort);
        }
        self.paginator.page(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        name: &'static str,
        size: Option<i64>,
    }

    impl TableRow for Row {
        fn columns() -> &'static [&'static str] {
            &["name", "size"]
        }

        fn cell(&self, column: &str) -> Option<SortKey> {
            match column {
                "name" => Some(SortKey::text(self.name)),
                "size" => self.size.map(SortKey::Number),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "beta", size: Some(2) },
            Row { name: "Alpha", size: None },
            Row { name: "gamma", size: Some(12) },
            Row { name: "delta", size: Some(2) },
        ]
    }

    fn names(rows: &[&Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_across_columns() {
        let rows = rows();
        assert_eq!(names(&filter_rows(&rows, " ALPHA ")), vec!["Alpha"]);
        assert_eq!(names(&filter_rows(&rows, "12")), vec!["gamma"]);
        assert_eq!(filter_rows(&rows, "").len(), 4);
        assert!(filter_rows(&rows, "zeta").is_empty());
    }

    #[test]
    fn test_sort_text_ignores_case() {
        let rows = rows();
        let mut visible: Vec<_> = rows.iter().collect();
        sort_rows(&mut visible, &SortState::asc("name"));
        assert_eq!(names(&visible), vec!["Alpha", "beta", "delta", "gamma"]);
    }

    #[test]
    fn test_sort_is_stable_and_missing_last() {
        let rows = rows();
        let mut visible: Vec<_> = rows.iter().collect();
        sort_rows(&mut visible, &SortState::desc("size"));
        assert_eq!(names(&visible), vec!["gamma", "beta", "delta", "Alpha"]);

        sort_rows(&mut visible, &SortState::asc("size"));
        assert_eq!(names(&visible), vec!["beta", "delta", "gamma", "Alpha"]);
    }

    #[test]
    fn test_toggle_cycle() {
        let first = SortState::toggle(None, "name");
        assert_eq!(first, Some(SortState::asc("name")));
        let second = SortState::toggle(first.as_ref(), "name");
        assert_eq!(second, Some(SortState::desc("name")));
        assert_eq!(SortState::toggle(second.as_ref(), "name"), None);
        assert_eq!(
            SortState::toggle(second.as_ref(), "size"),
            Some(SortState::asc("size"))
        );
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(SortState::parse("title"), Ok(SortState::asc("title")));
        assert_eq!(SortState::parse("date:DESC"), Ok(SortState::desc("date")));
        assert!(SortState::parse(":desc").is_err());
        assert!(SortState::parse("date:up").is_err());
    }

    #[test]
    fn test_unknown_sort_column_is_reported() {
        assert_eq!(SortState::asc("size").check_column::<Row>(), Ok(()));

        let err = SortState::desc("nonsense").check_column::<Row>().unwrap_err();
        assert_eq!(err.column, "nonsense");
        assert_eq!(
            err.to_string(),
            "unknown sort column 'nonsense' (available: name, size)"
        );

        let view = TableView {
            sort: Some(SortState::asc("colour")),
            ..TableView::default()
        };
        assert!(view.check::<Row>().is_err());
        assert!(TableView::default().check::<Row>().is_ok());
    }

    #[test]
    fn test_datetime_keys_sort_chronologically() {
        use chrono::TimeZone;

        let earlier = SortKey::DateTime(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let later = SortKey::DateTime(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap());
        assert_eq!(earlier.compare(&later), Ordering::Less);
        assert_eq!(later.as_filter_text(), "2024-05-01 10:30:00");
    }

    #[test]
    fn test_pagination_clamps_to_last_page() {
        let data: Vec<i32> = (0..12).collect();
        let refs: Vec<_> = data.iter().collect();

        let page = Paginator::new(7, 5).page(refs.clone());
        assert_eq!(page.page_index, 2);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total, 12);
        assert_eq!(page.rows, vec![&10, &11]);

        let page = Paginator::new(0, 7).page(refs);
        assert_eq!(page.rows.len(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let empty: Vec<&i32> = Vec::new();
        let page = Paginator::default().page(empty);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.page_index, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_table_view_apply() {
        let rows = rows();
        let view = TableView {
            filter: "a".to_string(),
            sort: Some(SortState::desc("name")),
            paginator: Paginator::new(0, 5),
        };
        let page = view.apply(&rows);
        assert_eq!(names(&page.rows), vec!["gamma", "delta", "beta", "Alpha"]);
        assert_eq!(page.total, 4);
    }
}
