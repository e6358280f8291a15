//! Page requests, sort descriptors and page results.
//!
//! # Invariants
//! - `page_index` is zero-based and `page_size` is at least 1.
//! - Sort fields are resolved against a per-store whitelist before they ever
//!   reach SQL.
//! - Every paged query appends `id ASC` as the final tie-breaker.

use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use serde::Serialize;

/// Sort direction for paged queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Maps a transport token to a direction.
    ///
    /// `ASC` in any letter case is ascending. Every other token, including
    /// typos and the empty string, is descending.
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("ASC") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Requested sort: a field token (validated later by the store) and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::by("id", SortDirection::Asc)
    }
}

/// One page of a sorted result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page_index: u32,
    page_size: u32,
    sort: Sort,
}

impl PageRequest {
    /// Builds a page request, rejecting a zero page size.
    pub fn new(page_index: u32, page_size: u32, sort: Sort) -> RepoResult<Self> {
        if page_size == 0 {
            return Err(RepoError::InvalidPageRequest(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            page_index,
            page_size,
            sort,
        })
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    /// Renders `ORDER BY ... LIMIT ? OFFSET ?` and pushes the two bind values.
    ///
    /// `sortable` maps accepted field tokens (matched case-insensitively) to
    /// column names.
    pub(crate) fn sql_tail(
        &self,
        sortable: &[(&str, &'static str)],
        bind_values: &mut Vec<Value>,
    ) -> RepoResult<String> {
        let column = resolve_sort_column(&self.sort.field, sortable)?;
        let offset = i64::try_from(self.offset()).map_err(|_| {
            RepoError::InvalidPageRequest(format!("page index {} is too large", self.page_index))
        })?;

        bind_values.push(Value::Integer(i64::from(self.page_size)));
        bind_values.push(Value::Integer(offset));

        let mut tail = format!(" ORDER BY {column} {}", self.sort.direction.as_sql());
        if column != "id" {
            tail.push_str(", id ASC");
        }
        tail.push_str(" LIMIT ? OFFSET ?");
        Ok(tail)
    }
}

fn resolve_sort_column(field: &str, sortable: &[(&str, &'static str)]) -> RepoResult<&'static str> {
    let token = field.trim();
    sortable
        .iter()
        .find(|(accepted, _)| accepted.eq_ignore_ascii_case(token))
        .map(|(_, column)| *column)
        .ok_or_else(|| RepoError::UnknownSortField(token.to_string()))
}

/// Result page with the request coordinates and the unpaged total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_items: u64,
}

impl<E> Page<E> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(u64::from(self.page_size.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::{PageRequest, Sort, SortDirection};
    use crate::repo::RepoError;
    use rusqlite::types::Value;

    const SORTABLE: &[(&str, &str)] = &[("id", "id"), ("name", "name"), ("createdAt", "created_at")];

    #[test]
    fn direction_token_is_case_insensitive_and_defaults_to_desc() {
        assert_eq!(SortDirection::from_token("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::from_token("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::from_token("Asc"), SortDirection::Asc);
        assert_eq!(SortDirection::from_token("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::from_token("sideways"), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(""), SortDirection::Desc);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = PageRequest::new(0, 0, Sort::default()).unwrap_err();
        assert!(matches!(err, RepoError::InvalidPageRequest(_)));
    }

    #[test]
    fn sql_tail_binds_limit_and_offset_with_id_tiebreak() {
        let page = PageRequest::new(3, 20, Sort::by("NAME", SortDirection::Desc)).unwrap();
        let mut binds = Vec::new();
        let tail = page.sql_tail(SORTABLE, &mut binds).unwrap();

        assert_eq!(tail, " ORDER BY name DESC, id ASC LIMIT ? OFFSET ?");
        assert_eq!(binds, vec![Value::Integer(20), Value::Integer(60)]);
    }

    #[test]
    fn sql_tail_rejects_unknown_field() {
        let page = PageRequest::new(0, 5, Sort::by("name; DROP TABLE projects", SortDirection::Asc))
            .unwrap();
        let err = page.sql_tail(SORTABLE, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, RepoError::UnknownSortField(_)));
    }
}
