//! Repository layer: storage contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the narrow `Store<E, Id>` capability every entity store offers.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - `delete` on an absent id returns `RepoError::NotFound`, never `Ok`.
//! - `save` is an upsert keyed by entity id.
//! - Read paths reject malformed persisted ids instead of masking them.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod paging;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

pub use paging::{Page, PageRequest, Sort, SortDirection};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all entity stores.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: Uuid },
    InvalidData(String),
    InvalidPageRequest(String),
    UnknownSortField(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::InvalidPageRequest(message) => write!(f, "invalid page request: {message}"),
            Self::UnknownSortField(field) => write!(f, "unknown sort field `{field}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Generic CRUD + paging capability over one entity kind.
pub trait Store<E, Id> {
    fn get(&self, id: Id) -> RepoResult<Option<E>>;
    fn exists(&self, id: Id) -> RepoResult<bool>;
    /// All rows in storage natural (insertion) order.
    fn list(&self) -> RepoResult<Vec<E>>;
    /// Inserts a new row or overwrites the mutable columns of an existing one.
    fn save(&self, entity: &E) -> RepoResult<()>;
    fn delete(&self, id: Id) -> RepoResult<()>;
    fn list_page(&self, page: &PageRequest) -> RepoResult<Page<E>>;
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_optional_uuid(value: Option<String>, column: &str) -> RepoResult<Option<Uuid>> {
    value.map(|text| parse_uuid(&text, column)).transpose()
}
