//! Service-level error and its client-facing status mapping.

use crate::repo::RepoError;
use crate::service::response::StatusCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a service operation. Every variant is terminal for the call.
#[derive(Debug)]
pub enum ServiceError {
    /// Entity absent by id.
    NotFound { entity: &'static str, id: Uuid },
    /// Business-rule violation or malformed paging/sort input.
    InvalidArgument(String),
    /// Storage failure.
    Repo(RepoError),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Status code a transport layer reports for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NotFound,
            Self::InvalidArgument(_) => StatusCode::BadRequest,
            Self::Repo(_) => StatusCode::InternalServerError,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} was not found with ID : {id}"),
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::InvalidPageRequest(_) | RepoError::UnknownSortField(_) => {
                Self::InvalidArgument(value.to_string())
            }
            other => Self::Repo(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::repo::RepoError;
    use crate::service::response::StatusCode;
    use uuid::Uuid;

    #[test]
    fn repo_errors_map_to_client_statuses() {
        let id = Uuid::new_v4();
        let not_found = ServiceError::from(RepoError::NotFound {
            entity: "Project",
            id,
        });
        assert_eq!(not_found.status(), StatusCode::NotFound);
        assert_eq!(
            not_found.to_string(),
            format!("Project was not found with ID : {id}")
        );

        let bad_sort = ServiceError::from(RepoError::UnknownSortField("colour".to_string()));
        assert_eq!(bad_sort.status(), StatusCode::BadRequest);

        let corrupt = ServiceError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(corrupt.status(), StatusCode::InternalServerError);
    }
}
