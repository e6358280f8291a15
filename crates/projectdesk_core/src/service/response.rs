//! Transport-neutral response envelope.
//!
//! Validation failures travel back as `ApiResponse` values with a client
//! status; lookup and storage failures travel as `ServiceError` and are turned
//! into responses by [`ApiResponse::from_error`].

use crate::service::error::ServiceError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// HTTP-style status codes produced by services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        (200..300).contains(&self.as_u16())
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody<T> {
    Empty,
    Data(T),
    /// Human-readable client error, serialized as `{"message": ...}`.
    Message(String),
}

impl<T: Serialize> Serialize for ResponseBody<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Data(data) => data.serialize(serializer),
            Self::Message(message) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("message", message)?;
                map.end()
            }
        }
    }
}

/// Status plus payload returned across the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: ResponseBody<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::with_data(StatusCode::Ok, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_data(StatusCode::Created, data)
    }

    pub fn with_data(status: StatusCode, data: T) -> Self {
        Self {
            status,
            body: ResponseBody::Data(data),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: ResponseBody::Empty,
        }
    }

    pub fn no_content() -> Self {
        Self::empty(StatusCode::NoContent)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BadRequest,
            body: ResponseBody::Message(message.into()),
        }
    }

    /// Translates a service error into the response a client sees.
    pub fn from_error(err: &ServiceError) -> Self {
        Self {
            status: err.status(),
            body: ResponseBody::Message(err.to_string()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match &self.body {
            ResponseBody::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self.body {
            ResponseBody::Data(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiResponse, StatusCode};
    use serde_json::json;

    #[test]
    fn serializes_status_as_number_and_message_as_object() {
        let response = ApiResponse::<()>::bad_request("Project name should not be empty");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"status": 400, "body": {"message": "Project name should not be empty"}})
        );
    }

    #[test]
    fn no_content_has_null_body() {
        let value = serde_json::to_value(ApiResponse::<()>::no_content()).unwrap();
        assert_eq!(value, json!({"status": 204, "body": null}));
        assert!(StatusCode::NoContent.is_success());
        assert!(!StatusCode::NotFound.is_success());
    }
}
