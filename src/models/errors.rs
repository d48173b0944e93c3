use std::fmt;
use std::fmt::{Display, Formatter};

use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::ser::{Serializer, SerializeStruct};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct StoreError {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct FetchError {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub code: StatusCode,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError { message: err.to_string() }
    }
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
    {
        let mut state = serializer.serialize_struct("ApiError", 2)?;
        state.serialize_field("error", "Internal server error")?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

impl ApiError {
    pub fn new<S: AsRef<str>>(message: S, code: StatusCode) -> Self {
        Self {
            message: message.as_ref().to_string(),
            code,
        }
    }

    pub fn not_found<S: AsRef<str>>(message: S) -> Self {
        Self::new(message, StatusCode::NOT_FOUND)
    }

    pub fn internal<S: AsRef<str>>(message: S) -> Self {
        Self::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::internal(err.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // not-found answers are plain text, everything else gets the JSON error payload
        if self.code == StatusCode::NOT_FOUND {
            return (self.code, self.message).into_response();
        }
        (self.code, Json(self)).into_response()
    }
}
