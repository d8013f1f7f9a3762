use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::store_error::BookStoreError;

/// JSON envelope returned across the FFI boundary.
#[derive(Debug, Serialize, Deserialize)]
pub enum AppResponse {
    StorageReadError(String),
    DataCorruptionError(String),
    StorageWriteError(String),
    ValidationError(String),
    PermissionDenied(String),
    BadRequest(String),
    Ok(String),
}

impl Display for AppResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppResponse::StorageReadError(msg) => write!(f, "Storage read error: {}", msg),
            AppResponse::DataCorruptionError(msg) => write!(f, "Data corruption: {}", msg),
            AppResponse::StorageWriteError(msg) => write!(f, "Storage write error: {}", msg),
            AppResponse::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppResponse::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppResponse::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppResponse::Ok(msg) => write!(f, "Ok: {}", msg),
        }
    }
}

impl From<BookStoreError> for AppResponse {
    fn from(err: BookStoreError) -> Self {
        match err {
            BookStoreError::StorageRead(fault) => AppResponse::StorageReadError(fault.to_string()),
            BookStoreError::DataCorruption(msg) => AppResponse::DataCorruptionError(msg),
            BookStoreError::StorageWrite(fault) => AppResponse::StorageWriteError(fault.to_string()),
            BookStoreError::Validation(msg) => AppResponse::ValidationError(msg),
            BookStoreError::ImagePermissionDenied(msg) => AppResponse::PermissionDenied(msg),
        }
    }
}

impl From<SerdeError> for AppResponse {
    fn from(err: SerdeError) -> Self {
        AppResponse::BadRequest(format!("Invalid JSON: {}", err))
    }
}

impl AppResponse {
    pub fn success(msg: impl Into<String>) -> Self {
        AppResponse::Ok(msg.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AppResponse::Ok(_))
    }
}
