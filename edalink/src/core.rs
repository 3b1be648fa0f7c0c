//! Result envelope, error taxonomy and pagination shared by every connector.
//! No connector or store dependencies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed error-code vocabulary used at every connector boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotInitialized,
    NotFound,
    ValidationError,
    AuthRequired,
    NotImplemented,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotInitialized => "NOT_INITIALIZED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::AuthRequired => "AUTH_REQUIRED",
            ErrorCode::NotImplemented => "NOT_IMPLEMENTED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed, data-only failure returned by connector operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ConnectorError {
    pub code: ErrorCode,
    pub message: String,
}

impl ConnectorError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "Connector not initialized. Call initialize() first.",
        )
    }

    /// `NOT_FOUND` for an entity kind and id, e.g. `("Board", "BRD009")`.
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} {} not found", kind, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthRequired, message)
    }

    pub fn not_implemented(operation: &str) -> Self {
        Self::new(
            ErrorCode::NotImplemented,
            format!("{} is not implemented for the live EDA backend", operation),
        )
    }
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Wire form of a connector result.
///
/// Serializes as `{"success":true,"data":...}` or
/// `{"success":false,"error":{"code":"...","message":"..."}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure(ConnectorError),
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn into_result(self) -> ConnectorResult<T> {
        self.into()
    }
}

impl<T> From<ConnectorResult<T>> for Envelope<T> {
    fn from(result: ConnectorResult<T>) -> Self {
        match result {
            Ok(data) => Envelope::Success(data),
            Err(e) => Envelope::Failure(e),
        }
    }
}

impl<T> From<Envelope<T>> for ConnectorResult<T> {
    fn from(envelope: Envelope<T>) -> Self {
        match envelope {
            Envelope::Success(data) => Ok(data),
            Envelope::Failure(e) => Err(e),
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a ConnectorError>,
}

#[derive(Deserialize)]
struct EnvelopeOwned<T> {
    success: bool,
    data: Option<T>,
    error: Option<ConnectorError>,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Envelope::Success(data) => EnvelopeRef {
                success: true,
                data: Some(data),
                error: None,
            },
            Envelope::Failure(error) => EnvelopeRef {
                success: false,
                data: None,
                error: Some(error),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = EnvelopeOwned::<T>::deserialize(deserializer)?;
        match (wire.success, wire.data, wire.error) {
            (true, Some(data), _) => Ok(Envelope::Success(data)),
            (false, _, Some(error)) => Ok(Envelope::Failure(error)),
            (true, None, _) => Err(serde::de::Error::missing_field("data")),
            (false, _, None) => Err(serde::de::Error::missing_field("error")),
        }
    }
}

/// Offset/limit request shared by list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl Pagination {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    /// Slice `items` (already filtered) into a page using `default_limit`
    /// when no limit was requested.
    pub fn apply<T>(&self, items: Vec<T>, default_limit: usize) -> Page<T> {
        let total = items.len();
        let limit = self.limit.unwrap_or(default_limit);
        let offset = self.offset.unwrap_or(0);
        let items = items.into_iter().skip(offset).take(limit).collect();
        Page {
            items,
            total,
            limit,
            offset,
        }
    }
}

/// A filtered-and-paged slice plus the pre-pagination count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }
}
