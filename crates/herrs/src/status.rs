//! HTTP status mapping for error kinds

use http::StatusCode;

use crate::ErrorKind;

/// Status reported for chains that carry no kind at all.
pub const UNEXPECTED_STATUS: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

impl ErrorKind {
    /// The fixed HTTP status an API response should carry for this kind.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorKind::UnauthorizedCredential => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidCredential => StatusCode::BAD_REQUEST,
            ErrorKind::RepositoryError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::SupplierError => StatusCode::BAD_GATEWAY,
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::SerializationError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unprocessable => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::CacheMalfunction => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Status for an optional kind; unset maps to [`UNEXPECTED_STATUS`].
pub fn status_of(kind: Option<ErrorKind>) -> StatusCode {
    kind.map_or(UNEXPECTED_STATUS, |k| k.http_status())
}
