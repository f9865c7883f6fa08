//! Error kinds for request-serving backends.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, FromRepr, IntoStaticStr};

/// Tag printed for a layer whose kind is unset or unknown.
pub const UNEXPECTED_TAG: &str = "UNEXPECTED_ERROR";

/// The semantic category of an error.
///
/// The kind drives both the tag printed in logs and the HTTP status returned
/// to API clients. Numeric codes are part of the public contract: consumers
/// compare and persist them, so variants are only ever appended. Do not
/// reorder or remove items. Code `0` is reserved for "no kind at this layer"
/// and is represented as `Option::<Kind>::None`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoStaticStr, Display, EnumIter, FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ErrorKind {
    /// Credential exists but is not active
    UnauthorizedCredential = 1,

    /// Credential was not found
    InvalidCredential = 2,

    /// Failure inside our own repository layer
    RepositoryError = 3,

    /// Failure reported by one of our suppliers
    SupplierError = 4,

    /// Data validation failed
    ValidationError = 5,

    /// Marshal, unmarshal or body read failed
    #[strum(serialize = "JSON_ERROR")]
    SerializationError = 6,

    /// Bad input handed to an internal helper
    InvalidInput = 7,

    /// Some record was not found
    NotFound = 8,

    /// The request cannot be processed as given
    Unprocessable = 9,

    /// Something cache-related failed
    #[strum(serialize = "CACHE_ERROR")]
    CacheMalfunction = 10,
}

impl ErrorKind {
    /// Returns the upper-snake-case tag used in rendered errors.
    pub fn tag(&self) -> &'static str {
        (*self).into()
    }

    /// Returns the stable numeric code of this kind.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Decode a persisted numeric code. `0` and unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Iterate the registry in code order.
    pub fn all() -> impl Iterator<Item = ErrorKind> {
        ErrorKind::iter()
    }
}

/// Tag for an optional kind, falling back to [`UNEXPECTED_TAG`].
pub fn tag_of(kind: Option<ErrorKind>) -> &'static str {
    kind.map_or(UNEXPECTED_TAG, |k| k.tag())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_tags() {
        assert_eq!(ErrorKind::UnauthorizedCredential.tag(), "UNAUTHORIZED_CREDENTIAL");
        assert_eq!(ErrorKind::ValidationError.to_string(), "VALIDATION_ERROR");
        assert_eq!(ErrorKind::SerializationError.tag(), "JSON_ERROR");
        assert_eq!(ErrorKind::CacheMalfunction.tag(), "CACHE_ERROR");
        assert_eq!(ErrorKind::NotFound.tag(), "NOT_FOUND");
        assert_eq!(ErrorKind::Unprocessable.tag(), "UNPROCESSABLE");
    }

    #[test]
    fn test_unset_tag() {
        assert_eq!(tag_of(None), "UNEXPECTED_ERROR");
        assert_eq!(tag_of(Some(ErrorKind::SupplierError)), "SUPPLIER_ERROR");
    }

    #[test]
    fn test_codes_are_stable() {
        let codes: Vec<u8> = ErrorKind::all().map(|k| k.code()).collect();
        assert_eq!(codes, (1..=10).collect::<Vec<u8>>());
        assert_eq!(ErrorKind::UnauthorizedCredential.code(), 1);
        assert_eq!(ErrorKind::CacheMalfunction.code(), 10);
    }

    #[test]
    fn test_from_code() {
        for kind in ErrorKind::all() {
            assert_eq!(ErrorKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ErrorKind::from_code(0), None);
        assert_eq!(ErrorKind::from_code(11), None);
    }
}
