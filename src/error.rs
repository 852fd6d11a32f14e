//! Crate-scoped error handling for redb-alphabar.
//!
//! This module provides a unified error type for public APIs while keeping
//! the leaf error types of the group and bitmap layers intact for callers
//! that want to match on them.

use std::fmt;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a foreign data source.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type exposed to users of the crate.
#[derive(Debug)]
pub enum Error {
    /// The bucketing field is unset or unknown to the data source
    InvalidField(String),

    /// Errors from the group layer (key parsing)
    Group(crate::group::GroupError),

    /// Errors from the bitmap layer (index value encoding)
    Bitmap(crate::bitmap::BitmapError),

    /// Errors raised by redb while reading or maintaining the store
    Storage(redb::Error),

    /// Errors raised by a caller-provided data source
    Source(SourceError),
}

impl Error {
    /// Wraps an arbitrary data-source error so it propagates unchanged.
    pub fn source_error<E>(err: E) -> Self
    where
        E: Into<SourceError>,
    {
        Error::Source(err.into())
    }
}

impl From<crate::group::GroupError> for Error {
    fn from(err: crate::group::GroupError) -> Self {
        Error::Group(err)
    }
}

impl From<crate::bitmap::BitmapError> for Error {
    fn from(err: crate::bitmap::BitmapError) -> Self {
        Error::Bitmap(err)
    }
}

impl From<redb::Error> for Error {
    fn from(err: redb::Error) -> Self {
        Error::Storage(err)
    }
}

impl From<redb::StorageError> for Error {
    fn from(err: redb::StorageError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::TableError> for Error {
    fn from(err: redb::TableError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::TransactionError> for Error {
    fn from(err: redb::TransactionError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::CommitError> for Error {
    fn from(err: redb::CommitError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::DatabaseError> for Error {
    fn from(err: redb::DatabaseError) -> Self {
        Error::Storage(err.into())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidField(_) => None,
            Error::Group(err) => Some(err),
            Error::Bitmap(err) => Some(err),
            Error::Storage(err) => Some(err),
            Error::Source(err) => Some(&**err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidField(field) => write!(f, "Invalid field: {:?}", field),
            Error::Group(err) => write!(f, "Group error: {}", err),
            Error::Bitmap(err) => write!(f, "Bitmap error: {}", err),
            Error::Storage(err) => write!(f, "Storage error: {}", err),
            Error::Source(err) => write!(f, "Source error: {}", err),
        }
    }
}
