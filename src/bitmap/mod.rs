//! Roaring bitmap index values.
//!
//! The first-letter index maps each raw group key to the set of record ids
//! carrying that initial. This module owns the stored representation of
//! those sets and the table operations that maintain them.

pub mod table;
pub mod value;

pub use table::{IdBitmapReadOnlyTable, IdBitmapTable};
pub use value::IdBitmap;

/// Errors specific to the bitmap layer.
#[derive(Debug, thiserror::Error)]
pub enum BitmapError {
    /// Serializing or deserializing the roaring bitmap failed
    #[error("bitmap serialization failed: {0}")]
    SerializationFailed(String),

    /// The stored bytes are not a bitmap this crate can read
    #[error("invalid bitmap: {0}")]
    InvalidBitmap(String),
}
