//! Server error codes that the mongodb crate leaves unnamed.

use mongodb::error::{Error as DbError, ErrorKind, WriteFailure};

/// Write rejected by a unique index.
pub const DUPLICATE_KEY: i32 = 11000;

/// Whether a write failed because it would break a unique index, e.g. a
/// second application with the same phone in the same state.
pub fn is_duplicate_key_error(err: &DbError) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
    )
}
