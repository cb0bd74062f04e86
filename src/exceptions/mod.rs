//! Persistence of exception policies for the scan engine.
//!
//! The engine reads exceptions from a location rather than receiving them
//! inline, so the normalizer hands every supplied list to an
//! [`ExceptionsStore`] and records where it landed.

mod filesystem;
mod memory;
mod traits;

pub use filesystem::{
    FixedPathStore, UniquePathStore, DEFAULT_EXCEPTIONS_PATH, EXCEPTIONS_FILE_NAME,
};
pub use memory::InMemoryStore;
pub use traits::{decode_exceptions, encode_exceptions, ExceptionsLocation, ExceptionsStore};
