//! Public API surface shared across stages.

mod error;

pub use error::CoreError;
