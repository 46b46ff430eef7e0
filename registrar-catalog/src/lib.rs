//! Registration data model types.
//!
//! This crate defines the records the registrar works with without any
//! database dependencies. Consumers can use these types directly for
//! serialization, display, or passing to `registrar-db` for persistence.

pub mod types;

pub use types::*;
