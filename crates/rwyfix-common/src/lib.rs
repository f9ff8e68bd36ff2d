//! Common utilities for rwyfix.
//!
//! This crate provides the foundational types used across the rwyfix crates:
//!
//! - [`ByteSource`] - Random-access reads and writes against a seekable stream
//! - [`Error`] / [`Result`] - Shared I/O error type

mod error;
mod source;

pub use error::{Error, Result};
pub use source::ByteSource;
