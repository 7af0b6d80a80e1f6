//! Common utilities for Coffin.
//!
//! This crate provides the foundational pieces shared by the Coffin crates:
//!
//! - [`BinaryReader`] - Bounds-checked, zero-copy reading from byte slices
//! - [`Error`] - The error raised when a read runs past the end of a buffer

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;
