//! K9A container reader for game asset files.
//!
//! A K9A container wraps one asset (image, audio clip, data file) with a
//! short plaintext header naming the original extension, followed by a
//! payload obfuscated with a rolling XOR cipher:
//!
//! - The keystream is seeded from the container's upper-cased file stem
//! - Each ciphertext byte is fed back into the keystream
//! - Only the first `N` bytes are obfuscated when the header declares `N > 0`
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let path = Path::new("www/img/pictures/Title.k9a");
//! let data = std::fs::read(path)?;
//!
//! let asset = coffin_k9a::decode_owned(data, path)?;
//! std::fs::write(path.with_extension(&asset.extension), &asset.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decoder;
mod encoder;
mod error;
mod header;

pub mod cipher;

pub use decoder::{decode, decode_owned, is_container, Plaintext};
pub use encoder::encode;
pub use error::{Error, Result};
pub use header::{K9aHeader, MIN_HEADER_SIZE};

/// File name suffix of K9A containers.
pub const CONTAINER_SUFFIX: &str = ".k9a";

/// Glob matching K9A containers by file name.
pub const CONTAINER_GLOB: &str = "*.k9a";
