//! Container decoding: header parse plus cipher.

use std::path::Path;

use crate::cipher;
use crate::header::K9aHeader;
use crate::{Error, Result, CONTAINER_SUFFIX};

/// A decoded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plaintext {
    /// Recovered asset bytes.
    pub bytes: Vec<u8>,
    /// Extension the asset should be written with, without the dot.
    pub extension: String,
}

impl Plaintext {
    /// Size of the recovered asset in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the recovered asset is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Check whether `path` names a K9A container.
///
/// The suffix comparison is case-sensitive.
pub fn is_container(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(CONTAINER_SUFFIX)
}

/// Decode a container read from `source`.
///
/// The mask is derived from `source`'s file name, so the path must be the
/// container's real name. Fails with [`Error::NotApplicable`] for anything
/// without the `.k9a` suffix.
pub fn decode(data: &[u8], source: &Path) -> Result<Plaintext> {
    let header = read_header(data, source)?;
    let payload = header.payload(data).to_vec();
    decrypt_payload(header, payload, source)
}

/// Decode a container, reusing `data` as the output buffer.
pub fn decode_owned(mut data: Vec<u8>, source: &Path) -> Result<Plaintext> {
    let header = read_header(&data, source)?;
    data.drain(..header.payload_offset());
    decrypt_payload(header, data, source)
}

fn read_header(data: &[u8], source: &Path) -> Result<K9aHeader> {
    if !is_container(source) {
        return Err(Error::NotApplicable(source.to_path_buf()));
    }
    K9aHeader::parse(data)
}

fn decrypt_payload(header: K9aHeader, mut payload: Vec<u8>, source: &Path) -> Result<Plaintext> {
    cipher::decrypt_in_place(
        &mut payload,
        header.declared_payload_len,
        cipher::mask_for_path(source),
    )?;

    Ok(Plaintext {
        bytes: payload,
        extension: header.extension,
    })
}
