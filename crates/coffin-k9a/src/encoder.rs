//! Container encoding, the inverse of [`decode`](crate::decode).

use std::path::Path;

use crate::cipher;
use crate::header::K9aHeader;
use crate::Result;

/// Wrap `asset` in a K9A container that will decode under `target`'s name.
///
/// `declared` bytes of the asset are obfuscated (all of them when zero);
/// the header stores `extension` so the decoder can restore it.
pub fn encode(asset: &[u8], extension: &str, declared: u8, target: &Path) -> Result<Vec<u8>> {
    let header = K9aHeader {
        extension: extension.to_string(),
        declared_payload_len: declared,
    };

    let mut out = header.to_bytes()?;
    let offset = out.len();
    out.extend_from_slice(asset);

    cipher::encrypt_in_place(&mut out[offset..], declared, cipher::mask_for_path(target))?;
    Ok(out)
}
