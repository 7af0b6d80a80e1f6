//! K9A container header.
//!
//! Layout (all fields are single unsigned bytes unless stated):
//!
//! | Offset | Field                   | Size          |
//! |--------|-------------------------|---------------|
//! | 0      | extension length (E)    | 1             |
//! | 1      | extension (ASCII)       | E             |
//! | 1 + E  | declared payload length | 1             |
//! | 2 + E  | ciphertext              | rest of file  |

use coffin_common::BinaryReader;

use crate::{Error, Result};

/// Smallest possible container: an empty extension plus the length byte.
pub const MIN_HEADER_SIZE: usize = 2;

/// Parsed K9A header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct K9aHeader {
    /// Original file extension, without the leading dot.
    pub extension: String,
    /// Number of leading ciphertext bytes that are obfuscated.
    /// Zero means the whole ciphertext is.
    pub declared_payload_len: u8,
}

impl K9aHeader {
    /// Parse the header at the start of `data`.
    ///
    /// Fails with [`Error::MalformedHeader`] when the buffer cannot hold the
    /// extension string and the payload length byte.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let extension_len = reader.read_u8().map_err(|_| Error::MalformedHeader {
            needed: MIN_HEADER_SIZE,
            available: data.len(),
        })? as usize;

        let needed = MIN_HEADER_SIZE + extension_len;
        if data.len() < needed {
            return Err(Error::MalformedHeader {
                needed,
                available: data.len(),
            });
        }

        let extension = reader.read_ascii(extension_len)?;
        let declared_payload_len = reader.read_u8()?;

        Ok(Self {
            extension,
            declared_payload_len,
        })
    }

    /// Length of the extension field in bytes.
    #[inline]
    pub fn extension_len(&self) -> usize {
        self.extension.len()
    }

    /// Offset of the first ciphertext byte.
    #[inline]
    pub fn payload_offset(&self) -> usize {
        MIN_HEADER_SIZE + self.extension_len()
    }

    /// Slice the ciphertext out of the buffer this header was parsed from.
    #[inline]
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.payload_offset().min(data.len())..]
    }

    /// Serialize the header.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let ext = self.extension.as_bytes();
        if ext.len() > u8::MAX as usize || !self.extension.is_ascii() {
            return Err(Error::InvalidExtension(self.extension.clone()));
        }

        let mut out = Vec::with_capacity(MIN_HEADER_SIZE + ext.len());
        out.push(ext.len() as u8);
        out.extend_from_slice(ext);
        out.push(self.declared_payload_len);
        Ok(out)
    }
}
