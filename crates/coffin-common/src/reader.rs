//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor over a byte slice where
//! every read is bounds-checked and reports a recoverable error instead of
//! panicking on short input.

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use coffin_common::BinaryReader;
///
/// let data = [0x03, b'p', b'n', b'g', 0x10];
/// let mut reader = BinaryReader::new(&data);
///
/// let len = reader.read_u8().unwrap() as usize;
/// assert_eq!(reader.read_ascii(len).unwrap(), "png");
/// assert_eq!(reader.read_u8().unwrap(), 0x10);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read `length` bytes as ASCII text.
    ///
    /// Bytes outside the 7-bit range decode to `?`, so this never fails on
    /// content, only on length.
    pub fn read_ascii(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        Ok(bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u8_sequence() {
        let data = [0x01u8, 0xFF];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u8().unwrap(), 0xFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.peek_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_bytes(3).unwrap(), &[0x01, 0x02, 0x03]);
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_read_ascii_replaces_high_bytes() {
        let data = [b'o', 0xC3, b'g'];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_ascii(3).unwrap(), "o?g");
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(
            reader.read_bytes(5),
            Err(Error::UnexpectedEof {
                needed: 5,
                available: 2
            })
        );
        // A failed read leaves the cursor where it was.
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_empty_buffer() {
        let mut reader = BinaryReader::new(&[]);
        assert!(reader.is_empty());
        assert!(reader.read_u8().is_err());
        assert_eq!(reader.remaining(), 0);
    }
}
