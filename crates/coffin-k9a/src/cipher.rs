//! K9A rolling XOR cipher.
//!
//! The keystream is seeded from the container's file name and fed back with
//! each *ciphertext* byte, so byte `i + 1` cannot be decoded before byte `i`.
//! Parallelism is only possible across files.
//!
//! The scheme is an obfuscation layer with a public algorithm, not a
//! security primitive.

use std::path::Path;

use crate::{Error, Result};

/// Strip the last extension from the final component of `path`.
///
/// A leading dot counts as an extension separator, so `".k9a"` yields `""`.
pub fn base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name.into_owned(),
    }
}

/// Compute the initial mask for an already-stripped base name.
///
/// Characters are upper-cased one to one (characters whose upper-case form
/// expands to several characters are kept as-is) and folded as UTF-16 code
/// units: `mask = (mask << 1) ^ unit`, with 32-bit wraparound.
pub fn compute_mask(base_name: &str) -> i32 {
    let upper: String = base_name
        .chars()
        .map(|c| {
            let mut up = c.to_uppercase();
            match (up.next(), up.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect();

    upper
        .encode_utf16()
        .fold(0i32, |mask, unit| (mask << 1) ^ i32::from(unit))
}

/// Compute the initial mask for a container path.
#[inline]
pub fn mask_for_path(path: &Path) -> i32 {
    compute_mask(&base_name(path))
}

/// Number of leading bytes covered by the transform.
///
/// A declared length of zero covers the whole ciphertext.
pub fn transform_len(declared: u8, available: usize) -> Result<usize> {
    let n = match declared {
        0 => available,
        n => n as usize,
    };

    if n > available {
        return Err(Error::PayloadOverrun {
            declared: n,
            available,
        });
    }

    Ok(n)
}

/// Decrypt `data` in place.
///
/// Only the first [`transform_len`] bytes change; the rest pass through.
/// Returns the mask after the last transformed byte.
pub fn decrypt_in_place(data: &mut [u8], declared: u8, mask: i32) -> Result<i32> {
    let n = transform_len(declared, data.len())?;

    Ok(data[..n].iter_mut().fold(mask, |mask, byte| {
        let cipher = *byte;
        *byte = cipher ^ mask as u8;
        (mask << 1) ^ i32::from(cipher)
    }))
}

/// Decrypt `ciphertext` into a new buffer.
pub fn decrypt(ciphertext: &[u8], declared: u8, mask: i32) -> Result<Vec<u8>> {
    let mut buffer = ciphertext.to_vec();
    decrypt_in_place(&mut buffer, declared, mask)?;
    Ok(buffer)
}

/// Encrypt `data` in place. Inverse of [`decrypt_in_place`].
pub fn encrypt_in_place(data: &mut [u8], declared: u8, mask: i32) -> Result<i32> {
    let n = transform_len(declared, data.len())?;

    Ok(data[..n].iter_mut().fold(mask, |mask, byte| {
        let cipher = *byte ^ mask as u8;
        *byte = cipher;
        (mask << 1) ^ i32::from(cipher)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_char_mask() {
        assert_eq!(compute_mask("A"), 65);
        assert_eq!(compute_mask("a"), 65);
    }

    #[test]
    fn test_mask_is_order_sensitive() {
        // 'A' = 65, 'B' = 66
        assert_eq!(compute_mask("AB"), (65 << 1) ^ 66);
        assert_eq!(compute_mask("BA"), (66 << 1) ^ 65);
        assert_ne!(compute_mask("AB"), compute_mask("BA"));
    }

    #[test]
    fn test_mask_upper_cases_non_ascii() {
        // 'é' -> 'É' (U+00C9)
        assert_eq!(compute_mask("é"), 0xC9);
        assert_eq!(compute_mask("é"), compute_mask("É"));
    }

    #[test]
    fn test_mask_folds_surrogate_pairs() {
        // U+10428 upper-cases to U+10400, encoded as D801 DC00.
        let expected = (0xD801 << 1) ^ 0xDC00;
        assert_eq!(compute_mask("\u{10428}"), expected);
        assert_eq!(compute_mask("\u{10400}"), expected);
    }

    #[test]
    fn test_mask_keeps_expanding_upper_case() {
        // 'ß' upper-cases to "SS"; the character is kept as U+00DF.
        assert_eq!(compute_mask("ß"), 0xDF);
        assert_eq!(compute_mask("aß"), (65 << 1) ^ 0xDF);
        assert_ne!(compute_mask("ß"), compute_mask("SS"));
    }

    #[test]
    fn test_mask_wraps_at_32_bits() {
        let name = "Z".repeat(40);
        let expected = name
            .bytes()
            .fold(0i64, |m, c| ((m << 1) ^ c as i64) & 0xFFFF_FFFF);
        assert_eq!(compute_mask(&name) as u32 as i64, expected);
    }

    #[test]
    fn test_mask_ignores_directory_and_extension() {
        let a = mask_for_path(Path::new("www/img/pictures/Title.k9a"));
        let b = mask_for_path(Path::new("other/deeper/dir/TITLE.png"));
        assert_eq!(a, b);
        assert_eq!(a, compute_mask("TITLE"));
    }

    #[test]
    fn test_base_name_strips_last_extension_only() {
        assert_eq!(base_name(Path::new("dir/map001.json.k9a")), "map001.json");
        assert_eq!(base_name(Path::new("noext")), "noext");
        assert_eq!(base_name(Path::new(".k9a")), "");
    }

    #[test]
    fn test_first_step_vector() {
        let mut data = [0x10u8];
        let next = decrypt_in_place(&mut data, 1, 65).unwrap();

        assert_eq!(data[0], 0x51);
        assert_eq!(next, 142);
    }

    #[test]
    fn test_feedback_uses_ciphertext_byte() {
        let ciphertext = [0x10u8, 0x20];
        let plain = decrypt(&ciphertext, 0, 65).unwrap();

        assert_eq!(plain[0], 0x10 ^ 65);
        // Second step keyed by 142, derived from ciphertext 0x10, not 0x51.
        assert_eq!(plain[1], 0x20 ^ 142u8);
    }

    #[test]
    fn test_partial_transform_passes_tail_through() {
        let ciphertext: Vec<u8> = (0..64).collect();
        let plain = decrypt(&ciphertext, 16, compute_mask("MAP001")).unwrap();

        assert_eq!(plain.len(), ciphertext.len());
        assert_eq!(&plain[16..], &ciphertext[16..]);
        assert_ne!(&plain[..16], &ciphertext[..16]);
    }

    #[test]
    fn test_full_transform_follows_rolling_formula() {
        let ciphertext: Vec<u8> = (0..300u32).map(|i| (i * 7 + 3) as u8).collect();
        let seed = compute_mask("ACTORS");
        let plain = decrypt(&ciphertext, 0, seed).unwrap();

        let mut mask = seed;
        for (c, p) in ciphertext.iter().zip(&plain) {
            assert_eq!(*p, (*c as i32 ^ mask) as u8);
            mask = (mask << 1) ^ *c as i32;
        }
    }

    #[test]
    fn test_overrun_is_rejected() {
        let mut data = [1u8, 2, 3];
        assert_eq!(
            decrypt_in_place(&mut data, 4, 0),
            Err(Error::PayloadOverrun {
                declared: 4,
                available: 3
            })
        );
        assert_eq!(data, [1, 2, 3]);
    }

    #[test]
    fn test_encrypt_inverts_decrypt() {
        let plain = b"\x89PNG\r\n\x1a\n fake image body".to_vec();
        let seed = compute_mask("Face1");

        let mut buffer = plain.clone();
        encrypt_in_place(&mut buffer, 8, seed).unwrap();
        assert_eq!(&buffer[8..], &plain[8..]);

        decrypt_in_place(&mut buffer, 8, seed).unwrap();
        assert_eq!(buffer, plain);
    }
}
