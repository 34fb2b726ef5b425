//! CSParve64: 64-bit Chain-&-Sum checksum and encryption.
//!
//! CSParve64 combines a byte-oriented block cipher (Parve), a
//! word-oriented stream cipher (BV4), and three chain-&-sum MAC families
//! into a keyed 64-bit hash and an in-place authenticated encryption
//! scheme whose last 8 bytes carry an embedded MAC.
//!
//! All word I/O is big-endian and all arithmetic wraps, so hashes, MACs,
//! and ciphertexts are identical byte for byte across platforms.
//!
//! # Architecture
//!
//! ```text
//! utils::endian  (big-endian word access, 64-bit halves, word swap)
//!     ↑ used by everything
//! parve          (8-round block cipher + zero-IV CBC-MAC)
//! bv4            (RC4-seeded word stream cipher)
//! cs64           (chain-&-sum MACs: Z_2^32, Z_2^31-1, word-swap)
//!     ↑ composed by
//! Context        (20-word configuration + S-box, combined public hash)
//! CsParve64      (per-key instance — seed hash, encode, decode)
//! ```
//!
//! # Examples
//!
//! Hash, encrypt, and decrypt a buffer:
//!
//! ```
//! use csparve64::{Context, CsParve64};
//!
//! let mut sbox = [0u8; 256];
//! for (i, s) in sbox.iter_mut().enumerate() {
//!     *s = i as u8;
//! }
//! let context = Context::open(&[0u32; 20], &sbox).unwrap();
//!
//! let key = [0u8, 1, 2, 3, 4, 5, 6, 7];
//! let instance = CsParve64::create(&context, &key, &[0u8; 16]).unwrap();
//!
//! let mut buffer = [0u8; 24];
//! let mac = instance.encode(&mut buffer).unwrap();
//! let recovered = instance.decode(&mut buffer).unwrap();
//! assert_eq!(buffer, [0u8; 24]);
//! assert_eq!(mac, recovered);
//! ```
//!
//! Compute the combined keyed hash without an instance:
//!
//! ```
//! use csparve64::Context;
//!
//! let mut sbox = [0u8; 256];
//! for (i, s) in sbox.iter_mut().enumerate() {
//!     *s = i as u8;
//! }
//! let context = Context::open(&[0u32; 20], &sbox).unwrap();
//! let hash = context.compute_hash(b"8bytekey", &[0u8; 16]).unwrap();
//! # let _ = hash;
//! ```

#![deny(clippy::all)]

pub mod error;

pub mod bv4;
pub mod cs64;
pub mod parve;
pub mod utils;

mod context;
mod csparve64;

pub use context::{Context, CONFIG_SIZE};
pub use csparve64::CsParve64;

use error::CsParve64Error;

/// Validates an input key and returns its first 8 bytes as the Parve key.
pub(crate) fn validate_input_key(
    input_key: &[u8],
) -> Result<[u8; parve::KEY_SIZE], CsParve64Error> {
    if input_key.len() < parve::KEY_SIZE {
        return Err(CsParve64Error::KeyTooShort);
    }
    let mut key = [0u8; parve::KEY_SIZE];
    key.copy_from_slice(&input_key[..parve::KEY_SIZE]);
    Ok(key)
}

/// Validates a data buffer length: at least one block and 8-byte aligned.
pub(crate) fn validate_data(data: &[u8]) -> Result<(), CsParve64Error> {
    if data.len() < parve::BLOCK_SIZE || data.len() % parve::BLOCK_SIZE != 0 {
        return Err(CsParve64Error::InvalidDataLength);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input_key() {
        assert_eq!(
            validate_input_key(&[0u8; 7]),
            Err(CsParve64Error::KeyTooShort)
        );
        assert_eq!(validate_input_key(&[7u8; 8]), Ok([7u8; 8]));
        // Only the first 8 bytes are used.
        let long = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        assert_eq!(validate_input_key(&long), Ok([1, 2, 3, 4, 5, 6, 7, 8]));
    }

    #[test]
    fn test_validate_data() {
        assert_eq!(validate_data(&[]), Err(CsParve64Error::InvalidDataLength));
        assert_eq!(
            validate_data(&[0u8; 7]),
            Err(CsParve64Error::InvalidDataLength)
        );
        assert_eq!(
            validate_data(&[0u8; 12]),
            Err(CsParve64Error::InvalidDataLength)
        );
        assert_eq!(validate_data(&[0u8; 8]), Ok(()));
        assert_eq!(validate_data(&[0u8; 64]), Ok(()));
    }
}
