//! Parve: 8-round byte-wise block cipher over 8-byte blocks.
//!
//! Parve is keyed by 8 bytes plus a caller-supplied 256-byte substitution
//! box. Each round walks the block bytes, adding a substituted mix of the
//! key byte, the previous block byte, and the round number, then rotating
//! the result left by one bit. Decryption runs the rounds and the byte
//! walk in exact reverse, so `decrypt_block(encrypt_block(b)) == b` for
//! every key, S-box, and block.
//!
//! The cipher serves two roles: as the block cipher under the zero-IV
//! CBC-MAC, and to encrypt the 8-byte chain-&-sum pre-MAC into the
//! ciphertext MAC.

use crate::utils::endian;

/// Block size in bytes for encryption and hashing.
pub const BLOCK_SIZE: usize = 8;

/// Parve key size in bytes.
pub const KEY_SIZE: usize = 8;

/// Substitution box size in bytes.
pub const SBOX_SIZE: usize = 256;

/// Number of cipher rounds.
const NUM_ROUNDS: u32 = 8;

/// Encrypts one 8-byte block in place.
///
/// # Parameters
/// - `key`: 8-byte cipher key.
/// - `sbox`: 256-byte substitution box.
/// - `block`: The block to encrypt; exactly 8 bytes are processed.
pub fn encrypt_block(key: &[u8; KEY_SIZE], sbox: &[u8; SBOX_SIZE], block: &mut [u8]) {
    for r in (1..=NUM_ROUNDS).rev() {
        let r = r as u8;
        for i in 0..BLOCK_SIZE - 1 {
            let s = sbox[key[i].wrapping_add(block[i]).wrapping_add(r) as usize];
            block[i + 1] = block[i + 1].wrapping_add(s).rotate_left(1);
        }
        let s = sbox[key[7].wrapping_add(block[7]).wrapping_add(r) as usize];
        block[0] = block[0].wrapping_add(s).rotate_left(1);
    }
}

/// Decrypts one 8-byte block in place.
///
/// Exact inverse of [`encrypt_block`]: rounds run 1 to 8 and each round
/// unwinds the byte walk from the wrap-around step downward.
///
/// # Parameters
/// - `key`: 8-byte cipher key.
/// - `sbox`: 256-byte substitution box.
/// - `block`: The block to decrypt; exactly 8 bytes are processed.
pub fn decrypt_block(key: &[u8; KEY_SIZE], sbox: &[u8; SBOX_SIZE], block: &mut [u8]) {
    for r in 1..=NUM_ROUNDS {
        let r = r as u8;
        // block[0] depends on block[7], so it must be unwound first.
        let s = sbox[key[7].wrapping_add(block[7]).wrapping_add(r) as usize];
        block[0] = block[0].rotate_right(1).wrapping_sub(s);

        for i in (0..BLOCK_SIZE - 1).rev() {
            let s = sbox[key[i].wrapping_add(block[i]).wrapping_add(r) as usize];
            block[i + 1] = block[i + 1].rotate_right(1).wrapping_sub(s);
        }
    }
}

/// Computes a CBC-MAC over `data` using Parve as the block cipher.
///
/// Zero IV; each 8-byte message block is XORed into the running block
/// which is then encrypted. The final ciphertext block, read big-endian,
/// is the 64-bit MAC.
///
/// # Parameters
/// - `key`: 8-byte cipher key.
/// - `sbox`: 256-byte substitution box.
/// - `data`: Input whose length must be a multiple of 8 bytes.
pub fn cbc_mac(key: &[u8; KEY_SIZE], sbox: &[u8; SBOX_SIZE], data: &[u8]) -> u64 {
    debug_assert!(data.len() % BLOCK_SIZE == 0);

    let mut block = [0u8; BLOCK_SIZE];
    for message in data.chunks_exact(BLOCK_SIZE) {
        for (b, m) in block.iter_mut().zip(message) {
            *b ^= m;
        }
        encrypt_block(key, sbox, &mut block);
    }

    endian::read_u64(&block, 0)
}
