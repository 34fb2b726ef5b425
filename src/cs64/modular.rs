//! Chain-&-sum MAC over Z_{2^31-1}.
//!
//! The same chain shape as the Z_{2^32} family, but every product is
//! reduced modulo the Mersenne prime 2^31 - 1 with a folded reduction.
//! Data words are treated as values 0..=2^31-2; the high bit of each
//! 32-bit input word is effectively ignored by the arithmetic.

use crate::utils::endian;

/// The Mersenne prime 2^31 - 1.
pub const MODULUS: u32 = 0x7FFF_FFFF;

/// Reduces a 64-bit intermediate chain-&-sum value mod 2^31 - 1.
///
/// With `v = 2^32*hi + lo` and `2^31 == 1 (mod p)`, the residue is
/// `2*hi + lo (mod p)`. The fold is carried out in 32-bit arithmetic
/// with conditional subtractions; it is exact whenever `hi < 2^31`,
/// which holds for every intermediate value the chain produces.
#[inline]
pub fn cs64_mod(v: u64) -> u64 {
    let hi = endian::hi(v);
    let mut lo = endian::lo(v);

    let mut r = hi << 1;

    if r >= MODULUS {
        r -= MODULUS;
    }

    if lo >= MODULUS {
        lo -= MODULUS;
    }

    r += lo;

    if r >= MODULUS {
        r -= MODULUS;
    }

    r as u64
}

/// Chain-&-sum MAC over Z_{2^31-1} with a key derived from an input hash.
///
/// `A` and `B` are the reduced halves of `in_hash`; `C`, `D`, `E` are the
/// caller's 32-bit keys used as-is. The chain mirrors the Z_{2^32}
/// family, including the asymmetric first pair, and finishes by folding
/// `B` into the chain and `D` into the sum once.
///
/// # Parameters
/// - `in_hash`: 64-bit input hash for key derivation.
/// - `key_c`, `key_d`, `key_e`: 32-bit keys.
/// - `data`: Input data buffer.
/// - `data_length`: Significant length in bytes; the word count must be
///   even and >= 2.
///
/// # Returns
/// The 64-bit MAC packed as `(sum << 32) | mac`, both halves below 2^31.
pub fn cs64_modular(
    in_hash: u64,
    key_c: u32,
    key_d: u32,
    key_e: u32,
    data: &[u8],
    data_length: usize,
) -> u64 {
    let num_blocks = data_length / 4;
    debug_assert!(num_blocks >= 2 && num_blocks % 2 == 0);

    // Generate the key from the input hash.
    let cs64_a = cs64_mod(endian::lo(in_hash) as u64);
    let cs64_b = cs64_mod(endian::hi(in_hash) as u64);
    let cs64_c = key_c as u64;
    let cs64_d = key_d as u64;
    let cs64_e = key_e as u64;

    let mut index = 0usize;

    // Multiply block 0 by E and reduce; no chain term on the first pair.
    let mut tmp = cs64_e * endian::read_u32(data, index << 2) as u64;
    index += 1;
    tmp = cs64_mod(tmp);

    // Ax+B on block 0 and reduce.
    let mut mac = cs64_mod(cs64_a * tmp + cs64_b);
    let mut sum = mac;

    // Cx+D on block 1 and reduce.
    tmp = cs64_mod(mac + endian::read_u32(data, index << 2) as u64);
    index += 1;
    mac = cs64_mod(cs64_c * tmp + cs64_d);
    sum += mac;

    for _ in 1..num_blocks / 2 {
        // Multiply the even-indexed block by E, add the chain, reduce.
        tmp = cs64_e * endian::read_u32(data, index << 2) as u64 + mac;
        index += 1;
        tmp = cs64_mod(tmp);

        mac = cs64_mod(cs64_a * tmp + cs64_b);
        sum += mac;

        tmp = cs64_mod(mac + endian::read_u32(data, index << 2) as u64);
        index += 1;
        mac = cs64_mod(cs64_c * tmp + cs64_d);
        sum += mac;
    }

    mac = cs64_mod(mac + cs64_b);
    sum = cs64_mod(sum + cs64_d);

    endian::make_u64(endian::lo(sum), endian::lo(mac))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_small_values() {
        assert_eq!(cs64_mod(0), 0);
        assert_eq!(cs64_mod(1), 1);
        assert_eq!(cs64_mod(MODULUS as u64 - 1), MODULUS as u64 - 1);
        assert_eq!(cs64_mod(MODULUS as u64), 0);
        assert_eq!(cs64_mod(MODULUS as u64 + 1), 1);
    }

    #[test]
    fn test_mod_full_32bit_word() {
        // 2^32 - 1 == 2^31 (mod p) == 1 (mod p)
        assert_eq!(cs64_mod(0xFFFF_FFFF), 1);
        // 2^32 == 2 (mod p)
        assert_eq!(cs64_mod(0x1_0000_0000), 2);
    }

    #[test]
    fn test_mod_congruence_products() {
        // Congruence against wide arithmetic for in-range products.
        let p = MODULUS as u128;
        for &v in &[
            0x7FFF_FFFEu64 * 0x7FFF_FFFE,
            0x1234_5678_9ABC_DEF0,
            0x3FFF_FFFF_FFFF_FFFF,
            42,
        ] {
            let reduced = cs64_mod(v);
            assert_eq!(reduced as u128 % p, v as u128 % p, "v = {:#x}", v);
            assert!(reduced <= MODULUS as u64);
        }
    }

    #[test]
    fn test_modular_mac_deterministic() {
        let data: Vec<u8> = (0..16).collect();
        let a = cs64_modular(0x1234_5678_9ABC_DEF0, 1, 3, 5, &data, 16);
        let b = cs64_modular(0x1234_5678_9ABC_DEF0, 1, 3, 5, &data, 16);
        assert_eq!(a, b);
    }

    #[test]
    fn test_modular_mac_halves_below_modulus() {
        let data: Vec<u8> = (0u8..24).map(|b| b.wrapping_mul(11)).collect();
        let mac = cs64_modular(0xFFFF_FFFF_FFFF_FFFF, 0x7FFF_FFFD, 0x7FFF_FFFB, 3, &data, 24);
        assert!(endian::hi(mac) <= MODULUS);
        assert!(endian::lo(mac) <= MODULUS);
    }

    #[test]
    fn test_modular_mac_sensitive_to_hash() {
        let data: Vec<u8> = (0..16).collect();
        let a = cs64_modular(0x0000_0001_0000_0002, 1, 3, 5, &data, 16);
        let b = cs64_modular(0x0000_0002_0000_0001, 1, 3, 5, &data, 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_modular_mac_sensitive_to_data() {
        let data: Vec<u8> = (0..16).collect();
        let mut flipped = data.clone();
        flipped[9] ^= 0x04;
        let a = cs64_modular(0x1111_2222_3333_4444, 7, 9, 11, &data, 16);
        let b = cs64_modular(0x1111_2222_3333_4444, 7, 9, 11, &flipped, 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_modular_mac_high_bit_of_word_ignored_mod_p() {
        // A word and the same word plus 2^31 - 1... the arithmetic treats
        // words congruent mod p identically in the chain.
        let mut a_data = vec![0u8; 16];
        let mut b_data = vec![0u8; 16];
        endian::write_u32(5, &mut a_data, 0);
        endian::write_u32(5 + MODULUS, &mut b_data, 0);
        let a = cs64_modular(0xABCD_EF01_2345_6789, 3, 5, 7, &a_data, 16);
        let b = cs64_modular(0xABCD_EF01_2345_6789, 3, 5, 7, &b_data, 16);
        assert_eq!(a, b);
    }
}
