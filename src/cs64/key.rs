//! Invertible chain-&-sum MAC over Z_{2^32}.
//!
//! A [`Cs64Key`] holds five odd 32-bit multipliers derived from a 64-bit
//! seed hash, plus precomputed inverses of the three multipliers that the
//! inverse MAC needs. Because every multiplier is odd it is a unit
//! mod 2^32, which makes the last two message words recoverable from the
//! MAC — the property the decrypt path relies on.

use crate::utils::endian;
use zeroize::Zeroize;

/// Chain-&-sum key over Z_{2^32}: five odd multipliers and the inverses
/// of `a`, `c`, `e` used for MAC inversion.
pub struct Cs64Key {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
    e: u32,
    inv_a: u32,
    inv_c: u32,
    inv_e: u32,
}

impl Cs64Key {
    /// Builds a chain-&-sum key.
    ///
    /// The multipliers are derived from the halves of `in_hash` and the
    /// three 32-bit keys, each forced odd so that it is invertible:
    ///
    /// - `a = lo|1`, `b = hi|1`
    /// - `c = (key1^lo)|1`, `d = (key2^hi)|1`, `e = (key3^lo)|1`
    ///
    /// # Parameters
    /// - `in_hash`: 64-bit input hash for key derivation.
    /// - `key1`, `key2`, `key3`: 32-bit keys mixed into `c`, `d`, `e`.
    pub fn new(in_hash: u64, key1: u32, key2: u32, key3: u32) -> Self {
        let hi = endian::hi(in_hash);
        let lo = endian::lo(in_hash);

        let a = 1 | lo;
        let c = 1 | (key1 ^ lo);
        let e = 1 | (key3 ^ lo);

        Cs64Key {
            a,
            b: 1 | hi,
            c,
            d: 1 | (key2 ^ hi),
            e,
            inv_a: mod_invert_32(a),
            inv_c: mod_invert_32(c),
            inv_e: mod_invert_32(e),
        }
    }

    /// Computes the chain-&-sum MAC over `num_blocks` 32-bit words.
    ///
    /// The first word pair seeds the chain directly (`x = e*W[0]`, no
    /// chain term); every following pair folds the previous chain into
    /// the `e*x` step. The two forms are not interchangeable — both the
    /// encoder and [`invert_mac`](Self::invert_mac) depend on this exact
    /// start.
    ///
    /// # Parameters
    /// - `data`: Input buffer holding at least `num_blocks` big-endian
    ///   32-bit words.
    /// - `num_blocks`: Number of 32-bit words; must be even and >= 2.
    ///
    /// # Returns
    /// The 64-bit MAC packed as `sum + (chain << 32)`.
    pub fn compute_mac(&self, data: &[u8], num_blocks: usize) -> u64 {
        debug_assert!(num_blocks >= 2 && num_blocks % 2 == 0);
        debug_assert!(data.len() >= num_blocks * 4);

        let mut index = 0usize;

        // Multiply block 0 by e; no chain term on the first pair.
        let exn = self.e.wrapping_mul(endian::read_u32(data, index << 2));
        index += 1;

        // ax+b on block 0.
        let mut chain = self.a.wrapping_mul(exn).wrapping_add(self.b);
        let mut sum = chain;

        // cx+d on block 1.
        chain = self
            .c
            .wrapping_mul(chain.wrapping_add(endian::read_u32(data, index << 2)))
            .wrapping_add(self.d);
        index += 1;
        sum = sum.wrapping_add(chain);

        for _ in 1..num_blocks / 2 {
            let exn = self.e.wrapping_mul(endian::read_u32(data, index << 2));
            index += 1;

            chain = self
                .a
                .wrapping_mul(chain.wrapping_add(exn))
                .wrapping_add(self.b);
            sum = sum.wrapping_add(chain);

            chain = self
                .c
                .wrapping_mul(chain.wrapping_add(endian::read_u32(data, index << 2)))
                .wrapping_add(self.d);
            index += 1;
            sum = sum.wrapping_add(chain);
        }

        (sum as u64).wrapping_add((chain as u64) << 32)
    }

    /// Inverts the chain-&-sum computation.
    ///
    /// Given the buffer and a target MAC, recovers the two 32-bit words
    /// whose presence in the last block positions would make
    /// [`compute_mac`](Self::compute_mac) produce that MAC.
    ///
    /// # Parameters
    /// - `data`: Input buffer; only the words before the last two are
    ///   read.
    /// - `data_length`: Significant buffer length in bytes; must be a
    ///   nonzero multiple of 8.
    /// - `hash`: 64-bit MAC to invert.
    ///
    /// # Returns
    /// The recovered word pair packed as `(x_{n-1} << 32) | x_n`.
    pub fn invert_mac(&self, data: &[u8], data_length: usize, hash: u64) -> u64 {
        let num_blocks = data_length / 4;
        debug_assert!(num_blocks >= 2 && num_blocks % 2 == 0);

        let sum = endian::lo(hash);
        let yn = endian::hi(hash);
        let mut yn2 = 0u32;
        let mut sum_prev = 0u32;

        // Chain and sum of all blocks except the last two.
        if num_blocks > 2 {
            let hash_prev = self.compute_mac(data, num_blocks - 2);
            sum_prev = endian::lo(hash_prev);
            yn2 = endian::hi(hash_prev);
        }

        // y_{n-1} = sum(y_1..y_n) - sum(y_1..y_{n-2}) - y_n
        let yn1 = sum.wrapping_sub(sum_prev).wrapping_sub(yn);

        // x_n = c_inv (y_n - d) - y_{n-1}
        let xn = self
            .inv_c
            .wrapping_mul(yn.wrapping_sub(self.d))
            .wrapping_sub(yn1);

        // x_{n-1} = e_inv [a_inv (y_{n-1} - b) - y_{n-2}]
        let xn1 = self.inv_e.wrapping_mul(
            self.inv_a
                .wrapping_mul(yn1.wrapping_sub(self.b))
                .wrapping_sub(yn2),
        );

        endian::make_u64(xn1, xn)
    }
}

impl Drop for Cs64Key {
    fn drop(&mut self) {
        self.a.zeroize();
        self.b.zeroize();
        self.c.zeroize();
        self.d.zeroize();
        self.e.zeroize();
        self.inv_a.zeroize();
        self.inv_c.zeroize();
        self.inv_e.zeroize();
    }
}

/// Inverts an odd `n` mod 2^32 without 64-bit arithmetic.
///
/// Runs the extended Euclidean algorithm on `(n, 2^32 mod n)` — computed
/// as `1 + (2^32 - 1) mod n` to stay inside 32 bits — and folds the
/// quotient back into the Bezout coefficient.
///
/// # Parameters
/// - `n`: The value to invert; must be odd.
///
/// # Returns
/// `n^(-1) mod 2^32`, satisfying `n.wrapping_mul(inv) == 1`.
pub fn mod_invert_32(n: u32) -> u32 {
    debug_assert!(n & 1 != 0, "modular inverse requires an odd argument");

    if n == 1 {
        return 1;
    }

    let (x, inv) = egcd_32(n, 1 + (u32::MAX % n));

    // n is odd and > 1, so 2^32 / n == (2^32 - 1) / n.
    x.wrapping_sub(inv.wrapping_mul(u32::MAX / n))
}

/// Extended Euclidean algorithm over wrapping 32-bit arithmetic.
///
/// Returns the Bezout coefficients `(x, y)` with `gcd(a, b) = x*a + y*b`.
fn egcd_32(mut a: u32, mut b: u32) -> (u32, u32) {
    let mut x = 0u32;
    let mut y = 1u32;
    let mut last_x = 1u32;
    let mut last_y = 0u32;

    while b != 0 {
        let q = a / b;

        let temp = b;
        b = a % b;
        a = temp;

        let temp = x;
        x = last_x.wrapping_sub(q.wrapping_mul(x));
        last_x = temp;

        let temp = y;
        y = last_y.wrapping_sub(q.wrapping_mul(y));
        last_y = temp;
    }

    (last_x, last_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_invert_one() {
        assert_eq!(mod_invert_32(1), 1);
    }

    #[test]
    fn test_mod_invert_known_values() {
        for n in [3u32, 5, 7, 0xDEAD_BEEF | 1, u32::MAX, 0x8000_0001] {
            let inv = mod_invert_32(n);
            assert_eq!(
                n.wrapping_mul(inv),
                1,
                "n * inv != 1 mod 2^32 for n = {:#x}",
                n
            );
        }
    }

    #[test]
    fn test_mod_invert_involution() {
        // inv(inv(n)) == n for units.
        for n in [3u32, 17, 0x1234_5679, 0xFFFF_FFFB] {
            assert_eq!(mod_invert_32(mod_invert_32(n)), n);
        }
    }

    #[test]
    fn test_key_derivation_all_odd() {
        let key = Cs64Key::new(0x0123_4567_89AB_CDEE, 0x1000_0000, 0x2000_0000, 0x3000_0000);
        assert_eq!(key.a & 1, 1);
        assert_eq!(key.b & 1, 1);
        assert_eq!(key.c & 1, 1);
        assert_eq!(key.d & 1, 1);
        assert_eq!(key.e & 1, 1);
    }

    #[test]
    fn test_key_inverses_match() {
        let key = Cs64Key::new(0xFEDC_BA98_7654_3210, 0xAAAA_AAAA, 0x5555_5555, 0x0F0F_0F0F);
        assert_eq!(key.a.wrapping_mul(key.inv_a), 1);
        assert_eq!(key.c.wrapping_mul(key.inv_c), 1);
        assert_eq!(key.e.wrapping_mul(key.inv_e), 1);
    }

    #[test]
    fn test_compute_mac_deterministic() {
        let key = Cs64Key::new(0x1111_2222_3333_4444, 1, 3, 5);
        let data: Vec<u8> = (0..16).collect();
        assert_eq!(key.compute_mac(&data, 4), key.compute_mac(&data, 4));
    }

    #[test]
    fn test_compute_mac_packs_chain_high() {
        // With two blocks, the high half of the result is the final chain
        // value and the low half is the sum.
        let key = Cs64Key::new(0xAAAA_BBBB_CCCC_DDDD, 7, 11, 13);
        let data: Vec<u8> = (0..8).collect();
        let mac = key.compute_mac(&data, 2);

        let w0 = endian::read_u32(&data, 0);
        let w1 = endian::read_u32(&data, 4);
        let chain0 = key
            .a
            .wrapping_mul(key.e.wrapping_mul(w0))
            .wrapping_add(key.b);
        let chain1 = key
            .c
            .wrapping_mul(chain0.wrapping_add(w1))
            .wrapping_add(key.d);
        let sum = chain0.wrapping_add(chain1);

        assert_eq!(endian::hi(mac), chain1);
        assert_eq!(endian::lo(mac), sum);
    }

    #[test]
    fn test_invert_mac_two_blocks() {
        let key = Cs64Key::new(0x0102_0304_0506_0708, 0x1111, 0x2222, 0x3333);
        let data = [0xDEu8, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE, 0xBA, 0xBE];
        let mac = key.compute_mac(&data, 2);
        let pair = key.invert_mac(&data, 8, mac);
        assert_eq!(endian::hi(pair), endian::read_u32(&data, 0));
        assert_eq!(endian::lo(pair), endian::read_u32(&data, 4));
    }

    #[test]
    fn test_invert_mac_recovers_last_pair() {
        let key = Cs64Key::new(0x9999_8888_7777_6666, 0xABCD, 0x1234, 0xFF00);
        let data: Vec<u8> = (0u8..32).map(|b| b.wrapping_mul(13)).collect();
        let mac = key.compute_mac(&data, 8);
        let pair = key.invert_mac(&data, 32, mac);
        assert_eq!(endian::hi(pair), endian::read_u32(&data, 24));
        assert_eq!(endian::lo(pair), endian::read_u32(&data, 28));
    }

    #[test]
    fn test_mac_sensitive_to_first_word() {
        let key = Cs64Key::new(0x1357_9BDF_0246_8ACE, 3, 5, 7);
        let data: Vec<u8> = (0..16).collect();
        let mut flipped = data.clone();
        flipped[0] ^= 0x80;
        assert_ne!(key.compute_mac(&data, 4), key.compute_mac(&flipped, 4));
    }
}
