//! BV4: word-oriented stream cipher seeded by the RC4 key schedule.
//!
//! BV4 extends the RC4 permutation walk with a 32-bit scalar `h` and a
//! 32-word table `y`, both harvested from the RC4 keystream during key
//! setup. The output stage XORs `h * s[t]` into each 32-bit word of the
//! buffer while evolving `s`, `h`, and `y`-driven byte updates.
//!
//! The keystream never depends on the processed data, so applying
//! [`Bv4Key::crypt`] with matching keys is an involution: encryption and
//! decryption are the same operation.

use crate::utils::endian;

/// Size of the RC4 permutation table.
const RC4_TABLE_SIZE: usize = 256;

/// Number of 32-bit words in the auxiliary `y` table.
const Y_TABLE_SIZE: usize = 32;

/// A keyed BV4 stream cipher state.
///
/// One state is constructed per encrypt or decrypt call and never shared.
pub struct Bv4Key {
    i: u8,
    j: u8,
    h: u32,
    s: [u8; RC4_TABLE_SIZE],
    y: [u32; Y_TABLE_SIZE],
}

impl Bv4Key {
    /// Sets up a BV4 key from `key_data`.
    ///
    /// Runs the RC4 key schedule over the permutation, wrapping through
    /// `key_data` as often as needed, then performs the warm-up that
    /// harvests `(1 + 32) * 4` keystream bytes to seed `h` and the `y`
    /// table.
    ///
    /// # Parameters
    /// - `key_data`: Key bytes; must be nonempty (8 bytes in the
    ///   encrypt/decrypt protocol).
    pub fn new(key_data: &[u8]) -> Self {
        debug_assert!(!key_data.is_empty());

        let mut s = [0u8; RC4_TABLE_SIZE];
        for (i, x) in s.iter_mut().enumerate() {
            *x = i as u8;
        }

        let mut j = 0u8;
        let mut k = 0usize;
        for i in 0..RC4_TABLE_SIZE {
            j = j.wrapping_add(s[i]).wrapping_add(key_data[k]);
            s.swap(i, j as usize);
            k += 1;
            if k == key_data.len() {
                k = 0;
            }
        }

        let mut bv4 = Bv4Key {
            i: 0,
            j: 0,
            h: 0,
            s,
            y: [0u32; Y_TABLE_SIZE],
        };
        bv4.rc4_fill();
        bv4
    }

    /// Fills `h` and `y` from the RC4 keystream.
    fn rc4_fill(&mut self) {
        let mut i = 0usize;
        let mut j = 0usize;

        const BUFFER_LENGTH: usize = (1 + Y_TABLE_SIZE) * 4;
        let mut buffer = [0u8; BUFFER_LENGTH];

        for out in buffer.iter_mut() {
            i = (i + 1) & (RC4_TABLE_SIZE - 1);
            let tmp = self.s[i];
            j = (j + tmp as usize) & (RC4_TABLE_SIZE - 1);
            self.s[i] = self.s[j];
            self.s[j] = tmp;
            *out = self.s[(self.s[i] as usize + tmp as usize) & (RC4_TABLE_SIZE - 1)];
        }

        self.i = i as u8;
        self.j = j as u8;
        self.h = endian::read_u32(&buffer, 0);
        for (k, y) in self.y.iter_mut().enumerate() {
            *y = endian::read_u32(&buffer, (k + 1) * 4);
        }
    }

    /// XORs the buffer with the BV4 keystream in place.
    ///
    /// Performs both encryption and decryption. The buffer is processed
    /// as big-endian 32-bit words.
    ///
    /// # Parameters
    /// - `buffer`: Data to encrypt or decrypt; the length must be a
    ///   multiple of 4 bytes.
    pub fn crypt(&mut self, buffer: &mut [u8]) {
        debug_assert!(buffer.len() % 4 == 0);

        let mut i = self.i as usize;
        let mut j = self.j as usize;
        let mut h = self.h;

        let num_words = buffer.len() >> 2;
        for index in 0..num_words {
            i = (i + 1) & (RC4_TABLE_SIZE - 1);
            let tmp = self.s[i];
            j = (j + tmp as usize) & (RC4_TABLE_SIZE - 1);
            self.s[i] = self.s[j];
            self.s[j] = tmp;
            let t = self.s[i].wrapping_add(self.s[j]) as usize;

            let mut word = endian::read_u32(buffer, index << 2);
            word ^= h.wrapping_mul(self.s[t] as u32);
            endian::write_u32(word, buffer, index << 2);

            h = h.wrapping_add(self.y[t & (Y_TABLE_SIZE - 1)]);
            self.s[t] = self.s[t].wrapping_add(self.y[t & (Y_TABLE_SIZE - 1)] as u8);
        }

        self.i = i as u8;
        self.j = j as u8;
        self.h = h;
    }
}
