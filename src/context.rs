//! Shared configuration context.
//!
//! A [`Context`] is built once from a 20-word configuration vector and a
//! 256-byte substitution box, and is immutable afterwards: it can be
//! shared across threads read-only, and any number of instances can be
//! created from it concurrently.

use crate::cs64::word_swap;
use crate::error::CsParve64Error;
use crate::parve;
use crate::utils::endian;
use crate::{cs64, validate_data, validate_input_key};
use zeroize::Zeroize;

/// Number of 32-bit words in the configuration vector.
pub const CONFIG_SIZE: usize = 20;

/// Shared, immutable configuration for hashing, encryption, and
/// decryption.
///
/// Holds the three hash keys, the two constant banks of each word-swap
/// family, and a private copy of the substitution box. Every 32-bit
/// constant except the flags word is forced odd at intake so that all
/// downstream multipliers are units mod 2^32.
pub struct Context {
    flags: u32,

    pub(crate) key1: u32,
    pub(crate) key2: u32,
    pub(crate) key3: u32,

    // Constant banks for the word-swap family.
    pub(crate) ws_b1: u32,
    pub(crate) ws_c1: u32,
    pub(crate) ws_d1: u32,
    pub(crate) ws_e1: u32,
    pub(crate) ws_b2: u32,
    pub(crate) ws_c2: u32,
    pub(crate) ws_d2: u32,
    pub(crate) ws_e2: u32,

    // Constant banks for the reversible family.
    pub(crate) rev_b1: u32,
    pub(crate) rev_c1: u32,
    pub(crate) rev_d1: u32,
    pub(crate) rev_e1: u32,
    pub(crate) rev_b2: u32,
    pub(crate) rev_c2: u32,
    pub(crate) rev_d2: u32,
    pub(crate) rev_e2: u32,

    pub(crate) sbox: [u8; parve::SBOX_SIZE],
}

impl Context {
    /// Opens a context from a configuration vector and substitution box.
    ///
    /// The configuration words are consumed in order: `[flags, key1,
    /// key2, key3, ws_b1..ws_e2, rev_b1..rev_e2]`. All words except
    /// `flags` are forced odd. The substitution box is copied; it is not
    /// required to be a permutation, but callers typically supply one
    /// with full entropy.
    ///
    /// # Parameters
    /// - `config`: 20 configuration words.
    /// - `sbox`: 256-byte substitution box.
    ///
    /// # Errors
    /// Returns [`CsParve64Error::UnsupportedFlags`] if `config[0]` is
    /// nonzero; no other configuration is currently defined.
    ///
    /// # Examples
    ///
    /// ```
    /// use csparve64::Context;
    ///
    /// let mut sbox = [0u8; 256];
    /// for (i, s) in sbox.iter_mut().enumerate() {
    ///     *s = i as u8;
    /// }
    /// let context = Context::open(&[0u32; 20], &sbox).unwrap();
    /// # let _ = context;
    /// ```
    pub fn open(
        config: &[u32; CONFIG_SIZE],
        sbox: &[u8; parve::SBOX_SIZE],
    ) -> Result<Self, CsParve64Error> {
        if config[0] != 0 {
            return Err(CsParve64Error::UnsupportedFlags);
        }

        Ok(Context {
            flags: config[0],
            key1: config[1] | 1,
            key2: config[2] | 1,
            key3: config[3] | 1,
            ws_b1: config[4] | 1,
            ws_c1: config[5] | 1,
            ws_d1: config[6] | 1,
            ws_e1: config[7] | 1,
            ws_b2: config[8] | 1,
            ws_c2: config[9] | 1,
            ws_d2: config[10] | 1,
            ws_e2: config[11] | 1,
            rev_b1: config[12] | 1,
            rev_c1: config[13] | 1,
            rev_d1: config[14] | 1,
            rev_e1: config[15] | 1,
            rev_b2: config[16] | 1,
            rev_c2: config[17] | 1,
            rev_d2: config[18] | 1,
            rev_e2: config[19] | 1,
            sbox: *sbox,
        })
    }

    /// Computes the combined keyed hash over `data`.
    ///
    /// Chains all four MAC families: the Parve CBC-MAC seeds the modular
    /// chain-&-sum, and each further family is keyed from the running
    /// XOR combination of the previous results. The result is
    /// independent of the hash cached by
    /// [`CsParve64::create`](crate::CsParve64::create); the two must not
    /// be interchanged.
    ///
    /// # Parameters
    /// - `input_key`: At least 8 bytes; only the first 8 are used.
    /// - `data`: Input whose length must be a nonzero multiple of 8.
    ///
    /// # Errors
    /// Returns [`CsParve64Error::KeyTooShort`] or
    /// [`CsParve64Error::InvalidDataLength`] on bad inputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use csparve64::Context;
    ///
    /// let mut sbox = [0u8; 256];
    /// for (i, s) in sbox.iter_mut().enumerate() {
    ///     *s = i as u8;
    /// }
    /// let context = Context::open(&[0u32; 20], &sbox).unwrap();
    ///
    /// let key = [0u8, 1, 2, 3, 4, 5, 6, 7];
    /// let hash = context.compute_hash(&key, &[0u8; 16]).unwrap();
    /// assert_eq!(hash, context.compute_hash(&key, &[0u8; 16]).unwrap());
    /// ```
    pub fn compute_hash(&self, input_key: &[u8], data: &[u8]) -> Result<u64, CsParve64Error> {
        let parve_key = validate_input_key(input_key)?;
        validate_data(data)?;

        let length = data.len();

        // Parve hash.
        let mut out_hash = parve::cbc_mac(&parve_key, &self.sbox, data);

        // Chain-&-sum hash keyed from the Parve CBC-MAC.
        let temp =
            cs64::modular::cs64_modular(out_hash, self.key1, self.key2, self.key3, data, length);
        out_hash ^= temp;

        // Chain-&-sum hash keyed from the intermediate hash.
        let temp = word_swap::cs64_word_swap(self, data, length, out_hash);
        out_hash ^= temp;

        // Chain-&-sum hash keyed from the intermediate hash.
        let temp = word_swap::cs64_reversible(self, data, length, out_hash);
        out_hash ^= temp;

        Ok(out_hash)
    }

    /// Computes the combined keyed hash, returned as `(hi, lo)` halves.
    ///
    /// Convenience wrapper over [`compute_hash`](Self::compute_hash).
    pub fn compute_hash_parts(
        &self,
        input_key: &[u8],
        data: &[u8],
    ) -> Result<(u32, u32), CsParve64Error> {
        let hash = self.compute_hash(input_key, data)?;
        Ok((endian::hi(hash), endian::lo(hash)))
    }
}

impl Drop for Context {
    /// Clears the substitution box and constant banks on drop.
    fn drop(&mut self) {
        self.flags.zeroize();
        self.key1.zeroize();
        self.key2.zeroize();
        self.key3.zeroize();
        self.ws_b1.zeroize();
        self.ws_c1.zeroize();
        self.ws_d1.zeroize();
        self.ws_e1.zeroize();
        self.ws_b2.zeroize();
        self.ws_c2.zeroize();
        self.ws_d2.zeroize();
        self.ws_e2.zeroize();
        self.rev_b1.zeroize();
        self.rev_c1.zeroize();
        self.rev_d1.zeroize();
        self.rev_e1.zeroize();
        self.rev_b2.zeroize();
        self.rev_c2.zeroize();
        self.rev_d2.zeroize();
        self.rev_e2.zeroize();
        self.sbox.zeroize();
    }
}
