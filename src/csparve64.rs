//! CSParve64 instance: keyed hashing plus in-place encryption and
//! decryption with an embedded 64-bit MAC.
//!
//! An instance is created from a [`Context`], an 8-byte input key, and a
//! seed buffer. Creation derives the instance's chain-&-sum key from the
//! seed and caches the 64-bit hash of the seed. Encryption writes the
//! chain-&-sum pre-MAC over the last two 32-bit words, Parve-encrypts
//! that block into the ciphertext MAC, and streams the rest of the buffer
//! with BV4 keyed from the encrypted MAC; decryption runs the exact
//! reverse and restores the original last two plaintext words through the
//! inverse MAC.

use crate::bv4::Bv4Key;
use crate::context::Context;
use crate::cs64::Cs64Key;
use crate::error::CsParve64Error;
use crate::parve;
use crate::utils::endian;
use crate::{validate_data, validate_input_key};
use zeroize::Zeroize;

/// Length in bytes of the embedded MAC region (two 32-bit words).
const MAC_LENGTH: usize = 8;

/// A keyed hashing and encryption instance.
///
/// Immutable after creation: all operations take `&self`, and a single
/// caller owns the instance across its lifetime. The seed hash computed
/// at creation is cached and available through [`hash`](Self::hash).
///
/// # Examples
///
/// ```
/// use csparve64::{Context, CsParve64};
///
/// let mut sbox = [0u8; 256];
/// for (i, s) in sbox.iter_mut().enumerate() {
///     *s = i as u8;
/// }
/// let context = Context::open(&[0u32; 20], &sbox).unwrap();
///
/// let key = [0u8, 1, 2, 3, 4, 5, 6, 7];
/// let instance = CsParve64::create(&context, &key, &[0u8; 16]).unwrap();
///
/// let mut buffer = *b"data apt for csp";
/// let mac = instance.encode(&mut buffer).unwrap();
/// assert_ne!(&buffer, b"data apt for csp");
///
/// let recovered = instance.decode(&mut buffer).unwrap();
/// assert_eq!(&buffer, b"data apt for csp");
/// assert_eq!(mac, recovered);
/// ```
pub struct CsParve64 {
    c: u32,
    d: u32,
    e: u32,
    cs_key: Cs64Key,
    parve_key: [u8; parve::KEY_SIZE],
    sbox: [u8; parve::SBOX_SIZE],
    hash: u64,
}

impl CsParve64 {
    /// Creates an instance from a context, input key, and seed data.
    ///
    /// The input key doubles as the Parve key; the seed data is hashed
    /// at creation, the result seeds the instance's chain-&-sum key, and
    /// the hash is cached for [`hash`](Self::hash). The seed need not be
    /// the data that will later be encrypted.
    ///
    /// # Parameters
    /// - `context`: The shared configuration.
    /// - `input_key`: At least 8 bytes; only the first 8 are used.
    /// - `data`: Seed data whose length must be a nonzero multiple of 8.
    ///
    /// # Errors
    /// Returns [`CsParve64Error::KeyTooShort`] or
    /// [`CsParve64Error::InvalidDataLength`] on bad inputs.
    pub fn create(
        context: &Context,
        input_key: &[u8],
        data: &[u8],
    ) -> Result<Self, CsParve64Error> {
        let parve_key = validate_input_key(input_key)?;
        validate_data(data)?;

        let c = context.key1 | 1;
        let d = context.key2 | 1;
        let e = context.key3 | 1;
        let sbox = context.sbox;

        // Combined hash over the seed: the Parve CBC-MAC seeds the
        // chain-&-sum key, and the cached hash is the XOR of both MACs.
        let parve_hash = parve::cbc_mac(&parve_key, &sbox, data);
        let cs_key = Cs64Key::new(parve_hash, c, d, e);
        let hash = cs_key.compute_mac(data, data.len() / 4) ^ parve_hash;

        Ok(CsParve64 {
            c,
            d,
            e,
            cs_key,
            parve_key,
            sbox,
            hash,
        })
    }

    /// Returns the 64-bit hash of the seed data, cached at creation.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Returns the cached seed hash as `(hi, lo)` halves.
    pub fn hash_parts(&self) -> (u32, u32) {
        (endian::hi(self.hash), endian::lo(self.hash))
    }

    /// Encrypts a buffer in place, embedding a 64-bit MAC.
    ///
    /// The chain-&-sum pre-MAC over the full plaintext replaces the last
    /// two 32-bit words, is Parve-encrypted into the ciphertext MAC, and
    /// the encrypted MAC bytes key the BV4 stream that encrypts the rest
    /// of the buffer.
    ///
    /// # Parameters
    /// - `data`: Buffer to encrypt; the length must be a nonzero
    ///   multiple of 8.
    ///
    /// # Returns
    /// The plaintext pre-MAC, to be compared against the value returned
    /// by [`decode`](Self::decode) after transmission.
    ///
    /// # Errors
    /// Returns [`CsParve64Error::InvalidDataLength`] without touching the
    /// buffer if the length is invalid.
    pub fn encode(&self, data: &mut [u8]) -> Result<u64, CsParve64Error> {
        validate_data(data)?;

        let mac_offset = data.len() - MAC_LENGTH;

        // The pre-MAC covers the whole plaintext, then replaces its last
        // two words.
        let mac = self.cs_key.compute_mac(data, data.len() / 4);
        endian::write_u64(mac, data, mac_offset);

        let (body, mac_region) = data.split_at_mut(mac_offset);

        // Encrypt the pre-MAC with Parve to create the ciphertext MAC.
        parve::encrypt_block(&self.parve_key, &self.sbox, mac_region);

        // The BV4 key comes from the encrypted MAC, not the pre-MAC.
        let mut bv4 = Bv4Key::new(mac_region);
        bv4.crypt(body);

        Ok(mac)
    }

    /// Decrypts a buffer in place, recovering the embedded 64-bit MAC.
    ///
    /// Reverses [`encode`](Self::encode): the encrypted MAC bytes key the
    /// BV4 stream that decrypts the prefix, Parve decryption reveals the
    /// pre-MAC, and the inverse chain-&-sum recovers the last two
    /// plaintext words.
    ///
    /// # Parameters
    /// - `data`: Buffer to decrypt; the length must be a nonzero
    ///   multiple of 8.
    ///
    /// # Returns
    /// The recovered pre-MAC. The caller compares it against the value
    /// [`encode`](Self::encode) returned; this method does not verify.
    ///
    /// # Errors
    /// Returns [`CsParve64Error::InvalidDataLength`] without touching the
    /// buffer if the length is invalid.
    pub fn decode(&self, data: &mut [u8]) -> Result<u64, CsParve64Error> {
        validate_data(data)?;

        let mac_offset = data.len() - MAC_LENGTH;

        {
            let (body, mac_region) = data.split_at_mut(mac_offset);

            let mut bv4 = Bv4Key::new(mac_region);
            bv4.crypt(body);

            // Reveal the chain-&-sum pre-MAC.
            parve::decrypt_block(&self.parve_key, &self.sbox, mac_region);
        }

        let mac = endian::read_u64(data, mac_offset);

        // Restore the original last two plaintext words.
        let last_pair = self.cs_key.invert_mac(data, data.len(), mac);
        endian::write_u64(last_pair, data, mac_offset);

        Ok(mac)
    }
}

impl Drop for CsParve64 {
    /// Clears key material and the cached hash on drop.
    fn drop(&mut self) {
        self.c.zeroize();
        self.d.zeroize();
        self.e.zeroize();
        self.parve_key.zeroize();
        self.sbox.zeroize();
        self.hash.zeroize();
        // cs_key clears itself on drop.
    }
}
