//! Key material derived from a completed run.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of sifted bits packed into a [`SessionKey`] (AES-128 key size).
pub const SESSION_KEY_BITS: usize = 128;

/// Packs a bit sequence into bytes, most significant bit first.
///
/// The sequence is zero-padded or truncated to `target_bit_length` before
/// packing, so the output always holds `target_bit_length / 8` bytes,
/// rounded up. Pure: equal inputs produce equal outputs.
pub fn derive_key(sifted_bits: &[bool], target_bit_length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; target_bit_length.div_ceil(8)];

    for (i, &bit) in sifted_bits.iter().take(target_bit_length).enumerate() {
        if bit {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }
    }

    bytes
}

/// A 128-bit symmetric session key established by a protocol run.
///
/// The bytes are wiped on drop and the type deliberately has no `Debug` or
/// `Display`, so key material cannot wander into logs.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; 16]);

impl SessionKey {
    /// Derives a session key from a sifted bit sequence.
    ///
    /// Shorter sequences are zero-padded and longer ones truncated to
    /// exactly [`SESSION_KEY_BITS`].
    pub fn derive(sifted_bits: &[bool]) -> Self {
        let bytes = derive_key(sifted_bits, SESSION_KEY_BITS);
        let mut key = [0u8; 16];
        key.copy_from_slice(&bytes);
        Self(key)
    }

    /// Builds a key from raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Borrows the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_is_msb_first() {
        let mut bits = [false; 8];
        bits[0] = true;
        assert_eq!(derive_key(&bits, 8), vec![0x80]);

        let mut bits = [false; 8];
        bits[7] = true;
        assert_eq!(derive_key(&bits, 8), vec![0x01]);

        // 1010_1010 -> 0xAA
        let bits: Vec<bool> = (0..8).map(|i| i % 2 == 0).collect();
        assert_eq!(derive_key(&bits, 8), vec![0xAA]);
    }

    #[test]
    fn short_input_is_zero_padded() {
        let bits = [true, true, true, true];
        assert_eq!(derive_key(&bits, 16), vec![0xF0, 0x00]);
    }

    #[test]
    fn long_input_is_truncated() {
        let mut bits = vec![false; 16];
        bits[0] = true;
        bits[8] = true;
        assert_eq!(derive_key(&bits, 8), vec![0x80]);
    }

    #[test]
    fn target_lengths_round_up_to_whole_bytes() {
        assert_eq!(derive_key(&[], 0), Vec::<u8>::new());
        // 1010 packed into the high nibble of a single byte.
        let bits = [true, false, true, false];
        assert_eq!(derive_key(&bits, 4), vec![0xA0]);
    }

    #[test]
    fn derivation_is_pure() {
        let bits: Vec<bool> = (0..200).map(|i| i % 3 == 0).collect();
        assert_eq!(derive_key(&bits, 128), derive_key(&bits, 128));

        let a = SessionKey::derive(&bits);
        let b = SessionKey::derive(&bits);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn session_key_pads_short_sifted_material() {
        let key = SessionKey::derive(&[true]);
        let mut expected = [0u8; 16];
        expected[0] = 0x80;
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn from_bytes_roundtrip() {
        let bytes = [42u8; 16];
        assert_eq!(SessionKey::from_bytes(bytes).as_bytes(), &bytes);
    }
}
