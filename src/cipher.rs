//! Symmetric encryption keyed by an established session key.
//!
//! AES-128-CBC with PKCS#7 padding and a fixed all-zero IV, mirroring the
//! classroom construction this crate models. The fixed IV makes equal
//! plaintexts under the same key encrypt identically; with single-use
//! session keys that is a documented simplification, not something to
//! deploy as-is.

use crate::errors::CipherError;
use crate::key::SessionKey;
use crate::protocols::qkd::bb84::TransmissionRecord;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

const BLOCK_SIZE: usize = 16;
const FIXED_IV: [u8; BLOCK_SIZE] = [0u8; BLOCK_SIZE];

/// Encrypts and decrypts application payloads with the session key of a
/// completed run.
///
/// A cipher built from a compromised or key-less run refuses both
/// operations with [`CipherError::NoKeyAvailable`]; it never passes
/// plaintext through.
pub struct MessageCipher {
    key: Option<SessionKey>,
}

impl MessageCipher {
    pub fn new(key: Option<SessionKey>) -> Self {
        Self { key }
    }

    /// Builds a cipher from a run's outcome, inheriting its withheld key.
    pub fn from_record(record: &TransmissionRecord) -> Self {
        Self {
            key: record.session_key.clone(),
        }
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Encrypts an arbitrary payload.
    ///
    /// The output is always a whole number of blocks; block-aligned input
    /// gains one full padding block.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let key = self.key.as_ref().ok_or(CipherError::NoKeyAvailable)?;

        Ok(
            Aes128CbcEnc::new(key.as_bytes().into(), &FIXED_IV.into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        )
    }

    /// Decrypts a payload produced by [`MessageCipher::encrypt`].
    ///
    /// Fails with [`CipherError::InvalidPadding`] when the ciphertext is
    /// empty or not a whole number of blocks, or when the recovered padding
    /// bytes are inconsistent. Decrypting under the wrong key surfaces the
    /// same way.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let key = self.key.as_ref().ok_or(CipherError::NoKeyAvailable)?;

        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::InvalidPadding);
        }

        Aes128CbcDec::new(key.as_bytes().into(), &FIXED_IV.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CipherError::InvalidPadding)
    }
}
