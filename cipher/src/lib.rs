//! Symmetric encryption for the OPEN phase of a session.
//!
//! [`CipherEngine`] wraps AES-256-CBC with PKCS#7 padding. A fresh,
//! cryptographically random IV is drawn for every call to [`CipherEngine::encrypt`];
//! the IV is not secret and travels alongside the ciphertext in the
//! [`wire::EncryptedData`] envelope.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use thiserror::Error;

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

pub const KEY_SIZE: usize = 32;
pub const IV_SIZE: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("key must be exactly {KEY_SIZE} bytes, got {0}")]
    InvalidKeyLength(usize),
    #[error("iv must be exactly {IV_SIZE} bytes, got {0}")]
    InvalidIvLength(usize),
    #[error("ciphertext is malformed or was tampered with")]
    DecryptionFailed,
}

/// The single supported cipher suite. Kept as an enum (rather than
/// hard-coding AES-256-CBC at every call site) so a second suite can be
/// added later without reshaping [`CipherEngine`]'s callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Aes256Cbc,
}

/// A keyed encryption/decryption facade. Constructed once per session, after
/// the shared secret has been derived, and reused for every message sent or
/// received during the OPEN phase.
#[derive(Clone)]
pub struct CipherEngine {
    algorithm: Algorithm,
    key: [u8; KEY_SIZE],
}

impl CipherEngine {
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        Self::with_algorithm(Algorithm::Aes256Cbc, key)
    }

    pub fn with_algorithm(algorithm: Algorithm, key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != KEY_SIZE {
            return Err(CipherError::InvalidKeyLength(key.len()));
        }
        let mut fixed = [0u8; KEY_SIZE];
        fixed.copy_from_slice(key);
        Ok(Self {
            algorithm,
            key: fixed,
        })
    }

    /// Encrypts `plaintext` under a freshly drawn IV, returning `(iv,
    /// ciphertext)`. The caller is responsible for wiring these into an
    /// [`wire::EncryptedData`] for transmission.
    pub fn encrypt(&self, plaintext: &[u8]) -> (Vec<u8>, Vec<u8>) {
        match self.algorithm {
            Algorithm::Aes256Cbc => {
                let mut iv = [0u8; IV_SIZE];
                rand::rngs::OsRng.fill_bytes(&mut iv);
                let ciphertext =
                    Encryptor::new(&self.key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
                (iv.to_vec(), ciphertext)
            }
        }
    }

    /// Decrypts `ciphertext` using the given `iv`. Fails if the padding is
    /// invalid (tampered or wrong key) or `iv` is the wrong length.
    pub fn decrypt(&self, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if iv.len() != IV_SIZE {
            return Err(CipherError::InvalidIvLength(iv.len()));
        }
        match self.algorithm {
            Algorithm::Aes256Cbc => {
                let mut iv_fixed = [0u8; IV_SIZE];
                iv_fixed.copy_from_slice(iv);
                Decryptor::new(&self.key.into(), &iv_fixed.into())
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(|_| CipherError::DecryptionFailed)
            }
        }
    }
}
