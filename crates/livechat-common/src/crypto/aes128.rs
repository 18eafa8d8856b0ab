//! AES-128 string cipher
//!
//! Encrypts UTF-8 strings with AES-128-ECB + PKCS7 padding and encodes the
//! result as base64. Used to protect chat message content; the key is
//! provisioned externally and must be exactly 16 bytes.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyInit};
use aes::Aes128;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

type Aes128EcbEnc = ecb::Encryptor<Aes128>;
type Aes128EcbDec = ecb::Decryptor<Aes128>;

/// Cipher errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key is not exactly 16 bytes (128 bits)
    #[error("key must be 16 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// Ciphertext is not valid base64
    #[error("ciphertext is not valid base64")]
    InvalidBase64,

    /// Ciphertext length or padding is invalid for the block cipher
    #[error("ciphertext has invalid length or padding")]
    InvalidCiphertext,

    /// Decrypted bytes are not valid UTF-8
    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,
}

/// AES-128 symmetric string cipher
#[derive(Clone)]
pub struct Aes128Cipher {
    key: [u8; 16],
}

impl Aes128Cipher {
    /// Create a cipher from a 16-byte key
    pub fn new(key: &str) -> Result<Self, CryptoError> {
        let bytes = key.as_bytes();
        let key: [u8; 16] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength(bytes.len()))?;
        Ok(Self { key })
    }

    /// Encrypt a plaintext string to base64 ciphertext
    ///
    /// Total for any input string.
    #[must_use]
    pub fn encrypt(&self, plaintext: &str) -> String {
        let encryptor = Aes128EcbEnc::new(&self.key.into());
        let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        BASE64.encode(ciphertext)
    }

    /// Decrypt base64 ciphertext back to the plaintext string
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let raw = BASE64
            .decode(ciphertext)
            .map_err(|_| CryptoError::InvalidBase64)?;
        let decryptor = Aes128EcbDec::new(&self.key.into());
        let plaintext = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&raw)
            .map_err(|_| CryptoError::InvalidCiphertext)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
    }
}

impl std::fmt::Debug for Aes128Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("Aes128Cipher").finish_non_exhaustive()
    }
}
