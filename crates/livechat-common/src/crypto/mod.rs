//! Symmetric message cipher

mod aes128;

pub use aes128::{Aes128Cipher, CryptoError};
