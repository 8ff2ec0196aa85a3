//! Key Management Service abstraction for the config encryption library
//!
//! The core consumes a KMS through the [`KmsService`] trait: data-key
//! generation for the envelope plugins and direct encrypt/decrypt of small
//! payloads for the direct plugin. Network KMS clients live outside this
//! crate; a static in-process implementation is provided for development
//! and tests.

mod static_kms;

pub use static_kms::StaticKmsService;

/// Well-known default master-key alias, applied by the encryption filter
/// when the caller did not choose a key id and the active KMS version
/// accepts caller-chosen master keys
pub const DEFAULT_KEY_ID: &str = "alias/config/default-key";

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data-key size specification for KMS generate-data-key requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec {
    /// 128-bit data key
    Aes128,
    /// 256-bit data key
    Aes256,
}

impl KeySpec {
    /// Returns the key length in bytes
    pub fn key_len(self) -> usize {
        match self {
            KeySpec::Aes128 => 16,
            KeySpec::Aes256 => 32,
        }
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpec::Aes128 => write!(f, "AES_128"),
            KeySpec::Aes256 => write!(f, "AES_256"),
        }
    }
}

/// Result of a KMS generate-data-key operation
///
/// `plaintext` is the base64-encoded data key and exists only for the
/// duration of one handler call; `encrypted` is the KMS-wrapped blob that
/// is persisted alongside the ciphertext content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataKey {
    #[serde(rename = "plaintextKey")]
    pub plaintext: String,
    #[serde(rename = "encryptedKey")]
    pub encrypted: String,
}

/// Key Management Service interface consumed by the encryption plugins
#[async_trait]
pub trait KmsService: Send + Sync + fmt::Debug {
    /// Generates a data key under the master key identified by `key_id`
    async fn generate_data_key(&self, key_id: &str, spec: KeySpec) -> Result<DataKey>;

    /// Encrypts a small payload under the master key identified by `key_id`
    async fn encrypt(&self, plaintext: &str, key_id: &str) -> Result<String>;

    /// Decrypts a payload previously encrypted by this KMS
    async fn decrypt(&self, ciphertext: &str) -> Result<String>;
}
