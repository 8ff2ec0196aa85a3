//! Encryption plugins for the config encryption library
//!
//! A plugin is a stateless encryption strategy named by its algorithm
//! identifier. The algorithm names double as the naming convention on
//! configuration identifiers: a data id that should be encrypted carries
//! the cipher prefix, and the most specific (longest) registered algorithm
//! name found in the data id selects the plugin.

mod direct;
mod envelope;

pub use direct::KmsDirectPlugin;
pub use envelope::{Aes128EnvelopePlugin, Aes256EnvelopePlugin};

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Prefix token marking a configuration identifier as encrypted
pub const CIPHER_PREFIX: &str = "cipher-";

/// Algorithm name of the direct-KMS plugin (the bare prefix token)
pub const KMS_ALGORITHM: &str = "cipher";

/// Algorithm name of the AES-128 envelope plugin
pub const AES_128_ALGORITHM: &str = "cipher-kms-aes-128";

/// Algorithm name of the AES-256 envelope plugin
pub const AES_256_ALGORITHM: &str = "cipher-kms-aes-256";

/// Per-call parameter record passed through the encryption handler
///
/// One value lives for exactly one handler call. `plain_data_key` is
/// populated once per call, by key generation on the encrypt path or by
/// KMS unwrap of `encrypted_data_key` on the decrypt path, and must never
/// be persisted.
#[derive(Clone, Default)]
pub struct HandlerParam {
    /// Configuration identifier; encryption applies only when it carries
    /// the cipher prefix
    pub data_id: String,
    /// Configuration value; plaintext on the way in, ciphertext on the way
    /// out (and vice versa)
    pub content: String,
    /// KMS-wrapped data key, persisted alongside the content
    pub encrypted_data_key: String,
    /// Base64 data key material, transient
    pub plain_data_key: String,
    /// Master key reference held by the KMS, may be defaulted
    pub key_id: String,
}

impl HandlerParam {
    /// Creates a parameter for the given data id and content
    pub fn new(data_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            data_id: data_id.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for HandlerParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // plain_data_key is key material and stays out of Debug output
        f.debug_struct("HandlerParam")
            .field("data_id", &self.data_id)
            .field("content", &self.content)
            .field("encrypted_data_key", &self.encrypted_data_key)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Encryption strategy dispatched by algorithm name
///
/// All operations mutate the passed [`HandlerParam`] in place and are
/// invoked by the handler in a fixed sequence: key
/// generation/derivation first, then content transformation.
#[async_trait]
pub trait EncryptionPlugin: Send + Sync {
    /// Populates `plain_data_key` (and `encrypted_data_key` where the
    /// strategy wraps keys) with fresh key material
    async fn generate_secret_key(&self, param: &mut HandlerParam) -> Result<()>;

    /// Wraps `plain_data_key` through the KMS into `encrypted_data_key`;
    /// no-op when there is no plaintext key
    async fn encrypt_secret_key(&self, param: &mut HandlerParam) -> Result<()>;

    /// Unwraps `encrypted_data_key` through the KMS into `plain_data_key`;
    /// no-op when there is no wrapped key
    async fn decrypt_secret_key(&self, param: &mut HandlerParam) -> Result<()>;

    /// Replaces `content` with its ciphertext; no-op on empty content
    async fn encrypt(&self, param: &mut HandlerParam) -> Result<()>;

    /// Replaces `content` with its plaintext; no-op on empty content
    async fn decrypt(&self, param: &mut HandlerParam) -> Result<()>;

    /// Unique algorithm identifier of this plugin
    fn algorithm_name(&self) -> &str;
}
