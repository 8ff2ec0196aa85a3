//! # Config Encryption Library
//!
//! `configencryption` lets a configuration-management client transparently
//! encrypt configuration values before they leave the process and decrypt
//! them after retrieval, using pluggable envelope-encryption strategies
//! keyed off a naming convention on the configuration identifier.
//!
//! A data id carrying the `cipher-` prefix selects an encryption plugin by
//! longest-substring match over the registered algorithm names. The
//! built-in envelope plugins (`cipher-kms-aes-128`, `cipher-kms-aes-256`)
//! derive a per-value data key through a KMS and encrypt the content
//! locally with AES-ECB/PKCS5; the direct plugin (bare `cipher`) sends the
//! whole content through the KMS. The KMS-wrapped data key travels
//! alongside the ciphertext in the caller's persistence layer; the
//! plaintext data key never leaves a single handler call.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use configencryption::filter::{ConfigParam, EncryptionFilter, FilterChain};
//! use configencryption::handler::EncryptionHandler;
//! use configencryption::kms::{StaticKmsService, DEFAULT_KEY_ID};
//! use std::sync::Arc;
//!
//! # async fn example() -> configencryption::Result<()> {
//! // Construct the long-lived objects once at process start
//! let kms = Arc::new(StaticKmsService::new(vec![0u8; 32]));
//! let handler = Arc::new(EncryptionHandler::with_default_plugins(kms));
//!
//! let chain = FilterChain::new();
//! chain.add_filter(Arc::new(EncryptionFilter::new(
//!     handler,
//!     Some(DEFAULT_KEY_ID.to_string()),
//! )));
//!
//! // Publish path: content is encrypted, the wrapped data key comes back
//! let mut publish = ConfigParam::request("cipher-kms-aes-256-myApp", "db-password");
//! chain.do_filters(&mut publish).await?;
//!
//! // Fetch path: ciphertext and wrapped key go in, plaintext comes out
//! let mut fetch = ConfigParam::response("cipher-kms-aes-256-myApp", publish.content.clone());
//! fetch.encrypted_data_key = publish.encrypted_data_key.clone();
//! chain.do_filters(&mut fetch).await?;
//! assert_eq!(fetch.content, "db-password");
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
pub mod filter;
pub mod handler;
pub mod kms;
pub mod plugin;
pub mod util;

// Re-export key types
pub use crate::error::{Error, Result};
pub use crate::filter::{
    ConfigFilter, ConfigParam, EncryptionFilter, FilterChain, Usage, ENCRYPTION_FILTER_NAME,
};
pub use crate::handler::EncryptionHandler;
pub use crate::kms::{DataKey, KeySpec, KmsService, StaticKmsService, DEFAULT_KEY_ID};
pub use crate::plugin::{
    Aes128EnvelopePlugin, Aes256EnvelopePlugin, EncryptionPlugin, HandlerParam, KmsDirectPlugin,
    AES_128_ALGORITHM, AES_256_ALGORITHM, CIPHER_PREFIX, KMS_ALGORITHM,
};
