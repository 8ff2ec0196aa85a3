use crate::crypto::{ecb_decrypt, ecb_encrypt, pkcs5_pad, pkcs5_unpad, AES_BLOCK_SIZE};
use crate::error::Result;
use crate::kms::{DataKey, KeySpec, KmsService};
use crate::util;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;

/// A static key management service for development and testing
///
/// This implementation wraps data keys and payloads with a static master
/// key held in process memory. It exercises the same block-cipher engine
/// as the envelope plugins, which is useful for tests, but offers none of
/// the protections of a real KMS and should not be used in production.
pub struct StaticKmsService {
    /// The static master key, 16 or 32 bytes
    master_key: Vec<u8>,
}

impl StaticKmsService {
    /// Creates a new StaticKmsService with the given master key
    pub fn new(master_key: Vec<u8>) -> Self {
        Self { master_key }
    }
}

impl fmt::Debug for StaticKmsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose key material through Debug output
        f.debug_struct("StaticKmsService").finish_non_exhaustive()
    }
}

#[async_trait]
impl KmsService for StaticKmsService {
    async fn generate_data_key(&self, key_id: &str, spec: KeySpec) -> Result<DataKey> {
        let key_bytes = util::get_rand_bytes(spec.key_len());
        let plaintext = STANDARD.encode(&key_bytes);

        // The wrapped form is the encryption of the base64 text, so
        // decrypt() recovers exactly the string handed out here.
        let encrypted = self.encrypt(&plaintext, key_id).await?;

        Ok(DataKey {
            plaintext,
            encrypted,
        })
    }

    async fn encrypt(&self, plaintext: &str, _key_id: &str) -> Result<String> {
        let padded = pkcs5_pad(plaintext.as_bytes(), AES_BLOCK_SIZE);
        let ciphertext = ecb_encrypt(&self.master_key, &padded)?;
        Ok(STANDARD.encode(ciphertext))
    }

    async fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let raw = STANDARD.decode(ciphertext)?;
        let decrypted = ecb_decrypt(&self.master_key, &raw)?;
        let unpadded = pkcs5_unpad(&decrypted)?;
        Ok(String::from_utf8(unpadded)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encrypt_decrypt_round_trip() {
        let kms = StaticKmsService::new(vec![9u8; 32]);
        let ciphertext = kms
            .encrypt("some-config-value", "alias/test")
            .await
            .expect("encrypt failed");
        assert_ne!(ciphertext, "some-config-value");
        let plaintext = kms.decrypt(&ciphertext).await.expect("decrypt failed");
        assert_eq!(plaintext, "some-config-value");
    }

    #[tokio::test]
    async fn test_generate_data_key_unwraps_to_same_plaintext() {
        let kms = StaticKmsService::new(vec![3u8; 16]);
        let data_key = kms
            .generate_data_key("alias/test", KeySpec::Aes128)
            .await
            .expect("generate failed");

        let key_bytes = STANDARD.decode(&data_key.plaintext).expect("not base64");
        assert_eq!(key_bytes.len(), 16);

        let unwrapped = kms.decrypt(&data_key.encrypted).await.expect("decrypt failed");
        assert_eq!(unwrapped, data_key.plaintext);
    }

    #[tokio::test]
    async fn test_key_spec_sizes() {
        let kms = StaticKmsService::new(vec![3u8; 16]);
        for (spec, len) in [(KeySpec::Aes128, 16), (KeySpec::Aes256, 32)] {
            let data_key = kms
                .generate_data_key("alias/test", spec)
                .await
                .expect("generate failed");
            let key_bytes = STANDARD.decode(&data_key.plaintext).unwrap();
            assert_eq!(key_bytes.len(), len);
        }
    }

    #[tokio::test]
    async fn test_bad_master_key_surfaces_error() {
        let kms = StaticKmsService::new(vec![0u8; 24]);
        assert!(kms.encrypt("x", "alias/test").await.is_err());
    }
}
