use crate::crypto::{ecb_decrypt, ecb_encrypt, pkcs5_pad, pkcs5_unpad, AES_BLOCK_SIZE};
use crate::error::Result;
use crate::kms::{KeySpec, KmsService};
use crate::plugin::{EncryptionPlugin, HandlerParam, AES_128_ALGORITHM, AES_256_ALGORITHM};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;

/// Shared envelope-encryption strategy
///
/// Both AES envelope plugins are this one behavior parameterized by key
/// spec: derive a data key through the KMS, encrypt content locally with
/// AES-ECB/PKCS5, persist only the wrapped key.
struct EnvelopeCipher {
    kms: Arc<dyn KmsService>,
    spec: KeySpec,
}

impl EnvelopeCipher {
    async fn generate_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        let data_key = self.kms.generate_data_key(&param.key_id, self.spec).await?;
        param.plain_data_key = data_key.plaintext;
        param.encrypted_data_key = data_key.encrypted;
        Ok(())
    }

    async fn encrypt_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        if param.plain_data_key.is_empty() {
            return Ok(());
        }
        param.encrypted_data_key = self.kms.encrypt(&param.plain_data_key, &param.key_id).await?;
        Ok(())
    }

    async fn decrypt_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        if param.encrypted_data_key.is_empty() {
            return Ok(());
        }
        param.plain_data_key = self.kms.decrypt(&param.encrypted_data_key).await?;
        Ok(())
    }

    // Content transforms are local and synchronous; only key material
    // crosses the KMS boundary.
    fn encrypt_content(&self, param: &mut HandlerParam) -> Result<()> {
        if param.content.is_empty() {
            return Ok(());
        }
        let key = STANDARD.decode(&param.plain_data_key)?;
        let padded = pkcs5_pad(param.content.as_bytes(), AES_BLOCK_SIZE);
        let ciphertext = ecb_encrypt(&key, &padded)?;
        param.content = STANDARD.encode(ciphertext);
        Ok(())
    }

    fn decrypt_content(&self, param: &mut HandlerParam) -> Result<()> {
        if param.content.is_empty() {
            return Ok(());
        }
        let key = STANDARD.decode(&param.plain_data_key)?;
        let raw = STANDARD.decode(&param.content)?;
        let decrypted = ecb_decrypt(&key, &raw)?;
        let unpadded = pkcs5_unpad(&decrypted)?;
        param.content = String::from_utf8(unpadded)?;
        Ok(())
    }
}

/// Envelope encryption with a 128-bit data key
pub struct Aes128EnvelopePlugin {
    cipher: EnvelopeCipher,
}

impl Aes128EnvelopePlugin {
    /// Creates a new plugin backed by the given KMS
    pub fn new(kms: Arc<dyn KmsService>) -> Self {
        Self {
            cipher: EnvelopeCipher {
                kms,
                spec: KeySpec::Aes128,
            },
        }
    }
}

#[async_trait]
impl EncryptionPlugin for Aes128EnvelopePlugin {
    async fn generate_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.generate_secret_key(param).await
    }

    async fn encrypt_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.encrypt_secret_key(param).await
    }

    async fn decrypt_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.decrypt_secret_key(param).await
    }

    async fn encrypt(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.encrypt_content(param)
    }

    async fn decrypt(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.decrypt_content(param)
    }

    fn algorithm_name(&self) -> &str {
        AES_128_ALGORITHM
    }
}

/// Envelope encryption with a 256-bit data key
pub struct Aes256EnvelopePlugin {
    cipher: EnvelopeCipher,
}

impl Aes256EnvelopePlugin {
    /// Creates a new plugin backed by the given KMS
    pub fn new(kms: Arc<dyn KmsService>) -> Self {
        Self {
            cipher: EnvelopeCipher {
                kms,
                spec: KeySpec::Aes256,
            },
        }
    }
}

#[async_trait]
impl EncryptionPlugin for Aes256EnvelopePlugin {
    async fn generate_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.generate_secret_key(param).await
    }

    async fn encrypt_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.encrypt_secret_key(param).await
    }

    async fn decrypt_secret_key(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.decrypt_secret_key(param).await
    }

    async fn encrypt(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.encrypt_content(param)
    }

    async fn decrypt(&self, param: &mut HandlerParam) -> Result<()> {
        self.cipher.decrypt_content(param)
    }

    fn algorithm_name(&self) -> &str {
        AES_256_ALGORITHM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kms::StaticKmsService;

    fn test_kms() -> Arc<dyn KmsService> {
        Arc::new(StaticKmsService::new(vec![5u8; 32]))
    }

    #[tokio::test]
    async fn test_generate_secret_key_populates_both_keys() {
        let plugin = Aes128EnvelopePlugin::new(test_kms());
        let mut param = HandlerParam::new("cipher-kms-aes-128-app", "value");
        param.key_id = "alias/test".into();

        plugin
            .generate_secret_key(&mut param)
            .await
            .expect("generate failed");
        assert!(!param.plain_data_key.is_empty());
        assert!(!param.encrypted_data_key.is_empty());
        let key = STANDARD.decode(&param.plain_data_key).expect("key not base64");
        assert_eq!(key.len(), 16);
    }

    #[tokio::test]
    async fn test_encrypt_decrypt_round_trip() {
        let plugins: Vec<Box<dyn EncryptionPlugin>> = vec![
            Box::new(Aes128EnvelopePlugin::new(test_kms())),
            Box::new(Aes256EnvelopePlugin::new(test_kms())),
        ];

        for plugin in plugins {
            let mut param = HandlerParam::new("cipher-kms-aes-app", "hello-world");
            plugin
                .generate_secret_key(&mut param)
                .await
                .expect("generate failed");
            plugin.encrypt(&mut param).await.expect("encrypt failed");
            assert_ne!(param.content, "hello-world");
            assert!(STANDARD.decode(&param.content).is_ok());

            plugin.decrypt(&mut param).await.expect("decrypt failed");
            assert_eq!(param.content, "hello-world");
        }
    }

    #[tokio::test]
    async fn test_empty_content_is_noop() {
        let plugin = Aes256EnvelopePlugin::new(test_kms());
        let mut param = HandlerParam::new("cipher-kms-aes-256-app", "");
        plugin
            .generate_secret_key(&mut param)
            .await
            .expect("generate failed");
        plugin.encrypt(&mut param).await.expect("encrypt failed");
        assert_eq!(param.content, "");
    }

    #[tokio::test]
    async fn test_secret_key_wrap_unwrap() {
        let plugin = Aes256EnvelopePlugin::new(test_kms());
        let mut param = HandlerParam::new("cipher-kms-aes-256-app", "value");
        param.plain_data_key = STANDARD.encode([1u8; 32]);

        plugin
            .encrypt_secret_key(&mut param)
            .await
            .expect("wrap failed");
        assert!(!param.encrypted_data_key.is_empty());

        let plain = param.plain_data_key.clone();
        param.plain_data_key.clear();
        plugin
            .decrypt_secret_key(&mut param)
            .await
            .expect("unwrap failed");
        assert_eq!(param.plain_data_key, plain);
    }

    #[tokio::test]
    async fn test_secret_key_ops_noop_without_material() {
        let plugin = Aes128EnvelopePlugin::new(test_kms());
        let mut param = HandlerParam::new("cipher-kms-aes-128-app", "value");

        plugin
            .encrypt_secret_key(&mut param)
            .await
            .expect("wrap failed");
        assert_eq!(param.encrypted_data_key, "");
        plugin
            .decrypt_secret_key(&mut param)
            .await
            .expect("unwrap failed");
        assert_eq!(param.plain_data_key, "");
    }

    #[tokio::test]
    async fn test_decrypt_rejects_corrupted_base64() {
        let plugin = Aes128EnvelopePlugin::new(test_kms());
        let mut param = HandlerParam::new("cipher-kms-aes-128-app", "not valid base64!!!");
        param.plain_data_key = STANDARD.encode([1u8; 16]);
        assert!(plugin.decrypt(&mut param).await.is_err());
    }
}
