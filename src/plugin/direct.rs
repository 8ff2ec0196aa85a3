use crate::error::Result;
use crate::kms::KmsService;
use crate::plugin::{EncryptionPlugin, HandlerParam, KMS_ALGORITHM};
use async_trait::async_trait;
use std::sync::Arc;

/// Plugin that delegates the entire content to the KMS
///
/// No local data key is derived and no local cipher runs; every value
/// costs a KMS round trip in each direction. Intended for small payloads.
pub struct KmsDirectPlugin {
    kms: Arc<dyn KmsService>,
}

impl KmsDirectPlugin {
    /// Creates a new plugin backed by the given KMS
    pub fn new(kms: Arc<dyn KmsService>) -> Self {
        Self { kms }
    }
}

#[async_trait]
impl EncryptionPlugin for KmsDirectPlugin {
    async fn generate_secret_key(&self, _param: &mut HandlerParam) -> Result<()> {
        Ok(())
    }

    async fn encrypt_secret_key(&self, _param: &mut HandlerParam) -> Result<()> {
        Ok(())
    }

    async fn decrypt_secret_key(&self, _param: &mut HandlerParam) -> Result<()> {
        Ok(())
    }

    async fn encrypt(&self, param: &mut HandlerParam) -> Result<()> {
        if param.content.is_empty() {
            return Ok(());
        }
        param.content = self.kms.encrypt(&param.content, &param.key_id).await?;
        Ok(())
    }

    async fn decrypt(&self, param: &mut HandlerParam) -> Result<()> {
        if param.content.is_empty() {
            return Ok(());
        }
        param.content = self.kms.decrypt(&param.content).await?;
        Ok(())
    }

    fn algorithm_name(&self) -> &str {
        KMS_ALGORITHM
    }
}
