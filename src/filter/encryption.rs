use crate::error::Result;
use crate::filter::{ConfigFilter, ConfigParam, Usage};
use crate::handler::EncryptionHandler;
use crate::plugin::HandlerParam;
use async_trait::async_trait;
use std::sync::Arc;
use zeroize::Zeroize;

/// Name of the built-in encryption filter
pub const ENCRYPTION_FILTER_NAME: &str = "encryption";

/// Filter adapting config operations to the encryption handler
///
/// On the publish path the content is encrypted and the wrapped data key
/// copied back onto the parameter for persistence; on the fetch path the
/// content is decrypted in place. The transient plaintext data key is
/// wiped before the filter returns, error or not.
pub struct EncryptionFilter {
    handler: Arc<EncryptionHandler>,
    /// Master key applied when the caller did not choose one; `None` when
    /// the active KMS version does not accept caller-chosen master keys
    default_key_id: Option<String>,
    order: usize,
}

impl EncryptionFilter {
    /// Creates the filter with order 0
    pub fn new(handler: Arc<EncryptionHandler>, default_key_id: Option<String>) -> Self {
        Self {
            handler,
            default_key_id,
            order: 0,
        }
    }

    /// Overrides the filter's position in the chain
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }
}

#[async_trait]
impl ConfigFilter for EncryptionFilter {
    async fn do_filter(&self, param: &mut ConfigParam) -> Result<()> {
        match param.usage {
            Usage::Request => {
                let mut handler_param = HandlerParam::new(&param.data_id, &param.content);
                handler_param.key_id = if param.key_id.is_empty() {
                    self.default_key_id.clone().unwrap_or_default()
                } else {
                    param.key_id.clone()
                };

                let result = self.handler.encrypt(&mut handler_param).await;
                handler_param.plain_data_key.zeroize();
                result?;

                param.content = std::mem::take(&mut handler_param.content);
                param.encrypted_data_key = std::mem::take(&mut handler_param.encrypted_data_key);
            }
            Usage::Response => {
                let mut handler_param = HandlerParam::new(&param.data_id, &param.content);
                handler_param.key_id = param.key_id.clone();
                handler_param.encrypted_data_key = param.encrypted_data_key.clone();

                let result = self.handler.decrypt(&mut handler_param).await;
                handler_param.plain_data_key.zeroize();
                result?;

                param.content = std::mem::take(&mut handler_param.content);
            }
        }
        Ok(())
    }

    fn order(&self) -> usize {
        self.order
    }

    fn name(&self) -> &str {
        ENCRYPTION_FILTER_NAME
    }
}
