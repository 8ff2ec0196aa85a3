//! Ordered filter chain applied to config publish and fetch operations
//!
//! Filters are named pipeline stages kept in ascending order; the name is
//! a uniqueness key across the whole chain. The encryption filter is one
//! such stage, adapting the generic config parameter to the encryption
//! handler.

mod encryption;

pub use encryption::{EncryptionFilter, ENCRYPTION_FILTER_NAME};

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Direction of the config operation carried by a [`ConfigParam`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    /// Publish path: content is plaintext and will be encrypted
    Request,
    /// Fetch path: content is ciphertext and will be decrypted
    Response,
}

/// Config operation parameter flowing through the filter chain
///
/// `encrypted_data_key` must round-trip alongside the ciphertext content
/// in the caller's persistence and transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigParam {
    #[serde(rename = "dataId")]
    pub data_id: String,
    pub content: String,
    pub usage: Usage,
    #[serde(rename = "keyId", default)]
    pub key_id: String,
    #[serde(rename = "encryptedDataKey", default)]
    pub encrypted_data_key: String,
}

impl ConfigParam {
    /// Creates a publish-direction parameter
    pub fn request(data_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            data_id: data_id.into(),
            content: content.into(),
            usage: Usage::Request,
            key_id: String::new(),
            encrypted_data_key: String::new(),
        }
    }

    /// Creates a fetch-direction parameter
    pub fn response(data_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            usage: Usage::Response,
            ..Self::request(data_id, content)
        }
    }
}

/// Named, ordered pipeline stage
#[async_trait]
pub trait ConfigFilter: Send + Sync {
    /// Processes the parameter in place
    async fn do_filter(&self, param: &mut ConfigParam) -> Result<()>;

    /// Position in the chain; lower runs first
    fn order(&self) -> usize;

    /// Unique name of this filter within a chain
    fn name(&self) -> &str;
}

/// Ordered, name-unique sequence of filters
pub struct FilterChain {
    filters: RwLock<Vec<Arc<dyn ConfigFilter>>>,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterChain {
    /// Creates an empty chain
    pub fn new() -> Self {
        Self {
            filters: RwLock::new(Vec::new()),
        }
    }

    /// Inserts a filter at the position given by its order
    ///
    /// Insertion is stable: among equal orders, earlier registration runs
    /// first. If a filter with the same name already exists anywhere in
    /// the chain the call is a silent no-op and the existing entry wins.
    pub fn add_filter(&self, filter: Arc<dyn ConfigFilter>) {
        let mut filters = self.filters.write().expect("filter chain lock poisoned");
        if filters.iter().any(|f| f.name() == filter.name()) {
            log::debug!("filter already registered, ignoring: {}", filter.name());
            return;
        }
        let pos = filters
            .iter()
            .position(|f| f.order() > filter.order())
            .unwrap_or(filters.len());
        filters.insert(pos, filter);
    }

    /// Runs every filter in ascending order
    ///
    /// Aborts on the first error; later filters do not run.
    pub async fn do_filters(&self, param: &mut ConfigParam) -> Result<()> {
        // Snapshot under the read lock; the chain is not held across awaits.
        let filters: Vec<Arc<dyn ConfigFilter>> = self
            .filters
            .read()
            .expect("filter chain lock poisoned")
            .clone();
        for filter in filters {
            filter.do_filter(param).await?;
        }
        Ok(())
    }

    /// Runs exactly the named filter
    pub async fn do_filter_by_name(&self, param: &mut ConfigParam, name: &str) -> Result<()> {
        let filter = self
            .filters
            .read()
            .expect("filter chain lock poisoned")
            .iter()
            .find(|f| f.name() == name)
            .cloned();
        match filter {
            Some(filter) => filter.do_filter(param).await,
            None => Err(Error::FilterNotFound(name.to_string())),
        }
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .filters
            .read()
            .expect("filter chain lock poisoned")
            .iter()
            .map(|filter| filter.name().to_string())
            .collect();
        f.debug_struct("FilterChain").field("filters", &names).finish()
    }
}
