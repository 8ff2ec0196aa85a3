//! Plugin registry and encryption dispatch
//!
//! The handler owns the set of registered encryption plugins and
//! orchestrates the generate-key → encrypt and derive-key → decrypt
//! sequences. One handler is constructed at process start and shared by
//! `Arc` across all config operations; the registry is read on every
//! dispatch and written only during registration.

use crate::error::{Error, Result};
use crate::kms::KmsService;
use crate::plugin::{
    Aes128EnvelopePlugin, Aes256EnvelopePlugin, EncryptionPlugin, HandlerParam, KmsDirectPlugin,
    CIPHER_PREFIX,
};
use metrics::{counter, histogram};
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Dispatches config values to the encryption plugin matching their data id
pub struct EncryptionHandler {
    /// Registered plugins in registration order; order is the tie-break
    /// for equal-length name matches
    plugins: RwLock<Vec<Arc<dyn EncryptionPlugin>>>,
}

impl Default for EncryptionHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EncryptionHandler {
    /// Creates a handler with an empty registry
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(Vec::new()),
        }
    }

    /// Creates a handler with the three built-in plugins registered
    /// against the given KMS
    pub fn with_default_plugins(kms: Arc<dyn KmsService>) -> Self {
        let handler = Self::new();
        handler.register_plugin(Arc::new(KmsDirectPlugin::new(kms.clone())));
        handler.register_plugin(Arc::new(Aes128EnvelopePlugin::new(kms.clone())));
        handler.register_plugin(Arc::new(Aes256EnvelopePlugin::new(kms)));
        handler
    }

    /// Registers a plugin under its algorithm name
    ///
    /// Re-registration under an existing name replaces the previous plugin
    /// in place; the replacement keeps the original's registration rank.
    /// Callers must not rely on tie order between equal-length names.
    pub fn register_plugin(&self, plugin: Arc<dyn EncryptionPlugin>) {
        let mut plugins = self.plugins.write().expect("plugin registry lock poisoned");
        let name = plugin.algorithm_name().to_string();
        if let Some(existing) = plugins
            .iter_mut()
            .find(|p| p.algorithm_name() == name)
        {
            log::warn!("replacing registered encryption plugin: {}", name);
            *existing = plugin;
        } else {
            log::debug!("registered encryption plugin: {}", name);
            plugins.push(plugin);
        }
    }

    /// Encrypts the parameter's content in place
    ///
    /// A data id without the cipher prefix, or empty content, is a
    /// deliberate no-op: the parameter is returned unchanged with no
    /// error. An empty data id is an error.
    pub async fn encrypt(&self, param: &mut HandlerParam) -> Result<()> {
        if !self.check_param(param)? {
            return Ok(());
        }
        let start = Instant::now();
        counter!("cel.handler.encrypt", 1);

        let plugin = self.find_plugin(&param.data_id)?;
        plugin.generate_secret_key(param).await?;
        plugin.encrypt(param).await?;

        histogram!("cel.handler.encrypt.time", start.elapsed());
        Ok(())
    }

    /// Decrypts the parameter's content in place
    ///
    /// Validation mirrors [`encrypt`](Self::encrypt); the data key is
    /// recovered from `encrypted_data_key` through the KMS before the
    /// plugin's decrypt runs.
    pub async fn decrypt(&self, param: &mut HandlerParam) -> Result<()> {
        if !self.check_param(param)? {
            return Ok(());
        }
        let start = Instant::now();
        counter!("cel.handler.decrypt", 1);

        let plugin = self.find_plugin(&param.data_id)?;
        plugin.decrypt_secret_key(param).await?;
        plugin.decrypt(param).await?;

        histogram!("cel.handler.decrypt.time", start.elapsed());
        Ok(())
    }

    // Returns false for the two documented skip cases, an error for an
    // empty data id, true when encryption applies.
    fn check_param(&self, param: &HandlerParam) -> Result<bool> {
        if param.data_id.is_empty() {
            return Err(Error::InvalidArgument("data id must not be empty".into()));
        }
        if !param.data_id.contains(CIPHER_PREFIX) || param.content.is_empty() {
            log::debug!("encryption not applicable for data id: {}", param.data_id);
            return Ok(false);
        }
        Ok(true)
    }

    // Longest algorithm name that is a substring of the data id wins;
    // ties go to the first registered. The Arc is cloned out so no lock
    // is held across the KMS round trip.
    fn find_plugin(&self, data_id: &str) -> Result<Arc<dyn EncryptionPlugin>> {
        let plugins = self.plugins.read().expect("plugin registry lock poisoned");
        let mut best: Option<&Arc<dyn EncryptionPlugin>> = None;
        for plugin in plugins.iter() {
            let name = plugin.algorithm_name();
            if !data_id.contains(name) {
                continue;
            }
            match best {
                Some(b) if name.len() <= b.algorithm_name().len() => {}
                _ => best = Some(plugin),
            }
        }
        best.cloned()
            .ok_or_else(|| Error::PluginNotFound(data_id.to_string()))
    }
}

impl std::fmt::Debug for EncryptionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .plugins
            .read()
            .expect("plugin registry lock poisoned")
            .iter()
            .map(|p| p.algorithm_name().to_string())
            .collect();
        f.debug_struct("EncryptionHandler")
            .field("plugins", &names)
            .finish()
    }
}
