//! Builder for creating and configuring Assistant instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;

use super::Assistant;
use crate::{
    client::{GeminiClient, ModelClient},
    config::{self, AssistantConfig},
    error::{AssistantError, Result},
    models::Language,
    normalize::IdMinter,
    state::AppState,
};

/// Builder for creating and configuring Assistant instances.
#[derive(Clone, Default)]
pub struct AssistantBuilder {
    config_path: Option<PathBuf>,
    model: Option<String>,
    language: Option<Language>,
    api_key: Option<String>,
    client: Option<Arc<dyn ModelClient>>,
    id_seed: Option<String>,
}

impl AssistantBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom config file path.
    ///
    /// If not specified, uses `$XDG_CONFIG_HOME/wayfinder/config.json` when
    /// it exists and built-in defaults otherwise.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Overrides the model named in the config file.
    pub fn with_model(mut self, model: Option<impl Into<String>>) -> Self {
        if let Some(model) = model {
            self.model = Some(model.into());
        }
        self
    }

    /// Overrides the initial output language.
    pub fn with_language(mut self, language: Option<Language>) -> Self {
        if language.is_some() {
            self.language = language;
        }
        self
    }

    /// Uses this API key instead of reading the environment.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Uses an existing client. No API key is needed then.
    pub fn with_client(mut self, client: Arc<dyn ModelClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Fixes the seed of minted identities, for reproducible output.
    pub fn with_id_seed(mut self, seed: impl Into<String>) -> Self {
        self.id_seed = Some(seed.into());
        self
    }

    /// Resolve the configuration without building a client.
    pub fn resolve_config(&self) -> Result<AssistantConfig> {
        let mut config = AssistantConfig::load(self.config_path.as_deref())?;
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        Ok(config)
    }

    /// Builds the configured assistant.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::FileSystem` or `AssistantError::Serialization`
    /// if an explicit config file cannot be read, and
    /// `AssistantError::Configuration` if no client was given and no API key
    /// is available.
    pub fn build(self) -> Result<Assistant> {
        let config = self.resolve_config()?;
        debug!("Building assistant with model {}", config.model);

        let client: Arc<dyn ModelClient> = match self.client {
            Some(client) => client,
            None => {
                let api_key = self
                    .api_key
                    .or_else(config::api_key_from_env)
                    .ok_or_else(|| AssistantError::Configuration {
                        message: format!("No API key found; set {}", config::API_KEY_VARS.join(" or ")),
                    })?;
                Arc::new(GeminiClient::from_config(&config, api_key)?)
            }
        };

        let (state_ids, ids) = match &self.id_seed {
            Some(seed) => (IdMinter::with_seed(seed.clone()), IdMinter::with_seed(seed.clone())),
            None => (IdMinter::new(), IdMinter::new()),
        };
        let state = AppState::with_minter(config.language, state_ids);
        Ok(Assistant::new(client, state, ids))
    }
}
