use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use std::path::Path;

use super::BatchprocConfig;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "BATCHPROC_";

impl BatchprocConfig {
    /// Load defaults, user and repository files, and environment overrides
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    /// Load configuration, replacing user and repository files with
    /// `custom_config` when one is given
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !custom_path.exists() {
                bail!("config file not found: {}", custom_path.display());
            }
            figment = match custom_path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user_base = Self::user_config_base_path();
            figment = figment
                .merge(Toml::file(format!("{user_base}.toml")))
                .merge(Json::file(format!("{user_base}.json")))
                .merge(Yaml::file(format!("{user_base}.yaml")))
                .merge(Yaml::file(format!("{user_base}.yml")))
                .merge(Toml::file("batchproc.toml"))
                .merge(Json::file("batchproc.json"))
                .merge(Yaml::file("batchproc.yaml"))
                .merge(Yaml::file("batchproc.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: BatchprocConfig = figment
            .extract()
            .context("failed to parse batchproc configuration")?;
        config.validate()?;

        tracing::trace!(?config, "CONFIG LOAD: Done");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let percentage = self.dispatch.thread_percentage;
        if !(1..=100).contains(&percentage) {
            bail!("dispatch.thread_percentage must be between 1 and 100, got {percentage}");
        }
        Ok(())
    }

    /// Render the merged configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }

    fn user_config_base_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/batchproc/config"),
            Err(_) => "~/.config/batchproc/config".to_string(),
        }
    }
}
