use super::Config;
use crate::error::ConfigError;
use crate::security::{AesKey, CryptoMaterial};
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(".streamgate"))
    }

    /// Load `config.toml` from `streamgate_dir`, writing defaults on first run.
    pub fn load_or_init_in(streamgate_dir: &Path) -> Result<Self> {
        let config_path = streamgate_dir.join("config.toml");
        let workspace_dir = streamgate_dir.join("workspace");

        if !workspace_dir.exists() {
            fs::create_dir_all(&workspace_dir).context("Failed to create workspace directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| ConfigError::Load(e.to_string()))
                .context("Failed to parse config file")?;
            config.config_path = config_path;
            config.workspace_dir = workspace_dir;
            Ok(config)
        } else {
            let config = Self {
                config_path,
                workspace_dir,
                ..Self::default()
            };
            config.save()?;
            tracing::info!(path = %config.config_path.display(), "wrote default config");
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Reject configs the gateway cannot serve with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Validation("token must not be empty".into()));
        }
        AesKey::from_base64(&self.encoding_aes_key)
            .map_err(|e| ConfigError::Validation(format!("encoding_aes_key: {e}")))?;
        if self.engine.max_steps == 0 {
            return Err(ConfigError::Validation(
                "engine.max_steps must be at least 1".into(),
            ));
        }
        if self.engine.id_length == 0 {
            return Err(ConfigError::Validation(
                "engine.id_length must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn crypto_material(&self) -> Result<CryptoMaterial, ConfigError> {
        CryptoMaterial::new(
            self.token.trim(),
            self.encoding_aes_key.trim(),
            self.receive_id.as_str(),
        )
        .map_err(|e| ConfigError::Validation(format!("encoding_aes_key: {e}")))
    }
}
