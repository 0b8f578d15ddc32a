use super::super::{AttachmentConfig, EngineConfig, GatewayConfig};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Signing token shared with the platform
    #[serde(default)]
    pub token: String,
    /// 43-char base64 encoding key (decodes to 32 bytes)
    #[serde(default)]
    pub encoding_aes_key: String,
    /// Recipient id bound into callback envelopes; empty for an unscoped bot
    #[serde(default)]
    pub receive_id: String,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub attachments: AttachmentConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let streamgate_dir = home.join(".streamgate");

        Self {
            workspace_dir: streamgate_dir.join("workspace"),
            config_path: streamgate_dir.join("config.toml"),
            token: String::new(),
            encoding_aes_key: String::new(),
            receive_id: String::new(),
            gateway: GatewayConfig::default(),
            engine: EngineConfig::default(),
            attachments: AttachmentConfig::default(),
        }
    }
}
