use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 3000)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Allow binding to non-localhost (default: false)
    #[serde(default)]
    pub allow_public_bind: bool,
    /// Route prefix for the callback endpoints; the bot id is appended
    #[serde(default = "default_callback_prefix")]
    pub callback_prefix: String,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_callback_prefix() -> String {
    "/callback".into()
}

impl GatewayConfig {
    /// Prefix with exactly one leading slash and no trailing slash.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.callback_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            allow_public_bind: false,
            callback_prefix: default_callback_prefix(),
        }
    }
}
