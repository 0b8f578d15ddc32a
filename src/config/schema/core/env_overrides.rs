use super::Config;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("STREAMGATE_TOKEN").or_else(|_| std::env::var("Token"))
            && !token.is_empty()
        {
            self.token = token;
        }

        if let Ok(key) = std::env::var("STREAMGATE_ENCODING_AES_KEY")
            .or_else(|_| std::env::var("EncodingAESKey"))
            && !key.is_empty()
        {
            self.encoding_aes_key = key;
        }

        if let Ok(receive_id) = std::env::var("STREAMGATE_RECEIVE_ID") {
            self.receive_id = receive_id;
        }

        if let Ok(workspace) = std::env::var("STREAMGATE_WORKSPACE")
            && !workspace.is_empty()
        {
            self.workspace_dir = PathBuf::from(workspace);
        }

        if let Ok(port_str) =
            std::env::var("STREAMGATE_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) =
            std::env::var("STREAMGATE_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(steps_str) = std::env::var("STREAMGATE_MAX_STEPS")
            && let Ok(steps) = steps_str.parse::<u32>()
            && steps > 0
        {
            self.engine.max_steps = steps;
        }
    }
}
