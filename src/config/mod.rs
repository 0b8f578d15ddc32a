pub mod schema;

pub use schema::{AttachmentConfig, Config, EngineConfig, GatewayConfig};
