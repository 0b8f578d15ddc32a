mod attachments;
mod core;
mod engine;
mod gateway;

pub use attachments::AttachmentConfig;
pub use core::Config;
pub use engine::EngineConfig;
pub use gateway::GatewayConfig;
