pub mod gateway;
pub mod message;
pub mod stream;

pub use gateway::{run_gateway, run_gateway_with_listener};
pub use message::{InboundMessage, MessageBody, Sender};
pub use stream::{MessageItem, StreamBody, StreamEnvelope};
