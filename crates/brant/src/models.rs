//! Core data types: chunk payloads arriving from a transport, rich content
//! envelopes, and the resolved messages the engine hands back.

pub mod content;
pub mod message;
pub mod role;
pub mod source;

pub use content::{RichContent, RichContentKind};
pub use message::{ChunkPayload, Message, MessageContent};
pub use role::Role;
pub use source::GroundingSource;
