//! Streaming rich-content resolution and markdown rendering for chat
//! surfaces: accumulate model output chunk by chunk, render each partial
//! state safely, then classify the completed message as prose or as one of
//! a closed set of typed payloads.

pub mod classify;
pub mod dispatch;
pub mod errors;
pub mod models;
pub mod render;
pub mod stream;
