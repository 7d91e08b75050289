//! Completion pipeline: remote chat-completions client, bounded history
//! windowing, and the deterministic local responder used when the provider
//! is unreachable.

pub mod client;
pub mod fallback;
pub mod pipeline;

pub use client::{
    ChatRole, ChatTurn, CompletionClient, CompletionRequest, HttpCompletionClient, encode_image,
};
pub use fallback::{FALLBACK_RULES, FallbackRule, local_reply};
pub use pipeline::{
    CompletionPipeline, HISTORY_WINDOW, HISTORY_WINDOW_WITH_IMAGE, VISION_MODEL,
};
