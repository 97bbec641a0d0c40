//! The CareBridge conversation bridge.
//!
//! Turns a caller's conversation history plus a persona selector into one
//! LLM round-trip, and turns a history into a structured summary.
//!
//! Pipeline:
//!
//! 1. [`normalize`]: canonicalize the selector and validate message shape
//! 2. persona lookup: [`carebridge_persona::PersonaCatalog`]
//! 3. [`assembler`]: build the outbound message sequence
//! 4. provider round-trip: any [`carebridge_core::Provider`]
//! 5. [`summary`]: parse summary output (summary turns only)
//!
//! [`ConversationBridge`] runs the pipeline.

pub mod assembler;
pub mod normalize;
pub mod request;
pub mod service;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use request::{BridgeRequest, RawMessage};
pub use service::ConversationBridge;
pub use summary::SummaryExtractor;
