//! # CareBridge Core
//!
//! Domain types, traits, and error definitions for the CareBridge
//! conversation bridge. This crate has **zero framework dependencies**; it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The LLM backend is defined as a trait here ([`Provider`]). Implementations
//! live in `carebridge-providers`. This enables:
//! - Swapping backends via configuration
//! - Easy testing with scripted stub providers
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod persona;
pub mod provider;
pub mod summary;

// Re-export key types at crate root for ergonomics
pub use error::{Error, GatewayError, ParseError, Result, SelectorError, SelectorField};
pub use message::{Message, Role};
pub use persona::{Audience, ConditionId, LanguageCode, PersonaKey};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use summary::SummaryResult;
