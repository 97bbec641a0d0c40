//! Persona and summary instruction catalogs for CareBridge.
//!
//! The catalog maps `(language, condition, audience)` to a ready-to-send
//! system instruction, and each language to its summary templates. It is
//! built once at startup from a TOML definition, validated complete, and
//! read-only afterwards, so it can be shared behind an `Arc` by any number
//! of concurrent requests.

pub mod catalog;
pub mod definition;
pub mod error;

pub use catalog::{PersonaCatalog, SummaryFormat};
pub use definition::CatalogDefinition;
pub use error::CatalogError;

/// The catalog definition compiled into the binary.
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/default.toml");
