//! Core types, parsing pipeline, and service wiring for the kerbi bin-day tracker.

/// Heading-text-to-bin-type keyword classification.
pub mod classify;
/// Collection date string parsing.
pub mod dates;
/// Domain models shared by all providers.
pub mod model;
/// Registry and helpers for plugging council-specific providers into the service.
pub mod plugin;
/// Traits describing the provider interfaces.
pub mod ports;
/// Schedule payload sniffing and HTML entry extraction.
pub mod scrape;
/// High-level service facade used by hosts.
pub mod service;

pub use classify::*;
pub use dates::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use scrape::*;
pub use service::*;
