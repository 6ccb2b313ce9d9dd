//! Common type definitions shared across the crate.
//!
//! Entity IDs are short opaque strings generated at create time (see
//! [`crate::crypto::generate_id`]) rather than UUIDs, so they are cheap to
//! embed in tokens and easy to paste into a terminal. Type aliases keep
//! signatures honest about which kind of id they expect:
//!
//! - [`ApiKeyId`]: API key identifier
//! - [`ModelId`]: Model configuration identifier

// Type aliases for IDs
pub type ApiKeyId = String;
pub type ModelId = String;

/// Abbreviate an id to its first 8 characters for more readable logs and traces
pub fn abbrev_id(id: &str) -> String {
    id.chars().take(8).collect()
}
