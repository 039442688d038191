//! Data model for Claude Code session logs and cache snapshots.
//!
//! Session records are deliberately loose: every field is optional and
//! unknown fields are preserved, because the logs carry no enforced schema
//! and aggregation must survive anything that parses as a JSON object.

pub mod cache;
pub mod record;

pub use cache::*;
pub use record::*;
