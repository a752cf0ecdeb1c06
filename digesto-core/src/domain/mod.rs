//! Core domain types
//!
//! Entities mirrored verbatim from the Digesto API. The backend owns their
//! lifecycle; the console only holds transient copies fetched on demand.
//!
//! JSON field names follow the API (Spanish camelCase) and are mapped onto
//! English Rust names with `serde(rename)`.

pub mod audit;
pub mod document;
pub mod lookup;
pub mod user;
