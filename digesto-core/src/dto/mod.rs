//! Data Transfer Objects
//!
//! Request and response bodies exchanged with the Digesto API that are not
//! domain entities themselves.

pub mod audit;
pub mod auth;
pub mod document;
pub mod lookup;
pub mod user;
