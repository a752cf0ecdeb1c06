//! Digesto Core
//!
//! Core types and front-end logic for the Digesto document-management console.
//!
//! This crate contains:
//! - Domain types: entities mirrored from the Digesto API (Document, User, lookups)
//! - DTOs: request/response bodies exchanged with the API
//! - Auth: session construction and view guards
//! - Forms: document and user forms, including keyword/reference chip editing
//! - Table: client-side filtering, sorting and pagination
//!
//! Nothing here performs I/O; the HTTP layer lives in `digesto-client`.

pub mod auth;
pub mod domain;
pub mod dto;
pub mod form;
pub mod notice;
pub mod search;
pub mod table;
