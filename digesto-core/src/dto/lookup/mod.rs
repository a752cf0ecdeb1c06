//! Lookup DTOs

use serde::{Deserialize, Serialize};

/// Body used to create or rename a managed catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
