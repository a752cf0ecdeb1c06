//! Document DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Keyword as sent on create/update: existing catalog entries carry their id,
/// free-text keywords only a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Body of document create (`POST`) and update (`PUT`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "fechaCreacion")]
    pub created_on: NaiveDate,
    #[serde(rename = "resumen", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "tipoId")]
    pub type_id: i64,
    #[serde(rename = "sectorId")]
    pub sector_id: i64,
    #[serde(rename = "estadoId")]
    pub status_id: i64,
    #[serde(rename = "palabrasClave")]
    pub keywords: Vec<KeywordRef>,
    #[serde(rename = "referenciaIds")]
    pub reference_ids: Vec<i64>,
    #[serde(rename = "archivoIds")]
    pub file_ids: Vec<i64>,
}
