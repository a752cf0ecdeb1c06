//! User DTOs

use serde::{Deserialize, Serialize};

/// Body of user create (`POST`) and update (`PUT`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    /// Omitted on update to keep the current password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "rolId")]
    pub role_id: i64,
    #[serde(rename = "sectorId")]
    pub sector_id: i64,
    #[serde(rename = "cargoId", skip_serializing_if = "Option::is_none")]
    pub job_title_id: Option<i64>,
    #[serde(rename = "estadoId", skip_serializing_if = "Option::is_none")]
    pub status_id: Option<i64>,
}

/// Body of `PUT /api/v1/usuarios/{id}/estado`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusUpdate {
    #[serde(rename = "estadoId")]
    pub status_id: i64,
}
