//! Authentication DTOs

use serde::{Deserialize, Serialize};

use crate::domain::lookup::Sector;

/// Body of `POST /api/v1/auth/signin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful sign-in response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    /// Token scheme, normally "Bearer"
    #[serde(default)]
    pub tipo: Option<String>,
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    /// Role name (e.g. "ADMIN", "EDITOR")
    #[serde(rename = "rol")]
    pub role: String,
    #[serde(default)]
    pub sector: Option<Sector>,
}
