//! User domain types

use serde::{Deserialize, Serialize};

use super::lookup::{JobTitle, Role, Sector, UserStatus};
use crate::table::{SortKey, TableRow};

/// A console user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "estado")]
    pub status: UserStatus,
    pub sector: Sector,
    #[serde(rename = "cargo", default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<JobTitle>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl TableRow for User {
    fn columns() -> &'static [&'static str] {
        &["name", "email", "role", "sector", "status"]
    }

    fn cell(&self, column: &str) -> Option<SortKey> {
        match column {
            "name" => Some(SortKey::Text(self.full_name())),
            "email" => Some(SortKey::text(&self.email)),
            "role" => Some(SortKey::text(&self.role.name)),
            "sector" => Some(SortKey::text(&self.sector.name)),
            "status" => Some(SortKey::text(&self.status.name)),
            _ => None,
        }
    }
}
