//! Lookup domain types
//!
//! Small fixed catalogs used to classify documents and users.

use serde::{Deserialize, Serialize};

use crate::table::{SortKey, TableRow};

/// A catalog entry (sector, role, status, type, keyword, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookup {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Lookup {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub type Role = Lookup;
pub type Sector = Lookup;
pub type DocumentStatus = Lookup;
pub type DocumentType = Lookup;
pub type Keyword = Lookup;
pub type UserStatus = Lookup;
pub type JobTitle = Lookup;
pub type Unit = Lookup;

/// The lookup catalogs exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    DocumentType,
    DocumentStatus,
    Sector,
    Role,
    Keyword,
    UserStatus,
    JobTitle,
    Unit,
}

impl LookupKind {
    pub const ALL: [LookupKind; 8] = [
        LookupKind::DocumentType,
        LookupKind::DocumentStatus,
        LookupKind::Sector,
        LookupKind::Role,
        LookupKind::Keyword,
        LookupKind::UserStatus,
        LookupKind::JobTitle,
        LookupKind::Unit,
    ];

    /// API path of this catalog, relative to the base URL
    pub fn path(self) -> &'static str {
        match self {
            LookupKind::DocumentType => "/api/tipos-documento",
            LookupKind::DocumentStatus => "/api/estados-documento",
            LookupKind::Sector => "/api/sectores",
            LookupKind::Role => "/api/roles",
            LookupKind::Keyword => "/api/palabras-clave",
            LookupKind::UserStatus => "/api/estados-usuario",
            LookupKind::JobTitle => "/api/cargos",
            LookupKind::Unit => "/api/unidades",
        }
    }

    /// Whether administrators can create, rename and delete entries
    pub fn is_managed(self) -> bool {
        matches!(self, LookupKind::Sector | LookupKind::Role)
    }

    /// Human-readable catalog name
    pub fn label(self) -> &'static str {
        match self {
            LookupKind::DocumentType => "document types",
            LookupKind::DocumentStatus => "document statuses",
            LookupKind::Sector => "sectors",
            LookupKind::Role => "roles",
            LookupKind::Keyword => "keywords",
            LookupKind::UserStatus => "user statuses",
            LookupKind::JobTitle => "job titles",
            LookupKind::Unit => "units",
        }
    }
}

impl std::str::FromStr for LookupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "type" | "types" | "tipos-documento" => Ok(LookupKind::DocumentType),
            "status" | "statuses" | "estados-documento" => Ok(LookupKind::DocumentStatus),
            "sector" | "sectors" | "sectores" => Ok(LookupKind::Sector),
            "role" | "roles" => Ok(LookupKind::Role),
            "keyword" | "keywords" | "palabras-clave" => Ok(LookupKind::Keyword),
            "user-status" | "user-statuses" | "estados-usuario" => Ok(LookupKind::UserStatus),
            "job-title" | "job-titles" | "cargos" => Ok(LookupKind::JobTitle),
            "unit" | "units" | "unidades" => Ok(LookupKind::Unit),
            other => Err(format!("unknown lookup kind '{}'", other)),
        }
    }
}

impl TableRow for Lookup {
    fn columns() -> &'static [&'static str] {
        &["id", "name"]
    }

    fn cell(&self, column: &str) -> Option<SortKey> {
        match column {
            "id" => Some(SortKey::Number(self.id)),
            "name" => Some(SortKey::text(&self.name)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_json_uses_api_names() {
        let lookup: Lookup =
            serde_json::from_str(r#"{"id": 3, "nombre": "Legales"}"#).unwrap();
        assert_eq!(lookup, Lookup::new(3, "Legales"));

        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "nombre": "Legales"}));
    }

    #[test]
    fn test_only_sectors_and_roles_are_managed() {
        let managed: Vec<_> = LookupKind::ALL
            .iter()
            .filter(|kind| kind.is_managed())
            .collect();
        assert_eq!(managed, vec![&LookupKind::Sector, &LookupKind::Role]);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Sectors".parse::<LookupKind>(), Ok(LookupKind::Sector));
        assert_eq!(
            "tipos-documento".parse::<LookupKind>(),
            Ok(LookupKind::DocumentType)
        );
        assert!("colors".parse::<LookupKind>().is_err());
    }
}
