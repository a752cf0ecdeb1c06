//! Document domain types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lookup::{DocumentStatus, DocumentType, Keyword, Sector};
use crate::table::{SortKey, TableRow};

/// An institutional document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "fechaCreacion")]
    pub created_on: NaiveDate,
    #[serde(rename = "resumen", default)]
    pub summary: Option<String>,
    #[serde(rename = "tipo")]
    pub doc_type: DocumentType,
    pub sector: Sector,
    #[serde(rename = "estado")]
    pub status: DocumentStatus,
    #[serde(rename = "archivos", default)]
    pub files: Vec<DocumentFile>,
    #[serde(rename = "palabrasClave", default)]
    pub keywords: Vec<Keyword>,
    #[serde(rename = "referencias", default)]
    pub references: Vec<DocumentReference>,
}

impl Document {
    /// Short label used in lists and chips ("number - title")
    pub fn label(&self) -> String {
        format!("{} - {}", self.number, self.title)
    }

    /// Reference to this document, as stored in another document's chips
    pub fn as_reference(&self) -> DocumentReference {
        DocumentReference {
            id: self.id,
            number: self.number.clone(),
            title: self.title.clone(),
        }
    }
}

/// A file attached to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Cross-reference from one document to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub id: i64,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "titulo")]
    pub title: String,
}

impl std::fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.number, self.title)
    }
}

impl TableRow for Document {
    fn columns() -> &'static [&'static str] {
        &["number", "title", "date", "type", "sector", "status"]
    }

    fn cell(&self, column: &str) -> Option<SortKey> {
        match column {
            "number" => Some(SortKey::text(&self.number)),
            "title" => Some(SortKey::text(&self.title)),
            "date" => Some(SortKey::Date(self.created_on)),
            "type" => Some(SortKey::text(&self.doc_type.name)),
            "sector" => Some(SortKey::text(&self.sector.name)),
            "status" => Some(SortKey::text(&self.status.name)),
            _ => None,
        }
    }
}
