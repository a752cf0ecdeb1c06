//! Document search filters
//!
//! The same filter drives the server-side search endpoint (`to_query`) and
//! the local narrowing of the browse list (`matches`).

use chrono::NaiveDate;

use crate::domain::document::Document;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    /// Free text matched against number, title and summary
    pub text: Option<String>,
    pub type_id: Option<i64>,
    pub sector_id: Option<i64>,
    pub status_id: Option<i64>,
    pub keyword: Option<String>,
    /// Inclusive lower bound on the creation date
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date
    pub to: Option<NaiveDate>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl DocumentFilter {
    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }

    /// Query-string pairs for `GET /api/v1/documentos/buscar`
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(text) = non_blank(&self.text) {
            pairs.push(("texto", text.to_string()));
        }
        if let Some(id) = self.type_id {
            pairs.push(("tipoId", id.to_string()));
        }
        if let Some(id) = self.sector_id {
            pairs.push(("sectorId", id.to_string()));
        }
        if let Some(id) = self.status_id {
            pairs.push(("estadoId", id.to_string()));
        }
        if let Some(keyword) = non_blank(&self.keyword) {
            pairs.push(("palabraClave", keyword.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("desde", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("hasta", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }

    pub fn matches(&self, document: &Document) -> bool {
        if let Some(text) = non_blank(&self.text) {
            let text = text.to_lowercase();
            let hit = document.number.to_lowercase().contains(&text)
                || document.title.to_lowercase().contains(&text)
                || document
                    .summary
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&text));
            if !hit {
                return false;
            }
        }

        if self.type_id.is_some_and(|id| id != document.doc_type.id)
            || self.sector_id.is_some_and(|id| id != document.sector.id)
            || self.status_id.is_some_and(|id| id != document.status.id)
        {
            return false;
        }

        if let Some(keyword) = non_blank(&self.keyword) {
            let keyword = keyword.to_lowercase();
            if !document
                .keywords
                .iter()
                .any(|k| k.name.to_lowercase().contains(&keyword))
            {
                return false;
            }
        }

        self.from.is_none_or(|from| document.created_on >= from)
            && self.to.is_none_or(|to| document.created_on <= to)
    }

    pub fn apply<'a>(&self, documents: &'a [Document]) -> Vec<&'a Document> {
        documents.iter().filter(|d| self.matches(d)).collect()
    }
}
