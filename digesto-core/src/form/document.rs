//! Document create/edit form

use chrono::NaiveDate;

use super::chips::{KeywordChips, ReferenceChips};
use super::{FieldError, optional_text, require_text, required};
use crate::domain::document::Document;
use crate::dto::document::DocumentRequest;

/// Local state of the document form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentForm {
    /// Id of the document being edited; `None` when creating
    pub document_id: Option<i64>,
    pub title: String,
    pub number: String,
    pub created_on: Option<NaiveDate>,
    pub summary: String,
    pub type_id: Option<i64>,
    pub sector_id: Option<i64>,
    pub status_id: Option<i64>,
    pub keywords: KeywordChips,
    pub references: ReferenceChips,
    pub file_ids: Vec<i64>,
}

impl DocumentForm {
    /// Empty form for a new document
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing document
    pub fn from_document(document: &Document) -> Self {
        Self {
            document_id: Some(document.id),
            title: document.title.clone(),
            number: document.number.clone(),
            created_on: Some(document.created_on),
            summary: document.summary.clone().unwrap_or_default(),
            type_id: Some(document.doc_type.id),
            sector_id: Some(document.sector.id),
            status_id: Some(document.status.id),
            keywords: KeywordChips::from_keywords(&document.keywords),
            references: ReferenceChips::from_references(Some(document.id), &document.references),
            file_ids: document.files.iter().map(|f| f.id).collect(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.document_id.is_some()
    }

    pub fn attach_file(&mut self, file_id: i64) {
        if !self.file_ids.contains(&file_id) {
            self.file_ids.push(file_id);
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        self.to_request().map(|_| ())
    }

    /// Validate and build the request body
    pub fn to_request(&self) -> Result<DocumentRequest, Vec<FieldError>> {
        let mut errors = Vec::new();
        require_text(&mut errors, "title", &self.title);
        require_text(&mut errors, "number", &self.number);
        let created_on = required(&mut errors, "creation date", self.created_on);
        let type_id = required(&mut errors, "type", self.type_id);
        let sector_id = required(&mut errors, "sector", self.sector_id);
        let status_id = required(&mut errors, "status", self.status_id);

        match (created_on, type_id, sector_id, status_id) {
            (Some(created_on), Some(type_id), Some(sector_id), Some(status_id))
                if errors.is_empty() =>
            {
                Ok(DocumentRequest {
                    title: self.title.trim().to_string(),
                    number: self.number.trim().to_string(),
                    created_on,
                    summary: optional_text(&self.summary),
                    type_id,
                    sector_id,
                    status_id,
                    keywords: self.keywords.to_refs(),
                    reference_ids: self.references.ids(),
                    file_ids: self.file_ids.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}
