//! Chip editing for multi-value fields
//!
//! Keywords and cross-references are edited as chips: free text is split on
//! the separator keys (Enter and comma), each token becomes a chip, and chips
//! can be removed individually.

use crate::domain::document::{Document, DocumentReference};
use crate::domain::lookup::Keyword;
use crate::dto::document::KeywordRef;

/// Split raw chip input on the separator keys, dropping blank tokens
pub fn split_chip_input(raw: &str) -> impl Iterator<Item = &str> {
    raw.split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// A keyword chip; `id` is set when it matches a catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordChip {
    pub id: Option<i64>,
    pub name: String,
}

/// Keyword chips of a document form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordChips {
    chips: Vec<KeywordChip>,
}

impl KeywordChips {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keywords(keywords: &[Keyword]) -> Self {
        let mut chips = Self::new();
        for keyword in keywords {
            chips.add_existing(keyword);
        }
        chips
    }

    pub fn chips(&self) -> &[KeywordChip] {
        &self.chips
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim().to_lowercase();
        self.chips
            .iter()
            .position(|chip| chip.name.to_lowercase() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Add a free-text keyword
    ///
    /// Returns `false` for blank input or when the keyword is already present
    /// (compared case-insensitively).
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.chips.push(KeywordChip {
            id: None,
            name: name.to_string(),
        });
        true
    }

    /// Add a keyword picked from the catalog
    ///
    /// A free-text chip with the same name is bound to the catalog id instead
    /// of being duplicated. Returns `true` only when a new chip was added.
    pub fn add_existing(&mut self, keyword: &Keyword) -> bool {
        match self.position(&keyword.name) {
            Some(index) => {
                let chip = &mut self.chips[index];
                if chip.id.is_none() {
                    chip.id = Some(keyword.id);
                }
                false
            }
            None => {
                self.chips.push(KeywordChip {
                    id: Some(keyword.id),
                    name: keyword.name.clone(),
                });
                true
            }
        }
    }

    /// Add every token of `raw`; returns how many chips were added
    pub fn add_all(&mut self, raw: &str) -> usize {
        split_chip_input(raw).filter(|token| self.add(token)).count()
    }

    /// Add every token of `raw`, binding tokens that name a catalog entry
    pub fn add_from_catalog(&mut self, raw: &str, catalog: &[Keyword]) -> usize {
        let mut added = 0;
        for token in split_chip_input(raw) {
            let lowered = token.to_lowercase();
            let inserted = match catalog.iter().find(|k| k.name.to_lowercase() == lowered) {
                Some(keyword) => self.add_existing(keyword),
                None => self.add(token),
            };
            if inserted {
                added += 1;
            }
        }
        added
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.chips.remove(index);
                true
            }
            None => false,
        }
    }

    /// Autocomplete: catalog keywords containing `input`, minus the selected ones
    pub fn suggest<'a>(&self, catalog: &'a [Keyword], input: &str) -> Vec<&'a Keyword> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Vec::new();
        }
        catalog
            .iter()
            .filter(|keyword| keyword.name.to_lowercase().contains(&input))
            .filter(|keyword| !self.contains(&keyword.name))
            .collect()
    }

    pub fn to_refs(&self) -> Vec<KeywordRef> {
        self.chips
            .iter()
            .map(|chip| KeywordRef {
                id: chip.id,
                name: chip.name.clone(),
            })
            .collect()
    }
}

/// Why a reference chip was not added
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChipRejection {
    #[error("a document cannot reference itself")]
    SelfReference,

    #[error("document is already referenced")]
    Duplicate,
}

/// Cross-reference chips of a document form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceChips {
    /// Id of the document being edited, if any
    owner_id: Option<i64>,
    references: Vec<DocumentReference>,
}

impl ReferenceChips {
    pub fn new(owner_id: Option<i64>) -> Self {
        Self {
            owner_id,
            references: Vec::new(),
        }
    }

    pub fn from_references(owner_id: Option<i64>, references: &[DocumentReference]) -> Self {
        let mut chips = Self::new(owner_id);
        for reference in references {
            // stored data may already contain duplicates; keep the first
            let _ = chips.add(reference.clone());
        }
        chips
    }

    pub fn references(&self) -> &[DocumentReference] {
        &self.references
    }

    pub fn ids(&self) -> Vec<i64> {
        self.references.iter().map(|r| r.id).collect()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.references.iter().any(|r| r.id == id)
    }

    pub fn add(&mut self, reference: DocumentReference) -> Result<(), ChipRejection> {
        if self.owner_id == Some(reference.id) {
            return Err(ChipRejection::SelfReference);
        }
        if self.contains(reference.id) {
            return Err(ChipRejection::Duplicate);
        }
        self.references.push(reference);
        Ok(())
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.references.len();
        self.references.retain(|r| r.id != id);
        self.references.len() != before
    }

    /// Documents matching `query` by number or title that can still be referenced
    pub fn candidates<'a>(&self, documents: &'a [Document], query: &str) -> Vec<&'a Document> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        documents
            .iter()
            .filter(|doc| Some(doc.id) != self.owner_id && !self.contains(doc.id))
            .filter(|doc| {
                doc.number.to_lowercase().contains(&query)
                    || doc.title.to_lowercase().contains(&query)
            })
            .collect()
    }
}
