//! ID resolver module
//!
//! Resolves what the user typed (numeric ids, document numbers, catalog
//! names) to the ids the API expects. Document numbers and catalog names may
//! be abbreviated as long as the prefix is unambiguous.

use anyhow::{Result, anyhow};
use digesto_core::domain::document::Document;
use digesto_core::domain::lookup::Lookup;
use digesto_core::domain::user::User;

use crate::context::Context;
use crate::types::DocRef;

/// Pick the single item matching `input`: exact match wins, otherwise a
/// unique prefix
fn unique_match<'a, T>(
    items: &'a [T],
    input: &str,
    key: impl Fn(&T) -> &str,
    what: &str,
) -> Result<&'a T> {
    let needle = input.trim().to_lowercase();

    if let Some(exact) = items.iter().find(|item| key(*item).to_lowercase() == needle) {
        return Ok(exact);
    }

    let matches: Vec<_> = items
        .iter()
        .filter(|item| key(*item).to_lowercase().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("No {} found matching '{}'", what, input)),
        [single] => Ok(*single),
        _ => {
            let names: Vec<&str> = matches.iter().map(|item| key(*item)).collect();
            Err(anyhow!(
                "Ambiguous {} '{}' matches: {}",
                what,
                input,
                names.join(", ")
            ))
        }
    }
}

/// Find a document in an already fetched list
pub fn find_document<'a>(documents: &'a [Document], doc_ref: &DocRef) -> Result<&'a Document> {
    match doc_ref {
        DocRef::Id(id) => documents
            .iter()
            .find(|d| d.id == *id)
            .ok_or_else(|| anyhow!("No document with id {}", id)),
        DocRef::Number(number) => unique_match(documents, number, |d| d.number.as_str(), "document"),
    }
}

/// Resolve a document reference to its id
///
/// Ids are returned as-is; numbers are looked up in the document list.
pub async fn resolve_document_id(ctx: &mut Context, doc_ref: &DocRef) -> Result<i64> {
    if let DocRef::Id(id) = doc_ref {
        return Ok(*id);
    }

    let fetched = ctx.client.list_documents().await;
    let documents = fetched.map_err(|e| ctx.api_error(e))?;

    Ok(find_document(&documents, doc_ref)?.id)
}

/// Resolve a catalog entry given by id or by name
pub fn resolve_lookup(items: &[Lookup], input: &str, what: &str) -> Result<i64> {
    if let Ok(id) = input.trim().parse::<i64>() {
        return items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.id)
            .ok_or_else(|| anyhow!("No {} with id {}", what, id));
    }

    Ok(unique_match(items, input, |item| item.name.as_str(), what)?.id)
}

/// Find a user by id or email
pub fn find_user<'a>(users: &'a [User], input: &str) -> Result<&'a User> {
    if let Ok(id) = input.trim().parse::<i64>() {
        return users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| anyhow!("No user with id {}", id));
    }

    unique_match(users, input, |u| u.email.as_str(), "user")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn document(id: i64, number: &str) -> Document {
        Document {
            id,
            title: format!("Documento {}", id),
            number: number.to_string(),
            created_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            summary: None,
            doc_type: Lookup::new(1, "Resolución"),
            sector: Lookup::new(1, "Legales"),
            status: Lookup::new(1, "Vigente"),
            files: vec![],
            keywords: vec![],
            references: vec![],
        }
    }

    #[test]
    fn test_find_document_by_number() {
        let docs = vec![
            document(1, "RES-1/2024"),
            document(2, "RES-12/2024"),
            document(3, "DEC-1/2024"),
        ];

        let found = find_document(&docs, &DocRef::parse("res-1/2024")).unwrap();
        assert_eq!(found.id, 1);

        let found = find_document(&docs, &DocRef::parse("DEC")).unwrap();
        assert_eq!(found.id, 3);

        let err = find_document(&docs, &DocRef::parse("RES-1")).unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));

        assert!(find_document(&docs, &DocRef::parse("ORD")).is_err());
        assert!(find_document(&docs, &DocRef::Id(9)).is_err());
    }

    #[test]
    fn test_resolve_lookup() {
        let sectors = vec![
            Lookup::new(1, "Legales"),
            Lookup::new(2, "Hacienda"),
            Lookup::new(3, "Hacienda municipal"),
        ];

        assert_eq!(resolve_lookup(&sectors, "2", "sector").unwrap(), 2);
        assert_eq!(resolve_lookup(&sectors, "leg", "sector").unwrap(), 1);
        assert_eq!(resolve_lookup(&sectors, "hacienda", "sector").unwrap(), 2);
        assert!(resolve_lookup(&sectors, "hac", "sector").is_err());
        assert!(resolve_lookup(&sectors, "7", "sector").is_err());
    }

    #[test]
    fn test_find_user_by_id_or_email() {
        let user = |id: i64, email: &str| User {
            id,
            first_name: "Ana".to_string(),
            last_name: "Gómez".to_string(),
            email: email.to_string(),
            dni: None,
            phone: None,
            role: Lookup::new(1, "ADMIN"),
            status: Lookup::new(1, "Activo"),
            sector: Lookup::new(1, "Legales"),
            job_title: None,
        };
        let users = vec![user(1, "ana@digesto.gob.ar"), user(2, "andres@digesto.gob.ar")];

        assert_eq!(find_user(&users, "2").unwrap().id, 2);
        assert_eq!(find_user(&users, "ANA@digesto.gob.ar").unwrap().id, 1);
        assert_eq!(find_user(&users, "andr").unwrap().id, 2);
        assert!(find_user(&users, "an").is_err());
    }
}
