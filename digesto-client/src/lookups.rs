//! Lookup catalog endpoints

use digesto_core::domain::lookup::{Lookup, LookupKind};
use digesto_core::dto::lookup::LookupRequest;
use tracing::info;

use crate::DigestoClient;
use crate::error::{ClientError, Result};

impl DigestoClient {
    /// List the entries of a catalog
    pub async fn list_lookup(&self, kind: LookupKind) -> Result<Vec<Lookup>> {
        let response = self.get(kind.path()).send().await?;

        self.handle_response(response).await
    }

    /// Create an entry in an administrator-managed catalog
    pub async fn create_lookup(&self, kind: LookupKind, req: &LookupRequest) -> Result<Lookup> {
        ensure_managed(kind)?;
        let response = self.post(kind.path()).json(req).send().await?;

        let lookup: Lookup = self.handle_response(response).await?;
        info!("Created {} entry '{}' ({})", kind.label(), lookup.name, lookup.id);
        Ok(lookup)
    }

    /// Rename/describe an entry in an administrator-managed catalog
    pub async fn update_lookup(
        &self,
        kind: LookupKind,
        id: i64,
        req: &LookupRequest,
    ) -> Result<Lookup> {
        ensure_managed(kind)?;
        let response = self
            .put(&format!("{}/{}", kind.path(), id))
            .json(req)
            .send()
            .await?;

        let lookup: Lookup = self.handle_response(response).await?;
        info!("Updated {} entry {}", kind.label(), id);
        Ok(lookup)
    }

    /// Delete an entry from an administrator-managed catalog
    pub async fn delete_lookup(&self, kind: LookupKind, id: i64) -> Result<()> {
        ensure_managed(kind)?;
        let response = self
            .delete(&format!("{}/{}", kind.path(), id))
            .send()
            .await?;

        self.handle_empty_response(response).await?;
        info!("Deleted {} entry {}", kind.label(), id);
        Ok(())
    }
}

fn ensure_managed(kind: LookupKind) -> Result<()> {
    if kind.is_managed() {
        Ok(())
    } else {
        Err(ClientError::InvalidRequest(format!(
            "{} are read-only",
            kind.label()
        )))
    }
}
