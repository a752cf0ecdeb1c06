//! Audit trail endpoints

use digesto_core::domain::audit::AuditRecord;
use digesto_core::dto::audit::AuditQuery;

use crate::DigestoClient;
use crate::error::Result;

impl DigestoClient {
    /// List audit records matching `query`
    pub async fn list_audit_records(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>> {
        let response = self
            .get("/api/v1/registros")
            .query(&query.to_query())
            .send()
            .await?;

        self.handle_response(response).await
    }
}
