//! Document-related API endpoints

use digesto_core::domain::document::Document;
use digesto_core::dto::document::DocumentRequest;
use digesto_core::search::DocumentFilter;
use tracing::info;

use crate::DigestoClient;
use crate::error::Result;

impl DigestoClient {
    // =============================================================================
    // Browsing
    // =============================================================================

    /// List all documents
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let response = self.get("/api/v1/documentos").send().await?;

        self.handle_response(response).await
    }

    /// Search documents server-side
    ///
    /// # Arguments
    /// * `filter` - Search criteria; unset fields are not sent
    pub async fn search_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let response = self
            .get("/api/v1/documentos/buscar")
            .query(&filter.to_query())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a document by ID
    pub async fn get_document(&self, document_id: i64) -> Result<Document> {
        let response = self
            .get(&format!("/api/v1/documentos/{}", document_id))
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Editing
    // =============================================================================

    /// Create a new document
    ///
    /// # Returns
    /// The created document, as stored by the server
    pub async fn create_document(&self, req: &DocumentRequest) -> Result<Document> {
        let response = self.post("/api/v1/documentos").json(req).send().await?;

        let document: Document = self.handle_response(response).await?;
        info!("Document created: {} ({})", document.number, document.id);
        Ok(document)
    }

    /// Replace the editable fields of a document
    pub async fn update_document(&self, document_id: i64, req: &DocumentRequest) -> Result<Document> {
        let response = self
            .put(&format!("/api/v1/documentos/{}", document_id))
            .json(req)
            .send()
            .await?;

        let document: Document = self.handle_response(response).await?;
        info!("Document updated: {} ({})", document.number, document.id);
        Ok(document)
    }

    /// Retire (soft-deactivate) a document
    pub async fn retire_document(&self, document_id: i64) -> Result<()> {
        let response = self
            .put(&format!("/api/v1/documentos/{}/baja", document_id))
            .send()
            .await?;

        self.handle_empty_response(response).await?;
        info!("Document retired: {}", document_id);
        Ok(())
    }
}
