//! File upload/download endpoints

use digesto_core::domain::document::DocumentFile;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::DigestoClient;
use crate::error::Result;

impl DigestoClient {
    /// Upload a file so it can be attached to a document
    ///
    /// # Arguments
    /// * `file_name` - Name the server stores the file under
    /// * `contents` - Raw file contents
    pub async fn upload_file(&self, file_name: &str, contents: Vec<u8>) -> Result<DocumentFile> {
        let size = contents.len();
        let part = Part::bytes(contents).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .post("/api/v1/archivos")
            .multipart(form)
            .send()
            .await?;

        let file: DocumentFile = self.handle_response(response).await?;
        info!("Uploaded {} ({} bytes) as file {}", file_name, size, file.id);
        Ok(file)
    }

    /// Download an attached file by name
    pub async fn download_file(&self, file_name: &str) -> Result<Vec<u8>> {
        let url = self.url_with_segment("/api/v1/archivos", file_name)?;
        tracing::debug!("GET {}", url);
        let response = self.authorize(self.client.get(url)).send().await?;

        self.handle_bytes(response).await
    }
}
