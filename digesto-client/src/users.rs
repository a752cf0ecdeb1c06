//! User administration endpoints

use digesto_core::domain::user::User;
use digesto_core::dto::user::{UserRequest, UserStatusUpdate};
use tracing::info;

use crate::DigestoClient;
use crate::error::Result;

impl DigestoClient {
    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let response = self.get("/api/v1/usuarios").send().await?;

        self.handle_response(response).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        let response = self
            .get(&format!("/api/v1/usuarios/{}", user_id))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a user account
    pub async fn create_user(&self, req: &UserRequest) -> Result<User> {
        let response = self.post("/api/v1/usuarios").json(req).send().await?;

        let user: User = self.handle_response(response).await?;
        info!("User created: {} ({})", user.email, user.id);
        Ok(user)
    }

    /// Update a user account
    pub async fn update_user(&self, user_id: i64, req: &UserRequest) -> Result<User> {
        let response = self
            .put(&format!("/api/v1/usuarios/{}", user_id))
            .json(req)
            .send()
            .await?;

        let user: User = self.handle_response(response).await?;
        info!("User updated: {} ({})", user.email, user.id);
        Ok(user)
    }

    /// Change the status (active, inactive, ...) of a user account
    pub async fn set_user_status(&self, user_id: i64, status_id: i64) -> Result<User> {
        let response = self
            .put(&format!("/api/v1/usuarios/{}/estado", user_id))
            .json(&UserStatusUpdate { status_id })
            .send()
            .await?;

        let user: User = self.handle_response(response).await?;
        info!("User {} status set to {}", user.id, user.status.name);
        Ok(user)
    }
}
