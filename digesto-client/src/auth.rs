//! Authentication endpoints

use digesto_core::auth::Session;
use digesto_core::dto::auth::{Credentials, SignInResponse};
use tracing::info;

use crate::DigestoClient;
use crate::error::Result;

impl DigestoClient {
    /// Sign in and build a session from the response
    ///
    /// The returned session is not attached to this client; call
    /// [`DigestoClient::set_token`] and persist it with a
    /// [`SessionStore`](crate::SessionStore).
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let response = self
            .post("/api/v1/auth/signin")
            .json(credentials)
            .send()
            .await?;

        let body: SignInResponse = self.handle_response(response).await?;
        let session = Session::from_sign_in(body);

        info!("Signed in as {} ({})", session.email, session.role_name);
        Ok(session)
    }
}
