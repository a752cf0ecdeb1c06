//! Authentication and authorization
//!
//! A [`Session`] is built from the sign-in response and persisted between
//! invocations. Before a view runs, [`authorize`] checks the session against
//! the view's [`Access`] requirement, the same way a route guard does in the
//! browser console.

pub mod claims;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::lookup::Sector;
use crate::dto::auth::SignInResponse;

pub use claims::{Claims, TokenError, decode_claims};

/// Authorization level derived from the role name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleKind {
    Admin,
    Editor,
    Reader,
}

impl RoleKind {
    /// Map a backend role name onto an authorization level
    ///
    /// Unknown names are treated as read-only.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_uppercase();
        let name = name.strip_prefix("ROLE_").unwrap_or(&name);
        match name {
            "ADMIN" | "ADMINISTRADOR" => RoleKind::Admin,
            "EDITOR" => RoleKind::Editor,
            _ => RoleKind::Reader,
        }
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleKind::Admin => write!(f, "Admin"),
            RoleKind::Editor => write!(f, "Editor"),
            RoleKind::Reader => write!(f, "Reader"),
        }
    }
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub display_name: String,
    pub email: String,
    /// Role name as reported by the server
    pub role_name: String,
    pub role: RoleKind,
    #[serde(default)]
    pub sector: Option<Sector>,
    /// `None` for opaque tokens: valid until sign-out or a 401
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Build a session from a successful sign-in
    pub fn from_sign_in(response: SignInResponse) -> Self {
        let claims = match decode_claims(&response.token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Token claims unavailable: {}", e);
                None
            }
        };

        let role_name = if response.role.trim().is_empty() {
            claims
                .as_ref()
                .and_then(|c| c.rol.clone())
                .unwrap_or_default()
        } else {
            response.role
        };

        Self {
            token: response.token,
            user_id: response.id,
            display_name: format!("{} {}", response.first_name, response.last_name)
                .trim()
                .to_string(),
            email: response.email,
            role: RoleKind::from_name(&role_name),
            role_name,
            sector: response.sector,
            expires_at: claims.and_then(|c| c.expires_at()),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Whether the session role satisfies any of `roles`
    ///
    /// Admin satisfies every requirement Editor does.
    pub fn has_any_role(&self, roles: &[RoleKind]) -> bool {
        roles.iter().any(|required| match required {
            RoleKind::Editor => matches!(self.role, RoleKind::Editor | RoleKind::Admin),
            other => *other == self.role,
        })
    }
}

/// Screens of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Profile,
    DocumentList,
    DocumentSearch,
    DocumentDetail,
    DocumentCreate,
    DocumentEdit,
    DocumentRetire,
    FileUpload,
    UserList,
    UserCreate,
    UserEdit,
    SectorAdmin,
    RoleAdmin,
    AuditLog,
}

/// Requirement a view places on the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    AnyOf(&'static [RoleKind]),
}

const EDITORS: &[RoleKind] = &[RoleKind::Editor];
const ADMINS: &[RoleKind] = &[RoleKind::Admin];

impl View {
    pub fn access(self) -> Access {
        match self {
            View::Login | View::DocumentList | View::DocumentSearch | View::DocumentDetail => {
                Access::Public
            }
            View::Profile => Access::Authenticated,
            View::DocumentCreate | View::DocumentEdit | View::DocumentRetire | View::FileUpload => {
                Access::AnyOf(EDITORS)
            }
            View::UserList
            | View::UserCreate
            | View::UserEdit
            | View::SectorAdmin
            | View::RoleAdmin
            | View::AuditLog => Access::AnyOf(ADMINS),
        }
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectToLogin,
    Forbidden,
}

/// Check whether `session` may open `view` at `now`
pub fn authorize(session: Option<&Session>, view: View, now: DateTime<Utc>) -> Decision {
    let access = view.access();
    if access == Access::Public {
        return Decision::Allow;
    }

    let session = match session {
        Some(session) if !session.is_expired(now) => session,
        _ => return Decision::RedirectToLogin,
    };

    match access {
        Access::AnyOf(roles) if !session.has_any_role(roles) => Decision::Forbidden,
        _ => Decision::Allow,
    }
}
