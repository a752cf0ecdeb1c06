//! User create/edit form

use super::{FieldError, require_text, required};
use crate::domain::user::User;
use crate::dto::user::UserRequest;

/// Minimum password length accepted by the form
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    /// Id of the user being edited; `None` when creating
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role_id: Option<i64>,
    pub sector_id: Option<i64>,
    pub job_title_id: Option<i64>,
    pub status_id: Option<i64>,
}

impl UserForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: Some(user.id),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: String::new(),
            password_confirmation: String::new(),
            role_id: Some(user.role.id),
            sector_id: Some(user.sector.id),
            job_title_id: user.job_title.as_ref().map(|j| j.id),
            status_id: Some(user.status.id),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        self.to_request().map(|_| ())
    }

    pub fn to_request(&self) -> Result<UserRequest, Vec<FieldError>> {
        let mut errors = Vec::new();
        require_text(&mut errors, "first name", &self.first_name);
        require_text(&mut errors, "last name", &self.last_name);

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::Required("email"));
        } else if !is_valid_email(email) {
            errors.push(FieldError::InvalidEmail("email"));
        }

        // an edit may leave the password untouched
        let password_set = !self.password.is_empty();
        if !self.is_editing() && !password_set {
            errors.push(FieldError::Required("password"));
        } else if password_set && self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.password != self.password_confirmation {
            errors.push(FieldError::Mismatch("password confirmation"));
        }

        let role_id = required(&mut errors, "role", self.role_id);
        let sector_id = required(&mut errors, "sector", self.sector_id);

        match (role_id, sector_id) {
            (Some(role_id), Some(sector_id)) if errors.is_empty() => Ok(UserRequest {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                email: email.to_lowercase(),
                password: password_set.then(|| self.password.clone()),
                role_id,
                sector_id,
                job_title_id: self.job_title_id,
                status_id: self.status_id,
            }),
            _ => Err(errors),
        }
    }
}

/// Loose `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || email.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
