//! Audit DTOs

use chrono::NaiveDate;

/// Filters for `GET /api/v1/registros`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub user: Option<String>,
    pub action: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AuditQuery {
    /// Query-string pairs, omitting unset filters
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(user) = self.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            pairs.push(("usuario", user.to_string()));
        }
        if let Some(action) = self.action.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            pairs.push(("accion", action.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("desde", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("hasta", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}
