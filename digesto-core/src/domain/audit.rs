//! Audit domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::table::{SortKey, TableRow};

/// An entry of the server-side audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    /// Email or username of whoever performed the action
    #[serde(rename = "usuario")]
    pub user: String,
    #[serde(rename = "accion")]
    pub action: String,
    #[serde(rename = "entidad")]
    pub entity: String,
    #[serde(rename = "entidadId", default)]
    pub entity_id: Option<i64>,
    #[serde(rename = "fecha")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "detalle", default)]
    pub detail: Option<String>,
}

impl TableRow for AuditRecord {
    fn columns() -> &'static [&'static str] {
        &["date", "user", "action", "entity"]
    }

    fn cell(&self, column: &str) -> Option<SortKey> {
        match column {
            "date" => Some(SortKey::DateTime(self.timestamp)),
            "user" => Some(SortKey::text(&self.user)),
            "action" => Some(SortKey::text(&self.action)),
            "entity" => Some(SortKey::text(&self.entity)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{SortState, TableView};
    use chrono::TimeZone;

    fn record(id: i64, hour: u32) -> AuditRecord {
        AuditRecord {
            id,
            user: "ana@digesto.gob".to_string(),
            action: "UPDATE".to_string(),
            entity: "Documento".to_string(),
            entity_id: Some(id),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
            detail: None,
        }
    }

    #[test]
    fn test_sort_by_date_uses_timestamp() {
        let records = vec![record(1, 9), record(2, 23), record(3, 10)];
        let view = TableView {
            sort: Some(SortState::desc("date")),
            ..TableView::default()
        };

        let ids: Vec<i64> = view.apply(&records).rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_filter_matches_formatted_date() {
        let records = vec![record(1, 9), record(2, 23)];
        let view = TableView {
            filter: "2024-05-01 23".to_string(),
            ..TableView::default()
        };
        assert_eq!(view.apply(&records).total, 1);
    }
}
