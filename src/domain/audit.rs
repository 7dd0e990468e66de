use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record lifecycle state. `Modified` is a transient marker set on every
/// update and is treated the same as `Active` when filtering reads;
/// `Inactive` marks a soft-deleted record and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Active,
    Modified,
    Inactive,
}

/// Audit fields shared by every entity kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEnvelope {
    pub creation_date: DateTime<Utc>,
    pub update_date: Option<DateTime<Utc>>,
    pub delete_date: Option<DateTime<Utc>>,
    pub status: Status,
}

impl AuditEnvelope {
    /// Fresh envelope for a newly created record.
    pub fn new() -> Self {
        Self {
            creation_date: Utc::now(),
            update_date: None,
            delete_date: None,
            status: Status::Active,
        }
    }

    /// Stamp an update. Creation date is immutable.
    pub fn touch(&mut self) {
        self.update_date = Some(Utc::now());
        self.status = Status::Modified;
    }

    /// Soft delete: terminal state, record keeps its row.
    pub fn retire(&mut self) {
        self.delete_date = Some(Utc::now());
        self.status = Status::Inactive;
    }

    pub fn is_deleted(&self) -> bool {
        self.status == Status::Inactive
    }
}

impl Default for AuditEnvelope {
    fn default() -> Self {
        Self::new()
    }
}
