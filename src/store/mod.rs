//! In-process storage. Entities live in arena-style tables keyed by their
//! opaque id; the tables own the audit stamping so services never touch
//! lifecycle fields directly. Credentials and roles sit behind a separate
//! identity provider so the user table stores no secrets.

pub mod identity;
pub mod queries;
pub mod table;

use uuid::Uuid;

use crate::domain::{AuditEnvelope, DietPlan, Meal, User};

pub use identity::{IdentityError, IdentityProvider};
pub use table::Table;

/// Anything a [`Table`] can hold: identifiable, auditable, cloneable.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Singular noun used in log lines.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn audit(&self) -> &AuditEnvelope;
    fn audit_mut(&mut self) -> &mut AuditEnvelope;
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &AuditEnvelope {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditEnvelope {
        &mut self.audit
    }
}

impl Entity for DietPlan {
    const KIND: &'static str = "diet plan";

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &AuditEnvelope {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditEnvelope {
        &mut self.audit
    }
}

impl Entity for Meal {
    const KIND: &'static str = "meal";

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &AuditEnvelope {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditEnvelope {
        &mut self.audit
    }
}

/// The full data store shared across handlers.
#[derive(Default)]
pub struct Store {
    pub users: Table<User>,
    pub diet_plans: Table<DietPlan>,
    pub meals: Table<Meal>,
    pub identity: IdentityProvider,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
