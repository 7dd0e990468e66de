use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::AuditEnvelope;

/// Role discriminator carried in JWT claims and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Admin,
    Dietitian,
    Client,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Admin, UserType::Dietitian, UserType::Client];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "Admin",
            UserType::Dietitian => "Dietitian",
            UserType::Client => "Client",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(UserType::Admin),
            "Dietitian" => Some(UserType::Dietitian),
            "Client" => Some(UserType::Client),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly one of the three account shapes. Each variant carries only its own
/// field set, so a dietitian can never simultaneously hold client data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "userType")]
pub enum RoleProfile {
    Admin,
    Dietitian(DietitianProfile),
    Client(ClientProfile),
}

impl RoleProfile {
    pub fn user_type(&self) -> UserType {
        match self {
            RoleProfile::Admin => UserType::Admin,
            RoleProfile::Dietitian(_) => UserType::Dietitian,
            RoleProfile::Client(_) => UserType::Client,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietitianProfile {
    pub license_number: String,
    pub specialization: String,
    pub years_of_experience: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub height: f64,
    pub initial_weight: f64,
    pub current_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Dietitian this client is assigned to, if any. Must reference a
    /// Dietitian-role user; enforced by the services at every write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietitian_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(flatten)]
    pub role: RoleProfile,
    #[serde(flatten)]
    pub audit: AuditEnvelope,
}

impl User {
    pub fn user_type(&self) -> UserType {
        self.role.user_type()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, RoleProfile::Admin)
    }

    pub fn is_dietitian(&self) -> bool {
        matches!(self.role, RoleProfile::Dietitian(_))
    }

    pub fn is_client(&self) -> bool {
        matches!(self.role, RoleProfile::Client(_))
    }

    /// For clients, the dietitian they are assigned to.
    pub fn dietitian_id(&self) -> Option<Uuid> {
        match &self.role {
            RoleProfile::Client(profile) => profile.dietitian_id,
            _ => None,
        }
    }
}
