use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaffMember {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl NewStaffMember {
    pub fn named(name: impl Into<String>) -> Self {
        NewStaffMember {
            name: name.into(),
            ..NewStaffMember::default()
        }
    }

    pub fn into_member(self, id: String, now: DateTime<Utc>) -> StaffMember {
        StaffMember {
            id,
            name: self.name,
            email: self.email,
            user_id: self.user_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The signed-in account, as reported by the authentication provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserIdentity {
    /// Display name, else the local part of the email, else the email itself.
    pub fn staff_name(&self) -> Option<String> {
        let display_name = self
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(name) = display_name {
            return Some(name.to_string());
        }

        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        match email.split('@').next() {
            Some(local) if !local.is_empty() => Some(local.to_string()),
            _ => Some(email.to_string()),
        }
    }
}
