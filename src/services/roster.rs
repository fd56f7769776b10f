use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::error::{AppError, Result, ValidationError};
use crate::models::staff_member::{NewStaffMember, StaffMember, UserIdentity};
use crate::repository::{StaffRepository, TaskRepository};
use crate::services::attendance::AttendanceBook;

/// Staff CRUD. Deleting a member also deletes their tasks and drops them from
/// attendance.
pub struct StaffRoster {
    staff: Arc<dyn StaffRepository>,
    tasks: Arc<dyn TaskRepository>,
    attendance: Arc<AttendanceBook>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub removed_duplicates: usize,
    pub remaining_staff: usize,
    pub staff_list: Vec<StaffMember>,
}

impl StaffRoster {
    pub fn new(
        staff: Arc<dyn StaffRepository>,
        tasks: Arc<dyn TaskRepository>,
        attendance: Arc<AttendanceBook>,
    ) -> Self {
        StaffRoster {
            staff,
            tasks,
            attendance,
        }
    }

    /// Active members, oldest first, without duplicates.
    pub async fn list(&self) -> Result<Vec<StaffMember>> {
        let (unique, _) = dedupe(self.staff.list_active().await?);
        Ok(unique)
    }

    pub async fn add(&self, member: NewStaffMember) -> Result<StaffMember> {
        let name = member.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingStaffName.into());
        }
        self.ensure_name_free(&name, None).await?;

        let email = member.email.filter(|e| !e.trim().is_empty());
        let added = self
            .staff
            .insert(NewStaffMember {
                name,
                email,
                user_id: member.user_id,
            })
            .await?;
        info!("Added staff member {} ({})", added.name, added.id);
        Ok(added)
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<StaffMember> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingStaffName.into());
        }
        self.active_member(id).await?;
        self.ensure_name_free(name, Some(id)).await?;

        let renamed = self.staff.rename(id, name).await?;
        info!("Renamed staff member {} to {}", id, renamed.name);
        Ok(renamed)
    }

    /// Removes every task filed under the member's name, then soft-deletes
    /// the member. A failure part way leaves the member active for a retry.
    pub async fn delete(&self, id: &str) -> Result<StaffMember> {
        let member = self.active_member(id).await?;

        let removed = self.tasks.delete_by_staff(&member.name).await?;
        self.staff.deactivate(&[member.id.clone()]).await?;
        self.attendance.remove_staff(&member.name).await;

        info!(
            "Deactivated staff member {} and removed {} tasks",
            member.name, removed
        );
        Ok(member)
    }

    /// Registers the signed-in user as a staff member unless a member with
    /// the derived name already exists. Returns `None` when no name can be
    /// derived from the identity.
    pub async fn provision(&self, identity: &UserIdentity) -> Result<Option<StaffMember>> {
        let Some(name) = identity.staff_name() else {
            warn!("Cannot provision staff member: identity has no name or email");
            return Ok(None);
        };

        let active = self.staff.list_active().await?;
        if let Some(existing) = active.into_iter().find(|s| s.name == name) {
            return Ok(Some(existing));
        }

        let member = self
            .add(NewStaffMember {
                name,
                email: identity.email.clone(),
                user_id: identity.user_id.clone(),
            })
            .await?;
        Ok(Some(member))
    }

    /// Deactivates every member that duplicates an older one by name or email.
    pub async fn cleanup_duplicates(&self) -> Result<CleanupReport> {
        let (unique, duplicates) = dedupe(self.staff.list_active().await?);
        let ids: Vec<String> = duplicates.iter().map(|s| s.id.clone()).collect();
        if !ids.is_empty() {
            self.staff.deactivate(&ids).await?;
            info!("Deactivated {} duplicate staff members", ids.len());
        }

        Ok(CleanupReport {
            removed_duplicates: ids.len(),
            remaining_staff: unique.len(),
            staff_list: unique,
        })
    }

    async fn active_member(&self, id: &str) -> Result<StaffMember> {
        match self.staff.get(id).await? {
            Some(member) if member.is_active => Ok(member),
            _ => Err(AppError::StaffNotFound(id.to_string())),
        }
    }

    async fn ensure_name_free(&self, name: &str, except_id: Option<&str>) -> Result<()> {
        let taken = self
            .staff
            .list_active()
            .await?
            .iter()
            .any(|s| s.name == name && except_id != Some(s.id.as_str()));
        if taken {
            return Err(ValidationError::DuplicateStaffName(name.to_string()).into());
        }
        Ok(())
    }
}

/// Splits an oldest-first list into the first member per name/email and the
/// later duplicates.
pub fn dedupe(staff: Vec<StaffMember>) -> (Vec<StaffMember>, Vec<StaffMember>) {
    let mut unique: Vec<StaffMember> = Vec::new();
    let mut duplicates = Vec::new();
    for member in staff {
        let is_duplicate = unique.iter().any(|u| {
            u.name == member.name
                || matches!((&u.email, &member.email), (Some(a), Some(b)) if a == b)
        });
        if is_duplicate {
            duplicates.push(member);
        } else {
            unique.push(member);
        }
    }
    (unique, duplicates)
}
