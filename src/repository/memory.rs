use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{sort_staff, sort_tasks, StaffRepository, TaskRepository};
use crate::error::{AppError, Result};
use crate::models::staff_member::{NewStaffMember, StaffMember};
use crate::models::task::{NewTask, Task, TaskPatch};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    staff: Vec<StaffMember>,
}

/// Mock-mode store. Everything lives in memory; when a snapshot path is set
/// the whole state is rewritten to that JSON file after every change.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Snapshot>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Loads `path` when it exists, otherwise starts empty.
    pub async fn with_snapshot(path: PathBuf) -> Result<Self> {
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                info!(
                    "Loaded mock snapshot {:?}: {} tasks, {} staff",
                    path,
                    snapshot.tasks.len(),
                    snapshot.staff.len()
                );
                snapshot
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No mock snapshot at {:?}, starting empty", path);
                Snapshot::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(MemoryStore {
            state: RwLock::new(state),
            snapshot_path: Some(path),
        })
    }

    async fn persist(&self, state: &Snapshot) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(state)?;
        if let Err(e) = tokio::fs::write(path, bytes).await {
            warn!("Failed to write mock snapshot {:?}: {}", path, e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Runs `change` on a copy of the state. The copy replaces the state only
    /// after the snapshot file has been written.
    async fn commit<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut Snapshot) -> Result<T> + Send,
        T: Send,
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let value = change(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(value)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Task>> {
        self.list_between(date, date).await
    }

    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Task>> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| t.date >= from && t.date <= to)
            .cloned()
            .collect();
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    async fn get(&self, id: &str) -> Result<Option<Task>> {
        let state = self.state.read().await;
        Ok(state.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, task: NewTask) -> Result<Task> {
        let task = task.into_task(Uuid::new_v4().to_string(), Utc::now());
        self.commit(|state| {
            state.tasks.push(task.clone());
            Ok(task)
        })
        .await
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        self.commit(|state| {
            let task = state
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| AppError::TaskNotFound(id.to_string()))?;
            task.apply(patch, Utc::now());
            Ok(task.clone())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.commit(|state| {
            state.tasks.retain(|t| t.id != id);
            Ok(())
        })
        .await
    }

    async fn delete_by_staff(&self, staff_name: &str) -> Result<u64> {
        self.commit(|state| {
            let before = state.tasks.len();
            state.tasks.retain(|t| t.staff_name != staff_name);
            Ok((before - state.tasks.len()) as u64)
        })
        .await
    }
}

#[async_trait]
impl StaffRepository for MemoryStore {
    async fn list_active(&self) -> Result<Vec<StaffMember>> {
        let state = self.state.read().await;
        let mut staff: Vec<StaffMember> =
            state.staff.iter().filter(|s| s.is_active).cloned().collect();
        sort_staff(&mut staff);
        Ok(staff)
    }

    async fn get(&self, id: &str) -> Result<Option<StaffMember>> {
        let state = self.state.read().await;
        Ok(state.staff.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, member: NewStaffMember) -> Result<StaffMember> {
        let member = member.into_member(Uuid::new_v4().to_string(), Utc::now());
        self.commit(|state| {
            state.staff.push(member.clone());
            Ok(member)
        })
        .await
    }

    async fn rename(&self, id: &str, name: &str) -> Result<StaffMember> {
        self.commit(|state| {
            let member = state
                .staff
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| AppError::StaffNotFound(id.to_string()))?;
            member.name = name.to_string();
            member.updated_at = Utc::now();
            Ok(member.clone())
        })
        .await
    }

    async fn deactivate(&self, ids: &[String]) -> Result<u64> {
        let now = Utc::now();
        self.commit(|state| {
            let mut changed = 0;
            for member in state.staff.iter_mut() {
                if member.is_active && ids.contains(&member.id) {
                    member.is_active = false;
                    member.updated_at = now;
                    changed += 1;
                }
            }
            Ok(changed)
        })
        .await
    }
}
