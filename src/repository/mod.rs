//! Storage behind the day board and the staff roster.
//!
//! Two implementations exist: [`MemoryStore`] for mock mode and [`SqlStore`]
//! for a real database. Both keep the same ordering rules so that a sequence
//! of calls produces the same results on either one.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;

use crate::config::{AppConfig, StoreMode};
use crate::error::Result;
use crate::models::staff_member::{NewStaffMember, StaffMember};
use crate::models::task::{NewTask, Task, TaskPatch};

pub mod memory;
pub mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Tasks of one day, ordered by staff name then start hour.
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Task>>;

    /// Tasks between two days (both inclusive), ordered by date, staff name
    /// and start hour.
    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Task>>;

    async fn get(&self, id: &str) -> Result<Option<Task>>;

    async fn insert(&self, task: NewTask) -> Result<Task>;

    /// Applies `patch` as-is. Fails with `TaskNotFound` for an unknown id.
    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task>;

    /// Removing an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Returns the number of removed tasks.
    async fn delete_by_staff(&self, staff_name: &str) -> Result<u64>;
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Active members, oldest first.
    async fn list_active(&self) -> Result<Vec<StaffMember>>;

    async fn get(&self, id: &str) -> Result<Option<StaffMember>>;

    async fn insert(&self, member: NewStaffMember) -> Result<StaffMember>;

    /// Fails with `StaffNotFound` for an unknown id.
    async fn rename(&self, id: &str, name: &str) -> Result<StaffMember>;

    /// Marks the given members inactive and returns how many changed.
    async fn deactivate(&self, ids: &[String]) -> Result<u64>;
}

/// Date, staff name, start hour; ties fall back to creation order. Done in
/// Rust so the order does not depend on the database collation.
pub(crate) fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        (a.date, &a.staff_name, a.start_hour, a.created_at, &a.id).cmp(&(
            b.date,
            &b.staff_name,
            b.start_hour,
            b.created_at,
            &b.id,
        ))
    });
}

pub(crate) fn sort_staff(staff: &mut [StaffMember]) {
    staff.sort_by(|a, b| (a.created_at, &a.name, &a.id).cmp(&(b.created_at, &b.name, &b.id)));
}

/// The pair of repositories handed to the rest of the application.
#[derive(Clone)]
pub struct Stores {
    pub tasks: Arc<dyn TaskRepository>,
    pub staff: Arc<dyn StaffRepository>,
}

impl Stores {
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Stores {
            tasks: store.clone(),
            staff: store,
        }
    }

    pub fn from_sql(store: Arc<SqlStore>) -> Self {
        Stores {
            tasks: store.clone(),
            staff: store,
        }
    }

    /// Builds the store selected by configuration.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        match &config.store {
            StoreMode::Mock { snapshot_path } => {
                info!("Using mock store (snapshot: {:?})", snapshot_path);
                let store = match snapshot_path {
                    Some(path) => MemoryStore::with_snapshot(path.clone()).await?,
                    None => MemoryStore::new(),
                };
                Ok(Stores::from_memory(Arc::new(store)))
            }
            StoreMode::Database {
                url,
                max_connections,
            } => {
                info!("Using database store (max connections: {})", max_connections);
                let store = SqlStore::connect(url, *max_connections).await?;
                Ok(Stores::from_sql(Arc::new(store)))
            }
        }
    }
}
