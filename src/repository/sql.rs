use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::{error, info};
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use uuid::Uuid;

use super::{sort_staff, sort_tasks, StaffRepository, TaskRepository};
use crate::error::{AppError, Result};
use crate::models::staff_member::{NewStaffMember, StaffMember};
use crate::models::task::{NewTask, Task, TaskPatch};

const CREATE_STAFF_MEMBERS: &str = "
    CREATE TABLE IF NOT EXISTS staff_members (
        id VARCHAR(36) NOT NULL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NULL,
        user_id VARCHAR(255) NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at VARCHAR(40) NOT NULL,
        updated_at VARCHAR(40) NOT NULL
    )";

const CREATE_TASKS: &str = "
    CREATE TABLE IF NOT EXISTS tasks (
        id VARCHAR(36) NOT NULL PRIMARY KEY,
        date VARCHAR(10) NOT NULL,
        staff_name VARCHAR(255) NOT NULL,
        task_name VARCHAR(255) NOT NULL,
        start_hour INTEGER NOT NULL,
        end_hour INTEGER NOT NULL,
        status VARCHAR(16) NOT NULL,
        wbs_code VARCHAR(255) NULL,
        created_by VARCHAR(255) NULL,
        created_at VARCHAR(40) NOT NULL,
        updated_at VARCHAR(40) NOT NULL
    )";

const TASK_COLUMNS: &str = "id, date, staff_name, task_name, start_hour, end_hour, status, \
                            wbs_code, created_by, created_at, updated_at";

const STAFF_COLUMNS: &str = "id, name, email, user_id, is_active, created_at, updated_at";

/// Database-backed store. Uses `?` placeholders, so MySQL and SQLite URLs both
/// work. Dates and timestamps are kept as text.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: AnyPool,
}

impl SqlStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let mut options = AnyPoolOptions::new().max_connections(max_connections);
        // Every connection to an in-memory SQLite database is a separate database.
        if database_url.contains(":memory:") {
            options = options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = options.connect(database_url).await.map_err(|e| {
            error!("Failed to create pool: {}", e);
            AppError::Database(e)
        })?;

        let store = SqlStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Creates the tables this service needs when they are missing.
    pub async fn migrate(&self) -> Result<()> {
        for statement in [CREATE_STAFF_MEMBERS, CREATE_TASKS] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is ready");
        Ok(())
    }

    async fn fetch_task(&self, id: &str) -> Result<Option<Task>> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(task_from_row).transpose()
    }

    async fn fetch_staff(&self, id: &str) -> Result<Option<StaffMember>> {
        let sql = format!("SELECT {} FROM staff_members WHERE id = ?", STAFF_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(staff_from_row).transpose()
    }

    /// Overwrites the stored row. `updated_at` always changes, so a matching
    /// row is always counted; zero rows means it was deleted after the read.
    async fn write_task(&self, task: &Task) -> Result<()> {
        let result = sqlx::query(
            "UPDATE tasks SET staff_name = ?, task_name = ?, start_hour = ?, end_hour = ?, \
             status = ?, wbs_code = ?, updated_at = ? WHERE id = ?",
        )
        .bind(task.staff_name.clone())
        .bind(task.task_name.clone())
        .bind(i64::from(task.start_hour))
        .bind(i64::from(task.end_hour))
        .bind(task.status.as_str().to_string())
        .bind(task.wbs_code.clone())
        .bind(format_timestamp(task.updated_at))
        .bind(task.id.clone())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::TaskNotFound(task.id.clone()));
        }
        Ok(())
    }

    async fn write_staff_name(&self, member: &StaffMember) -> Result<()> {
        let result = sqlx::query("UPDATE staff_members SET name = ?, updated_at = ? WHERE id = ?")
            .bind(member.name.clone())
            .bind(format_timestamp(member.updated_at))
            .bind(member.id.clone())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::StaffNotFound(member.id.clone()));
        }
        Ok(())
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::Corrupt(format!("date '{}': {}", value, e)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::Corrupt(format!("timestamp '{}': {}", value, e)))
}

fn hour_from_row(row: &AnyRow, column: &str) -> Result<i32> {
    let hour: i64 = row.try_get(column)?;
    i32::try_from(hour).map_err(|_| AppError::Corrupt(format!("{} out of range: {}", column, hour)))
}

fn task_from_row(row: &AnyRow) -> Result<Task> {
    let date: String = row.try_get("date")?;
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Task {
        id: row.try_get("id")?,
        date: parse_date(&date)?,
        staff_name: row.try_get("staff_name")?,
        task_name: row.try_get("task_name")?,
        start_hour: hour_from_row(row, "start_hour")?,
        end_hour: hour_from_row(row, "end_hour")?,
        status: status.parse()?,
        wbs_code: row.try_get("wbs_code")?,
        created_by: row.try_get("created_by")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn staff_from_row(row: &AnyRow) -> Result<StaffMember> {
    let is_active: i64 = row.try_get("is_active")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(StaffMember {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        user_id: row.try_get("user_id")?,
        is_active: is_active != 0,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[async_trait]
impl TaskRepository for SqlStore {
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Task>> {
        self.list_between(date, date).await
    }

    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE date >= ? AND date <= ?",
            TASK_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(format_date(from))
            .bind(format_date(to))
            .fetch_all(&self.pool)
            .await?;

        let mut tasks = rows.iter().map(task_from_row).collect::<Result<Vec<_>>>()?;
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    async fn get(&self, id: &str) -> Result<Option<Task>> {
        self.fetch_task(id).await
    }

    async fn insert(&self, task: NewTask) -> Result<Task> {
        let task = task.into_task(Uuid::new_v4().to_string(), Utc::now());
        let sql = format!(
            "INSERT INTO tasks ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TASK_COLUMNS
        );
        sqlx::query(&sql)
            .bind(task.id.clone())
            .bind(format_date(task.date))
            .bind(task.staff_name.clone())
            .bind(task.task_name.clone())
            .bind(i64::from(task.start_hour))
            .bind(i64::from(task.end_hour))
            .bind(task.status.as_str().to_string())
            .bind(task.wbs_code.clone())
            .bind(task.created_by.clone())
            .bind(format_timestamp(task.created_at))
            .bind(format_timestamp(task.updated_at))
            .execute(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let mut task = self
            .fetch_task(id)
            .await?
            .ok_or_else(|| AppError::TaskNotFound(id.to_string()))?;
        task.apply(patch, Utc::now());

        self.write_task(&task).await?;
        Ok(task)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_by_staff(&self, staff_name: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE staff_name = ?")
            .bind(staff_name.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl StaffRepository for SqlStore {
    async fn list_active(&self) -> Result<Vec<StaffMember>> {
        let sql = format!(
            "SELECT {} FROM staff_members WHERE is_active = 1",
            STAFF_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut staff = rows.iter().map(staff_from_row).collect::<Result<Vec<_>>>()?;
        sort_staff(&mut staff);
        Ok(staff)
    }

    async fn get(&self, id: &str) -> Result<Option<StaffMember>> {
        self.fetch_staff(id).await
    }

    async fn insert(&self, member: NewStaffMember) -> Result<StaffMember> {
        let member = member.into_member(Uuid::new_v4().to_string(), Utc::now());
        let sql = format!(
            "INSERT INTO staff_members ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            STAFF_COLUMNS
        );
        sqlx::query(&sql)
            .bind(member.id.clone())
            .bind(member.name.clone())
            .bind(member.email.clone())
            .bind(member.user_id.clone())
            .bind(1_i64)
            .bind(format_timestamp(member.created_at))
            .bind(format_timestamp(member.updated_at))
            .execute(&self.pool)
            .await?;
        Ok(member)
    }

    async fn rename(&self, id: &str, name: &str) -> Result<StaffMember> {
        let mut member = self
            .fetch_staff(id)
            .await?
            .ok_or_else(|| AppError::StaffNotFound(id.to_string()))?;
        member.name = name.to_string();
        member.updated_at = Utc::now();

        self.write_staff_name(&member).await?;
        Ok(member)
    }

    async fn deactivate(&self, ids: &[String]) -> Result<u64> {
        let now = format_timestamp(Utc::now());
        let mut changed = 0;
        for id in ids {
            let result = sqlx::query(
                "UPDATE staff_members SET is_active = 0, updated_at = ? \
                 WHERE id = ? AND is_active = 1",
            )
            .bind(now.clone())
            .bind(id.clone())
            .execute(&self.pool)
            .await?;
            changed += result.rows_affected();
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_keep_nanoseconds() {
        let ts = Utc::now();
        assert_eq!(parse_timestamp(&format_timestamp(ts)).unwrap(), ts);
    }

    #[test]
    fn malformed_values_are_corrupt() {
        assert!(matches!(parse_date("2024/01/01"), Err(AppError::Corrupt(_))));
        assert!(matches!(parse_timestamp("yesterday"), Err(AppError::Corrupt(_))));
    }

    #[tokio::test]
    async fn writing_a_vanished_row_is_not_found() {
        let store = SqlStore::connect("sqlite::memory:", 1).await.unwrap();
        let task = NewTask {
            date: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            staff_name: "Taro".into(),
            task_name: "棚卸し".into(),
            start_hour: 9,
            end_hour: 10,
            status: Default::default(),
            wbs_code: None,
            created_by: None,
        }
        .into_task("gone".into(), Utc::now());
        assert!(matches!(
            store.write_task(&task).await,
            Err(AppError::TaskNotFound(id)) if id == "gone"
        ));

        let member = NewStaffMember::named("Taro").into_member("gone".into(), Utc::now());
        assert!(matches!(
            store.write_staff_name(&member).await,
            Err(AppError::StaffNotFound(_))
        ));
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let store = SqlStore::connect("sqlite::memory:", 1).await.unwrap();
        store.migrate().await.unwrap();
        assert!(store.list_active().await.unwrap().is_empty());
    }
}
