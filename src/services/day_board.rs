use std::sync::Arc;

use chrono::NaiveDate;
use log::{info, warn};

use crate::error::{AppError, Result, ValidationError};
use crate::models::task::{NewTask, Task, TaskFormData, TaskPatch, TaskStatus};
use crate::models::time_slot::{self, GridRow};
use crate::repository::TaskRepository;
use crate::services::aggregation::{self, TaskStats};
use crate::services::overlap::{find_overlap, Interval};

/// The tasks of one day as last read from the store, plus the operations that
/// change them.
///
/// Overlap checks run against this snapshot, not against the store, so two
/// boards loaded before either of them writes can both accept colliding tasks.
pub struct DayBoard {
    date: NaiveDate,
    tasks: Vec<Task>,
    repo: Arc<dyn TaskRepository>,
}

impl DayBoard {
    pub async fn load(repo: Arc<dyn TaskRepository>, date: NaiveDate) -> Result<Self> {
        let tasks = repo.list_by_date(date).await?;
        Ok(DayBoard { date, tasks, repo })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub async fn refetch(&mut self) -> Result<()> {
        self.tasks = self.repo.list_by_date(self.date).await?;
        Ok(())
    }

    pub async fn create(&mut self, data: TaskFormData, created_by: Option<String>) -> Result<Task> {
        let data = TaskFormData {
            staff_name: data.staff_name.trim().to_string(),
            ..data
        };
        if data.task_name.trim().is_empty() {
            return Err(ValidationError::MissingTaskName.into());
        }
        let candidate = Interval::new(&data.staff_name, data.start_hour, data.end_hour);
        validate_schedule(&candidate, &self.tasks, None)?;

        let task = self
            .repo
            .insert(NewTask::from_form(self.date, data, created_by))
            .await?;
        info!(
            "Created task {} for {} on {} ({}-{})",
            task.id, task.staff_name, task.date, task.start_hour, task.end_hour
        );
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub async fn update(&mut self, id: &str, mut patch: TaskPatch) -> Result<Task> {
        if let Some(staff_name) = patch.staff_name.as_mut() {
            *staff_name = staff_name.trim().to_string();
        }
        let current = self.find(id).await?;

        if let Some(task_name) = &patch.task_name {
            if task_name.trim().is_empty() {
                return Err(ValidationError::MissingTaskName.into());
            }
        }

        if patch.touches_schedule() {
            let staff_name = patch.staff_name.as_deref().unwrap_or(&current.staff_name);
            let candidate = Interval::new(
                staff_name,
                patch.start_hour.unwrap_or(current.start_hour),
                patch.end_hour.unwrap_or(current.end_hour),
            );
            if current.date == self.date {
                validate_schedule(&candidate, &self.tasks, Some(id))?;
            } else {
                let same_day = self.repo.list_by_date(current.date).await?;
                validate_schedule(&candidate, &same_day, Some(id))?;
            }
        }

        let updated = self.repo.update(id, &patch).await?;
        info!("Updated task {}", updated.id);
        self.replace(updated.clone());
        Ok(updated)
    }

    pub async fn update_status(&mut self, id: &str, status: TaskStatus) -> Result<Task> {
        let updated = self.update(id, TaskPatch::status(status)).await?;
        info!("Task {} is now {}", updated.id, status.label());
        Ok(updated)
    }

    /// Moves the task to the next status in the fixed cycle.
    pub async fn cycle_status(&mut self, id: &str) -> Result<Task> {
        let current = self.find(id).await?;
        self.update_status(id, current.status.next()).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.repo.delete(id).await?;
        info!("Deleted task {}", id);
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }

    pub fn tasks_for_staff(&self, staff_name: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.staff_name == staff_name)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> TaskStats {
        aggregation::task_stats(&self.tasks)
    }

    pub fn grid(&self, staff_names: &[String]) -> Vec<GridRow> {
        time_slot::day_grid(&self.tasks, staff_names)
    }

    async fn find(&self, id: &str) -> Result<Task> {
        if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
            return Ok(task.clone());
        }
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::TaskNotFound(id.to_string()))
    }

    fn replace(&mut self, task: Task) {
        let position = self.tasks.iter().position(|t| t.id == task.id);
        match (position, task.date == self.date) {
            (Some(i), true) => self.tasks[i] = task,
            (Some(i), false) => {
                self.tasks.remove(i);
            }
            (None, true) => self.tasks.push(task),
            (None, false) => {}
        }
    }
}

/// Staff name present, both hours on the grid, start before end, and no
/// collision with another task of the same staff member.
pub fn validate_schedule(
    candidate: &Interval<'_>,
    existing: &[Task],
    exclude_id: Option<&str>,
) -> std::result::Result<(), ValidationError> {
    if candidate.staff_name.trim().is_empty() {
        return Err(ValidationError::MissingStaffName);
    }
    for hour in [candidate.start_hour, candidate.end_hour] {
        if !time_slot::in_grid(hour) {
            return Err(ValidationError::OutsideGrid { hour });
        }
    }
    if candidate.start_hour >= candidate.end_hour {
        return Err(ValidationError::InvalidTimeRange {
            start_hour: candidate.start_hour,
            end_hour: candidate.end_hour,
        });
    }
    if let Some(conflict) = find_overlap(candidate, existing, exclude_id) {
        warn!(
            "Rejected {}-{} for {}: overlaps task {}",
            candidate.start_hour, candidate.end_hour, candidate.staff_name, conflict.id
        );
        return Err(ValidationError::TimeOverlap {
            staff_name: candidate.staff_name.to_string(),
            conflicting_task: format!(
                "{} {}時-{}時",
                conflict.task_name, conflict.start_hour, conflict.end_hour
            ),
        });
    }
    Ok(())
}
