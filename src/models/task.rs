use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    Progress,
    Completed,
    Pending,
}

impl TaskStatus {
    /// Order used when the status badge is clicked.
    pub const CYCLE: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::Progress,
        TaskStatus::Completed,
        TaskStatus::Pending,
    ];

    pub fn next(self) -> TaskStatus {
        let index = Self::CYCLE.iter().position(|s| *s == self).unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::Progress => "progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Pending => "pending",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "未着手",
            TaskStatus::Progress => "進行中",
            TaskStatus::Completed => "完了",
            TaskStatus::Pending => "保留",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-started" => Ok(TaskStatus::NotStarted),
            "progress" => Ok(TaskStatus::Progress),
            "completed" => Ok(TaskStatus::Completed),
            "pending" => Ok(TaskStatus::Pending),
            other => Err(AppError::Corrupt(format!("unknown task status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub date: NaiveDate,
    pub staff_name: String,
    pub task_name: String,
    pub start_hour: i32,
    pub end_hour: i32,
    pub status: TaskStatus,
    pub wbs_code: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn hours(&self) -> i64 {
        i64::from(self.end_hour - self.start_hour)
    }

    /// Applies a patch in place. Callers validate the result first.
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(staff_name) = &patch.staff_name {
            self.staff_name = staff_name.clone();
        }
        if let Some(task_name) = &patch.task_name {
            self.task_name = task_name.clone();
        }
        if let Some(start_hour) = patch.start_hour {
            self.start_hour = start_hour;
        }
        if let Some(end_hour) = patch.end_hour {
            self.end_hour = end_hour;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(wbs_code) = &patch.wbs_code {
            self.wbs_code = normalize_wbs(Some(wbs_code.as_str()));
        }
        self.updated_at = now;
    }
}

/// Form payload used by the create and edit dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFormData {
    pub staff_name: String,
    pub task_name: String,
    pub start_hour: i32,
    pub end_hour: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbs_code: Option<String>,
}

/// Partial update. An empty `wbs_code` clears the label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_hour: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbs_code: Option<String>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        }
    }

    pub fn touches_schedule(&self) -> bool {
        self.staff_name.is_some() || self.start_hour.is_some() || self.end_hour.is_some()
    }
}

impl From<TaskFormData> for TaskPatch {
    fn from(data: TaskFormData) -> Self {
        TaskPatch {
            staff_name: Some(data.staff_name),
            task_name: Some(data.task_name),
            start_hour: Some(data.start_hour),
            end_hour: Some(data.end_hour),
            status: data.status,
            wbs_code: data.wbs_code,
        }
    }
}

/// A validated task ready to be stored; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: NaiveDate,
    pub staff_name: String,
    pub task_name: String,
    pub start_hour: i32,
    pub end_hour: i32,
    pub status: TaskStatus,
    pub wbs_code: Option<String>,
    pub created_by: Option<String>,
}

impl NewTask {
    pub fn from_form(date: NaiveDate, data: TaskFormData, created_by: Option<String>) -> Self {
        NewTask {
            date,
            staff_name: data.staff_name,
            task_name: data.task_name,
            start_hour: data.start_hour,
            end_hour: data.end_hour,
            status: data.status.unwrap_or_default(),
            wbs_code: normalize_wbs(data.wbs_code.as_deref()),
            created_by,
        }
    }

    pub fn into_task(self, id: String, now: DateTime<Utc>) -> Task {
        Task {
            id,
            date: self.date,
            staff_name: self.staff_name,
            task_name: self.task_name,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            status: self.status,
            wbs_code: self.wbs_code,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn normalize_wbs(code: Option<&str>) -> Option<String> {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_cycles_return_to_not_started() {
        let mut status = TaskStatus::NotStarted;
        let mut seen = Vec::new();
        for _ in 0..4 {
            status = status.next();
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                TaskStatus::Progress,
                TaskStatus::Completed,
                TaskStatus::Pending,
                TaskStatus::NotStarted
            ]
        );
    }

    #[test]
    fn every_status_has_a_display_label() {
        let labels: Vec<&str> = TaskStatus::CYCLE.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["未着手", "進行中", "完了", "保留"]);
    }

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&TaskStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
        let parsed: TaskStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, TaskStatus::Pending);
        assert_eq!("progress".parse::<TaskStatus>().unwrap(), TaskStatus::Progress);
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn form_data_optional_fields_may_be_omitted() {
        let data: TaskFormData = serde_json::from_str(
            r#"{"staff_name":"Taro","task_name":"棚卸し","start_hour":9,"end_hour":11}"#,
        )
        .unwrap();
        assert_eq!(data.status, None);
        assert_eq!(data.wbs_code, None);

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let new_task = NewTask::from_form(date, data, None);
        assert_eq!(new_task.status, TaskStatus::NotStarted);
    }

    #[test]
    fn blank_wbs_codes_are_dropped() {
        assert_eq!(normalize_wbs(Some("  ")), None);
        assert_eq!(normalize_wbs(Some(" A-1 ")), Some("A-1".to_string()));
        assert_eq!(normalize_wbs(None), None);
    }
}
