use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::task::{TaskFormData, TaskPatch, TaskStatus};
use crate::models::time_slot::{GridRow, TimeSlot};
use crate::services::aggregation::TaskStats;

// Task list request
#[derive(Deserialize)]
pub struct ListTasksRequest {
    pub date: NaiveDate,
}

// Add task request
#[derive(Deserialize)]
pub struct AddTaskRequest {
    pub date: NaiveDate,
    pub task: TaskFormData,
}

// Update task request
#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub date: NaiveDate,
    pub id: String,
    pub changes: TaskPatch,
}

#[derive(Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub date: NaiveDate,
    pub id: String,
    pub status: TaskStatus,
}

// Used by cycle-status and delete
#[derive(Deserialize)]
pub struct TaskIdRequest {
    pub date: NaiveDate,
    pub id: String,
}

#[derive(Deserialize)]
pub struct StaffTasksRequest {
    pub date: NaiveDate,
    pub staff_name: String,
}

#[derive(Serialize)]
pub struct DeleteTaskResponse {
    pub id: String,
}

// Board request and response
#[derive(Deserialize)]
pub struct BoardRequest {
    pub date: NaiveDate,
    // defaults to the staff marked as working that day
    #[serde(default)]
    pub staff_names: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct BoardResponse {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
    pub rows: Vec<GridRow>,
    pub stats: TaskStats,
    pub working_hours_by_staff: BTreeMap<String, i64>,
}
