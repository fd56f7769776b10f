#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;

use shift_board::models::task::{TaskFormData, TaskStatus};
use shift_board::repository::{MemoryStore, SqlStore, Stores};
use shift_board::state::AppState;

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn form(staff_name: &str, task_name: &str, start_hour: i32, end_hour: i32) -> TaskFormData {
    TaskFormData {
        staff_name: staff_name.to_string(),
        task_name: task_name.to_string(),
        start_hour,
        end_hour,
        status: None,
        wbs_code: None,
    }
}

pub fn full_form(
    staff_name: &str,
    task_name: &str,
    start_hour: i32,
    end_hour: i32,
    status: TaskStatus,
    wbs_code: &str,
) -> TaskFormData {
    TaskFormData {
        status: Some(status),
        wbs_code: Some(wbs_code.to_string()),
        ..form(staff_name, task_name, start_hour, end_hour)
    }
}

pub fn memory_stores() -> Stores {
    Stores::from_memory(Arc::new(MemoryStore::new()))
}

pub async fn sql_stores() -> Stores {
    let store = SqlStore::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory sqlite store");
    Stores::from_sql(Arc::new(store))
}

pub fn state(stores: Stores) -> AppState {
    AppState::new(stores)
}
