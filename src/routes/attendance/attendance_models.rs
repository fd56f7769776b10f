use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::attendance::AttendanceSelection;

#[derive(Deserialize)]
pub struct AttendanceRequest {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct ToggleAttendanceRequest {
    pub date: NaiveDate,
    pub staff_name: String,
}

#[derive(Deserialize)]
pub struct SetAttendanceRequest {
    pub date: NaiveDate,
    pub selection: AttendanceSelection,
}

#[derive(Serialize)]
pub struct AttendanceResponse {
    pub date: NaiveDate,
    pub selection: AttendanceSelection,
    pub selected_names: Vec<String>,
}
