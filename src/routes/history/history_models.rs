use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::aggregation::HistoryFilter;

#[derive(Deserialize)]
pub struct WorkingHoursRequest {
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct StaffHours {
    pub hours: i64,
    pub formatted: String,
}

#[derive(Serialize)]
pub struct WorkingHoursResponse {
    pub date: NaiveDate,
    pub total_hours: i64,
    pub formatted: String,
    pub by_staff: BTreeMap<String, StaffHours>,
}

// Monthly history request, month as YYYY-MM
#[derive(Deserialize)]
pub struct MonthlyHistoryRequest {
    pub month: String,
    #[serde(flatten)]
    pub filter: HistoryFilter,
}
