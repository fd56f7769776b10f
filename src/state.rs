use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;
use crate::repository::{StaffRepository, Stores, TaskRepository};
use crate::services::attendance::AttendanceBook;
use crate::services::day_board::DayBoard;
use crate::services::roster::StaffRoster;

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub attendance: Arc<AttendanceBook>,
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        AppState {
            tasks: stores.tasks,
            staff: stores.staff,
            attendance: Arc::new(AttendanceBook::new()),
        }
    }

    pub async fn board(&self, date: NaiveDate) -> Result<DayBoard> {
        DayBoard::load(self.tasks.clone(), date).await
    }

    pub fn roster(&self) -> StaffRoster {
        StaffRoster::new(self.staff.clone(), self.tasks.clone(), self.attendance.clone())
    }
}
