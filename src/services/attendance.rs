use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tokio::sync::RwLock;

/// staff name → working or not, for one day.
pub type AttendanceSelection = BTreeMap<String, bool>;

/// Who is marked as working, per day. Lives only as long as the process.
#[derive(Debug, Default)]
pub struct AttendanceBook {
    days: RwLock<HashMap<NaiveDate, AttendanceSelection>>,
}

impl AttendanceBook {
    pub fn new() -> Self {
        AttendanceBook::default()
    }

    pub async fn selection(&self, date: NaiveDate) -> AttendanceSelection {
        let days = self.days.read().await;
        days.get(&date).cloned().unwrap_or_default()
    }

    /// Names marked as working, in name order.
    pub async fn selected_names(&self, date: NaiveDate) -> Vec<String> {
        let days = self.days.read().await;
        days.get(&date)
            .map(|selection| {
                selection
                    .iter()
                    .filter(|(_, working)| **working)
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Flips one staff member and returns the new value.
    pub async fn toggle(&self, date: NaiveDate, staff_name: &str) -> bool {
        let mut days = self.days.write().await;
        let working = days
            .entry(date)
            .or_default()
            .entry(staff_name.to_string())
            .or_insert(false);
        *working = !*working;
        *working
    }

    pub async fn set(&self, date: NaiveDate, selection: AttendanceSelection) {
        let mut days = self.days.write().await;
        days.insert(date, selection);
    }

    pub async fn clear(&self, date: NaiveDate) {
        let mut days = self.days.write().await;
        days.remove(&date);
    }

    /// Drops a staff member from every day, used when the member is deleted.
    pub async fn remove_staff(&self, staff_name: &str) {
        let mut days = self.days.write().await;
        for selection in days.values_mut() {
            selection.remove(staff_name);
        }
    }
}
