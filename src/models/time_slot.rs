use serde::Serialize;

use crate::models::task::Task;

pub const GRID_START_HOUR: i32 = 8;
pub const GRID_END_HOUR: i32 = 22;
pub const SLOT_COUNT: usize = (GRID_END_HOUR - GRID_START_HOUR) as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: i32,
    pub end: i32,
    pub label: String,
}

pub fn time_slots() -> Vec<TimeSlot> {
    (GRID_START_HOUR..GRID_END_HOUR)
        .map(|start| TimeSlot {
            start,
            end: start + 1,
            label: format!("{}:00-{}:00", start, start + 1),
        })
        .collect()
}

pub fn in_grid(hour: i32) -> bool {
    (GRID_START_HOUR..=GRID_END_HOUR).contains(&hour)
}

/// The task of `staff_name` covering `hour`, if any.
pub fn task_at<'a>(tasks: &'a [Task], staff_name: &str, hour: i32) -> Option<&'a Task> {
    tasks
        .iter()
        .find(|t| t.staff_name == staff_name && t.start_hour <= hour && t.end_hour > hour)
}

pub fn is_task_start(task: &Task, hour: i32) -> bool {
    task.start_hour == hour
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub staff_name: String,
    pub cells: Vec<Option<String>>,
    /// True where a task begins, so the label is drawn once per block.
    pub starts: Vec<bool>,
    pub working_hours: i64,
}

/// One row per staff name, one cell per slot holding the covering task id.
pub fn day_grid(tasks: &[Task], staff_names: &[String]) -> Vec<GridRow> {
    staff_names
        .iter()
        .map(|name| {
            let covering: Vec<Option<&Task>> = time_slots()
                .iter()
                .map(|slot| task_at(tasks, name, slot.start))
                .collect();
            let starts = time_slots()
                .iter()
                .zip(&covering)
                .map(|(slot, task)| task.map_or(false, |t| is_task_start(t, slot.start)))
                .collect();
            let cells = covering.iter().map(|t| t.map(|t| t.id.clone())).collect();
            let working_hours = tasks
                .iter()
                .filter(|t| &t.staff_name == name)
                .map(Task::hours)
                .sum();
            GridRow {
                staff_name: name.clone(),
                cells,
                starts,
                working_hours,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;
    use chrono::{NaiveDate, Utc};

    fn task(id: &str, staff: &str, start: i32, end: i32) -> Task {
        Task {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            staff_name: staff.into(),
            task_name: "作業".into(),
            start_hour: start,
            end_hour: end,
            status: TaskStatus::NotStarted,
            wbs_code: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn fourteen_hourly_slots() {
        let slots = time_slots();
        assert_eq!(slots.len(), SLOT_COUNT);
        assert_eq!(slots[0].label, "8:00-9:00");
        assert_eq!(slots[13].label, "21:00-22:00");
        assert_eq!(slots[13].end, GRID_END_HOUR);
    }

    #[test]
    fn grid_bounds_are_inclusive() {
        assert!(in_grid(8));
        assert!(in_grid(22));
        assert!(!in_grid(7));
        assert!(!in_grid(23));
    }

    #[test]
    fn task_at_uses_half_open_interval() {
        let tasks = vec![task("a", "Taro", 9, 11)];
        assert!(task_at(&tasks, "Taro", 8).is_none());
        assert_eq!(task_at(&tasks, "Taro", 9).map(|t| t.id.as_str()), Some("a"));
        assert_eq!(task_at(&tasks, "Taro", 10).map(|t| t.id.as_str()), Some("a"));
        assert!(task_at(&tasks, "Taro", 11).is_none());
        assert!(task_at(&tasks, "Hanako", 9).is_none());
        assert!(is_task_start(&tasks[0], 9));
        assert!(!is_task_start(&tasks[0], 10));
    }

    #[test]
    fn day_grid_fills_cells_per_staff() {
        let tasks = vec![task("a", "Taro", 9, 11), task("b", "Hanako", 20, 22)];
        let rows = day_grid(&tasks, &["Taro".to_string(), "Hanako".to_string()]);

        assert_eq!(rows[0].cells.len(), SLOT_COUNT);
        assert_eq!(rows[0].cells[1].as_deref(), Some("a"));
        assert_eq!(rows[0].cells[2].as_deref(), Some("a"));
        assert_eq!(rows[0].cells[3], None);
        assert!(rows[0].starts[1]);
        assert!(!rows[0].starts[2]);
        assert!(!rows[0].starts[0]);
        assert_eq!(rows[0].working_hours, 2);
        assert_eq!(rows[1].cells[13].as_deref(), Some("b"));
    }
}
