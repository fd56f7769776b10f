use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::models::task::{Task, TaskStatus};

pub fn working_hours(tasks: &[Task]) -> i64 {
    tasks.iter().map(Task::hours).sum()
}

pub fn working_hours_by_staff(tasks: &[Task]) -> BTreeMap<String, i64> {
    let mut hours = BTreeMap::new();
    for task in tasks {
        *hours.entry(task.staff_name.clone()).or_insert(0) += task.hours();
    }
    hours
}

/// Rounded percentage; an empty collection counts as 0%.
pub fn rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * completed as f64 / total as f64).round() as u32
}

pub fn completion_rate(tasks: &[Task]) -> u32 {
    rate(count_status(tasks, TaskStatus::Completed), tasks.len())
}

fn count_status(tasks: &[Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|t| t.status == status).count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub pending: usize,
    pub completion_rate: u32,
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    TaskStats {
        total: tasks.len(),
        completed: count_status(tasks, TaskStatus::Completed),
        in_progress: count_status(tasks, TaskStatus::Progress),
        not_started: count_status(tasks, TaskStatus::NotStarted),
        pending: count_status(tasks, TaskStatus::Pending),
        completion_rate: completion_rate(tasks),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub total_hours: i64,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: u32,
}

pub fn day_record(date: NaiveDate, tasks: &[Task]) -> DayRecord {
    DayRecord {
        date,
        total_hours: working_hours(tasks),
        total_tasks: tasks.len(),
        completed_tasks: count_status(tasks, TaskStatus::Completed),
        completion_rate: completion_rate(tasks),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub month: String,
    pub total_days: usize,
    pub total_hours: i64,
    pub average_hours: f64,
    pub total_tasks: usize,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyHistory {
    pub records: Vec<DayRecord>,
    pub stats: Option<MonthlyStats>,
}

/// Whose history is being looked at. A task belongs to the person when either
/// its staff name or its owner matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    #[serde(default)]
    pub staff_name: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.staff_name.is_none() && self.created_by.is_none() {
            return true;
        }
        let by_name = self.staff_name.as_deref() == Some(task.staff_name.as_str());
        let by_owner = self.created_by.is_some() && self.created_by == task.created_by;
        by_name || by_owner
    }
}

/// A calendar month written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn parse(s: &str) -> Result<Month> {
        let invalid = || ValidationError::InvalidMonth(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        Ok(Month { year, month })
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Day records (newest first) for days with work, plus totals for the month.
pub fn monthly_history(month: Month, tasks: &[Task], filter: &HistoryFilter) -> MonthlyHistory {
    let mut by_day: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for task in tasks
        .iter()
        .filter(|t| month.contains(t.date) && filter.matches(t))
    {
        by_day.entry(task.date).or_default().push(task.clone());
    }
    let records: Vec<DayRecord> = by_day
        .iter()
        .rev()
        .map(|(date, day_tasks)| day_record(*date, day_tasks))
        .collect();

    let stats = (!records.is_empty()).then(|| {
        let total_hours: i64 = records.iter().map(|r| r.total_hours).sum();
        let total_tasks: usize = records.iter().map(|r| r.total_tasks).sum();
        let total_completed: usize = records.iter().map(|r| r.completed_tasks).sum();
        MonthlyStats {
            month: month.to_string(),
            total_days: records.len(),
            total_hours,
            average_hours: total_hours as f64 / records.len() as f64,
            total_tasks,
            completion_rate: rate(total_completed, total_tasks),
        }
    });

    MonthlyHistory { records, stats }
}

/// `1.5` → `"1時間30分"`, `0.5` → `"30分"`, `3.0` → `"3時間"`.
pub fn format_working_hours(hours: f64) -> String {
    if hours == 0.0 {
        return "0時間".to_string();
    }
    if hours < 1.0 {
        return format!("{}分", (hours * 60.0).round() as i64);
    }

    let whole_hours = hours.floor() as i64;
    let minutes = ((hours - hours.floor()) * 60.0).round() as i64;
    if minutes == 0 {
        format!("{}時間", whole_hours)
    } else {
        format!("{}時間{}分", whole_hours, minutes)
    }
}
