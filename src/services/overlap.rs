use crate::models::task::Task;

/// The part of a task that decides whether it collides with another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval<'a> {
    pub staff_name: &'a str,
    pub start_hour: i32,
    pub end_hour: i32,
}

impl<'a> Interval<'a> {
    pub fn new(staff_name: &'a str, start_hour: i32, end_hour: i32) -> Self {
        Interval {
            staff_name,
            start_hour,
            end_hour,
        }
    }

    /// Half-open intersection: [9,10) and [10,11) do not collide.
    pub fn intersects(&self, task: &Task) -> bool {
        self.start_hour < task.end_hour && self.end_hour > task.start_hour
    }
}

/// First task of the same staff member that collides with `candidate`.
/// The task with id `exclude_id` (the one being edited) is skipped.
pub fn find_overlap<'t>(
    candidate: &Interval<'_>,
    existing: &'t [Task],
    exclude_id: Option<&str>,
) -> Option<&'t Task> {
    existing
        .iter()
        .filter(|t| exclude_id != Some(t.id.as_str()))
        .filter(|t| t.staff_name == candidate.staff_name)
        .find(|t| candidate.intersects(t))
}

pub fn has_overlap(candidate: &Interval<'_>, existing: &[Task], exclude_id: Option<&str>) -> bool {
    find_overlap(candidate, existing, exclude_id).is_some()
}
