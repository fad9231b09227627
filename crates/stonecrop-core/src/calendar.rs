use chrono::NaiveDate;

use crate::task::{Priority, Task};

/// Tasks whose due date falls on `day`. Date comparison is exact equality;
/// rows without a due date never match.
pub fn tasks_due_on(tasks: &[Task], day: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.due_date == Some(day))
        .cloned()
        .collect()
}

/// Per-day marker source: how many tasks are due on `day`. Zero means the
/// day renders without a marker.
pub fn due_count_on(tasks: &[Task], day: NaiveDate) -> usize {
    tasks
        .iter()
        .filter(|task| task.due_date == Some(day))
        .count()
}

/// Aggregates over the due-dated task set shown in the calendar's overview
/// panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DueOverview {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority_pending: usize,
}

pub fn due_overview(tasks: &[Task]) -> DueOverview {
    let mut overview = DueOverview::default();
    for task in tasks {
        overview.total += 1;
        if task.completed {
            overview.completed += 1;
        } else {
            overview.pending += 1;
            if task.priority == Priority::High {
                overview.high_priority_pending += 1;
            }
        }
    }
    overview
}
