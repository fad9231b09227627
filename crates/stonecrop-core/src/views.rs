use crate::category::{Category, CategoryKind, category_info};
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn all() -> [Self; 3] {
        [Self::All, Self::Active, Self::Completed]
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

pub fn filter_by_status(tasks: &[Task], filter: StatusFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

/// Partitions a task list into the personal and work groups. Orphaned
/// category references fall into the personal group via the lookup sentinel.
pub fn split_by_kind(
    tasks: &[Task],
    categories: &[Category],
) -> (Vec<Task>, Vec<Task>) {
    let mut personal = Vec::new();
    let mut work = Vec::new();
    for task in tasks {
        match category_info(categories, task.category_id).kind {
            CategoryKind::Personal => personal.push(task.clone()),
            CategoryKind::Work => work.push(task.clone()),
        }
    }
    (personal, work)
}

pub fn categories_of_kind(
    categories: &[Category],
    kind: CategoryKind,
) -> Vec<Category> {
    categories
        .iter()
        .filter(|category| category.kind == kind)
        .cloned()
        .collect()
}

/// Aggregate counts over the full in-memory list; recomputed per render,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

pub fn counts(tasks: &[Task]) -> Counts {
    let completed =
        tasks.iter().filter(|task| task.completed).count();
    Counts {
        total: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::{
        StatusFilter, counts, filter_by_status, split_by_kind,
    };
    use crate::category::{Category, CategoryKind};
    use crate::task::{Priority, Task};

    fn task(id: i64, category_id: i64, completed: bool) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            category_id,
            completed,
            priority: Priority::Medium,
            notes: None,
            due_date: None,
            reminder: None,
            created_at: Utc
                .with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 1,
                name: "Home".to_string(),
                kind: CategoryKind::Personal,
            },
            Category {
                id: 2,
                name: "Office".to_string(),
                kind: CategoryKind::Work,
            },
        ]
    }

    #[test]
    fn status_filter_partitions_and_all_is_identity() {
        let tasks =
            vec![task(1, 1, false), task(2, 1, true), task(3, 2, false)];

        let all = filter_by_status(&tasks, StatusFilter::All);
        assert_eq!(all, tasks);

        let active = filter_by_status(&tasks, StatusFilter::Active);
        assert_eq!(
            active.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        let completed = filter_by_status(&tasks, StatusFilter::Completed);
        assert_eq!(
            completed.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn kind_split_sends_orphans_to_personal() {
        let tasks =
            vec![task(1, 1, false), task(2, 2, false), task(3, 99, false)];

        let (personal, work) = split_by_kind(&tasks, &categories());
        assert_eq!(
            personal.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(work.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn counts_track_the_completion_split() {
        let tasks =
            vec![task(1, 1, false), task(2, 1, true), task(3, 2, true)];
        let c = counts(&tasks);
        assert_eq!(c.total, 3);
        assert_eq!(c.active, 1);
        assert_eq!(c.completed, 2);
    }
}
