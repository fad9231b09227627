use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CategoryId;

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// The literal cycle the board uses when a row is clicked:
    /// low -> medium -> high -> low.
    pub fn cycled(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A row of the remote `tasks` table. `id` and `created_at` semantics follow
/// the store: the id is assigned server-side, the creation timestamp is
/// supplied by the client at insert time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    pub category_id: CategoryId,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub reminder: Option<NaiveTime>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AddTaskError {
    #[error("Select a category before adding a task")]
    NoCategorySelected,
    #[error("Task title cannot be empty")]
    EmptyTitle,
}

/// Insert payload for the `tasks` table; the store assigns the id.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub category_id: CategoryId,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl TaskDraft {
    /// Validates the add-task intent. Rejected drafts never reach the store.
    pub fn new(
        title: &str,
        selected_category: Option<CategoryId>,
        now: DateTime<Utc>,
    ) -> Result<Self, AddTaskError> {
        let category_id =
            selected_category.ok_or(AddTaskError::NoCategorySelected)?;
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(AddTaskError::EmptyTitle);
        }

        Ok(Self {
            title: trimmed.to_string(),
            category_id,
            completed: false,
            priority: Priority::Medium,
            created_at: now,
        })
    }
}

/// Partial update for a single task row. The outer `Option` means "leave the
/// column unchanged, do not send it"; the inner `Option` on nullable columns
/// distinguishes setting a value from clearing it to null.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Option<NaiveTime>>,
}

impl TaskPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }

    pub fn priority(value: Priority) -> Self {
        Self {
            priority: Some(value),
            ..Self::default()
        }
    }

    /// Assembles the notes-editor save. Empty input strings clear the
    /// matching column to null.
    pub fn notes_edit(notes: &str, due_date: &str, reminder: &str) -> Self {
        Self {
            completed: None,
            priority: None,
            notes: Some(if notes.is_empty() {
                None
            } else {
                Some(notes.to_string())
            }),
            due_date: Some(
                NaiveDate::parse_from_str(due_date, "%Y-%m-%d").ok(),
            ),
            reminder: Some(
                NaiveTime::parse_from_str(reminder, "%H:%M")
                    .or_else(|_| {
                        NaiveTime::parse_from_str(reminder, "%H:%M:%S")
                    })
                    .ok(),
            ),
        }
    }

    /// Merges the confirmed patch into an in-memory row.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(notes) = &self.notes {
            task.notes = notes.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(reminder) = self.reminder {
            task.reminder = reminder;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::{AddTaskError, Priority, Task, TaskDraft, TaskPatch};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn priority_cycle_is_a_fixed_three_cycle() {
        assert_eq!(Priority::Low.cycled(), Priority::Medium);
        assert_eq!(Priority::Medium.cycled(), Priority::High);
        assert_eq!(Priority::High.cycled(), Priority::Low);

        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(p.cycled().cycled().cycled(), p);
        }
    }

    #[test]
    fn draft_rejects_missing_category_and_blank_titles() {
        assert_eq!(
            TaskDraft::new("Buy milk", None, now()),
            Err(AddTaskError::NoCategorySelected)
        );
        assert_eq!(
            TaskDraft::new("   ", Some(1), now()),
            Err(AddTaskError::EmptyTitle)
        );
        assert_eq!(
            TaskDraft::new("", Some(1), now()),
            Err(AddTaskError::EmptyTitle)
        );
    }

    #[test]
    fn draft_trims_title_and_defaults_to_medium_priority() {
        let draft = TaskDraft::new("  Buy milk ", Some(1), now())
            .expect("valid draft");
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.category_id, 1);
        assert_eq!(draft.priority, Priority::Medium);
        assert!(!draft.completed);
    }

    #[test]
    fn patch_serializes_only_the_provided_columns() {
        let patch = TaskPatch::completed(true);
        let value = serde_json::to_value(&patch).expect("serialize patch");
        assert_eq!(value, serde_json::json!({ "completed": true }));

        let patch = TaskPatch::notes_edit("pick up oat milk", "2024-06-01", "");
        let value = serde_json::to_value(&patch).expect("serialize patch");
        assert_eq!(
            value,
            serde_json::json!({
                "notes": "pick up oat milk",
                "due_date": "2024-06-01",
                "reminder": null,
            })
        );
    }

    #[test]
    fn notes_edit_clears_columns_on_empty_input() {
        let patch = TaskPatch::notes_edit("", "", "");
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.reminder, Some(None));
        assert_eq!(patch.completed, None);
        assert_eq!(patch.priority, None);
    }

    #[test]
    fn patch_merge_updates_only_named_fields() {
        let mut task = Task {
            id: 7,
            title: "Water the plants".to_string(),
            category_id: 1,
            completed: false,
            priority: Priority::Medium,
            notes: Some("back porch first".to_string()),
            due_date: None,
            reminder: None,
            created_at: now(),
        };

        TaskPatch::priority(Priority::High).apply_to(&mut task);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.notes.as_deref(), Some("back porch first"));

        TaskPatch::notes_edit("", "2024-07-04", "08:00").apply_to(&mut task);
        assert_eq!(task.notes, None);
        assert_eq!(
            task.due_date,
            Some(chrono::NaiveDate::from_ymd_opt(2024, 7, 4).expect("date"))
        );
        assert!(task.reminder.is_some());
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn task_rows_round_trip_through_store_json() {
        let raw = serde_json::json!({
            "id": 3,
            "title": "Send invoices",
            "category_id": 2,
            "completed": false,
            "priority": "high",
            "notes": null,
            "due_date": "2024-06-01",
            "reminder": "14:30:00",
            "created_at": "2024-05-28T08:00:00Z",
        });

        let task: Task =
            serde_json::from_value(raw).expect("deserialize task row");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(
            task.due_date,
            Some(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"))
        );
    }
}
