use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::category::{Category, CategoryId};
use crate::task::{Priority, Task, TaskId, TaskPatch};

/// In-memory mirror of the two remote tables plus the transient UI state
/// that is keyed to it: the selected category and the per-task notes flags.
///
/// The board never talks to the store itself. The UI issues the remote call
/// and, on success, applies the matching transition here; after operations
/// that need server-assigned state it refreshes wholesale via
/// [`Board::replace_data`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub tasks: Vec<Task>,
    pub categories: Vec<Category>,
    pub selected_category: Option<CategoryId>,
    pub expanded_notes: BTreeMap<TaskId, bool>,
    pub editing_notes: BTreeMap<TaskId, bool>,
}

impl Board {
    /// Wholesale refresh from a full reload. Keeps the selected category
    /// when it still exists in the returned list; otherwise selects the
    /// first returned category, or clears the selection.
    pub fn replace_data(
        &mut self,
        tasks: Vec<Task>,
        categories: Vec<Category>,
    ) {
        self.replace_tasks(tasks);
        self.replace_categories(categories);
    }

    /// Each half of the paired fetch is applied independently: a failed
    /// categories read must not discard freshly loaded tasks, and vice
    /// versa.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        info!(tasks = tasks.len(), "replacing task list");
        self.tasks = tasks;
    }

    pub fn replace_categories(&mut self, categories: Vec<Category>) {
        info!(categories = categories.len(), "replacing category list");
        self.categories = categories;

        // A selection that no longer resolves (deleted out from under us,
        // or nothing selected yet) falls back to the first category.
        let resolves = self.selected_category.is_some_and(|id| {
            self.categories.iter().any(|category| category.id == id)
        });
        if !resolves {
            let next = self.categories.first().map(|category| category.id);
            debug!(?next, "reassigning selected category");
            self.selected_category = next;
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Patch flipping the completion flag of `id`, or `None` for an unknown
    /// task. The second element reports whether this is the transition to
    /// completed (the one that triggers the celebration effect).
    pub fn toggle_patch(&self, id: TaskId) -> Option<(TaskPatch, bool)> {
        let task = self.task(id)?;
        let next = !task.completed;
        Some((TaskPatch::completed(next), next))
    }

    /// Patch advancing the priority of `id` one step along the fixed cycle.
    pub fn cycle_patch(&self, id: TaskId) -> Option<TaskPatch> {
        let task = self.task(id)?;
        Some(TaskPatch::priority(task.priority.cycled()))
    }

    pub fn priority_of(&self, id: TaskId) -> Option<Priority> {
        self.task(id).map(|task| task.priority)
    }

    /// Merges a store-confirmed patch into the in-memory row.
    pub fn apply_patch(&mut self, id: TaskId, patch: &TaskPatch) {
        if let Some(task) =
            self.tasks.iter_mut().find(|task| task.id == id)
        {
            debug!(task_id = id, "applying confirmed patch");
            patch.apply_to(task);
        }
    }

    /// Removes a task and the UI-flag keys tied to it.
    pub fn remove_task(&mut self, id: TaskId) {
        info!(task_id = id, "removing task");
        self.tasks.retain(|task| task.id != id);
        self.expanded_notes.remove(&id);
        self.editing_notes.remove(&id);
    }

    /// The exact id set a clear-completed call targets. May be empty; the
    /// batched remote delete is issued either way (preserved behavior).
    pub fn completed_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|task| task.completed)
            .map(|task| task.id)
            .collect()
    }

    pub fn remove_tasks(&mut self, ids: &[TaskId]) {
        info!(count = ids.len(), "removing completed tasks");
        self.tasks.retain(|task| !ids.contains(&task.id));
        for id in ids {
            self.expanded_notes.remove(id);
            self.editing_notes.remove(id);
        }
    }

    /// Drops a category. When the deleted category was the selected one, the
    /// selection moves to the first remaining category, or clears if none
    /// remain. Tasks referencing it are left alone and become orphans.
    pub fn remove_category(&mut self, id: CategoryId) {
        info!(category_id = id, "removing category");
        self.categories.retain(|category| category.id != id);

        if self.selected_category == Some(id) {
            let next = self.categories.first().map(|category| category.id);
            debug!(?next, "reassigning selected category");
            self.selected_category = next;
        }
    }

    pub fn notes_expanded(&self, id: TaskId) -> bool {
        self.expanded_notes.get(&id).copied().unwrap_or(false)
    }

    pub fn notes_editing(&self, id: TaskId) -> bool {
        self.editing_notes.get(&id).copied().unwrap_or(false)
    }

    pub fn toggle_notes(&mut self, id: TaskId) {
        let flag = self.expanded_notes.entry(id).or_insert(false);
        *flag = !*flag;
    }

    pub fn start_editing(&mut self, id: TaskId) {
        self.editing_notes.insert(id, true);
    }

    pub fn stop_editing(&mut self, id: TaskId) {
        self.editing_notes.insert(id, false);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::Board;
    use crate::category::{Category, CategoryKind};
    use crate::task::{Priority, Task};

    fn task(id: i64, completed: bool) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            category_id: 1,
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

    fn category(id: i64, name: &str, kind: CategoryKind) -> Category {
        Category {
            id,
            name: name.to_string(),
            kind,
        }
    }

    #[test]
    fn replace_selects_the_first_category_only_when_none_is_selected() {
        let mut board = Board::default();
        board.replace_data(
            vec![],
            vec![
                category(5, "Home", CategoryKind::Personal),
                category(6, "Office", CategoryKind::Work),
            ],
        );
        assert_eq!(board.selected_category, Some(5));

        board.selected_category = Some(6);
        board.replace_data(
            vec![],
            vec![
                category(5, "Home", CategoryKind::Personal),
                category(6, "Office", CategoryKind::Work),
            ],
        );
        assert_eq!(board.selected_category, Some(6));
    }

    #[test]
    fn reload_drops_a_selection_that_no_longer_resolves() {
        // A stale board can still point at a category deleted remotely;
        // the next reload must move the selection, not keep the dangling id.
        let mut board = Board::default();
        board.selected_category = Some(1);
        board.replace_data(
            vec![],
            vec![category(2, "Office", CategoryKind::Work)],
        );
        assert_eq!(board.selected_category, Some(2));

        board.selected_category = Some(2);
        board.replace_data(vec![], vec![]);
        assert_eq!(board.selected_category, None);
    }

    #[test]
    fn double_toggle_returns_to_the_original_state_with_two_patches() {
        let mut board = Board::default();
        board.replace_data(
            vec![task(1, false)],
            vec![category(1, "Home", CategoryKind::Personal)],
        );

        let mut patches = Vec::new();

        let (first, celebrated) =
            board.toggle_patch(1).expect("patch for known task");
        assert!(celebrated);
        board.apply_patch(1, &first);
        patches.push(first);
        assert!(board.task(1).expect("task").completed);

        let (second, celebrated) =
            board.toggle_patch(1).expect("patch for known task");
        assert!(!celebrated);
        board.apply_patch(1, &second);
        patches.push(second);

        assert_eq!(patches.len(), 2);
        assert!(!board.task(1).expect("task").completed);
    }

    #[test]
    fn remove_task_discards_its_ui_flags() {
        let mut board = Board::default();
        board.replace_data(
            vec![task(1, false), task(2, false)],
            vec![category(1, "Home", CategoryKind::Personal)],
        );
        board.toggle_notes(1);
        board.start_editing(1);
        board.toggle_notes(2);

        board.remove_task(1);

        assert!(board.task(1).is_none());
        assert!(!board.expanded_notes.contains_key(&1));
        assert!(!board.editing_notes.contains_key(&1));
        assert!(board.notes_expanded(2));
    }

    #[test]
    fn completed_ids_capture_the_exact_set_at_call_time() {
        let mut board = Board::default();
        board.replace_data(
            vec![task(3, true), task(1, false), task(2, true)],
            vec![category(1, "Home", CategoryKind::Personal)],
        );

        let ids = board.completed_ids();
        assert_eq!(ids, vec![3, 2]);

        board.remove_tasks(&ids);
        assert_eq!(
            board.tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1]
        );

        // Nothing completed left: the set is empty, the caller still issues
        // the batched delete.
        assert!(board.completed_ids().is_empty());
    }

    #[test]
    fn deleting_the_selected_category_reassigns_the_selection() {
        let mut board = Board::default();
        board.replace_data(
            vec![task(1, false)],
            vec![
                category(1, "Home", CategoryKind::Personal),
                category(2, "Office", CategoryKind::Work),
            ],
        );
        assert_eq!(board.selected_category, Some(1));

        board.remove_category(1);
        assert_eq!(board.selected_category, Some(2));

        board.remove_category(2);
        assert_eq!(board.selected_category, None);

        // The referencing task survives as an orphan.
        assert!(board.task(1).is_some());
    }

    #[test]
    fn notes_flags_toggle_independently_per_task() {
        let mut board = Board::default();
        board.replace_data(
            vec![task(1, false), task(2, false)],
            vec![category(1, "Home", CategoryKind::Personal)],
        );

        board.toggle_notes(1);
        assert!(board.notes_expanded(1));
        assert!(!board.notes_expanded(2));

        board.start_editing(2);
        assert!(board.notes_editing(2));
        board.stop_editing(2);
        assert!(!board.notes_editing(2));

        board.toggle_notes(1);
        assert!(!board.notes_expanded(1));
    }
}
