use chrono::{NaiveDate, TimeZone, Utc};
use stonecrop_core::board::Board;
use stonecrop_core::calendar::tasks_due_on;
use stonecrop_core::category::{Category, CategoryKind, category_info};
use stonecrop_core::task::{AddTaskError, Priority, Task, TaskDraft};
use stonecrop_core::views::{StatusFilter, filter_by_status, split_by_kind};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn home_category() -> Category {
    Category {
        id: 1,
        name: "Home".to_string(),
        kind: CategoryKind::Personal,
    }
}

/// Simulates the store side of an insert: the draft comes back as a row
/// with a server-assigned id.
fn row_from_draft(draft: &TaskDraft, id: i64) -> Task {
    Task {
        id,
        title: draft.title.clone(),
        category_id: draft.category_id,
        completed: draft.completed,
        priority: draft.priority,
        notes: None,
        due_date: None,
        reminder: None,
        created_at: draft.created_at,
    }
}

#[test]
fn adding_buy_milk_yields_exactly_one_medium_priority_task() {
    let mut board = Board::default();
    board.replace_data(vec![], vec![home_category()]);
    assert_eq!(board.selected_category, Some(1));

    let draft = TaskDraft::new("Buy milk", board.selected_category, now())
        .expect("valid draft");

    // The store inserts the draft and the board reloads wholesale.
    board.replace_data(vec![row_from_draft(&draft, 10)], vec![home_category()]);

    assert_eq!(board.tasks.len(), 1);
    let task = &board.tasks[0];
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.category_id, 1);
    assert_eq!(task.priority, Priority::Medium);
    assert!(!task.completed);
}

#[test]
fn whitespace_titles_never_reach_the_store() {
    let mut board = Board::default();
    board.replace_data(vec![], vec![home_category()]);

    let err = TaskDraft::new("   \t ", board.selected_category, now())
        .expect_err("blank title must be rejected");
    assert_eq!(err, AddTaskError::EmptyTitle);
    assert!(board.tasks.is_empty());
}

#[test]
fn deleting_a_task_removes_it_from_every_derived_view() {
    let mut board = Board::default();
    let categories = vec![
        home_category(),
        Category {
            id: 2,
            name: "Office".to_string(),
            kind: CategoryKind::Work,
        },
    ];
    let draft_a = TaskDraft::new("Buy milk", Some(1), now()).expect("draft");
    let draft_b =
        TaskDraft::new("Send invoices", Some(2), now()).expect("draft");
    board.replace_data(
        vec![row_from_draft(&draft_a, 1), row_from_draft(&draft_b, 2)],
        categories.clone(),
    );
    board.toggle_notes(2);
    board.start_editing(2);

    board.remove_task(2);

    for filter in StatusFilter::all() {
        let visible = filter_by_status(&board.tasks, filter);
        assert!(visible.iter().all(|task| task.id != 2));
    }
    let (personal, work) = split_by_kind(&board.tasks, &categories);
    assert!(personal.iter().all(|task| task.id != 2));
    assert!(work.is_empty());
    assert!(!board.expanded_notes.contains_key(&2));
    assert!(!board.editing_notes.contains_key(&2));
}

#[test]
fn clear_completed_targets_the_completed_set_independent_of_order() {
    let mut board = Board::default();
    let drafts: Vec<Task> = (1..=4)
        .map(|id| {
            let draft = TaskDraft::new(&format!("task {id}"), Some(1), now())
                .expect("draft");
            let mut row = row_from_draft(&draft, id);
            row.completed = id % 2 == 0;
            row
        })
        .rev()
        .collect();
    board.replace_data(drafts, vec![home_category()]);

    let ids = board.completed_ids();
    assert_eq!(ids, vec![4, 2]);

    board.remove_tasks(&ids);
    assert!(board.tasks.iter().all(|task| !task.completed));
    assert_eq!(board.tasks.len(), 2);
}

#[test]
fn orphaned_tasks_survive_category_deletion_and_resolve_to_the_sentinel() {
    let mut board = Board::default();
    let categories = vec![
        home_category(),
        Category {
            id: 2,
            name: "Office".to_string(),
            kind: CategoryKind::Work,
        },
    ];
    let draft =
        TaskDraft::new("Send invoices", Some(2), now()).expect("draft");
    board.replace_data(vec![row_from_draft(&draft, 1)], categories);
    board.selected_category = Some(2);

    board.remove_category(2);

    assert_eq!(board.selected_category, Some(1));
    let task = board.task(1).expect("orphaned task survives");
    let info = category_info(&board.categories, task.category_id);
    assert_eq!(info.name, "Unknown");
    assert_eq!(info.kind, CategoryKind::Personal);

    let (personal, work) = split_by_kind(&board.tasks, &board.categories);
    assert_eq!(personal.len(), 1);
    assert!(work.is_empty());
}

#[test]
fn calendar_selection_matches_due_dates_exactly() {
    let draft = TaskDraft::new("Buy milk", Some(1), now()).expect("draft");
    let mut row = row_from_draft(&draft, 1);
    row.due_date = NaiveDate::parse_from_str("2024-06-01", "%Y-%m-%d").ok();
    let tasks = vec![row];

    let selected_day =
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
    assert_eq!(tasks_due_on(&tasks, selected_day).len(), 1);

    for offset in [-1_i64, 1, 30] {
        let other = selected_day + chrono::Duration::days(offset);
        assert!(tasks_due_on(&tasks, other).is_empty());
    }
}
