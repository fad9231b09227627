use chrono::{Datelike, Duration, Local, NaiveDate};
use futures_util::future;
use stonecrop_core::calendar::{due_count_on, due_overview, tasks_due_on};
use stonecrop_core::category::{Category, category_info};
use stonecrop_core::task::Task;
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::{
    Callback, Html, UseStateHandle, classes, function_component, html,
    use_effect_with, use_state,
};

use crate::api::Store;

const WEEKDAY_LABELS: [&str; 7] =
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Month calendar over the due-dated subset of the task table. The page
/// runs its own restricted fetch on mount and keeps no link to the board;
/// it is a read-only view.
#[function_component(CalendarPage)]
pub fn calendar_page() -> Html {
    let tasks: UseStateHandle<Vec<Task>> = use_state(Vec::new);
    let categories: UseStateHandle<Vec<Category>> = use_state(Vec::new);
    let today = Local::now().date_naive();
    let selected = use_state(move || today);
    let cursor =
        use_state(move || first_day_of_month(today.year(), today.month()));

    {
        let tasks = tasks.clone();
        let categories = categories.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let store = Store::from_settings();
                let (due, cats) = future::join(
                    store.fetch_due_tasks(),
                    store.fetch_categories(),
                )
                .await;

                match due {
                    Ok(rows) => tasks.set(rows),
                    Err(err) => {
                        tracing::error!(error = %err, "due task fetch failed");
                    }
                }
                match cats {
                    Ok(rows) => categories.set(rows),
                    Err(err) => {
                        tracing::error!(error = %err, "category fetch failed");
                    }
                }
            });
            || ()
        });
    }

    let shift_month = |months: i32| {
        let cursor = cursor.clone();
        Callback::from(move |_: MouseEvent| {
            cursor.set(add_months(*cursor, months));
        })
    };

    let on_today = {
        let cursor = cursor.clone();
        let selected = selected.clone();
        Callback::from(move |_: MouseEvent| {
            let now = Local::now().date_naive();
            cursor.set(first_day_of_month(now.year(), now.month()));
            selected.set(now);
        })
    };

    let grid_start = start_of_week(*cursor);
    let day_cells = (0_i64..42_i64).map(|offset| {
        let day = add_days(grid_start, offset);
        let count = due_count_on(&tasks, day);
        let outside = day.month() != cursor.month();
        let selected_handle = selected.clone();
        let class = classes!(
            "calendar-day-cell",
            outside.then_some("outside"),
            (day == today).then_some("today"),
            (day == *selected).then_some("selected"),
            (count > 0).then_some("has-tasks"),
        );
        html! {
            <button
                type="button"
                class={class}
                onclick={Callback::from(move |_| selected_handle.set(day))}
            >
                <div class="calendar-day-label">{ day.day() }</div>
                {
                    if count > 0 {
                        html! {
                            <div class="calendar-markers">
                                <span class="dot"></span>
                                {
                                    if count > 1 {
                                        html! { <span class="dot-count">{ count }</span> }
                                    } else {
                                        html! {}
                                    }
                                }
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </button>
        }
    });

    let due_today = tasks_due_on(&tasks, *selected);
    let overview = due_overview(&tasks);

    html! {
        <div class="page calendar-page">
            <header class="page-header">
                <h1>{ "Calendar" }</h1>
                <p>{ "See your tasks by due date" }</p>
            </header>
            <div class="calendar-layout">
                <div class="panel calendar-panel">
                    <div class="calendar-nav">
                        <button type="button" class="btn" onclick={shift_month(-1)}>
                            { "‹" }
                        </button>
                        <span class="calendar-title">
                            { cursor.format("%B %Y").to_string() }
                        </span>
                        <button type="button" class="btn" onclick={on_today}>
                            { "Today" }
                        </button>
                        <button type="button" class="btn" onclick={shift_month(1)}>
                            { "›" }
                        </button>
                    </div>
                    <div class="calendar-weekday-row">
                        {
                            for WEEKDAY_LABELS.iter().map(|label| html! {
                                <div class="calendar-weekday">{ *label }</div>
                            })
                        }
                    </div>
                    <div class="calendar-grid">
                        { for day_cells }
                    </div>
                </div>
                <div class="calendar-side">
                    <div class="panel day-panel">
                        <h3>{ selected.format("%A, %B %d").to_string() }</h3>
                        {
                            if due_today.is_empty() {
                                html! {
                                    <p class="empty">{ "No tasks due on this date" }</p>
                                }
                            } else {
                                html! {
                                    <div class="day-task-list">
                                        { for due_today.into_iter().map(|task| day_task_card(&task, &categories)) }
                                    </div>
                                }
                            }
                        }
                    </div>
                    <div class="panel overview-panel">
                        <h3>{ "Due overview" }</h3>
                        <div class="kv"><strong>{ "total" }</strong><div>{ overview.total }</div></div>
                        <div class="kv"><strong>{ "pending" }</strong><div>{ overview.pending }</div></div>
                        <div class="kv"><strong>{ "completed" }</strong><div>{ overview.completed }</div></div>
                        <div class="kv"><strong>{ "high priority pending" }</strong><div>{ overview.high_priority_pending }</div></div>
                    </div>
                </div>
            </div>
        </div>
    }
}

fn day_task_card(task: &Task, categories: &[Category]) -> Html {
    let info = category_info(categories, task.category_id);
    let priority_class = format!("priority-{}", task.priority.as_key());

    html! {
        <div class={classes!("day-task-card", priority_class)}>
            <div class="card-row">
                <span class={classes!("title", task.completed.then_some("done"))}>
                    { &task.title }
                </span>
                { if task.completed { html! { <span class="check-mark">{ "✓" }</span> } } else { html! {} } }
            </div>
            <div class="card-row">
                <span class="badge category-badge">{ info.name }</span>
                <span class="badge priority-badge">{ task.priority.label() }</span>
                {
                    if let Some(reminder) = task.reminder {
                        html! {
                            <span class="badge reminder-badge">
                                { reminder.format("%H:%M").to_string() }
                            </span>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
            {
                if let Some(notes) = &task.notes {
                    html! { <p class="notes-text">{ notes }</p> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn first_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    first_day_of_month(year, month)
}

/// Grid origin: the Monday on or before `day`.
fn start_of_week(day: NaiveDate) -> NaiveDate {
    let diff = day.weekday().num_days_from_monday() as i64;
    add_days(day, -diff)
}
