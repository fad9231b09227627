use std::collections::BTreeMap;

use stonecrop_core::category::{
    Category, CategoryId, CategoryKind, category_info,
};
use stonecrop_core::task::{Task, TaskId};
use stonecrop_core::views::{Counts, StatusFilter, categories_of_kind};
use web_sys::{
    Event, HtmlInputElement, HtmlTextAreaElement, InputEvent, MouseEvent,
    SubmitEvent,
};
use yew::{
    Callback, Html, Properties, TargetCast, classes, function_component,
    html, use_effect_with, use_state,
};

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub active: String,
    pub on_nav: Callback<String>,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let collapsed = use_state(|| false);

    let make_item = |key: &str, label: &str| {
        let active = props.active == key;
        let class = if active { "item active" } else { "item" };
        let on_nav = props.on_nav.clone();
        let key_string = key.to_string();
        let shown = if *collapsed {
            label.chars().take(1).collect::<String>()
        } else {
            label.to_string()
        };
        html! {
            <div class={class} title={label.to_string()} onclick={move |_| on_nav.emit(key_string.clone())}>
                { shown }
            </div>
        }
    };

    let on_collapse = {
        let collapsed = collapsed.clone();
        Callback::from(move |_: MouseEvent| {
            collapsed.set(!*collapsed);
        })
    };

    html! {
        <div class={classes!("panel", "sidebar", collapsed.then_some("collapsed"))}>
            <div class="sidebar-top">
                {
                    if !*collapsed {
                        html! {
                            <div class="brand">
                                <div class="header">{ "Stonecrop" }</div>
                                <div class="subtitle">{ "Personal task board" }</div>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
                <button type="button" class="btn collapse-btn" onclick={on_collapse}>
                    { if *collapsed { "»" } else { "«" } }
                </button>
            </div>
            { make_item("tasks", "Tasks") }
            { make_item("calendar", "Calendar") }
            { make_item("analytics", "Analytics") }
            { make_item("settings", "Settings") }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
    pub title: String,
    pub selected: Option<CategoryId>,
    pub categories: Vec<Category>,
    pub on_title_change: Callback<InputEvent>,
    pub on_select: Callback<Event>,
    pub on_submit: Callback<SubmitEvent>,
}

#[function_component(TaskForm)]
pub fn task_form(props: &TaskFormProps) -> Html {
    let group = |kind: CategoryKind| {
        let members = categories_of_kind(&props.categories, kind);
        if members.is_empty() {
            return html! {};
        }
        html! {
            <optgroup label={kind.label()}>
                {
                    for members.into_iter().map(|category| {
                        let selected = props.selected == Some(category.id);
                        html! {
                            <option value={category.id.to_string()} selected={selected}>
                                { category.name }
                            </option>
                        }
                    })
                }
            </optgroup>
        }
    };

    html! {
        <form class="task-form" onsubmit={props.on_submit.clone()}>
            <input
                type="text"
                class="title-input"
                placeholder="Add a new task..."
                value={props.title.clone()}
                oninput={props.on_title_change.clone()}
            />
            <select class="category-select" onchange={props.on_select.clone()}>
                <option value="" selected={props.selected.is_none()}>
                    { "Select category..." }
                </option>
                { group(CategoryKind::Personal) }
                { group(CategoryKind::Work) }
            </select>
            <button type="submit" class="btn primary" disabled={props.selected.is_none()}>
                { "Add" }
            </button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct CategoryManagerProps {
    pub open: bool,
    pub name: String,
    pub kind: CategoryKind,
    pub categories: Vec<Category>,
    pub on_toggle: Callback<MouseEvent>,
    pub on_name_change: Callback<InputEvent>,
    pub on_kind_change: Callback<Event>,
    pub on_submit: Callback<SubmitEvent>,
    pub on_delete: Callback<CategoryId>,
}

#[function_component(CategoryManager)]
pub fn category_manager(props: &CategoryManagerProps) -> Html {
    let column = |kind: CategoryKind| {
        let members = categories_of_kind(&props.categories, kind);
        html! {
            <div class="category-column">
                <h4>{ kind.label() }</h4>
                <ul>
                    {
                        for members.into_iter().map(|category| {
                            let on_delete = props.on_delete.clone();
                            let id = category.id;
                            html! {
                                <li>
                                    <span>{ category.name }</span>
                                    <button
                                        type="button"
                                        class="btn icon"
                                        title="Delete category"
                                        onclick={move |_| on_delete.emit(id)}
                                    >
                                        { "✕" }
                                    </button>
                                </li>
                            }
                        })
                    }
                </ul>
            </div>
        }
    };

    html! {
        <div class="category-manager">
            <button type="button" class="btn link" onclick={props.on_toggle.clone()}>
                { "Manage Categories" }
                <span class={classes!("chevron", props.open.then_some("open"))}>{ "▾" }</span>
            </button>
            {
                if props.open {
                    html! {
                        <div class="panel manager-panel">
                            <form class="category-form" onsubmit={props.on_submit.clone()}>
                                <input
                                    type="text"
                                    placeholder="Category name..."
                                    value={props.name.clone()}
                                    oninput={props.on_name_change.clone()}
                                />
                                <select onchange={props.on_kind_change.clone()}>
                                    <option value="personal" selected={props.kind == CategoryKind::Personal}>
                                        { "Personal" }
                                    </option>
                                    <option value="work" selected={props.kind == CategoryKind::Work}>
                                        { "Work" }
                                    </option>
                                </select>
                                <button type="submit" class="btn primary">{ "Add" }</button>
                            </form>
                            <div class="category-columns">
                                { column(CategoryKind::Personal) }
                                { column(CategoryKind::Work) }
                            </div>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusTabsProps {
    pub filter: StatusFilter,
    pub counts: Counts,
    pub on_filter: Callback<StatusFilter>,
    pub on_clear_completed: Callback<MouseEvent>,
}

#[function_component(StatusTabs)]
pub fn status_tabs(props: &StatusTabsProps) -> Html {
    html! {
        <div class="status-tabs">
            <div class="tabs">
                {
                    for StatusFilter::all().into_iter().map(|filter| {
                        let active = props.filter == filter;
                        let on_filter = props.on_filter.clone();
                        html! {
                            <button
                                type="button"
                                class={classes!("btn", "tab", active.then_some("active"))}
                                onclick={move |_| on_filter.emit(filter)}
                            >
                                { filter.label() }
                            </button>
                        }
                    })
                }
            </div>
            <div class="tab-meta">
                <span class="counts">
                    { format!(
                        "{} total · {} active · {} completed",
                        props.counts.total,
                        props.counts.active,
                        props.counts.completed,
                    ) }
                </span>
                <button
                    type="button"
                    class="btn link"
                    onclick={props.on_clear_completed.clone()}
                >
                    { "Clear completed" }
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
    pub heading: String,
    pub tasks: Vec<Task>,
    pub categories: Vec<Category>,
    pub expanded_notes: BTreeMap<TaskId, bool>,
    pub editing_notes: BTreeMap<TaskId, bool>,
    pub on_toggle: Callback<TaskId>,
    pub on_delete: Callback<TaskId>,
    pub on_cycle: Callback<TaskId>,
    pub on_toggle_notes: Callback<TaskId>,
    pub on_start_edit: Callback<TaskId>,
    pub on_cancel_edit: Callback<TaskId>,
    pub on_save_notes: Callback<(TaskId, String, String, String)>,
}

#[function_component(TaskList)]
pub fn task_list(props: &TaskListProps) -> Html {
    html! {
        <section class="task-list">
            <h2>{ &props.heading }</h2>
            {
                for props.tasks.iter().cloned().map(|task| {
                    let id = task.id;
                    let category_name =
                        category_info(&props.categories, task.category_id).name;
                    html! {
                        <TaskItem
                            task={task}
                            category_name={category_name}
                            expanded={props.expanded_notes.get(&id).copied().unwrap_or(false)}
                            editing={props.editing_notes.get(&id).copied().unwrap_or(false)}
                            on_toggle={props.on_toggle.clone()}
                            on_delete={props.on_delete.clone()}
                            on_cycle={props.on_cycle.clone()}
                            on_toggle_notes={props.on_toggle_notes.clone()}
                            on_start_edit={props.on_start_edit.clone()}
                            on_cancel_edit={props.on_cancel_edit.clone()}
                            on_save_notes={props.on_save_notes.clone()}
                        />
                    }
                })
            }
            {
                if props.tasks.is_empty() {
                    html! {
                        <p class="empty">
                            { format!("No {} tasks", props.heading.to_lowercase()) }
                        </p>
                    }
                } else {
                    html! {}
                }
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskItemProps {
    pub task: Task,
    pub category_name: String,
    pub expanded: bool,
    pub editing: bool,
    pub on_toggle: Callback<TaskId>,
    pub on_delete: Callback<TaskId>,
    pub on_cycle: Callback<TaskId>,
    pub on_toggle_notes: Callback<TaskId>,
    pub on_start_edit: Callback<TaskId>,
    pub on_cancel_edit: Callback<TaskId>,
    pub on_save_notes: Callback<(TaskId, String, String, String)>,
}

#[function_component(TaskItem)]
pub fn task_item(props: &TaskItemProps) -> Html {
    let id = props.task.id;
    let draft_notes = use_state(String::new);
    let draft_due = use_state(String::new);
    let draft_reminder = use_state(String::new);

    // Entering edit mode re-seeds the drafts from the row.
    {
        let draft_notes = draft_notes.clone();
        let draft_due = draft_due.clone();
        let draft_reminder = draft_reminder.clone();
        let task = props.task.clone();
        use_effect_with(props.editing, move |editing| {
            if *editing {
                draft_notes.set(task.notes.clone().unwrap_or_default());
                draft_due.set(
                    task.due_date
                        .map(|date| date.to_string())
                        .unwrap_or_default(),
                );
                draft_reminder.set(
                    task.reminder
                        .map(|time| time.format("%H:%M").to_string())
                        .unwrap_or_default(),
                );
            }
            || ()
        });
    }

    let on_row_click = {
        let on_cycle = props.on_cycle.clone();
        Callback::from(move |_: MouseEvent| on_cycle.emit(id))
    };

    let stop_then = |inner: Callback<TaskId>| {
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            inner.emit(id);
        })
    };

    let on_save = {
        let on_save_notes = props.on_save_notes.clone();
        let draft_notes = draft_notes.clone();
        let draft_due = draft_due.clone();
        let draft_reminder = draft_reminder.clone();
        Callback::from(move |_: MouseEvent| {
            on_save_notes.emit((
                id,
                (*draft_notes).clone(),
                (*draft_due).clone(),
                (*draft_reminder).clone(),
            ));
        })
    };

    let on_cancel = {
        let on_cancel_edit = props.on_cancel_edit.clone();
        Callback::from(move |_: MouseEvent| on_cancel_edit.emit(id))
    };

    let on_edit = {
        let on_start_edit = props.on_start_edit.clone();
        Callback::from(move |_: MouseEvent| on_start_edit.emit(id))
    };

    let has_details = props.task.notes.is_some()
        || props.task.due_date.is_some()
        || props.task.reminder.is_some();

    let priority_class = format!("priority-{}", props.task.priority.as_key());

    html! {
        <div
            class={classes!("task-item", priority_class)}
            title="Click to change priority"
            onclick={on_row_click}
        >
            <div class="task-row">
                <button
                    type="button"
                    class={classes!("check", props.task.completed.then_some("done"))}
                    title="Toggle completed"
                    onclick={stop_then(props.on_toggle.clone())}
                >
                    { if props.task.completed { "✓" } else { "" } }
                </button>
                <span class={classes!("title", props.task.completed.then_some("done"))}>
                    { &props.task.title }
                </span>
                <span class="category-label">{ &props.category_name }</span>
                <button
                    type="button"
                    class="btn icon"
                    title="Toggle notes"
                    onclick={stop_then(props.on_toggle_notes.clone())}
                >
                    { "≡" }
                </button>
                <button
                    type="button"
                    class="btn icon"
                    title="Delete task"
                    onclick={stop_then(props.on_delete.clone())}
                >
                    { "✕" }
                </button>
            </div>
            {
                if props.expanded {
                    html! {
                        <div class="task-details" onclick={|event: MouseEvent| event.stop_propagation()}>
                            <div class="priority-label">
                                { format!("{} priority", props.task.priority.label()) }
                            </div>
                            {
                                if props.editing {
                                    html! {
                                        <div class="notes-editor">
                                            <textarea
                                                rows="3"
                                                placeholder="Add notes..."
                                                value={(*draft_notes).clone()}
                                                oninput={{
                                                    let draft_notes = draft_notes.clone();
                                                    Callback::from(move |event: InputEvent| {
                                                        if let Some(area) = event.target_dyn_into::<HtmlTextAreaElement>() {
                                                            draft_notes.set(area.value());
                                                        }
                                                    })
                                                }}
                                            />
                                            <div class="editor-row">
                                                <input
                                                    type="date"
                                                    value={(*draft_due).clone()}
                                                    oninput={{
                                                        let draft_due = draft_due.clone();
                                                        Callback::from(move |event: InputEvent| {
                                                            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                                                                draft_due.set(input.value());
                                                            }
                                                        })
                                                    }}
                                                />
                                                <input
                                                    type="time"
                                                    value={(*draft_reminder).clone()}
                                                    oninput={{
                                                        let draft_reminder = draft_reminder.clone();
                                                        Callback::from(move |event: InputEvent| {
                                                            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                                                                draft_reminder.set(input.value());
                                                            }
                                                        })
                                                    }}
                                                />
                                            </div>
                                            <div class="editor-row">
                                                <button type="button" class="btn primary" onclick={on_save}>
                                                    { "Save" }
                                                </button>
                                                <button type="button" class="btn" onclick={on_cancel}>
                                                    { "Cancel" }
                                                </button>
                                            </div>
                                        </div>
                                    }
                                } else {
                                    html! {
                                        <div class="notes-view">
                                            {
                                                if let Some(notes) = &props.task.notes {
                                                    html! { <p class="notes-text">{ notes }</p> }
                                                } else {
                                                    html! {}
                                                }
                                            }
                                            {
                                                if let Some(due) = props.task.due_date {
                                                    html! { <div class="meta">{ format!("Due: {due}") }</div> }
                                                } else {
                                                    html! {}
                                                }
                                            }
                                            {
                                                if let Some(reminder) = props.task.reminder {
                                                    html! {
                                                        <div class="meta">
                                                            { format!("Reminder: {}", reminder.format("%H:%M")) }
                                                        </div>
                                                    }
                                                } else {
                                                    html! {}
                                                }
                                            }
                                            <button type="button" class="btn link" onclick={on_edit}>
                                                { if has_details { "Edit notes / due date" } else { "Add notes / due date" } }
                                            </button>
                                        </div>
                                    }
                                }
                            }
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[function_component(AnalyticsPage)]
pub fn analytics_page() -> Html {
    html! {
        <div class="page placeholder-page">
            <header class="page-header">
                <h1>{ "Analytics" }</h1>
                <p>{ "Track your productivity insights" }</p>
            </header>
            <div class="panel placeholder">
                <h3>{ "Coming Soon" }</h3>
                <p>{ "Completion rates, productivity trends, and insights." }</p>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SettingsPageProps {
    pub store_url: String,
    pub tasks_loaded: usize,
    pub categories_loaded: usize,
}

#[function_component(SettingsPage)]
pub fn settings_page(props: &SettingsPageProps) -> Html {
    html! {
        <div class="page placeholder-page">
            <header class="page-header">
                <h1>{ "Settings" }</h1>
                <p>{ "Customize your experience" }</p>
            </header>
            <div class="panel placeholder">
                <h3>{ "Coming Soon" }</h3>
                <p>{ "Theme preferences, notifications, and app customization." }</p>
                <div class="kv"><strong>{ "store" }</strong><div>{ &props.store_url }</div></div>
                <div class="kv"><strong>{ "tasks loaded" }</strong><div>{ props.tasks_loaded }</div></div>
                <div class="kv"><strong>{ "categories loaded" }</strong><div>{ props.categories_loaded }</div></div>
            </div>
        </div>
    }
}
