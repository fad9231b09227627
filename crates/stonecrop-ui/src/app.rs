use chrono::Utc;
use gloo::timers::future::TimeoutFuture;
use stonecrop_core::board::Board;
use stonecrop_core::category::{CategoryDraft, CategoryId, CategoryKind};
use stonecrop_core::task::{TaskDraft, TaskId, TaskPatch};
use stonecrop_core::views::{self, StatusFilter};
use web_sys::{
    Event, HtmlInputElement, HtmlSelectElement, InputEvent, MouseEvent,
    SubmitEvent,
};
use yew::{
    Callback, Html, TargetCast, UseStateHandle, classes, function_component,
    html, use_effect_with, use_state,
};

use crate::api::Store;
use crate::calendar::CalendarPage;
use crate::components::{
    AnalyticsPage, CategoryManager, SettingsPage, Sidebar, StatusTabs,
    TaskForm, TaskList,
};

const PAGE_STORAGE_KEY: &str = "stonecrop.page";
const CELEBRATION_MS: u32 = 1400;

#[function_component(App)]
pub fn app() -> Html {
    let page = use_state(load_page);
    let board = use_state(Board::default);
    let title_input = use_state(String::new);
    let status_filter = use_state(StatusFilter::default);
    let category_name = use_state(String::new);
    let category_kind = use_state(|| CategoryKind::Personal);
    let manage_open = use_state(|| false);
    let celebrating = use_state(|| false);

    {
        let board = board.clone();
        use_effect_with((), move |_| {
            tracing::info!("board mounted, loading data");
            reload_board(board);
            || ()
        });
    }

    {
        let page = page.clone();
        use_effect_with((*page).clone(), move |active| {
            save_page(active);
            tracing::debug!(page = %active, "persisted active page");
            || ()
        });
    }

    let on_nav = {
        let page = page.clone();
        Callback::from(move |key: String| {
            page.set(key);
        })
    };

    let on_title_change = {
        let title_input = title_input.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                title_input.set(input.value());
            }
        })
    };

    let on_select_category = {
        let board = board.clone();
        Callback::from(move |event: Event| {
            let Some(select) = event.target_dyn_into::<HtmlSelectElement>()
            else {
                return;
            };
            let mut next = (*board).clone();
            next.selected_category = select.value().parse::<CategoryId>().ok();
            board.set(next);
        })
    };

    let on_add_task = {
        let board = board.clone();
        let title_input = title_input.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            let draft = match TaskDraft::new(
                &title_input,
                board.selected_category,
                Utc::now(),
            ) {
                Ok(draft) => draft,
                Err(err) => {
                    notify(&err.to_string());
                    return;
                }
            };

            let board = board.clone();
            let title_input = title_input.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let store = Store::from_settings();
                match store.insert_task(&draft).await {
                    Ok(()) => {
                        title_input.set(String::new());
                        reload_board(board);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "add task failed");
                        notify(&format!("Could not add the task: {err}"));
                    }
                }
            });
        })
    };

    let on_toggle = {
        let board = board.clone();
        let celebrating = celebrating.clone();
        Callback::from(move |id: TaskId| {
            let Some((patch, now_completed)) = board.toggle_patch(id) else {
                return;
            };

            let board = board.clone();
            let celebrating = celebrating.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let store = Store::from_settings();
                match store.update_task(id, &patch).await {
                    Ok(()) => {
                        let mut next = (*board).clone();
                        next.apply_patch(id, &patch);
                        board.set(next);
                        if now_completed {
                            celebrate(celebrating);
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, task_id = id, "toggle failed");
                        notify(&format!("Could not update the task: {err}"));
                    }
                }
            });
        })
    };

    let on_delete = {
        let board = board.clone();
        Callback::from(move |id: TaskId| {
            let board = board.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let store = Store::from_settings();
                match store.delete_task(id).await {
                    Ok(()) => {
                        let mut next = (*board).clone();
                        next.remove_task(id);
                        board.set(next);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, task_id = id, "delete failed");
                        notify(&format!("Could not delete the task: {err}"));
                    }
                }
            });
        })
    };

    let on_clear_completed = {
        let board = board.clone();
        Callback::from(move |_: MouseEvent| {
            // The batched call goes out even when nothing is completed;
            // an empty id list matches no rows.
            let ids = board.completed_ids();

            let board = board.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let store = Store::from_settings();
                match store.delete_tasks(&ids).await {
                    Ok(()) => {
                        let mut next = (*board).clone();
                        next.remove_tasks(&ids);
                        board.set(next);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "clear completed failed");
                        notify(&format!(
                            "Could not clear completed tasks: {err}"
                        ));
                    }
                }
            });
        })
    };

    let on_cycle = {
        let board = board.clone();
        Callback::from(move |id: TaskId| {
            let Some(patch) = board.cycle_patch(id) else {
                return;
            };

            let board = board.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let store = Store::from_settings();
                match store.update_task(id, &patch).await {
                    Ok(()) => {
                        let mut next = (*board).clone();
                        next.apply_patch(id, &patch);
                        board.set(next);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, task_id = id, "priority cycle failed");
                        notify(&format!("Could not update the task: {err}"));
                    }
                }
            });
        })
    };

    let on_save_notes = {
        let board = board.clone();
        Callback::from(
            move |(id, notes, due_date, reminder): (
                TaskId,
                String,
                String,
                String,
            )| {
                let patch =
                    TaskPatch::notes_edit(&notes, &due_date, &reminder);

                let board = board.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let store = Store::from_settings();
                    match store.update_task(id, &patch).await {
                        Ok(()) => {
                            let mut next = (*board).clone();
                            next.apply_patch(id, &patch);
                            next.stop_editing(id);
                            board.set(next);
                        }
                        Err(err) => {
                            tracing::error!(error = %err, task_id = id, "save notes failed");
                            notify(&format!("Could not save the notes: {err}"));
                        }
                    }
                });
            },
        )
    };

    let on_toggle_notes = {
        let board = board.clone();
        Callback::from(move |id: TaskId| {
            let mut next = (*board).clone();
            next.toggle_notes(id);
            board.set(next);
        })
    };

    let on_start_edit = {
        let board = board.clone();
        Callback::from(move |id: TaskId| {
            let mut next = (*board).clone();
            next.start_editing(id);
            board.set(next);
        })
    };

    let on_cancel_edit = {
        let board = board.clone();
        Callback::from(move |id: TaskId| {
            let mut next = (*board).clone();
            next.stop_editing(id);
            board.set(next);
        })
    };

    let on_toggle_manage = {
        let manage_open = manage_open.clone();
        Callback::from(move |_: MouseEvent| {
            manage_open.set(!*manage_open);
        })
    };

    let on_category_name_change = {
        let category_name = category_name.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                category_name.set(input.value());
            }
        })
    };

    let on_category_kind_change = {
        let category_kind = category_kind.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>()
                && let Some(kind) = CategoryKind::from_key(&select.value())
            {
                category_kind.set(kind);
            }
        })
    };

    let on_add_category = {
        let board = board.clone();
        let category_name = category_name.clone();
        let category_kind = category_kind.clone();
        let manage_open = manage_open.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            // Empty names are a silent no-op, not an error.
            let Some(draft) =
                CategoryDraft::new(&category_name, *category_kind)
            else {
                return;
            };

            let board = board.clone();
            let category_name = category_name.clone();
            let manage_open = manage_open.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let store = Store::from_settings();
                match store.insert_category(&draft).await {
                    Ok(()) => {
                        category_name.set(String::new());
                        manage_open.set(false);
                        reload_board(board);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "add category failed");
                        notify(&format!("Could not add the category: {err}"));
                    }
                }
            });
        })
    };

    let on_delete_category = {
        let board = board.clone();
        Callback::from(move |id: CategoryId| {
            let board = board.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let store = Store::from_settings();
                match store.delete_category(id).await {
                    Ok(()) => {
                        let mut next = (*board).clone();
                        next.remove_category(id);
                        board.set(next);
                        reload_board(board);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, category_id = id, "delete category failed");
                        notify(&format!(
                            "Could not delete the category: {err}"
                        ));
                    }
                }
            });
        })
    };

    let main = match page.as_str() {
        "calendar" => html! { <CalendarPage /> },
        "analytics" => html! { <AnalyticsPage /> },
        "settings" => html! {
            <SettingsPage
                store_url={Store::from_settings().base_url().to_string()}
                tasks_loaded={board.tasks.len()}
                categories_loaded={board.categories.len()}
            />
        },
        _ => {
            let visible =
                views::filter_by_status(&board.tasks, *status_filter);
            let (personal, work) =
                views::split_by_kind(&visible, &board.categories);
            let counts = views::counts(&board.tasks);

            html! {
                <div class="page board-page">
                    <header class="page-header">
                        <h1>{ "Tasks" }</h1>
                        <p>{ "Organize your personal and work life" }</p>
                    </header>
                    <TaskForm
                        title={(*title_input).clone()}
                        selected={board.selected_category}
                        categories={board.categories.clone()}
                        on_title_change={on_title_change.clone()}
                        on_select={on_select_category.clone()}
                        on_submit={on_add_task.clone()}
                    />
                    <CategoryManager
                        open={*manage_open}
                        name={(*category_name).clone()}
                        kind={*category_kind}
                        categories={board.categories.clone()}
                        on_toggle={on_toggle_manage.clone()}
                        on_name_change={on_category_name_change.clone()}
                        on_kind_change={on_category_kind_change.clone()}
                        on_submit={on_add_category.clone()}
                        on_delete={on_delete_category.clone()}
                    />
                    <StatusTabs
                        filter={*status_filter}
                        counts={counts}
                        on_filter={{
                            let status_filter = status_filter.clone();
                            Callback::from(move |filter: StatusFilter| {
                                status_filter.set(filter);
                            })
                        }}
                        on_clear_completed={on_clear_completed.clone()}
                    />
                    <TaskList
                        heading="Personal"
                        tasks={personal}
                        categories={board.categories.clone()}
                        expanded_notes={board.expanded_notes.clone()}
                        editing_notes={board.editing_notes.clone()}
                        on_toggle={on_toggle.clone()}
                        on_delete={on_delete.clone()}
                        on_cycle={on_cycle.clone()}
                        on_toggle_notes={on_toggle_notes.clone()}
                        on_start_edit={on_start_edit.clone()}
                        on_cancel_edit={on_cancel_edit.clone()}
                        on_save_notes={on_save_notes.clone()}
                    />
                    <TaskList
                        heading="Work"
                        tasks={work}
                        categories={board.categories.clone()}
                        expanded_notes={board.expanded_notes.clone()}
                        editing_notes={board.editing_notes.clone()}
                        on_toggle={on_toggle}
                        on_delete={on_delete}
                        on_cycle={on_cycle}
                        on_toggle_notes={on_toggle_notes}
                        on_start_edit={on_start_edit}
                        on_cancel_edit={on_cancel_edit}
                        on_save_notes={on_save_notes}
                    />
                </div>
            }
        }
    };

    html! {
        <div class={classes!("app-shell", (*celebrating).then_some("celebrating"))}>
            <Sidebar active={(*page).clone()} on_nav={on_nav} />
            <main class="content">
                { main }
                {
                    if *celebrating {
                        html! { <div class="celebration-overlay">{ "✦" }</div> }
                    } else {
                        html! {}
                    }
                }
            </main>
        </div>
    }
}

/// Issues the paired fetch of both tables, awaited jointly. Each half is
/// applied independently; a read failure only logs and leaves stale state.
fn reload_board(board: UseStateHandle<Board>) {
    wasm_bindgen_futures::spawn_local(async move {
        let store = Store::from_settings();
        let (tasks, categories) = futures_util::future::join(
            store.fetch_tasks(),
            store.fetch_categories(),
        )
        .await;

        let mut next = (*board).clone();
        match tasks {
            Ok(rows) => next.replace_tasks(rows),
            Err(err) => {
                tracing::error!(error = %err, "tasks fetch failed")
            }
        }
        match categories {
            Ok(rows) => next.replace_categories(rows),
            Err(err) => {
                tracing::error!(error = %err, "categories fetch failed")
            }
        }
        board.set(next);
    });
}

/// Blocking notification for write failures and add-task validation.
fn notify(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Transient overlay on the transition to completed; pure UI effect, no
/// persisted state.
fn celebrate(celebrating: UseStateHandle<bool>) {
    celebrating.set(true);
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(CELEBRATION_MS).await;
        celebrating.set(false);
    });
}

fn load_page() -> String {
    let stored = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(PAGE_STORAGE_KEY).ok().flatten());

    match stored.as_deref() {
        Some(page @ ("tasks" | "calendar" | "analytics" | "settings")) => {
            page.to_string()
        }
        _ => "tasks".to_string(),
    }
}

fn save_page(page: &str) {
    if let Some(storage) = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
    {
        let _ = storage.set_item(PAGE_STORAGE_KEY, page);
    }
}
