//! Task Row Component
//!
//! One task: done checkbox, title (double-click to rename), creation
//! time and delete button.

use leptos::prelude::*;
use todo_client::Task;

use crate::context::use_app_context;

#[component]
pub fn TaskRow(task: Task) -> impl IntoView {
    let ctx = use_app_context();

    let id = task.id;
    let done = task.done;
    let created = task
        .created_at
        .map(|dt| format!("Created {}", dt.format("%Y-%m-%d %H:%M UTC")));

    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(task.title.clone());

    let toggle = move |_| {
        ctx.dispatch(move |client| async move {
            client.toggle_task(id, done).await;
        });
    };

    let delete = move |_| {
        ctx.dispatch(move |client| async move {
            client.delete_task(id).await;
        });
    };

    let original = task.title.clone();
    let rename = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let new_title = draft.get_untracked();
        if new_title.trim() == original {
            set_editing.set(false);
            return;
        }
        ctx.dispatch(move |client| async move {
            if client.rename_task(id, &new_title).await {
                set_editing.set(false);
            }
        });
    };

    let shown_title = task.title.clone();

    view! {
        <div class=move || if done { "task-row done" } else { "task-row" }>
            <input type="checkbox" checked=done on:change=toggle />

            <Show
                when=move || editing.get()
                fallback=move || {
                    let shown_title = shown_title.clone();
                    view! {
                        <span class="task-title" on:dblclick=move |_| set_editing.set(true)>
                            {shown_title}
                        </span>
                    }
                }
            >
                <form class="rename-form" on:submit=rename.clone()>
                    <input
                        type="text"
                        prop:value=move || draft.get()
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                    />
                    <button type="submit">"Save"</button>
                    <button type="button" class="cancel-btn" on:click=move |_| set_editing.set(false)>
                        "Cancel"
                    </button>
                </form>
            </Show>

            {created.map(|text| view! { <small class="task-created">{text}</small> })}

            <button class="delete-btn" title="Delete" on:click=delete>"×"</button>
        </div>
    }
}
