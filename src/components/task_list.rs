//! Task List Component
//!
//! Renders the last fetched collection in server order.

use leptos::prelude::*;
use todo_client::{done_count, open_count};

use crate::components::TaskRow;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn TaskList() -> impl IntoView {
    let store = use_app_store();

    let summary = move || {
        store.tasks().with(|tasks| {
            format!("{} open, {} done", open_count(tasks), done_count(tasks))
        })
    };

    view! {
        <div class="task-list">
            <Show
                when=move || !store.tasks().get().is_empty()
                fallback=|| view! { <p class="empty">"No tasks yet. Add one!"</p> }
            >
                // Key on content too so a refetched row re-renders
                <For
                    each=move || store.tasks().get()
                    key=|task| (task.id, task.done, task.title.clone())
                    children=move |task| view! { <TaskRow task=task /> }
                />
            </Show>
            <p class="task-count">{summary}</p>
        </div>
    }
}
