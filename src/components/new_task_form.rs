//! New Task Form Component
//!
//! Title input for creating tasks. Blank titles are rejected by the client.

use leptos::prelude::*;

use crate::context::use_app_context;

#[component]
pub fn NewTaskForm() -> impl IntoView {
    let ctx = use_app_context();

    let (new_title, set_new_title) = signal(String::new());

    let create_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let title = new_title.get_untracked();

        ctx.dispatch(move |client| async move {
            if client.add_task(&title).await {
                set_new_title.set(String::new());
            }
        });
    };

    view! {
        <form class="new-task-form" on:submit=create_task>
            <input
                type="text"
                placeholder="Task title"
                prop:value=move || new_title.get()
                on:input=move |ev| set_new_title.set(event_target_value(&ev))
            />
            <button type="submit">"Add task"</button>
        </form>
    }
}
