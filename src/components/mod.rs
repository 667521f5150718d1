//! UI Components
//!
//! Leptos components; each user intent goes through the shared client.

mod auth_panel;
mod new_task_form;
mod session_bar;
mod status_banner;
mod task_list;
mod task_row;

pub use auth_panel::AuthPanel;
pub use new_task_form::NewTaskForm;
pub use session_bar::SessionBar;
pub use status_banner::StatusBanner;
pub use task_list::TaskList;
pub use task_row::TaskRow;
