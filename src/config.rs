//! Runtime Configuration
//!
//! Compile-time overrides (read by Trunk's build environment):
//! - `TODO_API_BASE_URL`: API origin; defaults to the page origin so the
//!   dev proxy in `Trunk.toml` forwards requests to the backend
//! - `TODO_LOG_LEVEL`: `error` .. `trace`, defaults to `info`

use log::LevelFilter;
use todo_client::ClientConfig;

pub fn client_config() -> ClientConfig {
    let base_url = option_env!("TODO_API_BASE_URL")
        .map(str::to_string)
        .or_else(page_origin)
        .unwrap_or_default();
    ClientConfig::new(base_url)
}

pub fn log_level() -> LevelFilter {
    option_env!("TODO_LOG_LEVEL")
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}
