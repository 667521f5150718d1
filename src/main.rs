#![allow(warnings)]
//! Todo Web Client Entry Point

mod app;
mod components;
mod config;
mod context;
mod logging;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(config::log_level());
    mount_to_body(App);
}
