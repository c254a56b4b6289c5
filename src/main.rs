//! Stan Bingo Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod live;
mod pages;
mod realtime;
mod refresh;
mod storage;
mod store;

use app::App;
use bingo_core::BingoConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let loaded = config::load_config();
    let level = loaded
        .as_ref()
        .map(BingoConfig::log_filter)
        .unwrap_or(log::LevelFilter::Info);
    if rolling_logger::init_logger("StanBingo", level, rolling_logger::DEFAULT_CAPACITY).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    let config = loaded.unwrap_or_else(|e| {
        log::error!("{}", e);
        BingoConfig::default()
    });
    mount_to_body(move || view! { <App config=config /> });
}
