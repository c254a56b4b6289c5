//! Stan Bingo Frontend App
//!
//! Validates the loaded configuration, provides it to every page and
//! mounts the router.

use bingo_core::BingoConfig;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::components::StatusScreen;
use crate::context::AppContext;
use crate::pages::{AdminPage, HomePage, ResetPage};

#[component]
pub fn App(config: BingoConfig) -> impl IntoView {
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        return view! { <StatusScreen message=format!("⚠️ {}", e) /> }.into_any();
    }
    provide_context(AppContext::new(config));

    view! {
        <Router>
            <Routes fallback=|| view! { <StatusScreen message="Pagina niet gevonden" /> }>
                <Route path=path!("/") view=HomePage />
                <Route path=path!("/reset") view=ResetPage />
                <Route path=path!("/admin") view=AdminPage />
                // legacy admin path
                <Route path=path!("/secret") view=AdminPage />
            </Routes>
        </Router>
    }
    .into_any()
}
