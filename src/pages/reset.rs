use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

use crate::components::StatusScreen;
use crate::context::use_app_context;

/// Forget this device's card and rules flag, then go home
#[component]
pub fn ResetPage() -> impl IntoView {
    let ctx = use_app_context();
    let navigate = use_navigate();

    Effect::new(move |_| {
        ctx.prefs().reset();
        log::info!("Card reset");
        navigate(
            "/",
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    });

    view! { <StatusScreen message="🔄 Kaart wordt vernieuwd…" /> }
}
