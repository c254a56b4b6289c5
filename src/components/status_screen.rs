use leptos::prelude::*;

/// Full-height centered status line (loading, redirecting, errors)
#[component]
pub fn StatusScreen(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center">{message}</div>
    }
}
