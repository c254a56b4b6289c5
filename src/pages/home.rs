//! Home Page
//!
//! Title, rules and the board. The board stays unmounted while the rules
//! modal is open.

use leptos::prelude::*;

use crate::components::{BingoBoard, RulesInline, RulesModal};
use crate::context::use_app_context;

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_app_context();
    let seen = !ctx.features().rules_modal || ctx.prefs().rules_seen();
    let show_modal = RwSignal::new(!seen);
    let rules_accepted = RwSignal::new(seen);

    let accept_rules = Callback::new(move |_: ()| {
        ctx.prefs().mark_rules_seen();
        rules_accepted.set(true);
        show_modal.set(false);
    });

    view! {
        <Show when=move || show_modal.get()>
            <RulesModal on_accept=accept_rules />
        </Show>
        <main class="min-h-screen p-2 w-full">
            <Show when=move || !show_modal.get()>
                <h1 class="text-3xl font-bold mb-4 text-center">"🍻 Stan Bingo"</h1>
                <Show when=move || rules_accepted.get()>
                    <RulesInline />
                </Show>
                <BingoBoard />
            </Show>
        </main>
    }
}
