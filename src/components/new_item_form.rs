//! New Item Form Component
//!
//! Inserts a bingo cell; blank input never reaches the store.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::Admin;

#[component]
pub fn NewItemForm(admin: StoredValue<Admin, LocalStorage>) -> impl IntoView {
    let (new_text, set_new_text) = signal(String::new());

    let add_item = move |ev: SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get_untracked();
        let admin = admin.get_value();
        spawn_local(async move {
            match admin.add_item(&text).await {
                // the list fills in from the echoed insert
                Ok(true) => set_new_text.set(String::new()),
                Ok(false) => {}
                Err(e) => log::error!("Insert error: {}", e),
            }
        });
    };

    view! {
        <form class="flex gap-2 mb-6" on:submit=add_item>
            <input
                type="text"
                class="flex-1 border rounded px-2 py-1"
                placeholder="New item text…"
                prop:value=move || new_text.get()
                on:input=move |ev| set_new_text.set(event_target_value(&ev))
            />
            <button type="submit" class="bg-blue-600 text-white px-4 py-1 rounded hover:bg-blue-700">
                "Add"
            </button>
        </form>
    }
}
