//! Admin Item Row Component
//!
//! Click the text to flip `checked`, the pencil to edit. While editing,
//! Enter saves and Escape cancels.

use bingo_core::{EditSession, Item, ItemId};
use leptos::ev::KeyboardEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::Admin;

const ROW_CLASS: &str =
    "flex items-center justify-between p-3 rounded-lg border transition-all duration-200 cursor-pointer";

#[component]
pub fn AdminItemRow(
    item: Item,
    session: RwSignal<EditSession>,
    admin: StoredValue<Admin, LocalStorage>,
) -> impl IntoView {
    let Item { id, text, checked } = item;
    let class = if checked {
        format!("{ROW_CLASS} bg-green-100 border-green-400")
    } else {
        format!("{ROW_CLASS} bg-white border-gray-300 hover:bg-blue-50")
    };

    let editing = {
        let id = id.clone();
        Memo::new(move |_| session.with(|s| s.is_editing(&id)))
    };

    let toggle = move |id: ItemId| {
        let admin = admin.get_value();
        spawn_local(async move {
            if let Err(e) = admin.toggle(&id, checked).await {
                log::error!("Toggle error: {}", e);
            }
        });
    };

    // The row leaves edit mode right away; the store catches up from the echo.
    let save = move || {
        let Some(mut finished) = session.try_update(|s| std::mem::take(s)) else {
            return;
        };
        let admin = admin.get_value();
        spawn_local(async move {
            if let Err(e) = admin.save_edit(&mut finished).await {
                log::error!("Update error: {}", e);
            }
        });
    };

    let on_keydown = move |ev: KeyboardEvent| match ev.key().as_str() {
        "Enter" => save(),
        "Escape" => session.update(EditSession::cancel),
        _ => {}
    };

    view! {
        <div class=class>
            <Show
                when=move || editing.get()
                fallback=move || {
                    let toggle_id = id.clone();
                    let edit_id = id.clone();
                    let edit_text = text.clone();
                    view! {
                        <span class="flex-1" on:click=move |_| toggle(toggle_id.clone())>
                            {text.clone()}
                        </span>
                        <button on:click=move |_| {
                            session.set(EditSession::start(edit_id.clone(), edit_text.clone()))
                        }>
                            <span class="ml-2">"✏️"</span>
                        </button>
                    }
                }
            >
                <input
                    class="flex-1 border rounded px-2 py-1 mr-2"
                    prop:value=move || session.with(|s| s.draft().unwrap_or_default().to_string())
                    on:input=move |ev| {
                        let draft = event_target_value(&ev);
                        session.update(|s| s.set_draft(draft));
                    }
                    on:keydown=on_keydown
                />
                <button class="text-green-600 mr-2" on:click=move |_| save()>"Save"</button>
                <button class="text-red-600" on:click=move |_| session.update(EditSession::cancel)>
                    "Cancel"
                </button>
            </Show>
        </div>
    }
}
