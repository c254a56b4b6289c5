//! Admin Page
//!
//! Every row in id order, kept current from insert, update and delete
//! events on the admin channel.

use bingo_core::{EditSession, SyncClient, SyncMode};
use leptos::prelude::*;

use crate::components::{AdminItemRow, LogPanel, NewItemForm};
use crate::context::{use_app_context, Admin};
use crate::live::{follow_changes, spawn_refresh};
use crate::store::{new_items_store, store_item_count, store_items, StoreItems};

#[component]
pub fn AdminPage() -> impl IntoView {
    let ctx = use_app_context();
    let config = ctx.config();

    let store = new_items_store();
    let repo = ctx.repository();
    let sync = SyncClient::new(repo.clone(), StoreItems(store), SyncMode::Full);
    let admin = StoredValue::new_local(Admin::new(repo));
    let session = RwSignal::new(EditSession::Idle);

    spawn_refresh(sync.clone(), store);
    follow_changes(&config, &config.admin_channel, sync, store);

    view! {
        <main class="min-h-screen bg-gray-50 p-4">
            <h1 class="text-2xl font-bold mb-2 text-center">"🍻 Stan Bingo Admin"</h1>
            <p class="text-center mb-4">"Total items: " {move || store_item_count(&store)}</p>
            <NewItemForm admin=admin />
            <div class="space-y-2">
                <For
                    each=move || store_items(&store)
                    key=|item| item.clone()
                    children=move |item| view! { <AdminItemRow item=item session=session admin=admin /> }
                />
            </div>
            <LogPanel />
        </main>
    }
}
