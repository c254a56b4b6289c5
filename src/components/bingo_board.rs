//! Bingo Board Component
//!
//! Loads the item table, follows pushed updates and renders this device's
//! card as a 4-column grid with optimistic toggles.

use bingo_core::{resolve_card, CardSelection, ItemId, SyncClient, SyncMode, ToggleController};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{BingoCell, StatusScreen};
use crate::context::use_app_context;
use crate::live::{follow_changes, spawn_refresh};
use crate::refresh::refresh_on_return;
use crate::store::{new_items_store, store_is_loaded, store_items, StoreItems};

#[component]
pub fn BingoBoard() -> impl IntoView {
    let ctx = use_app_context();
    let config = ctx.config();

    let store = new_items_store();
    let cache = StoreItems(store);
    let repo = ctx.repository();
    let sync = SyncClient::new(repo.clone(), cache, SyncMode::UpdatesOnly);
    let toggler = StoredValue::new_local(ToggleController::new(repo, cache));

    spawn_refresh(sync.clone(), store);
    follow_changes(&config, &config.board_channel, sync.clone(), store);
    if config.features.refresh_on_focus {
        let sync = StoredValue::new_local(sync);
        refresh_on_return(move || spawn_refresh(sync.get_value(), store));
    }

    // Pick or restore the card once rows are in
    let card = RwSignal::new(None::<CardSelection>);
    Effect::new(move |_| {
        if !store_is_loaded(&store) || card.with_untracked(Option::is_some) {
            return;
        }
        let items = store_items(&store);
        if let Some(selection) = ctx.prefs().card_or_draw(&items, &mut rand::thread_rng()) {
            log::debug!("Card has {} cells", selection.len());
            card.set(Some(selection));
        }
    });

    let cells = Memo::new(move |_| {
        card.with(|selection| {
            selection
                .as_ref()
                .map(|selection| resolve_card(selection, &store_items(&store)))
                .unwrap_or_default()
        })
    });

    let on_toggle = Callback::new(move |(id, was_checked): (ItemId, bool)| {
        let toggler = toggler.get_value();
        spawn_local(async move {
            if let Err(e) = toggler.toggle(&id, was_checked).await {
                log::error!("Update failed: {}", e);
            }
        });
    });

    view! {
        <Show
            when=move || cells.with(|cells| !cells.is_empty())
            fallback=|| view! { <StatusScreen message="📦 Kaart wordt geladen…" /> }
        >
            <div class="max-w-md mx-auto grid grid-cols-4 gap-2">
                <For
                    each=move || cells.get()
                    key=|item| item.clone()
                    children=move |item| view! { <BingoCell item=item on_toggle=on_toggle /> }
                />
            </div>
        </Show>
    }
}
