use bingo_core::{Item, ItemId};
use leptos::prelude::*;

const CELL_CLASS: &str = "p-2 text-xs text-center rounded border transition";

/// One card cell; clicking reports its id and the checked state it showed
#[component]
pub fn BingoCell(item: Item, on_toggle: Callback<(ItemId, bool)>) -> impl IntoView {
    let Item { id, text, checked } = item;
    let class = if checked {
        format!("{CELL_CLASS} bg-green-300 line-through border-green-600")
    } else {
        format!("{CELL_CLASS} bg-gray-100 hover:bg-blue-100 border-gray-300")
    };

    view! {
        <button class=class on:click=move |_| on_toggle.run((id.clone(), checked))>
            {text}
        </button>
    }
}
