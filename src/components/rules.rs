//! Rules Components
//!
//! The one-time rules modal and the compact list shown above the board.

use leptos::prelude::*;

const INLINE_RULES: &[&str] = &[
    "Eerste die een kaart vol heeft wint.",
    "Stan mag niet doorhebben dat we bingo spelen, anders straf (shotje/atje).",
    "Ontdekt hij manipulatie, dan straf (shotje/atje).",
    "Minimaal 2 getuigen vereist.",
];

const MODAL_RULES: &[&str] = &[
    "Eerste die een kaart vol heeft wint.",
    "Komt Stan er door jou achter dat we bingo spelen, straf atje of shotje.",
    "Je mag hem proberen iets te laten doen/zeggen. MAAR: komt Stan erachter dat je hem manipuleert, straf atje of shotje.",
    "Minstens 2 getuigen.",
];

#[component]
pub fn RulesModal(on_accept: Callback<()>) -> impl IntoView {
    view! {
        <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
            <div class="bg-white rounded-lg p-6 mx-4 max-w-md text-left">
                <h2 class="text-xl font-bold mb-4">"Spelregels"</h2>
                <ul class="list-disc pl-5 space-y-2 mb-6 text-sm">
                    {MODAL_RULES.iter().map(|rule| view! { <li>{*rule}</li> }).collect_view()}
                </ul>
                <button
                    class="block w-full bg-green-600 hover:bg-green-700 text-white py-2 rounded"
                    on:click=move |_| on_accept.run(())
                >
                    "Ik begrijp het, laten we beginnen!"
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn RulesInline() -> impl IntoView {
    view! {
        <div class="mb-4 p-2 bg-gray-50 rounded border border-gray-200 text-xs text-gray-600">
            <strong class="block mb-1">"Korte Regels"</strong>
            <ul class="list-disc list-inside space-y-0">
                {INLINE_RULES.iter().map(|rule| view! { <li>{*rule}</li> }).collect_view()}
            </ul>
        </div>
    }
}
