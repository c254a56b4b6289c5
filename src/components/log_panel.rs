use leptos::prelude::*;

/// Tail of the in-memory log, for checking sync trouble from a phone
#[component]
pub fn LogPanel() -> impl IntoView {
    let lines = RwSignal::new(rolling_logger::recent_lines());

    view! {
        <details class="mt-6 text-xs">
            <summary class="cursor-pointer text-gray-500">"Log"</summary>
            <button
                class="text-blue-600 my-1"
                on:click=move |_| lines.set(rolling_logger::recent_lines())
            >
                "Reload"
            </button>
            <pre class="bg-white border rounded p-2 overflow-auto max-h-64">
                {move || lines.with(|lines| lines.join("\n"))}
            </pre>
        </details>
    }
}
