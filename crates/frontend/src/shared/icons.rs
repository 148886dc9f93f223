use leptos::prelude::*;

/// Stroke-only 24x24 glyph at the given pixel size
fn frame(size: u32, shapes: impl IntoView + 'static) -> AnyView {
    view! {
        <svg
            width=size
            height=size
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            aria-hidden="true"
        >
            {shapes}
        </svg>
    }
    .into_any()
}

/// Inline SVG icon by name; unknown names render a neutral circle
pub fn icon(name: &str) -> AnyView {
    match name {
        "plus" => frame(16, view! { <path d="M12 5v14"/><path d="M5 12h14"/> }),
        "more" => frame(
            16,
            view! {
                <circle cx="5" cy="12" r="1"/>
                <circle cx="12" cy="12" r="1"/>
                <circle cx="19" cy="12" r="1"/>
            },
        ),
        "x" => frame(14, view! { <path d="M18 6 6 18"/><path d="m6 6 12 12"/> }),
        "logout" => frame(
            16,
            view! {
                <path d="M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4"/>
                <polyline points="16 17 21 12 16 7"/>
                <path d="M21 12H9"/>
            },
        ),
        "image" => frame(
            20,
            view! {
                <rect x="3" y="3" width="18" height="18" rx="2" ry="2"/>
                <circle cx="9" cy="9" r="2"/>
                <path d="m21 15-3.09-3.09a2 2 0 0 0-2.82 0L6 21"/>
            },
        ),
        "chevron-left" => frame(16, view! { <polyline points="15 18 9 12 15 6"/> }),
        "chevron-right" => frame(16, view! { <polyline points="9 18 15 12 9 6"/> }),
        "chevron-down" => frame(16, view! { <polyline points="6 9 12 15 18 9"/> }),
        _ => frame(20, view! { <circle cx="12" cy="12" r="10"/> }),
    }
}
