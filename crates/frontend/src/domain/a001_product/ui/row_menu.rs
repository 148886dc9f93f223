use crate::shared::icons::icon;
use leptos::prelude::*;

/// "..." button of a product row with the 수정/삭제 actions
#[component]
pub fn ProductRowMenu(on_edit: Callback<()>, on_delete: Callback<()>) -> impl IntoView {
    let is_open = RwSignal::new(false);

    let pick = move |action: Callback<()>| {
        move |_| {
            is_open.set(false);
            action.run(());
        }
    };

    view! {
        <div class="row-menu" on:mouseleave=move |_| is_open.set(false)>
            <button
                class="button button--ghost row-menu__trigger"
                aria-label="actions"
                on:click=move |_| is_open.update(|open| *open = !*open)
            >
                {icon("more")}
            </button>
            <Show when=move || is_open.get()>
                <div class="row-menu__content">
                    <div class="row-menu__label">"작업"</div>
                    <div class="row-menu__separator"></div>
                    <button class="row-menu__item" on:click=pick(on_edit)>"수정"</button>
                    <button class="row-menu__item row-menu__item--danger" on:click=pick(on_delete)>
                        "삭제"
                    </button>
                </div>
            </Show>
        </div>
    }
}
