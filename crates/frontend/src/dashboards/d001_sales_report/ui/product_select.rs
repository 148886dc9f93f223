use super::state::ProductOption;
use crate::shared::icons::icon;
use leptos::prelude::*;
use thaw::*;
use uuid::Uuid;

/// Products whose title contains `query`, ignoring case
pub fn filter_products(products: &[ProductOption], query: &str) -> Vec<ProductOption> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

pub fn trigger_text(selected: usize) -> String {
    if selected == 0 {
        "상품 선택".to_string()
    } else {
        format!("{}개 선택됨", selected)
    }
}

/// Multi-select popover for the report's product filter
#[component]
pub fn ProductMultiSelect(
    #[prop(into)] options: Signal<Vec<ProductOption>>,
    #[prop(into)] selected: Signal<Vec<ProductOption>>,
    on_toggle: Callback<Uuid>,
) -> impl IntoView {
    let is_open = RwSignal::new(false);
    let search = RwSignal::new(String::new());

    let visible = move || options.with(|items| filter_products(items, &search.get()));
    let is_checked = move |id: Uuid| selected.with(|items| items.iter().any(|p| p.id == id));

    view! {
        <div class="product-select">
            <button
                type="button"
                class="button button--secondary product-select__trigger"
                on:click=move |_| is_open.update(|open| *open = !*open)
            >
                <span>{move || trigger_text(selected.with(Vec::len))}</span>
                {icon("chevron-down")}
            </button>

            <Show when=move || is_open.get()>
                <div class="product-select__popover" on:mouseleave=move |_| is_open.set(false)>
                    <input
                        type="text"
                        class="product-select__search"
                        placeholder="상품 검색..."
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                    <div class="product-select__list">
                        {move || {
                            let items = visible();
                            if items.is_empty() {
                                return view! { <div class="product-select__empty">"결과 없음"</div> }.into_any();
                            }
                            items.into_iter().map(|option| {
                                let id = option.id;
                                view! {
                                    <label class="product-select__item">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || is_checked(id)
                                            on:change=move |_| on_toggle.run(id)
                                        />
                                        <span>{option.title}</span>
                                    </label>
                                }
                            }).collect_view().into_any()
                        }}
                    </div>
                </div>
            </Show>

            <div class="product-select__badges">
                {move || selected.get().into_iter().map(|option| {
                    let id = option.id;
                    view! {
                        <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                            {option.title}
                            <button
                                type="button"
                                class="product-select__badge-remove"
                                aria-label="remove"
                                on:click=move |_| on_toggle.run(id)
                            >
                                {icon("x")}
                            </button>
                        </Badge>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(title: &str) -> ProductOption {
        ProductOption {
            id: Uuid::new_v4(),
            title: title.into(),
        }
    }

    #[test]
    fn test_filter_products() {
        let items = vec![option("바나나 보관함"), option("초코 바나나 세트"), option("Sticker Pack")];
        assert_eq!(filter_products(&items, "").len(), 3);
        assert_eq!(filter_products(&items, "  ").len(), 3);
        assert_eq!(filter_products(&items, "바나나").len(), 2);
        assert_eq!(filter_products(&items, "sticker")[0].title, "Sticker Pack");
        assert!(filter_products(&items, "사과").is_empty());
    }

    #[test]
    fn test_trigger_text() {
        assert_eq!(trigger_text(0), "상품 선택");
        assert_eq!(trigger_text(2), "2개 선택됨");
    }
}
