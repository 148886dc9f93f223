use super::view_model::ProductFormViewModel;
use crate::shared::api_utils::asset_url;
use crate::shared::data_source::use_data_source;
use contracts::domain::a001_product::aggregate::{Product, MAX_IMAGES};
use leptos::prelude::*;
use thaw::*;

/// Product create/edit form; `product` is `None` when registering a new one
#[component]
pub fn ProductForm(
    product: Option<Product>,
    submit_text: &'static str,
    on_saved: Callback<Product>,
) -> impl IntoView {
    let vm = ProductFormViewModel::new(product.as_ref());
    let data_source = use_data_source();
    on_cleanup(move || vm.release_previews());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        vm.save_command(data_source.clone(), on_saved);
    };

    view! {
        <form class="details-form product-form" on:submit=on_submit>
            <div class="form-group">
                <label for="product-title">"상품 제목"</label>
                <input
                    type="text"
                    id="product-title"
                    placeholder="예) 바나나 보관함"
                    prop:value=move || vm.form.get().title
                    on:input=move |ev| vm.form.update(|f| f.title = event_target_value(&ev))
                />
                {move || vm.errors.get().title.map(|e| view! { <p class="field-error">{e.to_string()}</p> })}
            </div>

            <div class="form-group">
                <label for="product-description">"상품 설명"</label>
                <textarea
                    id="product-description"
                    rows="4"
                    placeholder="간단한 설명을 입력하세요."
                    prop:value=move || vm.form.get().description
                    on:input=move |ev| vm.form.update(|f| f.description = event_target_value(&ev))
                />
                {move || vm.errors.get().description.map(|e| view! { <p class="field-error">{e.to_string()}</p> })}
            </div>

            <div class="form-group">
                <label for="product-price">"가격(원)"</label>
                <input
                    type="number"
                    id="product-price"
                    min="0"
                    placeholder="예) 12900"
                    prop:value=move || vm.form.get().price
                    on:input=move |ev| vm.form.update(|f| f.price = event_target_value(&ev))
                />
                {move || vm.errors.get().price.map(|e| view! { <p class="field-error">{e.to_string()}</p> })}
            </div>

            <div class="form-group">
                <label for="product-images">
                    {format!("이미지 파일 (최대 {}장)", MAX_IMAGES)}
                    {move || {
                        let remaining = vm.remaining();
                        (remaining > 0).then(|| view! {
                            <span class="form-hint">{format!(" (추가 가능: {}장)", remaining)}</span>
                        })
                    }}
                </label>
                <input
                    type="file"
                    id="product-images"
                    accept="image/png,image/jpeg,image/gif,image/webp"
                    multiple=true
                    disabled=move || vm.remaining() == 0
                    on:change=move |ev| {
                        let input = event_target::<web_sys::HtmlInputElement>(&ev);
                        if let Some(list) = input.files() {
                            vm.add_files(&list);
                        }
                        // same file can be picked again after removing it
                        input.set_value("");
                    }
                />
                {move || vm.errors.get().images.map(|e| view! { <p class="field-error">{e.to_string()}</p> })}
            </div>

            <div class="image-previews">
                {move || vm.existing_urls.get().into_iter().enumerate().map(|(i, src)| view! {
                    <div class="image-previews__item">
                        <img src=asset_url(&src) alt=format!("exist-{}", i) />
                        <button
                            type="button"
                            class="image-previews__remove"
                            aria-label="remove"
                            on:click=move |_| vm.remove_existing(i)
                        >
                            "삭제"
                        </button>
                    </div>
                }).collect_view()}
                {move || vm.files.with(|files| files.iter().map(|f| f.preview_url.clone()).collect::<Vec<_>>())
                    .into_iter()
                    .enumerate()
                    .map(|(i, src)| view! {
                        <div class="image-previews__item">
                            <img src=src alt=format!("new-{}", i) />
                            <button
                                type="button"
                                class="image-previews__remove"
                                aria-label="remove"
                                on:click=move |_| vm.remove_new(i)
                            >
                                "삭제"
                            </button>
                        </div>
                    }).collect_view()}
            </div>

            {move || vm.server_error.get().map(|e| view! { <p class="error-message">{e}</p> })}

            <div class="details-actions">
                <Button
                    button_type=ButtonType::Submit
                    appearance=ButtonAppearance::Primary
                    disabled=vm.submitting
                >
                    {move || if vm.submitting.get() { "처리 중..." } else { submit_text }}
                </Button>
            </div>
        </form>
    }
}
