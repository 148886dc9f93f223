pub mod state;

use crate::domain::a001_product::ui::details::ProductForm;
use crate::domain::a001_product::ui::row_menu::ProductRowMenu;
use crate::shared::api_utils::asset_url;
use crate::shared::data_source::use_data_source;
use crate::shared::icons::icon;
use contracts::domain::a001_product::aggregate::Product;
use contracts::shared::format::format_number;
use leptos::prelude::*;
use leptos::task::spawn_local;
use state::{format_updated, ProductsDialog};
use thaw::*;
use uuid::Uuid;

#[component]
#[allow(non_snake_case)]
pub fn ProductsScreen() -> impl IntoView {
    let data_source = use_data_source();
    let products = RwSignal::new(Vec::<Product>::new());
    let loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let dialog = RwSignal::new(ProductsDialog::Closed);
    let deleting = RwSignal::new(false);

    // thaw dialogs are driven by their own open flags
    let create_open = RwSignal::new(false);
    let edit_open = RwSignal::new(false);
    let delete_open = RwSignal::new(false);

    Effect::new(move |_| {
        let current = dialog.get();
        create_open.set(current.is_create());
        edit_open.set(current.editing().is_some());
        delete_open.set(current.deleting().is_some());
    });
    // closed from the mask or Escape
    Effect::new(move |_| {
        let any_open = create_open.get() || edit_open.get() || delete_open.get();
        if !any_open && dialog.get_untracked() != ProductsDialog::Closed {
            dialog.set(ProductsDialog::Closed);
        }
    });

    let fetch = {
        let data_source = data_source.clone();
        move || {
            let data_source = data_source.clone();
            loading.set(true);
            spawn_local(async move {
                match data_source.list_products().await {
                    Ok(items) => {
                        products.set(items);
                        error.set(None);
                    }
                    Err(e) => {
                        log::error!("Loading products failed: {}", e);
                        error.set(Some(e));
                    }
                }
                loading.set(false);
            });
        }
    };
    fetch();

    let on_saved = Callback::new(move |saved: Product| {
        products.update(|items| state::upsert(items, saved));
        dialog.set(ProductsDialog::Closed);
    });

    let confirm_delete = {
        let data_source = data_source.clone();
        move |_| {
            let Some(id) = dialog.get_untracked().deleting() else {
                return;
            };
            let data_source = data_source.clone();
            deleting.set(true);
            spawn_local(async move {
                match data_source.delete_product(id).await {
                    Ok(()) => {
                        products.update(|items| state::remove(items, id));
                        error.set(None);
                    }
                    Err(e) => {
                        log::error!("Deleting product {} failed: {}", id, e);
                        error.set(Some(e));
                    }
                }
                deleting.set(false);
                dialog.set(ProductsDialog::Closed);
            });
        }
    };

    let open_row = move |id: Uuid, delete: bool| {
        let next = products.with_untracked(|items| ProductsDialog::open_for(items, id, delete));
        dialog.set(next);
    };

    let editing_product = move || {
        let id = dialog.get().editing()?;
        products.with_untracked(|items| items.iter().find(|p| p.id.value() == id).cloned())
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"상품 관리"</h1>
                </div>
                <div class="header__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| dialog.set(ProductsDialog::Create)
                    >
                        {icon("plus")}
                        "상품 등록"
                    </Button>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell min_width=96.0>"이미지"</TableHeaderCell>
                        <TableHeaderCell>"제목"</TableHeaderCell>
                        <TableHeaderCell class="text-right">"가격(원)"</TableHeaderCell>
                        <TableHeaderCell min_width=140.0 class="text-right">"수정일"</TableHeaderCell>
                        <TableHeaderCell min_width=60.0 class="text-right">"액션"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || {
                        let items = products.get();
                        if items.is_empty() {
                            let text = if loading.get() { "불러오는 중..." } else { "등록된 상품이 없습니다." };
                            return view! {
                                <TableRow>
                                    <TableCell attr:colspan="5" class="table__cell--empty">{text}</TableCell>
                                </TableRow>
                            }.into_any();
                        }
                        items.into_iter().map(|row| {
                            let id = row.id.value();
                            let thumb = row.cover_image().map(asset_url);
                            let alt = row.title.clone();
                            view! {
                                <TableRow>
                                    <TableCell>
                                        <div class="product-thumb">
                                            {match thumb {
                                                Some(src) => view! { <img src=src alt=alt /> }.into_any(),
                                                None => icon("image"),
                                            }}
                                        </div>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout>
                                            <div class="product-title">{row.title.clone()}</div>
                                            <div class="product-description">{row.description.clone()}</div>
                                        </TableCellLayout>
                                    </TableCell>
                                    <TableCell class="text-right">{format_number(row.price)}</TableCell>
                                    <TableCell class="text-right">{format_updated(row.metadata.updated_at)}</TableCell>
                                    <TableCell class="text-right">
                                        <ProductRowMenu
                                            on_edit=Callback::new(move |_| open_row(id, false))
                                            on_delete=Callback::new(move |_| open_row(id, true))
                                        />
                                    </TableCell>
                                </TableRow>
                            }
                        }).collect_view().into_any()
                    }}
                </TableBody>
            </Table>

            <Dialog open=create_open>
                <DialogSurface>
                    <DialogBody>
                        <DialogTitle>"상품 등록"</DialogTitle>
                        <DialogContent>
                            {move || dialog.get().is_create().then(|| view! {
                                <ProductForm product=None submit_text="등록" on_saved=on_saved />
                            })}
                        </DialogContent>
                    </DialogBody>
                </DialogSurface>
            </Dialog>

            <Dialog open=edit_open>
                <DialogSurface>
                    <DialogBody>
                        <DialogTitle>"상품 수정"</DialogTitle>
                        <DialogContent>
                            {move || editing_product().map(|product| view! {
                                <ProductForm product=Some(product) submit_text="수정" on_saved=on_saved />
                            })}
                        </DialogContent>
                    </DialogBody>
                </DialogSurface>
            </Dialog>

            <Dialog open=delete_open>
                <DialogSurface>
                    <DialogBody>
                        <DialogTitle>"정말 삭제하시겠습니까?"</DialogTitle>
                        <DialogContent>
                            "이 작업은 되돌릴 수 없습니다. 해당 상품이 목록에서 제거됩니다."
                        </DialogContent>
                        <DialogActions>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| dialog.set(ProductsDialog::Closed)
                            >
                                "취소"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Primary
                                class="button--danger"
                                disabled=deleting
                                on_click=confirm_delete
                            >
                                "삭제"
                            </Button>
                        </DialogActions>
                    </DialogBody>
                </DialogSurface>
            </Dialog>
        </div>
    }
}
