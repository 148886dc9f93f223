use super::product_select::ProductMultiSelect;
use super::state::SalesScreenState;
use crate::shared::data_source::use_data_source;
use crate::shared::icons::icon;
use contracts::dashboards::d001_sales_report::MeasureMode;
use contracts::shared::date_bucket::Granularity;
use contracts::shared::format::{format_number, format_won};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
#[allow(non_snake_case)]
pub fn SalesScreen() -> impl IntoView {
    let data_source = use_data_source();
    let state = RwSignal::new(SalesScreenState::new(chrono::Local::now().date_naive()));

    // product filter options
    {
        let data_source = data_source.clone();
        spawn_local(async move {
            match data_source.list_products().await {
                Ok(items) => state.update(|s| s.products_loaded(&items)),
                Err(e) => {
                    log::error!("Loading products for the sales filter failed: {}", e);
                    state.update(|s| s.error = Some(e));
                }
            }
        });
    }

    let grain_value = RwSignal::new(Granularity::Day.as_str().to_string());
    Effect::new(move |_| {
        if let Ok(grain) = grain_value.get().parse::<Granularity>() {
            if state.with_untracked(|s| s.grain) != grain {
                state.update(|s| s.set_grain(grain));
            }
        }
    });

    let request_key = Memo::new(move |_| state.with(|s| s.request_key()));
    Effect::new(move |_| {
        request_key.track();
        let Some((ticket, query)) = state.try_update(|s| s.begin_request()).flatten() else {
            return;
        };
        let data_source = data_source.clone();
        spawn_local(async move {
            let result = data_source.fetch_sales(&query).await;
            if let Err(e) = &result {
                log::error!("Loading sales for {:?} failed: {}", query, e);
            }
            state.update(|s| {
                if !s.apply(ticket, result) {
                    log::debug!("Dropped stale sales response #{}", ticket);
                }
            });
        });
    });

    let options = Signal::derive(move || state.with(|s| s.products.clone()));
    let selected = Signal::derive(move || state.with(|s| s.selected_options()));
    let on_toggle = Callback::new(move |id| state.update(|s| s.toggle_product(id)));
    let mode = move || state.with(|s| s.mode);

    let mode_button = move |target: MeasureMode| {
        view! {
            <Button
                size=ButtonSize::Small
                appearance=move || if mode() == target { ButtonAppearance::Primary } else { ButtonAppearance::Secondary }
                on_click=move |_| state.update(|s| s.set_mode(target))
            >
                {target.label()}
            </Button>
        }
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"판매 내역"</h1>
                </div>
            </div>

            <div class="filter-panel">
                <Flex align=FlexAlign::Center gap=FlexGap::Large>
                    <RadioGroup value=grain_value>
                        {Granularity::all().into_iter().map(|g| view! {
                            <Radio value=g.as_str() label=g.label() />
                        }).collect_view()}
                    </RadioGroup>

                    <Flex align=FlexAlign::Center gap=FlexGap::Small>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| state.update(|s| s.step(-1))
                        >
                            {icon("chevron-left")}
                        </Button>
                        <span class="period-label">{move || state.with(|s| s.label())}</span>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| state.update(|s| s.step(1))
                        >
                            {icon("chevron-right")}
                        </Button>
                    </Flex>

                    <ProductMultiSelect options=options selected=selected on_toggle=on_toggle />

                    <Space>
                        {mode_button(MeasureMode::Amount)}
                        {mode_button(MeasureMode::Quantity)}
                    </Space>
                </Flex>
            </div>

            {move || state.with(|s| s.error.clone()).map(|e| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell min_width=140.0>"버킷"</TableHeaderCell>
                        <TableHeaderCell class="text-right">"총 금액"</TableHeaderCell>
                        <TableHeaderCell class="text-right">"총 수량"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || {
                        let (rows, loading, current) = state.with(|s| (s.rows.clone(), s.loading, s.mode));
                        if loading {
                            return view! {
                                <TableRow>
                                    <TableCell attr:colspan="3" class="table__cell--empty">
                                        <Spinner />
                                        " 불러오는 중..."
                                    </TableCell>
                                </TableRow>
                            }.into_any();
                        }
                        if rows.is_empty() {
                            return view! {
                                <TableRow>
                                    <TableCell attr:colspan="3" class="table__cell--empty">"데이터가 없습니다."</TableCell>
                                </TableRow>
                            }.into_any();
                        }
                        let emphasis = move |m: MeasureMode| {
                            if m == current { "text-right measure--active" } else { "text-right" }
                        };
                        let totals = state.with(|s| s.totals());
                        view! {
                            {rows.into_iter().map(|row| view! {
                                <TableRow>
                                    <TableCell>{row.bucket.clone()}</TableCell>
                                    <TableCell class=emphasis(MeasureMode::Amount)>{format_won(row.total_amount)}</TableCell>
                                    <TableCell class=emphasis(MeasureMode::Quantity)>{format_number(row.total_qty)}</TableCell>
                                </TableRow>
                            }).collect_view()}
                            <TableRow class="table__row--totals">
                                <TableCell>"합계"</TableCell>
                                <TableCell class=emphasis(MeasureMode::Amount)>{format_won(totals.total_amount)}</TableCell>
                                <TableCell class=emphasis(MeasureMode::Quantity)>{format_number(totals.total_qty)}</TableCell>
                            </TableRow>
                        }.into_any()
                    }}
                </TableBody>
            </Table>
        </div>
    }
}
