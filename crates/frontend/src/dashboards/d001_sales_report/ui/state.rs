//! State of the sales screen.
//!
//! Every user action is a method on `SalesScreenState`; the view keeps one
//! instance in a signal and only renders it. Reloads are numbered: the view
//! asks `begin_request` for a ticket and hands it back with the response, and
//! only the most recent ticket may change the rows.

use chrono::NaiveDate;
use contracts::dashboards::d001_sales_report::{MeasureMode, SalesBucket, SalesQuery, SalesTotals};
use contracts::domain::a001_product::aggregate::Product;
use contracts::shared::date_bucket::{advance, period_label, range_for_anchor, DateRange, Granularity};
use uuid::Uuid;

/// Entry of the product filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOption {
    pub id: Uuid,
    pub title: String,
}

impl From<&Product> for ProductOption {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.value(),
            title: product.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesScreenState {
    pub grain: Granularity,
    pub anchor: NaiveDate,
    pub products: Vec<ProductOption>,
    pub selected: Vec<Uuid>,
    pub mode: MeasureMode,
    pub rows: Vec<SalesBucket>,
    pub loading: bool,
    pub error: Option<String>,
    issued: u64,
}

impl SalesScreenState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            grain: Granularity::Day,
            anchor: today,
            products: Vec::new(),
            selected: Vec::new(),
            mode: MeasureMode::Amount,
            rows: Vec::new(),
            loading: false,
            error: None,
            issued: 0,
        }
    }

    /// Switching the unit keeps the anchor date
    pub fn set_grain(&mut self, grain: Granularity) {
        self.grain = grain;
    }

    /// ◀ is `-1`, ▶ is `+1`
    pub fn step(&mut self, delta: i32) {
        self.anchor = advance(self.anchor, self.grain, delta);
    }

    pub fn set_mode(&mut self, mode: MeasureMode) {
        self.mode = mode;
    }

    pub fn toggle_product(&mut self, id: Uuid) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Take the product list; the first product is preselected when nothing is
    pub fn products_loaded(&mut self, products: &[Product]) {
        self.products = products.iter().map(ProductOption::from).collect();
        let known: Vec<Uuid> = self.products.iter().map(|p| p.id).collect();
        self.selected.retain(|id| known.contains(id));
        if self.selected.is_empty() {
            if let Some(first) = self.products.first() {
                self.selected.push(first.id);
            }
        }
    }

    pub fn selected_options(&self) -> Vec<ProductOption> {
        self.selected
            .iter()
            .filter_map(|id| self.products.iter().find(|p| p.id == *id).cloned())
            .collect()
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    pub fn range(&self) -> DateRange {
        range_for_anchor(self.anchor, self.grain)
    }

    pub fn label(&self) -> String {
        period_label(self.anchor, self.grain)
    }

    /// Query for the current selection; `None` while no product is selected
    pub fn request_key(&self) -> Option<SalesQuery> {
        if self.selected.is_empty() {
            return None;
        }
        Some(SalesQuery::new(self.range(), self.grain, self.selected.clone()))
    }

    /// Issue a new ticket. Without a selection the rows are cleared and
    /// nothing is requested, but the ticket still moves so that responses
    /// still in flight are dropped.
    pub fn begin_request(&mut self) -> Option<(u64, SalesQuery)> {
        self.issued += 1;
        self.error = None;
        match self.request_key() {
            Some(query) => {
                self.loading = true;
                Some((self.issued, query))
            }
            None => {
                self.loading = false;
                self.rows.clear();
                None
            }
        }
    }

    /// Apply a response; returns `false` when the ticket is stale
    pub fn apply(&mut self, ticket: u64, result: Result<Vec<SalesBucket>, String>) -> bool {
        if ticket != self.issued {
            return false;
        }
        self.loading = false;
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.error = None;
            }
            Err(e) => {
                self.rows.clear();
                self.error = Some(e);
            }
        }
        true
    }

    pub fn totals(&self) -> SalesTotals {
        SalesTotals::from_buckets(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_product::aggregate::ProductFields;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn product(title: &str) -> Product {
        Product::new_for_insert(
            ProductFields {
                title: title.into(),
                description: "설명".into(),
                price: 1000,
            },
            vec!["/uploads/a.png".into()],
        )
    }

    fn bucket(key: &str, qty: i64, amount: i64) -> SalesBucket {
        SalesBucket {
            bucket: key.into(),
            total_amount: amount,
            total_qty: qty,
        }
    }

    #[test]
    fn test_navigation_and_grain_switch() {
        let mut state = SalesScreenState::new(d(2024, 1, 31));
        state.set_grain(Granularity::Month);
        state.step(1);
        assert_eq!(state.anchor, d(2024, 2, 29));
        assert_eq!(state.label(), "2024년 2월");
        assert_eq!(state.range(), DateRange { from: d(2024, 2, 1), to: d(2024, 2, 29) });

        // anchor survives the switch
        state.set_grain(Granularity::Year);
        assert_eq!(state.anchor, d(2024, 2, 29));
        assert_eq!(state.range(), DateRange { from: d(2024, 1, 1), to: d(2024, 12, 31) });
        state.step(-1);
        assert_eq!(state.label(), "2023년");

        state.set_grain(Granularity::Day);
        assert_eq!(state.range().from, state.range().to);
    }

    #[test]
    fn test_first_product_is_preselected() {
        let mut state = SalesScreenState::new(d(2024, 3, 1));
        assert!(state.request_key().is_none());

        let items = vec![product("바나나 보관함"), product("초코 바나나 세트")];
        state.products_loaded(&items);
        assert_eq!(state.selected, vec![items[0].id.value()]);

        state.toggle_product(items[1].id.value());
        state.products_loaded(&items);
        assert_eq!(state.selected.len(), 2);
        assert_eq!(state.selected_options()[1].title, "초코 바나나 세트");

        state.toggle_product(items[0].id.value());
        state.toggle_product(items[1].id.value());
        assert!(state.selected.is_empty());
        assert!(state.request_key().is_none());
    }

    #[test]
    fn test_request_key_follows_selection() {
        let mut state = SalesScreenState::new(d(2024, 3, 15));
        let items = vec![product("a")];
        state.products_loaded(&items);
        state.set_grain(Granularity::Month);

        let query = state.request_key().unwrap();
        assert_eq!(query.from, d(2024, 3, 1));
        assert_eq!(query.to, d(2024, 3, 31));
        assert_eq!(query.grain, Granularity::Month);
        assert_eq!(query.product_ids, vec![items[0].id.value()]);

        // the measure toggle does not refetch
        state.set_mode(MeasureMode::Quantity);
        assert_eq!(state.request_key(), Some(query));
    }

    #[test]
    fn test_stale_ticket_is_dropped() {
        let mut state = SalesScreenState::new(d(2024, 3, 15));
        state.products_loaded(&[product("a")]);

        let (first, _) = state.begin_request().unwrap();
        state.step(1);
        let (second, _) = state.begin_request().unwrap();
        assert!(state.loading);

        assert!(!state.apply(first, Ok(vec![bucket("2024-03-15", 9, 9000)])));
        assert!(state.rows.is_empty());
        assert!(state.loading);

        assert!(state.apply(second, Ok(vec![bucket("2024-03-16", 2, 3000)])));
        assert!(!state.loading);
        assert_eq!(state.rows[0].bucket, "2024-03-16");
        assert_eq!(state.totals().total_amount, 3000);
    }

    #[test]
    fn test_empty_selection_clears_rows() {
        let mut state = SalesScreenState::new(d(2024, 3, 15));
        let items = vec![product("a")];
        state.products_loaded(&items);

        let (ticket, _) = state.begin_request().unwrap();
        state.toggle_product(items[0].id.value());
        assert!(state.begin_request().is_none());
        assert!(!state.loading);

        assert!(!state.apply(ticket, Ok(vec![bucket("2024-03-15", 1, 1000)])));
        assert!(state.rows.is_empty());
    }

    #[test]
    fn test_error_result() {
        let mut state = SalesScreenState::new(d(2024, 3, 15));
        state.products_loaded(&[product("a")]);
        let (ticket, _) = state.begin_request().unwrap();
        state.apply(ticket, Err("판매 내역을 불러오지 못했습니다. (500)".into()));
        assert!(state.rows.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_some());
        assert_eq!(state.totals(), SalesTotals::default());
    }
}
