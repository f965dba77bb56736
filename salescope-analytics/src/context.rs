//! The analysis context: one snapshot of a period for the summarizer

use crate::customers::{classify_customers, SegmentCounts};
use crate::filter::filter_by_period;
use crate::format::{format_count, format_percent, round2, CurrencyFormat};
use crate::kpi::{compute_general_kpis, GeneralKpis};
use crate::ranking::{
    rank_channels, rank_products, rank_stores, ChannelAnalysis, ChannelShare, ProductPerformance,
    ProductRanking, StorePerformance, StoreRanking,
};
use chrono::NaiveDate;
use salescope_core::{AnalysisPeriod, LineItem, RecordSet, Sale};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// How many entries each ranking keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    /// Stores in each of the top and bottom lists
    pub stores: usize,
    /// Products in each product ranking
    pub products: usize,
    /// Channels ranked by revenue
    pub channels: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            stores: 5,
            products: 5,
            channels: 7,
        }
    }
}

/// Builds [`AnalysisContext`] snapshots
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    limits: ContextLimits,
    currency: CurrencyFormat,
}

impl ContextBuilder {
    /// Builder with limits 5/5/7 and the default currency
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ranking limits
    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the currency used by the display document
    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    /// Build the context for `[period_start, period_end]`
    ///
    /// Only completed sales count. The full completed history is the lookup
    /// for first purchases; line items are filtered on their sale date only.
    pub fn build<'s, 'i, S, L>(
        &self,
        all_sales: S,
        all_line_items: L,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AnalysisContext
    where
        S: IntoIterator<Item = &'s Sale>,
        L: IntoIterator<Item = &'i LineItem>,
    {
        let completed: Vec<&Sale> = all_sales.into_iter().filter(|s| s.is_completed()).collect();
        let sales_in_period = filter_by_period(
            completed.iter().copied(),
            period_start,
            period_end,
            Sale::sale_date,
        );
        let items_in_period =
            filter_by_period(all_line_items, period_start, period_end, LineItem::sale_day);

        let general_kpis = compute_general_kpis(sales_in_period.iter().copied());
        let customers =
            classify_customers(completed.iter().copied(), sales_in_period.iter().copied()).counts;
        let stores = rank_stores(sales_in_period.iter().copied(), self.limits.stores);
        let products = rank_products(items_in_period.iter().copied(), self.limits.products);
        let channels = rank_channels(sales_in_period.iter().copied(), self.limits.channels);

        tracing::debug!(
            start = %period_start,
            end = %period_end,
            orders = general_kpis.total_orders,
            line_items = items_in_period.len(),
            "built analysis context"
        );

        AnalysisContext {
            period_start,
            period_end,
            general_kpis,
            customers,
            stores,
            products,
            channels,
            limits: self.limits,
            currency: self.currency.clone(),
        }
    }

    /// Build the context for a period over a loaded record set
    pub fn build_for(&self, records: &RecordSet, period: &AnalysisPeriod) -> AnalysisContext {
        self.build(&records.sales, &records.line_items, period.start(), period.end())
    }
}

/// Build a context with the default limits and currency
pub fn build_context<'s, 'i, S, L>(
    all_sales: S,
    all_line_items: L,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> AnalysisContext
where
    S: IntoIterator<Item = &'s Sale>,
    L: IntoIterator<Item = &'i LineItem>,
{
    ContextBuilder::default().build(all_sales, all_line_items, period_start, period_end)
}

/// Snapshot of one period
///
/// Values keep full precision; the documents round or format them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisContext {
    /// First day of the period
    pub period_start: NaiveDate,
    /// Last day of the period, inclusive
    pub period_end: NaiveDate,
    /// Revenue, orders and AOV
    pub general_kpis: GeneralKpis,
    /// New, returning and unidentified order counts
    pub customers: SegmentCounts,
    /// Top and bottom stores by revenue
    pub stores: StoreRanking,
    /// Best sellers by quantity and by revenue
    pub products: ProductRanking,
    /// Channels by revenue with their shares
    pub channels: ChannelAnalysis,
    #[serde(skip)]
    limits: ContextLimits,
    #[serde(skip)]
    currency: CurrencyFormat,
}

#[derive(Clone, Copy)]
enum Rendering<'a> {
    Machine,
    Display(&'a CurrencyFormat),
}

impl Rendering<'_> {
    fn money(&self, value: f64) -> Value {
        match self {
            Self::Machine => json!(round2(value)),
            Self::Display(currency) => json!(currency.format(value)),
        }
    }

    fn count(&self, value: u64) -> Value {
        match self {
            Self::Machine => json!(value),
            Self::Display(_) => json!(format_count(value)),
        }
    }

    fn percent(&self, value: f64) -> Value {
        match self {
            Self::Machine => json!(round2(value)),
            Self::Display(_) => json!(format_percent(value)),
        }
    }
}

impl AnalysisContext {
    /// `"From DD/MM/YYYY to DD/MM/YYYY"`
    pub fn period_label(&self) -> String {
        format!(
            "From {} to {}",
            self.period_start.format("%d/%m/%Y"),
            self.period_end.format("%d/%m/%Y")
        )
    }

    /// Identified share of the period's orders, in percent
    pub fn pct_identified(&self) -> f64 {
        self.customers.pct_identified()
    }

    /// Nested document with numbers rounded to 2 decimals
    pub fn to_machine_document(&self) -> Value {
        self.render(Rendering::Machine)
    }

    /// Nested document with pre-formatted strings
    pub fn to_display_document(&self) -> Value {
        self.render(Rendering::Display(&self.currency))
    }

    fn render(&self, r: Rendering<'_>) -> Value {
        let store = |s: &StorePerformance| {
            json!({
                "store_id": s.store_id,
                "store_name": s.store_name,
                "revenue": r.money(s.revenue),
                "orders": r.count(s.orders),
                "average_order_value": r.money(s.average_order_value),
            })
        };
        let product = |p: &ProductPerformance| {
            json!({
                "product_id": p.product_id,
                "product_name": p.product_name,
                "quantity": r.count(p.quantity),
                "revenue": r.money(p.revenue),
            })
        };
        let channel = |c: &ChannelShare| {
            json!({
                "channel_id": c.channel_id,
                "channel_name": c.channel_name,
                "orders": r.count(c.orders),
                "revenue": r.money(c.revenue),
                "revenue_share": r.percent(c.revenue_share),
            })
        };
        let list = |key: String, values: Vec<Value>| (key, Value::Array(values));

        let ContextLimits {
            stores: ns,
            products: np,
            channels: nc,
        } = self.limits;

        let store_performance: Map<String, Value> = [
            list(format!("top_{ns}_stores"), self.stores.top.iter().map(store).collect()),
            list(format!("bottom_{ns}_stores"), self.stores.bottom.iter().map(store).collect()),
        ]
        .into_iter()
        .collect();

        let products = &self.products;
        let product_performance: Map<String, Value> = [
            list(format!("top_{np}_by_quantity"), products.top_by_quantity.iter().map(product).collect()),
            list(format!("top_{np}_by_revenue"), products.top_by_revenue.iter().map(product).collect()),
            list(format!("bottom_{np}_by_quantity"), products.bottom_by_quantity.iter().map(product).collect()),
            list(format!("bottom_{np}_by_revenue"), products.bottom_by_revenue.iter().map(product).collect()),
        ]
        .into_iter()
        .collect();

        let mut channel_analysis = Map::new();
        channel_analysis.insert("total_revenue".into(), r.money(self.channels.total_revenue));
        channel_analysis.insert(
            format!("top_{nc}_channels_by_revenue"),
            Value::Array(self.channels.top_channels.iter().map(channel).collect()),
        );

        json!({
            "analysis_period": self.period_label(),
            "general_kpis": {
                "total_revenue": r.money(self.general_kpis.total_revenue),
                "total_orders": r.count(self.general_kpis.total_orders),
                "average_order_value": r.money(self.general_kpis.average_order_value),
            },
            "customer_analysis": {
                "new_customer_orders": r.count(self.customers.new_orders),
                "returning_customer_orders": r.count(self.customers.returning_orders),
                "unidentified_orders": r.count(self.customers.unidentified_orders),
                "pct_identified_orders": r.percent(self.pct_identified()),
            },
            "store_performance": store_performance,
            "product_performance": product_performance,
            "channel_analysis": channel_analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;
    use salescope_core::SaleStatus;

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    /// Customer 1 buys for the first time in the period, customer 2 bought
    /// before it, the third sale is anonymous, and one cancelled sale is
    /// ignored everywhere.
    fn scenario() -> (Vec<Sale>, Vec<LineItem>) {
        let sales = vec![
            Sale::new(10, 1, at(1), 40.0)
                .with_store("Downtown", "São Paulo", "SP")
                .with_channel(7, "In-store")
                .with_customer(2),
            Sale::new(1, 1, at(3), 100.0)
                .with_store("Downtown", "São Paulo", "SP")
                .with_channel(8, "iFood")
                .with_customer(1),
            Sale::new(2, 2, at(4), 50.0)
                .with_store("Harbor", "Rio de Janeiro", "RJ")
                .with_channel(7, "In-store")
                .with_customer(2),
            Sale::new(3, 2, at(5), 30.0)
                .with_store("Harbor", "Rio de Janeiro", "RJ")
                .with_channel(7, "In-store"),
            Sale::new(4, 1, at(4), 999.0)
                .with_store("Downtown", "São Paulo", "SP")
                .with_customer(3)
                .with_status(SaleStatus::parse("CANCELLED")),
        ];
        let items = vec![
            LineItem::new(10, 5, "Fries", 1, 40.0, at(1)),
            LineItem::new(1, 4, "Burger", 2, 100.0, at(3)),
            LineItem::new(2, 5, "Fries", 5, 50.0, at(4)),
            LineItem::new(3, 6, "Soda", 1, 30.0, at(5)),
        ];
        (sales, items)
    }

    #[test]
    fn test_build_context_scenario() {
        let (sales, items) = scenario();
        let ctx = build_context(&sales, &items, date(3), date(5));

        assert_eq!(ctx.general_kpis.total_revenue, 180.0);
        assert_eq!(ctx.general_kpis.total_orders, 3);
        assert_eq!(ctx.general_kpis.average_order_value, 60.0);

        assert_eq!(ctx.customers.new_orders, 1);
        assert_eq!(ctx.customers.returning_orders, 1);
        assert_eq!(ctx.customers.unidentified_orders, 1);

        assert_eq!(ctx.stores.top[0].store_name.as_deref(), Some("Downtown"));
        assert_eq!(ctx.stores.top.len(), 2);
        assert_eq!(ctx.products.top_by_quantity[0].product_name, "Fries");
        assert_eq!(ctx.products.top_by_quantity[0].quantity, 5);
        assert_eq!(ctx.products.top_by_revenue[0].product_name, "Burger");

        let shares: f64 = ctx.channels.top_channels.iter().map(|c| c.revenue_share).sum();
        assert!((shares - 100.0).abs() < 0.05);
    }

    #[test]
    fn test_machine_document() {
        let (sales, items) = scenario();
        let doc = build_context(&sales, &items, date(3), date(5)).to_machine_document();

        assert_eq!(doc["analysis_period"], "From 03/01/2024 to 05/01/2024");
        assert_eq!(doc["general_kpis"]["total_revenue"], json!(180.0));
        assert_eq!(doc["general_kpis"]["total_orders"], json!(3));
        assert_eq!(doc["customer_analysis"]["pct_identified_orders"], json!(66.67));
        assert_eq!(
            doc["store_performance"]["top_5_stores"][0]["store_id"],
            json!(1)
        );
        assert!(doc["product_performance"]["bottom_5_by_revenue"].is_array());
        assert_eq!(
            doc["channel_analysis"]["top_7_channels_by_revenue"][0]["revenue_share"],
            json!(55.56)
        );
    }

    #[test]
    fn test_display_document() {
        let (sales, items) = scenario();
        let doc = ContextBuilder::new()
            .with_limits(ContextLimits {
                stores: 1,
                products: 2,
                channels: 1,
            })
            .build(&sales, &items, date(3), date(5))
            .to_display_document();

        assert_eq!(doc["general_kpis"]["total_revenue"], "R$ 180.00");
        assert_eq!(doc["general_kpis"]["total_orders"], "3");
        assert_eq!(doc["customer_analysis"]["pct_identified_orders"], "66.67%");
        assert_eq!(
            doc["store_performance"]["top_1_stores"].as_array().map(Vec::len),
            Some(1)
        );
        assert_eq!(
            doc["channel_analysis"]["top_1_channels_by_revenue"][0]["revenue_share"],
            "55.56%"
        );
    }

    #[test]
    fn test_empty_period() {
        let (sales, items) = scenario();
        let ctx = build_context(&sales, &items, date(20), date(25));
        assert_eq!(ctx.general_kpis, GeneralKpis::default());
        assert_eq!(ctx.customers.pct_identified(), 0.0);
        assert!(ctx.stores.top.is_empty());
        assert_eq!(ctx.channels.total_revenue, 0.0);

        // A reversed interval behaves like an empty period
        let reversed = build_context(&sales, &items, date(5), date(3));
        assert_eq!(reversed.general_kpis.total_orders, 0);
    }

    #[test]
    fn test_build_for_record_set() {
        let (sales, items) = scenario();
        let records = RecordSet::new(sales, items);
        let period = AnalysisPeriod::new(date(1), date(5)).unwrap();
        let ctx = ContextBuilder::new().build_for(&records, &period);
        assert_eq!(ctx.general_kpis.total_orders, 4);
        // Customer 2's sale on the 1st is now their New sale
        assert_eq!(ctx.customers.new_orders, 2);
    }
}
