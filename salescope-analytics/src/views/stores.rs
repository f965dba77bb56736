//! Store view: leaderboard and single-unit detail

use crate::kpi::{compute_general_kpis, GeneralKpis};
use crate::ranking::{compare, store_performance, top_n, Direction, StorePerformance};
use crate::views::brand::{daily_totals, DailyPoint};
use chrono::{Datelike, Weekday};
use salescope_core::Sale;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Narrows the sale set to a state and/or a single store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFilter {
    /// Keep only sales from this state
    pub state: Option<String>,
    /// Keep only sales from this store
    pub store_id: Option<i64>,
}

impl UnitFilter {
    /// No narrowing
    pub fn all() -> Self {
        Self::default()
    }

    /// Narrow to one state
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Narrow to one store
    pub fn with_store(mut self, store_id: i64) -> Self {
        self.store_id = Some(store_id);
        self
    }

    /// Whether a single store is selected
    pub fn is_single_store(&self) -> bool {
        self.store_id.is_some()
    }

    /// Whether `sale` passes both narrowings
    pub fn matches(&self, sale: &Sale) -> bool {
        let state_ok = match &self.state {
            Some(state) => sale.state.as_deref() == Some(state.as_str()),
            None => true,
        };
        state_ok && self.store_id.map_or(true, |id| sale.store_id == id)
    }

    /// The matching sales, in input order
    pub fn apply<'a, I>(&self, sales: I) -> Vec<&'a Sale>
    where
        I: IntoIterator<Item = &'a Sale>,
    {
        sales.into_iter().filter(|s| self.matches(s)).collect()
    }
}

/// Sorted, distinct states present in `sales`
pub fn available_states<'a, I>(sales: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Sale>,
{
    sales
        .into_iter()
        .filter_map(|s| s.state.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, distinct store ids, optionally within one state
pub fn available_stores<'a, I>(sales: I, state: Option<&str>) -> Vec<i64>
where
    I: IntoIterator<Item = &'a Sale>,
{
    sales
        .into_iter()
        .filter(|s| state.map_or(true, |st| s.state.as_deref() == Some(st)))
        .map(|s| s.store_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStore {
    /// 1-based position by revenue
    pub rank: usize,
    /// Store name, or `Store (ID n)`
    pub label: String,
    /// Revenue, orders and AOV of the store
    #[serde(flatten)]
    pub performance: StorePerformance,
}

/// Every store ranked by revenue, highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreLeaderboard {
    /// Ranked rows, best first
    pub entries: Vec<RankedStore>,
}

impl StoreLeaderboard {
    /// The best `n` stores, ascending so the best is read last on a bar chart
    pub fn top_for_display(&self, n: usize) -> Vec<RankedStore> {
        let mut top: Vec<RankedStore> = self.entries.iter().take(n).cloned().collect();
        top.sort_by(|a, b| compare(a.performance.revenue, b.performance.revenue, Direction::Bottom));
        top
    }

    /// The worst `n` stores, descending so the worst is read last
    pub fn bottom_for_display(&self, n: usize) -> Vec<RankedStore> {
        let mut bottom = top_n(&self.entries, n, Direction::Bottom, |s| s.performance.revenue);
        bottom.sort_by(|a, b| compare(a.performance.revenue, b.performance.revenue, Direction::Top));
        bottom
    }

    /// Number of ranked stores
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no store sold in the period
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank every store in `sales` by revenue
pub fn store_leaderboard<'a, I>(sales: I) -> StoreLeaderboard
where
    I: IntoIterator<Item = &'a Sale>,
{
    let stores = store_performance(sales);
    let entries = top_n(&stores, stores.len(), Direction::Top, |s| s.revenue)
        .into_iter()
        .enumerate()
        .map(|(i, performance)| RankedStore {
            rank: i + 1,
            label: performance.label(),
            performance,
        })
        .collect();
    StoreLeaderboard { entries }
}

/// Display names for channel ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelNames {
    names: HashMap<i64, String>,
}

impl ChannelNames {
    /// Empty mapping
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Name a channel id
    pub fn with_name(mut self, channel_id: i64, name: impl Into<String>) -> Self {
        self.names.insert(channel_id, name.into());
        self
    }

    /// Mapped name, then the record's own channel name, then `Channel {id}`
    pub fn resolve(&self, sale: &Sale) -> String {
        self.names
            .get(&sale.channel_id)
            .cloned()
            .unwrap_or_else(|| super::brand::channel_label(sale))
    }
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self::new()
            .with_name(7, "In-store")
            .with_name(8, "iFood")
            .with_name(9, "Rappi")
            .with_name(10, "Uber Eats")
            .with_name(11, "WhatsApp")
            .with_name(12, "Own App")
    }
}

/// Revenue of one channel within a unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMix {
    /// Channel id
    pub channel_id: i64,
    /// Resolved channel name
    pub channel: String,
    /// Revenue through the channel
    pub revenue: f64,
}

/// Revenue on one weekday
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayRevenue {
    /// English weekday name
    pub weekday: String,
    /// Revenue on that weekday across the period
    pub revenue: f64,
}

/// Detail for the selected unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDetail {
    /// Revenue, orders and AOV of the unit
    pub kpis: GeneralKpis,
    /// Daily revenue and average ticket
    pub daily: Vec<DailyPoint>,
    /// Revenue per channel, by channel id
    pub channel_mix: Vec<ChannelMix>,
    /// Monday first; weekdays without sales are left out
    pub weekday_revenue: Vec<WeekdayRevenue>,
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Build the unit detail from completed, period-filtered sales of one unit
pub fn unit_detail(sales: &[&Sale], channel_names: &ChannelNames) -> UnitDetail {
    let mut channels: BTreeMap<i64, (String, f64)> = BTreeMap::new();
    let mut weekdays: BTreeMap<u32, (Weekday, f64)> = BTreeMap::new();
    for sale in sales {
        channels
            .entry(sale.channel_id)
            .or_insert_with(|| (channel_names.resolve(sale), 0.0))
            .1 += sale.total_amount;
        let weekday = sale.created_at.weekday();
        weekdays
            .entry(weekday.num_days_from_monday())
            .or_insert((weekday, 0.0))
            .1 += sale.total_amount;
    }

    let weekday_revenue = weekdays
        .into_values()
        .map(|(day, revenue)| WeekdayRevenue {
            weekday: weekday_name(day).to_string(),
            revenue,
        })
        .collect();

    UnitDetail {
        kpis: compute_general_kpis(sales.iter().copied()),
        daily: daily_totals(sales.iter().copied()),
        channel_mix: channels
            .into_iter()
            .map(|(channel_id, (channel, revenue))| ChannelMix {
                channel_id,
                channel,
                revenue,
            })
            .collect(),
        weekday_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn at(d: u32) -> NaiveDateTime {
        // 2024-01-01 is a Monday
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sale(id: i64, store: i64, state: &str, amount: f64) -> Sale {
        Sale::new(id, store, at(1), amount).with_store(format!("Unit {}", store), "City", state)
    }

    fn sales() -> Vec<Sale> {
        vec![
            sale(1, 3, "SP", 30.0),
            sale(2, 1, "SP", 100.0),
            sale(3, 2, "RJ", 60.0),
            sale(4, 1, "SP", 20.0),
            sale(5, 4, "MG", 10.0),
        ]
    }

    #[test]
    fn test_filters_and_options() {
        let sales = sales();
        assert_eq!(available_states(&sales), vec!["MG", "RJ", "SP"]);
        assert_eq!(available_stores(&sales, None), vec![1, 2, 3, 4]);
        assert_eq!(available_stores(&sales, Some("SP")), vec![1, 3]);

        let filter = UnitFilter::all().with_state("SP").with_store(1);
        assert!(filter.is_single_store());
        assert_eq!(filter.apply(&sales).len(), 2);
        assert_eq!(UnitFilter::all().apply(&sales).len(), 5);
    }

    #[test]
    fn test_leaderboard() {
        let sales = sales();
        let board = store_leaderboard(&sales);
        assert_eq!(board.len(), 4);
        assert_eq!(board.entries[0].rank, 1);
        assert_eq!(board.entries[0].label, "Unit 1 (ID 1)");
        assert_eq!(board.entries[0].performance.revenue, 120.0);
        assert_eq!(board.entries[0].performance.average_order_value, 60.0);

        let top: Vec<i64> = board.top_for_display(3).iter().map(|s| s.performance.store_id).collect();
        assert_eq!(top, vec![3, 2, 1]);

        let bottom: Vec<i64> = board
            .bottom_for_display(2)
            .iter()
            .map(|s| s.performance.store_id)
            .collect();
        assert_eq!(bottom, vec![3, 4]);
    }

    #[test]
    fn test_unit_detail() {
        let sales = vec![
            Sale::new(1, 1, at(2), 10.0).with_channel(8, "ifood-raw"),
            Sale::new(2, 1, at(1), 20.0).with_channel(7, "loja"),
            Sale::new(3, 1, at(7), 5.0).with_channel(99, "Kiosk"),
            Sale::new(4, 1, at(8), 15.0).with_channel(8, "ifood-raw"),
        ];
        let refs: Vec<&Sale> = sales.iter().collect();
        let detail = unit_detail(&refs, &ChannelNames::default());

        assert_eq!(detail.kpis.total_orders, 4);
        assert_eq!(detail.daily.len(), 4);

        let mix: Vec<(&str, f64)> = detail
            .channel_mix
            .iter()
            .map(|c| (c.channel.as_str(), c.revenue))
            .collect();
        assert_eq!(mix, vec![("In-store", 20.0), ("iFood", 25.0), ("Kiosk", 5.0)]);

        let weekdays: Vec<(&str, f64)> = detail
            .weekday_revenue
            .iter()
            .map(|w| (w.weekday.as_str(), w.revenue))
            .collect();
        assert_eq!(
            weekdays,
            vec![("Monday", 35.0), ("Tuesday", 10.0), ("Sunday", 5.0)]
        );
        assert_eq!(detail.kpis.average_order_value, 12.5);
    }
}
