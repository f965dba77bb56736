//! Grouping and top/bottom-N rankings
//!
//! Groups keep the order in which their keys first appear in the input, and
//! every ranking uses a stable sort, so ties resolve to first-appearance order.

use crate::format::{percentage, round2, safe_ratio};
use indexmap::IndexMap;
use salescope_core::types::SaleId;
use salescope_core::{LineItem, Sale};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

/// Which end of the ordering to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Largest values first
    Top,
    /// Smallest values first
    Bottom,
}

/// What a group is ranked on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Sum of the grouped values
    Sum,
    /// Number of grouped records
    Count,
}

/// Aggregate of the records sharing a key
#[derive(Debug, Clone, PartialEq)]
pub struct Group<K> {
    /// Group key
    pub key: K,
    /// Sum of the values
    pub total: f64,
    /// Number of records
    pub count: u64,
}

impl<K> Group<K> {
    /// Value of the chosen measure
    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Sum => self.total,
            Measure::Count => self.count as f64,
        }
    }

    /// `total / count`
    pub fn average(&self) -> f64 {
        safe_ratio(self.total, self.count as f64)
    }
}

/// Group records by key, summing `value`
pub fn group_by<'a, T, K, I, KF, VF>(records: I, key: KF, value: VF) -> Vec<Group<K>>
where
    T: 'a,
    K: Eq + Hash,
    I: IntoIterator<Item = &'a T>,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> f64,
{
    let mut groups: IndexMap<K, (f64, u64)> = IndexMap::new();
    for record in records {
        let entry = groups.entry(key(record)).or_insert((0.0, 0));
        entry.0 += value(record);
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (total, count))| Group { key, total, count })
        .collect()
}

/// Take the first `n` items after a stable sort on `measure`
pub fn top_n<T, F>(items: &[T], n: usize, direction: Direction, measure: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    let mut ordered: Vec<&T> = items.iter().collect();
    ordered.sort_by(|a, b| compare(measure(a), measure(b), direction));
    ordered.into_iter().take(n).cloned().collect()
}

pub(crate) fn compare(a: f64, b: f64, direction: Direction) -> Ordering {
    match direction {
        Direction::Top => b.total_cmp(&a),
        Direction::Bottom => a.total_cmp(&b),
    }
}

/// Rank groups on a measure
pub fn rank<K: Clone>(groups: &[Group<K>], measure: Measure, n: usize, direction: Direction) -> Vec<Group<K>> {
    top_n(groups, n, direction, |g| g.measure(measure))
}

/// Group then rank in one step
pub fn rank_by<'a, T, K, I, KF, VF>(
    records: I,
    key: KF,
    value: VF,
    measure: Measure,
    n: usize,
    direction: Direction,
) -> Vec<Group<K>>
where
    T: 'a,
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'a T>,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> f64,
{
    rank(&group_by(records, key, value), measure, n, direction)
}

/// Revenue and orders of one store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorePerformance {
    /// Store id
    pub store_id: i64,
    /// Store name, if known
    pub store_name: Option<String>,
    /// Sum of `total_amount`
    pub revenue: f64,
    /// Number of sales
    pub orders: u64,
    /// `revenue / orders`
    pub average_order_value: f64,
}

impl StorePerformance {
    fn from_group(group: Group<(i64, Option<String>)>) -> Self {
        let average_order_value = group.average();
        let (store_id, store_name) = group.key;
        Self {
            store_id,
            store_name,
            revenue: group.total,
            orders: group.count,
            average_order_value,
        }
    }

    /// Display label, e.g. `Downtown (ID 3)`
    pub fn label(&self) -> String {
        format!(
            "{} (ID {})",
            self.store_name.as_deref().unwrap_or("Store"),
            self.store_id
        )
    }
}

/// Per-store aggregates in first-appearance order
pub fn store_performance<'a, I>(sales: I) -> Vec<StorePerformance>
where
    I: IntoIterator<Item = &'a Sale>,
{
    group_by(
        sales,
        |s: &Sale| (s.store_id, s.store_name.clone()),
        |s| s.total_amount,
    )
    .into_iter()
    .map(StorePerformance::from_group)
    .collect()
}

/// Best and worst stores by revenue
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreRanking {
    /// Highest revenue first
    pub top: Vec<StorePerformance>,
    /// Lowest revenue first
    pub bottom: Vec<StorePerformance>,
}

/// Rank stores on revenue
pub fn rank_stores<'a, I>(sales: I, n: usize) -> StoreRanking
where
    I: IntoIterator<Item = &'a Sale>,
{
    let stores = store_performance(sales);
    StoreRanking {
        top: top_n(&stores, n, Direction::Top, |s| s.revenue),
        bottom: top_n(&stores, n, Direction::Bottom, |s| s.revenue),
    }
}

/// Sold quantity and revenue of one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPerformance {
    /// Product id
    pub product_id: i64,
    /// Product name
    pub product_name: String,
    /// Units sold
    pub quantity: u64,
    /// Sum of `item_total_amount`
    pub revenue: f64,
}

/// Product rankings on quantity and on revenue
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductRanking {
    /// Most units first
    pub top_by_quantity: Vec<ProductPerformance>,
    /// Highest revenue first
    pub top_by_revenue: Vec<ProductPerformance>,
    /// Fewest units first
    pub bottom_by_quantity: Vec<ProductPerformance>,
    /// Lowest revenue first
    pub bottom_by_revenue: Vec<ProductPerformance>,
}

/// Per-product aggregates in first-appearance order
pub fn product_performance<'a, I>(items: I) -> Vec<ProductPerformance>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut products: IndexMap<(i64, String), (u64, f64)> = IndexMap::new();
    for item in items {
        let entry = products
            .entry((item.product_id, item.product_name.clone()))
            .or_insert((0, 0.0));
        entry.0 += u64::from(item.quantity);
        entry.1 += item.item_total_amount;
    }
    products
        .into_iter()
        .map(|((product_id, product_name), (quantity, revenue))| ProductPerformance {
            product_id,
            product_name,
            quantity,
            revenue,
        })
        .collect()
}

/// Rank products on quantity and revenue
pub fn rank_products<'a, I>(items: I, n: usize) -> ProductRanking
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let products = product_performance(items);
    let quantity = |p: &ProductPerformance| p.quantity as f64;
    let revenue = |p: &ProductPerformance| p.revenue;
    ProductRanking {
        top_by_quantity: top_n(&products, n, Direction::Top, quantity),
        top_by_revenue: top_n(&products, n, Direction::Top, revenue),
        bottom_by_quantity: top_n(&products, n, Direction::Bottom, quantity),
        bottom_by_revenue: top_n(&products, n, Direction::Bottom, revenue),
    }
}

/// Revenue share of one sales channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelShare {
    /// Channel id
    pub channel_id: i64,
    /// Channel name, if known
    pub channel_name: Option<String>,
    /// Distinct sales on the channel
    pub orders: u64,
    /// Sum of `total_amount`
    pub revenue: f64,
    /// Share of total revenue, in percent rounded to 2 decimals
    pub revenue_share: f64,
}

/// Channel mix
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelAnalysis {
    /// Revenue over all channels
    pub total_revenue: f64,
    /// Channels by revenue, highest first
    pub top_channels: Vec<ChannelShare>,
}

/// Rank channels on revenue with their revenue share
pub fn rank_channels<'a, I>(sales: I, n: usize) -> ChannelAnalysis
where
    I: IntoIterator<Item = &'a Sale>,
{
    let mut channels: IndexMap<(i64, Option<String>), (HashSet<SaleId>, f64)> = IndexMap::new();
    for sale in sales {
        let entry = channels
            .entry((sale.channel_id, sale.channel_name.clone()))
            .or_insert_with(|| (HashSet::new(), 0.0));
        entry.0.insert(sale.id);
        entry.1 += sale.total_amount;
    }

    let total_revenue: f64 = channels.values().map(|(_, revenue)| revenue).sum();
    let shares: Vec<ChannelShare> = channels
        .into_iter()
        .map(|((channel_id, channel_name), (ids, revenue))| ChannelShare {
            channel_id,
            channel_name,
            orders: ids.len() as u64,
            revenue,
            revenue_share: round2(percentage(revenue, total_revenue)),
        })
        .collect();

    ChannelAnalysis {
        total_revenue,
        top_channels: top_n(&shares, n, Direction::Top, |c| c.revenue),
    }
}

/// Label of the bucket that collects the states outside the top N
pub const OTHER_STATES: &str = "Other";

/// Revenue of one state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateShare {
    /// State code, or [`OTHER_STATES`]
    pub state: String,
    /// Revenue
    pub revenue: f64,
}

/// Top `n` states by revenue plus an "Other" bucket with the rest
///
/// Sales without a state are left out of every bucket. The "Other" bucket is
/// always appended, with 0 revenue when nothing is left over.
pub fn rank_states<'a, I>(sales: I, n: usize) -> Vec<StateShare>
where
    I: IntoIterator<Item = &'a Sale>,
{
    let states = group_by(
        sales.into_iter().filter(|s| s.state.is_some()),
        |s: &Sale| s.state.clone().unwrap_or_default(),
        |s| s.total_amount,
    );
    let total: f64 = states.iter().map(|g| g.total).sum();

    let mut ranked: Vec<StateShare> = rank(&states, Measure::Sum, n, Direction::Top)
        .into_iter()
        .map(|g| StateShare {
            state: g.key,
            revenue: g.total,
        })
        .collect();
    let top_total: f64 = ranked.iter().map(|s| s.revenue).sum();
    ranked.push(StateShare {
        state: OTHER_STATES.to_string(),
        revenue: total - top_total,
    });
    ranked
}
