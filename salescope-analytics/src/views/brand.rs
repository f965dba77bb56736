//! Brand overview: totals and time series for the whole brand

use crate::format::safe_ratio;
use crate::kpi::{compute_general_kpis, GeneralKpis};
use crate::ranking::{rank_states, StateShare};
use chrono::{NaiveDate, Timelike};
use salescope_core::Sale;
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    /// Calendar day
    pub date: NaiveDate,
    /// Revenue of the day
    pub revenue: f64,
    /// Completed orders of the day
    pub orders: u64,
    /// `revenue / orders`
    pub average_ticket: f64,
}

/// Orders placed in one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyPoint {
    /// 0 to 23
    pub hour: u32,
    /// Orders placed in that hour
    pub orders: u64,
}

/// Revenue for one channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRevenue {
    /// Channel name, or `Channel {id}` when unnamed
    pub channel: String,
    /// Summed sale totals
    pub revenue: f64,
}

/// Everything the brand overview screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandOverview {
    /// Revenue, orders and AOV for the period
    pub kpis: GeneralKpis,
    /// Daily series, ascending by date
    pub daily: Vec<DailyPoint>,
    /// Orders per hour of day
    pub hourly_orders: Vec<HourlyPoint>,
    /// Revenue per channel, sorted by name
    pub channel_revenue: Vec<ChannelRevenue>,
    /// Top 5 states plus "Other"
    pub state_revenue: Vec<StateShare>,
}

/// Revenue, orders and average ticket per day, ascending by date
pub fn daily_totals<'a, I>(sales: I) -> Vec<DailyPoint>
where
    I: IntoIterator<Item = &'a Sale>,
{
    let mut days: BTreeMap<NaiveDate, (f64, u64)> = BTreeMap::new();
    for sale in sales {
        let day = days.entry(sale.sale_date()).or_insert((0.0, 0));
        day.0 += sale.total_amount;
        day.1 += 1;
    }
    days.into_iter()
        .map(|(date, (revenue, orders))| DailyPoint {
            date,
            revenue,
            orders,
            average_ticket: safe_ratio(revenue, orders as f64),
        })
        .collect()
}

/// Order count per hour of day; hours without sales are left out
pub fn hourly_orders<'a, I>(sales: I) -> Vec<HourlyPoint>
where
    I: IntoIterator<Item = &'a Sale>,
{
    let mut hours: BTreeMap<u32, u64> = BTreeMap::new();
    for sale in sales {
        *hours.entry(sale.created_at.hour()).or_default() += 1;
    }
    hours
        .into_iter()
        .map(|(hour, orders)| HourlyPoint { hour, orders })
        .collect()
}

pub(crate) fn channel_label(sale: &Sale) -> String {
    sale.channel_name
        .clone()
        .unwrap_or_else(|| format!("Channel {}", sale.channel_id))
}

/// Revenue per channel name, sorted by name
pub fn channel_revenue<'a, I>(sales: I) -> Vec<ChannelRevenue>
where
    I: IntoIterator<Item = &'a Sale>,
{
    let mut channels: BTreeMap<String, f64> = BTreeMap::new();
    for sale in sales {
        *channels.entry(channel_label(sale)).or_default() += sale.total_amount;
    }
    channels
        .into_iter()
        .map(|(channel, revenue)| ChannelRevenue { channel, revenue })
        .collect()
}

/// Build the brand overview from completed, period-filtered sales
pub fn brand_overview(sales: &[&Sale]) -> BrandOverview {
    let sales = || sales.iter().copied();
    BrandOverview {
        kpis: compute_general_kpis(sales()),
        daily: daily_totals(sales()),
        hourly_orders: hourly_orders(sales()),
        channel_revenue: channel_revenue(sales()),
        state_revenue: rank_states(sales(), 5),
    }
}
