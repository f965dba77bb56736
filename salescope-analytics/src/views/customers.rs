//! Customer analytics screen

use crate::customers::{classify_customers_in_period, CustomerType, SegmentCounts};
use crate::format::{percentage, CurrencyFormat};
use crate::kpi::compute_general_kpis;
use crate::ranking::{top_n, Direction};
use indexmap::IndexMap;
use salescope_core::types::CustomerId;
use salescope_core::{AnalysisPeriod, Sale};
use serde::Serialize;
use std::collections::HashMap;

/// Headline customer numbers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CustomerKpis {
    /// Distinct identified customers
    pub unique_customers: u64,
    /// Share of identified customers with more than one order, in percent
    pub repurchase_rate: f64,
    /// Orders with a customer attached
    pub identified_orders: u64,
    /// Orders without a customer
    pub unidentified_orders: u64,
    /// Identified share of all orders, in percent
    pub pct_identified: f64,
    /// Revenue per order over the period
    pub average_order_value: f64,
}

/// Revenue and orders of New or Returning sales
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetentionSplit {
    /// New or Returning
    pub customer_type: CustomerType,
    /// Revenue from these sales
    pub revenue: f64,
    /// Number of these sales
    pub orders: u64,
}

/// Customers grouped by how often they bought
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoyaltyBucket {
    /// Bucket name, e.g. `2 purchases`
    pub label: String,
    /// Customers in the bucket
    pub customers: u64,
}

/// One of the best customers by spend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCustomer {
    /// Customer id
    pub customer_id: CustomerId,
    /// Registered name, or `No registration`
    pub name: String,
    /// Phone number, or `Not provided`
    pub phone: String,
    /// Spend in the period
    pub total_spent: f64,
    /// `total_spent` formatted as currency
    pub total_spent_display: String,
}

/// Everything the customer analytics screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerAnalytics {
    /// Headline numbers
    pub kpis: CustomerKpis,
    /// Per-period New/Returning counts
    pub segments: SegmentCounts,
    /// Revenue and orders of New and Returning sales
    pub retention: Vec<RetentionSplit>,
    /// Customers per purchase-count bucket; empty buckets are left out
    pub loyalty_curve: Vec<LoyaltyBucket>,
    /// Best 10 customers by spend
    pub top_customers: Vec<TopCustomer>,
}

const LOYALTY_BUCKETS: [&str; 4] = ["1 purchase", "2 purchases", "3 to 5 purchases", "5+ purchases"];

fn loyalty_bucket(orders: u64) -> usize {
    match orders {
        0 | 1 => 0,
        2 => 1,
        3 | 4 => 2,
        _ => 3,
    }
}

/// Build the customer analytics for a period
///
/// `history` is the completed sale history used to find first purchases and
/// `sales_in_period` the completed sales inside `period`. A customer is New
/// only when their first purchase falls inside the period.
pub fn customer_analytics<'h, 'a, H, S>(
    history: H,
    sales_in_period: S,
    period: AnalysisPeriod,
    currency: &CurrencyFormat,
) -> CustomerAnalytics
where
    H: IntoIterator<Item = &'h Sale>,
    S: IntoIterator<Item = &'a Sale>,
{
    let segmentation = classify_customers_in_period(history, sales_in_period, period);
    let counts = segmentation.counts;
    let general = compute_general_kpis(segmentation.sales.iter().map(|s| s.sale));

    let mut retention: IndexMap<CustomerType, (f64, u64)> = IndexMap::new();
    let mut orders_per_customer: IndexMap<CustomerId, u64> = IndexMap::new();
    let mut spend: IndexMap<(CustomerId, String, String), f64> = IndexMap::new();
    for classified in segmentation.identified() {
        let sale = classified.sale;
        let Some(customer) = sale.customer_id else {
            continue;
        };
        let split = retention.entry(classified.customer_type).or_insert((0.0, 0));
        split.0 += sale.total_amount;
        split.1 += 1;

        *orders_per_customer.entry(customer).or_default() += 1;

        let name = sale
            .customer_name
            .clone()
            .unwrap_or_else(|| "No registration".to_string());
        let phone = sale
            .customer_phone
            .clone()
            .unwrap_or_else(|| "Not provided".to_string());
        *spend.entry((customer, name, phone)).or_default() += sale.total_amount;
    }
    retention.sort_keys();

    let unique_customers = orders_per_customer.len() as u64;
    let repeat_customers = orders_per_customer.values().filter(|n| **n > 1).count();

    let mut buckets: HashMap<usize, u64> = HashMap::new();
    for orders in orders_per_customer.values() {
        *buckets.entry(loyalty_bucket(*orders)).or_default() += 1;
    }
    let loyalty_curve = LOYALTY_BUCKETS
        .iter()
        .enumerate()
        .filter_map(|(i, label)| {
            buckets.get(&i).map(|customers| LoyaltyBucket {
                label: (*label).to_string(),
                customers: *customers,
            })
        })
        .collect();

    let spenders: Vec<((CustomerId, String, String), f64)> = spend.into_iter().collect();
    let top_customers = top_n(&spenders, 10, Direction::Top, |(_, total)| *total)
        .into_iter()
        .map(|((customer_id, name, phone), total_spent)| TopCustomer {
            customer_id,
            name,
            phone,
            total_spent,
            total_spent_display: currency.format(total_spent),
        })
        .collect();

    CustomerAnalytics {
        kpis: CustomerKpis {
            unique_customers,
            repurchase_rate: percentage(repeat_customers as f64, unique_customers as f64),
            identified_orders: counts.identified(),
            unidentified_orders: counts.unidentified_orders,
            pct_identified: counts.pct_identified(),
            average_order_value: general.average_order_value,
        },
        segments: counts,
        retention: retention
            .into_iter()
            .map(|(customer_type, (revenue, orders))| RetentionSplit {
                customer_type,
                revenue,
                orders,
            })
            .collect(),
        loyalty_curve,
        top_customers,
    }
}
