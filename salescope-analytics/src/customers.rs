//! Customer segmentation: New, Returning and Unidentified sales

use crate::format::percentage;
use chrono::NaiveDate;
use salescope_core::types::CustomerId;
use salescope_core::{AnalysisPeriod, Sale};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Classification of a single sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CustomerType {
    /// The sale happened on the customer's first purchase date
    New,
    /// The customer had bought before
    Returning,
    /// The sale has no customer attached
    Unidentified,
}

impl CustomerType {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Returning => "Returning",
            Self::Unidentified => "Unidentified",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Earliest purchase date per identified customer
pub type FirstPurchases = HashMap<CustomerId, NaiveDate>;

/// Build the first-purchase lookup from a purchase history
///
/// Sales without a customer are skipped.
pub fn first_purchases<'a, I>(history: I) -> FirstPurchases
where
    I: IntoIterator<Item = &'a Sale>,
{
    let mut firsts = FirstPurchases::new();
    for sale in history {
        let Some(customer) = sale.customer_id else {
            continue;
        };
        let date = sale.sale_date();
        firsts
            .entry(customer)
            .and_modify(|first| {
                if date < *first {
                    *first = date;
                }
            })
            .or_insert(date);
    }
    firsts
}

/// How a sale's customer is decided to be New or Returning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationStrategy {
    /// New iff the sale falls on the customer's first purchase date
    FirstPurchaseDate,
    /// New iff the sale falls on the first purchase date and that date lies
    /// inside the period
    FirstPurchaseInPeriod(AnalysisPeriod),
}

impl SegmentationStrategy {
    /// Classify one sale against a first-purchase lookup
    ///
    /// A customer missing from the lookup is Returning, since the sale cannot
    /// be shown to be their first.
    pub fn classify(&self, sale: &Sale, firsts: &FirstPurchases) -> CustomerType {
        let Some(customer) = sale.customer_id else {
            return CustomerType::Unidentified;
        };
        let first = firsts.get(&customer).copied();
        let on_first_date = first == Some(sale.sale_date());

        let is_new = match self {
            Self::FirstPurchaseDate => on_first_date,
            Self::FirstPurchaseInPeriod(period) => {
                on_first_date && first.is_some_and(|date| period.contains(date))
            }
        };

        if is_new {
            CustomerType::New
        } else {
            CustomerType::Returning
        }
    }
}

/// A sale paired with its classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedSale<'a> {
    /// The classified sale
    pub sale: &'a Sale,
    /// Its classification
    pub customer_type: CustomerType,
}

/// Order counts per classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentCounts {
    /// Sales classified New
    pub new_orders: u64,
    /// Sales classified Returning
    pub returning_orders: u64,
    /// Sales without a customer
    pub unidentified_orders: u64,
}

impl SegmentCounts {
    fn record(&mut self, customer_type: CustomerType) {
        match customer_type {
            CustomerType::New => self.new_orders += 1,
            CustomerType::Returning => self.returning_orders += 1,
            CustomerType::Unidentified => self.unidentified_orders += 1,
        }
    }

    /// All classified orders
    pub fn total(&self) -> u64 {
        self.new_orders + self.returning_orders + self.unidentified_orders
    }

    /// Orders with a customer attached
    pub fn identified(&self) -> u64 {
        self.new_orders + self.returning_orders
    }

    /// Share of identified orders in percent, 0 without orders
    pub fn pct_identified(&self) -> f64 {
        percentage(self.identified() as f64, self.total() as f64)
    }
}

/// Result of segmenting a set of sales
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSegmentation<'a> {
    /// Every input sale with its classification, in input order
    pub sales: Vec<ClassifiedSale<'a>>,
    /// Counts per classification
    pub counts: SegmentCounts,
}

impl<'a> CustomerSegmentation<'a> {
    /// Sales with a customer attached
    pub fn identified(&self) -> impl Iterator<Item = &ClassifiedSale<'a>> {
        self.sales
            .iter()
            .filter(|s| s.customer_type != CustomerType::Unidentified)
    }
}

/// Classify `sales` using the first purchases found in `history`
pub fn segment_customers<'h, 'a, H, S>(
    history: H,
    sales: S,
    strategy: SegmentationStrategy,
) -> CustomerSegmentation<'a>
where
    H: IntoIterator<Item = &'h Sale>,
    S: IntoIterator<Item = &'a Sale>,
{
    let firsts = first_purchases(history);
    let mut counts = SegmentCounts::default();
    let sales: Vec<ClassifiedSale<'a>> = sales
        .into_iter()
        .map(|sale| {
            let customer_type = strategy.classify(sale, &firsts);
            counts.record(customer_type);
            ClassifiedSale {
                sale,
                customer_type,
            }
        })
        .collect();

    tracing::trace!(
        new = counts.new_orders,
        returning = counts.returning_orders,
        unidentified = counts.unidentified_orders,
        "segmented customers"
    );

    CustomerSegmentation { sales, counts }
}

/// Global first-purchase-date segmentation
///
/// `all_sales` is the full completed history used to find each customer's
/// first purchase; `sales_in_period` are the sales being classified.
pub fn classify_customers<'h, 'a, H, S>(all_sales: H, sales_in_period: S) -> CustomerSegmentation<'a>
where
    H: IntoIterator<Item = &'h Sale>,
    S: IntoIterator<Item = &'a Sale>,
{
    segment_customers(all_sales, sales_in_period, SegmentationStrategy::FirstPurchaseDate)
}

/// Segmentation that only counts a customer as New when their first
/// purchase falls inside `period`
pub fn classify_customers_in_period<'h, 'a, H, S>(
    all_sales: H,
    sales_in_period: S,
    period: AnalysisPeriod,
) -> CustomerSegmentation<'a>
where
    H: IntoIterator<Item = &'h Sale>,
    S: IntoIterator<Item = &'a Sale>,
{
    segment_customers(
        all_sales,
        sales_in_period,
        SegmentationStrategy::FirstPurchaseInPeriod(period),
    )
}
