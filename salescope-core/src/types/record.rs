//! Sale and line-item records produced by a load

use crate::types::{CustomerId, SaleId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a sale
///
/// Only completed sales count toward revenue. Every other status the store
/// reports is kept verbatim so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleStatus {
    /// The sale was completed
    Completed,
    /// Any other status (cancelled, pending, ...)
    Other(String),
}

impl SaleStatus {
    /// Text the store uses for completed sales
    pub const COMPLETED: &'static str = "COMPLETED";

    /// Parse the status text stored in the database
    pub fn parse(text: &str) -> Self {
        if text == Self::COMPLETED {
            SaleStatus::Completed
        } else {
            SaleStatus::Other(text.to_string())
        }
    }

    /// Whether the sale counts toward revenue
    pub fn is_completed(&self) -> bool {
        matches!(self, SaleStatus::Completed)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Completed => f.write_str(Self::COMPLETED),
            SaleStatus::Other(text) => f.write_str(text),
        }
    }
}

/// A single sale (order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Sale identifier
    pub id: SaleId,
    /// Store identifier
    pub store_id: i64,
    /// Store name
    pub store_name: Option<String>,
    /// Store city
    pub city: Option<String>,
    /// Store state
    pub state: Option<String>,
    /// Sales channel identifier
    pub channel_id: i64,
    /// Sales channel name
    pub channel_name: Option<String>,
    /// Creation time, in the reporting timezone
    pub created_at: NaiveDateTime,
    /// Sale status
    pub status: SaleStatus,
    /// Order total
    pub total_amount: f64,
    /// Discount granted
    pub total_discount: f64,
    /// Delivery fee charged
    pub delivery_fee: f64,
    /// Customer identifier, when the customer was identified
    pub customer_id: Option<CustomerId>,
    /// Customer name
    pub customer_name: Option<String>,
    /// Customer phone number
    pub customer_phone: Option<String>,
    /// Sub-brand identifier
    pub sub_brand_id: Option<i64>,
    /// Sub-brand name
    pub sub_brand_name: Option<String>,
}

impl Sale {
    /// Create a completed sale with the required fields
    pub fn new(id: SaleId, store_id: i64, created_at: NaiveDateTime, total_amount: f64) -> Self {
        Self {
            id,
            store_id,
            store_name: None,
            city: None,
            state: None,
            channel_id: 0,
            channel_name: None,
            created_at,
            status: SaleStatus::Completed,
            total_amount,
            total_discount: 0.0,
            delivery_fee: 0.0,
            customer_id: None,
            customer_name: None,
            customer_phone: None,
            sub_brand_id: None,
            sub_brand_name: None,
        }
    }

    /// Set the store name and location
    pub fn with_store(
        mut self,
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.store_name = Some(name.into());
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }

    /// Set the sales channel
    pub fn with_channel(mut self, id: i64, name: impl Into<String>) -> Self {
        self.channel_id = id;
        self.channel_name = Some(name.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: SaleStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach an identified customer
    pub fn with_customer(mut self, id: CustomerId) -> Self {
        self.customer_id = Some(id);
        self
    }

    /// Set the customer contact details
    pub fn with_contact(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self.customer_phone = Some(phone.into());
        self
    }

    /// Calendar date of the sale
    pub fn sale_date(&self) -> NaiveDate {
        self.created_at.date()
    }

    /// Whether the sale counts toward revenue
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Whether the sale carries a customer identifier
    pub fn is_identified(&self) -> bool {
        self.customer_id.is_some()
    }
}

/// A product line within a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Sale this item belongs to
    pub sale_id: SaleId,
    /// Product identifier
    pub product_id: i64,
    /// Product name
    pub product_name: String,
    /// Units sold
    pub quantity: u32,
    /// Total price of the line
    pub item_total_amount: f64,
    /// Status of the parent sale
    pub sale_status: SaleStatus,
    /// Creation time of the parent sale, in the reporting timezone
    pub sale_date: NaiveDateTime,
    /// Product sub-brand identifier
    pub sub_brand_id: Option<i64>,
    /// Product sub-brand name
    pub sub_brand_name: Option<String>,
}

impl LineItem {
    /// Create a line item of a completed sale
    pub fn new(
        sale_id: SaleId,
        product_id: i64,
        product_name: impl Into<String>,
        quantity: u32,
        item_total_amount: f64,
        sale_date: NaiveDateTime,
    ) -> Self {
        Self {
            sale_id,
            product_id,
            product_name: product_name.into(),
            quantity,
            item_total_amount,
            sale_status: SaleStatus::Completed,
            sale_date,
            sub_brand_id: None,
            sub_brand_name: None,
        }
    }

    /// Set the parent sale status
    pub fn with_status(mut self, status: SaleStatus) -> Self {
        self.sale_status = status;
        self
    }

    /// Calendar date of the parent sale
    pub fn sale_day(&self) -> NaiveDate {
        self.sale_date.date()
    }

    /// Whether the parent sale counts toward revenue
    pub fn is_completed(&self) -> bool {
        self.sale_status.is_completed()
    }
}

/// The two record sets produced by a single load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    /// All sales, any status
    pub sales: Vec<Sale>,
    /// All line items, any status
    pub line_items: Vec<LineItem>,
}

impl RecordSet {
    /// Create a record set
    pub fn new(sales: Vec<Sale>, line_items: Vec<LineItem>) -> Self {
        Self { sales, line_items }
    }

    /// Completed sales, in load order
    pub fn completed_sales(&self) -> Vec<&Sale> {
        self.sales.iter().filter(|s| s.is_completed()).collect()
    }

    /// Line items of completed sales, in load order
    pub fn completed_line_items(&self) -> Vec<&LineItem> {
        self.line_items.iter().filter(|i| i.is_completed()).collect()
    }

    /// First and last completed sale dates, if any sale completed
    ///
    /// This is the default reporting window offered to users.
    pub fn completed_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self
            .sales
            .iter()
            .filter(|s| s.is_completed())
            .map(Sale::sale_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Whether no records were loaded
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.line_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(SaleStatus::parse("COMPLETED"), SaleStatus::Completed);
        assert_eq!(
            SaleStatus::parse("CANCELLED"),
            SaleStatus::Other("CANCELLED".into())
        );
        // Status text is case sensitive, like the store's enumeration
        assert!(!SaleStatus::parse("completed").is_completed());
        assert_eq!(SaleStatus::Completed.to_string(), "COMPLETED");
    }

    #[test]
    fn test_sale_builder() {
        let sale = Sale::new(1, 10, at(2024, 1, 1, 23), 99.5)
            .with_store("Centro", "Recife", "PE")
            .with_channel(8, "iFood")
            .with_customer(42);

        assert_eq!(sale.sale_date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(sale.is_completed());
        assert!(sale.is_identified());
        assert_eq!(sale.state.as_deref(), Some("PE"));
        assert_eq!(sale.channel_name.as_deref(), Some("iFood"));
    }

    #[test]
    fn test_completed_date_range() {
        let records = RecordSet::new(
            vec![
                Sale::new(1, 1, at(2024, 1, 5, 12), 10.0),
                Sale::new(2, 1, at(2023, 12, 30, 12), 10.0)
                    .with_status(SaleStatus::Other("CANCELLED".into())),
                Sale::new(3, 1, at(2024, 1, 2, 12), 10.0),
                Sale::new(4, 1, at(2024, 1, 9, 12), 10.0),
            ],
            vec![],
        );

        let (lo, hi) = records.completed_date_range().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(records.completed_sales().len(), 3);
        assert!(RecordSet::default().completed_date_range().is_none());
    }

    #[test]
    fn test_completed_line_items() {
        let records = RecordSet::new(
            vec![],
            vec![
                LineItem::new(1, 7, "Burger", 2, 40.0, at(2024, 1, 1, 12)),
                LineItem::new(2, 7, "Burger", 1, 20.0, at(2024, 1, 1, 12))
                    .with_status(SaleStatus::Other("CANCELLED".into())),
            ],
        );
        let items = records.completed_line_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sale_id, 1);
    }
}
