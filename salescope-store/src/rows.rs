//! Database rows and their conversion into records

use crate::error::{LoadError, LoadResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use salescope_core::{LineItem, Sale, SaleStatus};
use sqlx::FromRow;

/// One row of the sales query
#[derive(Debug, Clone, FromRow)]
pub struct SaleRow {
    pub id: i64,
    pub store_id: i64,
    pub store_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub channel_id: i64,
    pub channel_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sale_status_desc: String,
    pub total_amount: f64,
    pub total_discount: f64,
    pub delivery_fee: f64,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub sub_brand_id: Option<i64>,
    pub sub_brand_name: Option<String>,
}

/// One row of the line-items query
#[derive(Debug, Clone, FromRow)]
pub struct LineItemRow {
    pub sale_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub item_total_amount: f64,
    pub sale_status_desc: String,
    pub sale_date: DateTime<Utc>,
    pub sub_brand_id: Option<i64>,
    pub sub_brand_name: Option<String>,
}

fn local_time(at: DateTime<Utc>, timezone: Tz) -> NaiveDateTime {
    at.with_timezone(&timezone).naive_local()
}

impl SaleRow {
    /// Convert into a sale with `created_at` in `timezone`
    pub fn into_sale(self, timezone: Tz) -> Sale {
        Sale {
            id: self.id,
            store_id: self.store_id,
            store_name: self.store_name,
            city: self.city,
            state: self.state,
            channel_id: self.channel_id,
            channel_name: self.channel_name,
            created_at: local_time(self.created_at, timezone),
            status: SaleStatus::parse(&self.sale_status_desc),
            total_amount: self.total_amount,
            total_discount: self.total_discount,
            delivery_fee: self.delivery_fee,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            sub_brand_id: self.sub_brand_id,
            sub_brand_name: self.sub_brand_name,
        }
    }
}

impl LineItemRow {
    /// Convert into a line item with `sale_date` in `timezone`
    pub fn into_line_item(self, timezone: Tz) -> LoadResult<LineItem> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            LoadError::invalid_row(
                "line item",
                format!("sale {}: quantity {} out of range", self.sale_id, self.quantity),
            )
        })?;

        Ok(LineItem {
            sale_id: self.sale_id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity,
            item_total_amount: self.item_total_amount,
            sale_status: SaleStatus::parse(&self.sale_status_desc),
            sale_date: local_time(self.sale_date, timezone),
            sub_brand_id: self.sub_brand_id,
            sub_brand_name: self.sub_brand_name,
        })
    }
}
