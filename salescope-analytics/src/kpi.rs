//! General KPIs over a sale collection

use crate::format::safe_ratio;
use salescope_core::Sale;
use serde::Serialize;

/// Revenue, order count and average order value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GeneralKpis {
    /// Sum of `total_amount`
    pub total_revenue: f64,
    /// Number of sales
    pub total_orders: u64,
    /// `total_revenue / total_orders`, or 0 without orders
    pub average_order_value: f64,
}

/// Compute the general KPIs
///
/// Every input sale is counted; restricting to completed sales is the
/// caller's job.
pub fn compute_general_kpis<'a, I>(sales: I) -> GeneralKpis
where
    I: IntoIterator<Item = &'a Sale>,
{
    let (total_revenue, total_orders) = sales
        .into_iter()
        .fold((0.0, 0u64), |(revenue, orders), sale| {
            (revenue + sale.total_amount, orders + 1)
        });

    GeneralKpis {
        total_revenue,
        total_orders,
        average_order_value: safe_ratio(total_revenue, total_orders as f64),
    }
}
