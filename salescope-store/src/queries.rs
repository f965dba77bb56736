//! SQL for the two record sets
//!
//! Columns are cast to the exact types the row structs decode, and
//! timestamps to `timestamptz` so the session timezone applies.

/// Every sale with its store, channel, sub-brand and customer
pub const SALES_QUERY: &str = r#"
SELECT
    s.id::bigint AS id,
    s.store_id::bigint AS store_id,
    st.name AS store_name,
    st.city,
    st.state,
    s.channel_id::bigint AS channel_id,
    c.name AS channel_name,
    s.created_at::timestamptz AS created_at,
    s.sale_status_desc,
    s.total_amount::float8 AS total_amount,
    COALESCE(s.total_discount, 0)::float8 AS total_discount,
    COALESCE(s.delivery_fee, 0)::float8 AS delivery_fee,
    s.customer_id::bigint AS customer_id,
    COALESCE(cust.customer_name, s.customer_name) AS customer_name,
    cust.phone_number AS customer_phone,
    st.sub_brand_id::bigint AS sub_brand_id,
    sb.name AS sub_brand_name
FROM sales s
JOIN stores st ON s.store_id = st.id
LEFT JOIN channels c ON s.channel_id = c.id
LEFT JOIN sub_brands sb ON st.sub_brand_id = sb.id
LEFT JOIN customers cust ON s.customer_id = cust.id
"#;

/// Every sold product line with its sale's status and timestamp
pub const LINE_ITEMS_QUERY: &str = r#"
SELECT
    ps.sale_id::bigint AS sale_id,
    ps.product_id::bigint AS product_id,
    p.name AS product_name,
    ps.quantity::bigint AS quantity,
    ps.total_price::float8 AS item_total_amount,
    s.sale_status_desc,
    s.created_at::timestamptz AS sale_date,
    p.sub_brand_id::bigint AS sub_brand_id,
    sb.name AS sub_brand_name
FROM product_sales ps
JOIN products p ON ps.product_id = p.id
JOIN sales s ON ps.sale_id = s.id
LEFT JOIN sub_brands sb ON p.sub_brand_id = sb.id
"#;
