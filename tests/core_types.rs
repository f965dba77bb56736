//! Tests for core types

use chrono::NaiveDate;
use salescope::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_message_creation() {
    let msg = Message::user("How was January?");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "How was January?");
    assert_eq!(Message::assistant("Good.").role, Role::Assistant);
}

#[test]
fn test_request_builder() {
    let request = Request::builder()
        .message(Message::user("Hello"))
        .model("gemini-2.5-pro")
        .system_instruction("You are a sales analyst.")
        .temperature(0.4)
        .max_tokens(256)
        .web_search(true)
        .build();

    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.model.0, "gemini-2.5-pro");
    assert_eq!(request.parameters.temperature, Some(0.4));
    assert_eq!(request.parameters.max_tokens, Some(256));
    assert!(request.web_search);
}

#[test]
fn test_period_and_records() {
    let period = AnalysisPeriod::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
    assert_eq!(period.days(), 31);
    assert!(AnalysisPeriod::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());

    let at = date(2024, 1, 10).and_hms_opt(19, 30, 0).unwrap();
    let records = RecordSet::new(
        vec![
            Sale::new(1, 1, at, 42.0),
            Sale::new(2, 1, at, 10.0).with_status(SaleStatus::parse("CANCELLED")),
        ],
        vec![LineItem::new(1, 3, "Pizza", 1, 42.0, at)],
    );
    assert_eq!(records.completed_sales().len(), 1);
    assert_eq!(
        records.completed_date_range(),
        Some((date(2024, 1, 10), date(2024, 1, 10)))
    );
}

#[test]
fn test_response_references() {
    let mut response = Response::text("Sales rose.");
    assert_eq!(response.with_references(), "Sales rose.");

    response.sources.push(Source {
        title: "Holidays".into(),
        uri: "https://example.com/holidays".into(),
    });
    assert_eq!(
        response.with_references(),
        "Sales rose.\n\n---\n**References:**\n- [Holidays](https://example.com/holidays)"
    );
}

#[test]
fn test_error_display() {
    let err = Error::missing_field("sale", "created_at");
    assert!(err.to_string().contains("created_at"));
    assert!(!err.is_external_service());

    let err = Error::Provider {
        provider: "gemini".into(),
        message: "HTTP 503".into(),
        status: Some(503),
    };
    assert!(err.is_external_service());
}
