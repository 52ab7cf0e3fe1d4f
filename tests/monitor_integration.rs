//! End-to-end tests of the refresh and dispatch workflow against mock endpoints.

use hot_tours::bot::BotClient;
use hot_tours::config::OutputFormat;
use hot_tours::deals::ParserClient;
use hot_tours::format::Formatter;
use hot_tours::monitor::{
    DispatchSequencer, NoticeLog, ParseOutcome, RefreshController, RefreshOutcome,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn maldives() -> serde_json::Value {
    json!({
        "id": "1",
        "destination": "Мальдивы",
        "imageUrl": "https://images.unsplash.com/photo-1514282401047-d79a71a590e8?w=400",
        "currentPrice": 1299,
        "originalPrice": 2599,
        "discount": 50,
        "url": "https://travelata.ru/deal/1"
    })
}

fn turkey() -> serde_json::Value {
    json!({
        "id": 2,
        "destination": "Турция, Анталия",
        "imageUrl": "https://images.unsplash.com/photo-1524231757912-21f4fe3a7200?w=400",
        "currentPrice": 899,
        "originalPrice": 1899,
        "discount": 53,
        "url": "https://travelata.ru/deal/2",
        "foundAt": "2026-10-16T08:00:00"
    })
}

fn deals_response(deals: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "deals": deals }))
}

fn parser_for(server: &MockServer) -> ParserClient {
    ParserClient::with_url(format!("{}/parser", server.uri()), Duration::from_secs(5)).unwrap()
}

fn bot_for(server: &MockServer) -> BotClient {
    BotClient::with_url(format!("{}/bot", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_single_deal_renders_one_card() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parser"))
        .respond_with(deals_response(json!([maldives()])))
        .mount(&server)
        .await;

    let controller = RefreshController::new(parser_for(&server), Arc::new(NoticeLog::new()));
    assert!(controller.refresh().await.is_updated());

    let output = Formatter::new(OutputFormat::Table).format_board(&controller.snapshot());

    assert_eq!(output.matches("✈ ").count(), 1);
    assert!(output.contains("Мальдивы"));
    assert!(output.contains("1299$"));
    assert!(output.contains("50% OFF"));
    assert!(output.contains("\x1b[9m2599$\x1b[29m"));
}

#[tokio::test]
async fn test_network_error_keeps_previous_deals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parser"))
        .respond_with(deals_response(json!([maldives(), turkey()])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/parser"))
        .respond_with(ResponseTemplate::new(200).set_body_string("gateway timeout"))
        .mount(&server)
        .await;

    let notices = Arc::new(NoticeLog::new());
    let controller = RefreshController::new(parser_for(&server), notices.clone());

    assert!(matches!(controller.refresh().await, RefreshOutcome::Updated(2)));
    assert!(matches!(controller.refresh().await, RefreshOutcome::Failed(_)));

    let state = controller.snapshot();
    assert_eq!(state.deals().len(), 2);
    assert_eq!(state.deals()[1].id, "2");
    assert!(!state.is_loading);
    assert_eq!(notices.len(), 1);
    assert!(notices.entries()[0].is_error());
}

#[tokio::test]
async fn test_parse_count_then_automatic_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/parser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 7})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/parser"))
        .respond_with(deals_response(json!([turkey()])))
        .expect(1)
        .mount(&server)
        .await;

    let notices = Arc::new(NoticeLog::new());
    let controller = RefreshController::new(parser_for(&server), notices.clone());

    let outcome = controller.parse_then_refresh().await;
    assert!(matches!(outcome, ParseOutcome::Completed { refresh: RefreshOutcome::Updated(1), .. }));

    assert!(notices.entries()[0].message.contains('7'));
    assert_eq!(controller.snapshot().deals()[0].destination, "Турция, Анталия");
}

#[tokio::test]
async fn test_dispatch_reports_bot_errors_verbatim() {
    let parser = MockServer::start().await;
    let bot = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parser"))
        .respond_with(deals_response(json!([maldives(), turkey()])))
        .mount(&parser)
        .await;

    Mock::given(method("POST"))
        .and(path("/bot"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "bad chat id"})),
        )
        .expect(2)
        .mount(&bot)
        .await;

    let notices = Arc::new(NoticeLog::new());
    let controller = RefreshController::new(parser_for(&parser), notices.clone());
    controller.refresh().await;

    let sequencer =
        DispatchSequencer::new(bot_for(&bot), Duration::from_millis(10), notices.clone());
    let report = sequencer.dispatch(controller.snapshot().deals()).await;

    assert_eq!(report.len(), 2);
    assert_eq!(report.failed(), 2);

    let entries = notices.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|n| n.message == "bad chat id"));
}
