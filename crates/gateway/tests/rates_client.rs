//! Exchange rate client against a mock rate service.

use divvy_core::currency::{CachedRateProvider, CurrencyNormalizer, RateError, RateProvider};
use divvy_gateway::ExchangeRateApiClient;
use divvy_shared::types::CurrencyCode;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_latest(server: &MockServer, source: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/latest/{source}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> ExchangeRateApiClient {
    ExchangeRateApiClient::new(&server.uri(), 5).expect("valid client")
}

// ============================================================================
// Successful lookups
// ============================================================================
#[tokio::test]
async fn test_rate_from_latest() {
    let server = MockServer::start().await;
    mock_latest(
        &server,
        "EUR",
        json!({ "base": "EUR", "rates": { "USD": 1.08, "GBP": 0.86 } }),
    )
    .await;

    let rate = client(&server)
        .rate(CurrencyCode::EUR, CurrencyCode::USD)
        .await
        .expect("rate should resolve");
    assert_eq!(rate, dec!(1.08));
}

#[tokio::test]
async fn test_same_currency_skips_the_service() {
    let server = MockServer::start().await;

    let rate = client(&server)
        .rate(CurrencyCode::USD, CurrencyCode::USD)
        .await
        .expect("identity rate");
    assert_eq!(rate, dec!(1));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_cached_client_fetches_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/EUR"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "base": "EUR", "rates": { "USD": 1.08 } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let normalizer =
        CurrencyNormalizer::new(CachedRateProvider::new(client(&server)), CurrencyCode::USD);
    for _ in 0..3 {
        let amount = normalizer
            .normalize(dec!(10), CurrencyCode::EUR)
            .await
            .expect("conversion");
        assert_eq!(amount, dec!(10.80));
    }
}

// ============================================================================
// Failures
// ============================================================================
#[tokio::test]
async fn test_missing_target_is_unsupported() {
    let server = MockServer::start().await;
    mock_latest(&server, "EUR", json!({ "base": "EUR", "rates": { "GBP": 0.86 } })).await;

    let err = client(&server)
        .rate(CurrencyCode::EUR, CurrencyCode::USD)
        .await
        .expect_err("USD is missing");
    assert_eq!(
        err,
        RateError::Unsupported {
            currency: CurrencyCode::USD
        }
    );
}

#[tokio::test]
async fn test_unknown_source_is_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/IRR"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .rate(CurrencyCode::IRR, CurrencyCode::USD)
        .await
        .expect_err("unknown source");
    assert_eq!(
        err,
        RateError::Unsupported {
            currency: CurrencyCode::IRR
        }
    );
}

#[tokio::test]
async fn test_server_error_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/EUR"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server)
        .rate(CurrencyCode::EUR, CurrencyCode::USD)
        .await
        .expect_err("service down");
    assert!(matches!(err, RateError::Unreachable(_)));
}

#[tokio::test]
async fn test_garbage_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .rate(CurrencyCode::EUR, CurrencyCode::USD)
        .await
        .expect_err("not json");
    assert!(matches!(err, RateError::Malformed(_)));
}

#[tokio::test]
async fn test_wrong_base_is_malformed() {
    let server = MockServer::start().await;
    mock_latest(&server, "EUR", json!({ "base": "GBP", "rates": { "USD": 1.27 } })).await;

    let err = client(&server)
        .rate(CurrencyCode::EUR, CurrencyCode::USD)
        .await
        .expect_err("mismatched base");
    assert!(matches!(err, RateError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_service() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = ExchangeRateApiClient::new(&uri, 1).expect("valid client");
    let err = client
        .rate(CurrencyCode::EUR, CurrencyCode::USD)
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, RateError::Unreachable(_)));
}

#[tokio::test]
async fn test_transient_failure_is_retryable_through_normalizer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/EUR"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let normalizer = CurrencyNormalizer::new(client(&server), CurrencyCode::USD);
    let err = normalizer
        .normalize(dec!(10), CurrencyCode::EUR)
        .await
        .expect_err("service failing");
    assert!(err.is_retryable());
}
