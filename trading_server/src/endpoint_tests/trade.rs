use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::Duration;
use httpmock::prelude::*;
use mockall::predicate::eq;
use serde_json::json;
use st_common::Secret;
use trading_engine::{db_types::NewTrade, TradeApi};

use super::{
    helpers::{bearer, body_string, test_signer},
    mocks::MockTradeManager,
};
use crate::{
    config::{MachineCredentialConfig, PeerConfig},
    routes::PlaceTradeRoute,
    workflow::{TradeValidator, WorkflowError},
};

fn machine() -> MachineCredentialConfig {
    MachineCredentialConfig {
        client_id: "myclientid".to_string(),
        client_secret: Secret::new("myclientsecret".to_string()),
    }
}

fn peers(server: &MockServer) -> PeerConfig {
    PeerConfig { auth_url: server.url("/auth/token"), data_url: server.url("/data/lowest") }
}

fn token() -> String {
    test_signer().issue("alice@example.com", None, Duration::hours(1)).unwrap()
}

/// Stand up the trade endpoint against mocked peer services and a mocked trade store.
async fn call_trade(
    server: &MockServer,
    trades: MockTradeManager,
    uri: &str,
) -> (StatusCode, String) {
    let validator = TradeValidator::new(peers(server), machine());
    let app = App::new()
        .app_data(web::Data::new(test_signer()))
        .app_data(web::Data::new(validator))
        .app_data(web::Data::new(TradeApi::new(trades)))
        .service(PlaceTradeRoute::<MockTradeManager>::new());
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri(uri).insert_header(("Authorization", bearer(&token()))).to_request();
    match test::try_call_service(&service, req).await {
        Ok(res) => {
            let status = res.status();
            (status, body_string(res.into_body()).await)
        },
        Err(e) => {
            let res = actix_web::HttpResponse::from_error(e);
            let status = res.status();
            (status, body_string(res.into_body()).await)
        },
    }
}

async fn mock_peers(server: &MockServer, floor: f64) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
    let auth = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/auth/token")
                .header("authorization", format!("Basic {}", base64::encode("myclientid:myclientsecret")));
            then.status(200).json_body(json!({"access_token": "machine-token"}));
        })
        .await;
    let price = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/lowest").header("authorization", "Bearer machine-token");
            then.status(200).json_body(json!({"lowest": floor}));
        })
        .await;
    (auth, price)
}

#[actix_web::test]
async fn trade_above_the_minimum_is_accepted_and_persisted() {
    let _ = env_logger::try_init().ok();
    let server = MockServer::start_async().await;
    let (auth, price) = mock_peers(&server, 1000.0).await;
    let mut trades = MockTradeManager::new();
    trades
        .expect_insert_trade()
        .with(eq(NewTrade { user_id: "alice@example.com".to_string(), price: 600.0 }))
        .times(1)
        .returning(|_| Ok(1));
    let (status, body) = call_trade(&server, trades, "/trade?amount=600").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("trade accepted"));
    auth.assert_async().await;
    price.assert_async().await;
}

#[actix_web::test]
async fn trade_exactly_at_the_minimum_is_accepted() {
    let server = MockServer::start_async().await;
    let _mocks = mock_peers(&server, 1000.0).await;
    let mut trades = MockTradeManager::new();
    trades.expect_insert_trade().times(1).returning(|_| Ok(2));
    let (status, _) = call_trade(&server, trades, "/trade?amount=500").await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn trade_below_the_minimum_is_rejected_with_the_minimum() {
    let server = MockServer::start_async().await;
    let _mocks = mock_peers(&server, 1000.0).await;
    let mut trades = MockTradeManager::new();
    trades.expect_insert_trade().times(0);
    let (status, body) = call_trade(&server, trades, "/trade?amount=400").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    // The one piece of validation detail the API shares.
    assert!(body.contains("500.00"));
}

#[actix_web::test]
async fn trade_without_a_token_is_unauthorized() {
    let server = MockServer::start_async().await;
    let validator = TradeValidator::new(peers(&server), machine());
    let app = App::new()
        .app_data(web::Data::new(test_signer()))
        .app_data(web::Data::new(validator))
        .app_data(web::Data::new(TradeApi::new(MockTradeManager::new())))
        .service(PlaceTradeRoute::<MockTradeManager>::new());
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri("/trade?amount=600").to_request();
    let res = test::try_call_service(&service, req).await;
    let status = match res {
        Ok(res) => res.status(),
        Err(e) => e.as_response_error().status_code(),
    };
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn invalid_amounts_are_rejected_without_calling_the_peers() {
    let server = MockServer::start_async().await;
    let (auth, _price) = mock_peers(&server, 1000.0).await;
    let mut trades = MockTradeManager::new();
    trades.expect_insert_trade().times(0);
    let (status, _) = call_trade(&server, trades, "/trade?amount=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(auth.hits_async().await, 0);

    let trades = MockTradeManager::new();
    let (status, _) = call_trade(&server, trades, "/trade?amount=NaN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn a_failed_code_path_never_reaches_the_data_service() {
    let server = MockServer::start_async().await;
    let auth = server
        .mock_async(|when, then| {
            when.method(GET).path("/auth/token");
            then.status(500);
        })
        .await;
    let price = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/lowest");
            then.status(200).json_body(json!({"lowest": 1000.0}));
        })
        .await;
    let validator = TradeValidator::new(peers(&server), machine());
    let err = validator.validate(600.0).await.unwrap_err();
    assert!(matches!(err, WorkflowError::AuthenticationFailed(_)));
    assert_eq!(auth.hits_async().await, 1);
    assert_eq!(price.hits_async().await, 0);
}

#[actix_web::test]
async fn an_undecodable_floor_price_is_a_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/auth/token");
            then.status(200).json_body(json!({"access_token": "machine-token"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/data/lowest");
            then.status(200).body("not json at all");
        })
        .await;
    let mut trades = MockTradeManager::new();
    trades.expect_insert_trade().times(0);
    let (status, body) = call_trade(&server, trades, "/trade?amount=600").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("internal server error"));
}
