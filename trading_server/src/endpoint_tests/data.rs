use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use mockall::predicate::eq;
use trading_engine::{db_types::DataPoint, DataApi};

use super::{
    helpers::{bearer, get_request, test_signer},
    mocks::MockDataManager,
};
use crate::{data_objects::LowestPriceResult, routes::{DataRoute, LowestPriceRoute}};

fn reading(id: i64, value: f64, age_minutes: i64) -> DataPoint {
    DataPoint { id, value, timestamp: Utc::now() - Duration::minutes(age_minutes) }
}

fn token() -> String {
    test_signer().issue("alice@example.com", None, Duration::hours(1)).unwrap()
}

fn configure_unreachable(cfg: &mut ServiceConfig) {
    // No expectations are set: reaching the backend at all fails the test.
    let api = DataApi::new(MockDataManager::new());
    cfg.service(DataRoute::<MockDataManager>::new())
        .service(LowestPriceRoute::<MockDataManager>::new())
        .app_data(web::Data::new(api));
}

#[actix_web::test]
async fn data_without_a_token_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/data", configure_unreachable).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Unauthorized"));
}

#[actix_web::test]
async fn data_with_a_raw_token_is_unauthorized() {
    // The token itself is valid, but the Bearer scheme prefix is mandatory.
    let (status, _) = get_request(&token(), "/data", configure_unreachable).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn data_with_an_expired_token_is_unauthorized() {
    let expired = test_signer().issue("alice@example.com", None, Duration::seconds(-5)).unwrap();
    let (status, body) = get_request(&bearer(&expired), "/data", configure_unreachable).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // Expiry and signature failures are indistinguishable on the wire.
    assert!(body.contains("Unauthorized"));
    assert!(!body.contains("expired"));
}

#[actix_web::test]
async fn data_with_a_cross_signed_token_is_unauthorized() {
    use st_common::Secret;
    let foreign = trading_engine::jwt::TokenSigner::new(Secret::new("some-other-secret".to_string()));
    let token = foreign.issue("alice@example.com", None, Duration::hours(1)).unwrap();
    let (status, _) = get_request(&bearer(&token), "/data", configure_unreachable).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn configure_default_limit(cfg: &mut ServiceConfig) {
    let mut db = MockDataManager::new();
    db.expect_fetch_recent_data_points()
        .with(eq(10))
        .returning(|_| Ok(vec![reading(3, 4200.0, 1), reading(2, 3100.5, 2), reading(1, 990.0, 3)]));
    cfg.service(DataRoute::<MockDataManager>::new()).app_data(web::Data::new(DataApi::new(db)));
}

#[actix_web::test]
async fn data_returns_recent_readings_with_the_default_limit() {
    let (status, body) = get_request(&bearer(&token()), "/data", configure_default_limit).await;
    assert_eq!(status, StatusCode::OK);
    let readings: Vec<DataPoint> = serde_json::from_str(&body).unwrap();
    assert_eq!(readings.len(), 3);
    assert_eq!(readings[0].id, 3);
    assert_eq!(readings[0].value, 4200.0);
}

fn configure_explicit_limit(cfg: &mut ServiceConfig) {
    let mut db = MockDataManager::new();
    db.expect_fetch_recent_data_points().with(eq(2)).returning(|_| Ok(vec![reading(2, 3100.5, 1), reading(1, 990.0, 2)]));
    cfg.service(DataRoute::<MockDataManager>::new()).app_data(web::Data::new(DataApi::new(db)));
}

#[actix_web::test]
async fn data_passes_an_explicit_limit_through() {
    let (status, body) = get_request(&bearer(&token()), "/data?limit=2", configure_explicit_limit).await;
    assert_eq!(status, StatusCode::OK);
    let readings: Vec<DataPoint> = serde_json::from_str(&body).unwrap();
    assert_eq!(readings.len(), 2);
}

#[actix_web::test]
async fn data_treats_a_nonpositive_limit_as_the_default() {
    let (status, _) = get_request(&bearer(&token()), "/data?limit=-5", configure_default_limit).await;
    assert_eq!(status, StatusCode::OK);
}

fn configure_lowest(cfg: &mut ServiceConfig) {
    let mut db = MockDataManager::new();
    db.expect_fetch_data_points_since()
        .returning(|_| Ok(vec![reading(3, 4200.0, 10), reading(2, 870.25, 300), reading(1, 990.0, 1200)]));
    cfg.service(LowestPriceRoute::<MockDataManager>::new()).app_data(web::Data::new(DataApi::new(db)));
}

#[actix_web::test]
async fn lowest_returns_the_minimum_reading_in_the_window() {
    let (status, body) = get_request(&bearer(&token()), "/data/lowest", configure_lowest).await;
    assert_eq!(status, StatusCode::OK);
    let res: LowestPriceResult = serde_json::from_str(&body).unwrap();
    assert_eq!(res.lowest, 870.25);
}

fn configure_empty_window(cfg: &mut ServiceConfig) {
    let mut db = MockDataManager::new();
    db.expect_fetch_data_points_since().returning(|_| Ok(vec![]));
    cfg.service(LowestPriceRoute::<MockDataManager>::new()).app_data(web::Data::new(DataApi::new(db)));
}

#[actix_web::test]
async fn lowest_with_no_readings_is_a_404() {
    let (status, body) = get_request(&bearer(&token()), "/data/lowest", configure_empty_window).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("no readings"));
}
