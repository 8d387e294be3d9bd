use std::time::Duration;

use actix_web::{http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use trading_engine::{
    credentials::MachineCredentialStore,
    jwt::TokenSigner,
    DataApi,
    SqliteDatabase,
    TradeApi,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    generator::start_data_generator,
    oauth::GoogleOAuthBridge,
    routes::{
        google_callback,
        google_login,
        health,
        machine_token,
        DataRoute,
        LowestPriceRoute,
        PlaceTradeRoute,
    },
    workflow::TradeValidator,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let generator = start_data_generator(db.clone(), config.generator_interval);
    info!("📊️ Synthetic data generator started ({:?} interval)", config.generator_interval);
    let srv = create_server_instance(config, db)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    generator.abort();
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
) -> Result<actix_web::dev::Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let signer = TokenSigner::new(config.auth.jwt_secret.clone());
        let store =
            MachineCredentialStore::new(config.machine.client_id.as_str(), config.machine.client_secret.clone());
        let bridge = GoogleOAuthBridge::new(config.oauth.clone());
        let validator = TradeValidator::new(config.peers.clone(), config.machine.clone());
        let data_api = DataApi::new(db.clone());
        let trade_api = TradeApi::new(db.clone());
        let auth_scope =
            web::scope("/auth").service(machine_token).service(google_login).service(google_callback);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("stg::access_log"))
            .app_data(web::Data::new(signer))
            .app_data(web::Data::new(store))
            .app_data(web::Data::new(bridge))
            .app_data(web::Data::new(validator))
            .app_data(web::Data::new(data_api))
            .app_data(web::Data::new(trade_api))
            .service(health)
            .service(auth_scope)
            .service(DataRoute::<SqliteDatabase>::new())
            .service(LowestPriceRoute::<SqliteDatabase>::new())
            .service(PlaceTradeRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
