//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Any long, non-cpu-bound operation (I/O, database access, outbound HTTP) must be expressed as a
//! future so the worker thread can service other requests while it is pending.

use actix_web::{get, http::header, web, HttpRequest, HttpResponse, Responder};
use chrono::Duration;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use trading_engine::{
    credentials::MachineCredentialStore,
    jwt::TokenSigner,
    traits::{DataManagement, TradeManagement},
    DataApi,
    TradeApi,
};

use crate::{
    auth::VerifiedIdentity,
    data_objects::{CallbackParams, DataQueryParams, LoginResponse, LowestPriceResult, TokenResponse, TradeParams, TradeResponse},
    errors::ServerError,
    helpers::basic_credentials,
    oauth::GoogleOAuthBridge,
    workflow::TradeValidator,
};

const DEFAULT_DATA_LIMIT: i64 = 10;
const MACHINE_TOKEN_TTL_HOURS: i64 = 1;
const LOGIN_TOKEN_TTL_HOURS: i64 = 72;
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where protected) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::BearerAuthMiddlewareFactory::new());
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------

/// Route handler for the machine token endpoint.
///
/// Machines authenticate with HTTP Basic client credentials and receive a short-lived bearer
/// token. Any malformation of the header and any credential mismatch produce the same generic
/// 401; the submitted values are never logged.
#[get("/token")]
pub async fn machine_token(
    req: HttpRequest,
    store: web::Data<MachineCredentialStore>,
    signer: web::Data<TokenSigner>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received machine token request");
    let (client_id, client_secret) = basic_credentials(&req).ok_or(ServerError::Unauthenticated)?;
    if !store.authenticate(&client_id, &client_secret) {
        debug!("💻️ Machine credential check failed. Denying access.");
        return Err(ServerError::Unauthenticated);
    }
    let token = signer
        .issue(&client_id, Some(&client_id), Duration::hours(MACHINE_TOKEN_TTL_HOURS))
        .map_err(|e| ServerError::BackendError(format!("Could not issue machine token. {e}")))?;
    debug!("💻️ Issued machine token for client '{client_id}'");
    Ok(HttpResponse::Ok().json(TokenResponse { access_token: token }))
}

/// Route handler for starting a Google login.
///
/// Issues a fresh random state token (signed, short-lived, single purpose) and redirects the
/// browser to the provider's consent page. The state is verified statelessly on the callback, so
/// no per-login record is kept server-side.
#[get("/google")]
pub async fn google_login(
    signer: web::Data<TokenSigner>,
    bridge: web::Data<GoogleOAuthBridge>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received Google login request");
    let nonce = thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect::<String>();
    let state = signer
        .issue(&nonce, None, Duration::minutes(OAUTH_STATE_TTL_MINUTES))
        .map_err(|e| ServerError::BackendError(format!("Could not issue state token. {e}")))?;
    let url = bridge.authorization_url(&state).map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    debug!("💻️ Redirecting to the identity provider");
    Ok(HttpResponse::TemporaryRedirect().insert_header((header::LOCATION, url.to_string())).finish())
}

/// Route handler for the Google OAuth callback.
///
/// The state parameter must verify before anything else happens; a provider-supplied code with a
/// bad state never reaches the code exchange. On success the user's email becomes the subject of
/// a long-lived login token.
#[get("/google/callback")]
pub async fn google_callback(
    params: web::Query<CallbackParams>,
    signer: web::Data<TokenSigner>,
    bridge: web::Data<GoogleOAuthBridge>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received Google login callback");
    signer.verify(&params.state).map_err(|e| {
        debug!("💻️ OAuth state parameter did not verify ({e}). Rejecting callback.");
        ServerError::OAuthStateMismatch
    })?;
    let email = bridge.exchange_code(&params.code).await?;
    let token = signer
        .issue(&email, None, Duration::hours(LOGIN_TOKEN_TTL_HOURS))
        .map_err(|e| ServerError::BackendError(format!("Could not issue login token. {e}")))?;
    info!("💻️ Completed Google login for {email}");
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

//----------------------------------------------   Data  ----------------------------------------------------
route!(data => Get "/data" impl DataManagement where protected);
/// Route handler for recent market readings, newest first. `limit` defaults to 10; zero and
/// negative values fall back to the default rather than erroring.
pub async fn data<B: DataManagement>(
    params: web::Query<DataQueryParams>,
    api: web::Data<DataApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_DATA_LIMIT);
    debug!("💻️ GET data with limit {limit}");
    let readings = api.recent(limit).await?;
    Ok(HttpResponse::Ok().json(readings))
}

route!(lowest_price => Get "/data/lowest" impl DataManagement where protected);
/// Route handler for the floor price: the lowest reading in the trailing 24 hours. An empty
/// window is a 404, never a made-up zero.
pub async fn lowest_price<B: DataManagement>(api: web::Data<DataApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET lowest price");
    let lowest = api.lowest_in_window(Duration::hours(24)).await?;
    Ok(HttpResponse::Ok().json(LowestPriceResult { lowest }))
}

//----------------------------------------------   Trade  ----------------------------------------------------
route!(place_trade => Post "/trade" impl TradeManagement where protected);
/// Route handler for placing a trade.
///
/// The amount must be a finite, non-negative number. The trade validation workflow then runs its
/// full chain (machine token, floor price, price rule) before the trade is persisted under the
/// caller's identity. A rejected trade discloses the minimum acceptable price; that is the one
/// piece of validation detail the API deliberately shares.
pub async fn place_trade<B: TradeManagement>(
    identity: VerifiedIdentity,
    params: web::Query<TradeParams>,
    validator: web::Data<TradeValidator>,
    api: web::Data<TradeApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let amount = params.amount;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ServerError::InvalidRequestInput(format!("{amount} is not a valid trade amount")));
    }
    debug!("💻️ POST trade of {amount} for {}", identity.sub);
    let floor = validator.validate(amount).await?;
    let id = api.save_trade(&identity.sub, amount).await?;
    info!("💻️ Trade #{id} of {amount:.2} accepted for {} (floor was {floor:.2})", identity.sub);
    Ok(HttpResponse::Ok().json(TradeResponse { status: "trade accepted".to_string() }))
}
