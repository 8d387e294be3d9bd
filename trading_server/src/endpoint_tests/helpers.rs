use actix_web::{
    body::{to_bytes, MessageBody},
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
    HttpResponse,
};
use st_common::Secret;
use trading_engine::jwt::TokenSigner;

// The signing secret every endpoint test app uses. DO NOT re-use this anywhere.
pub fn test_signer() -> TokenSigner {
    TokenSigner::new(Secret::new("endpoint-test-secret".to_string()))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn get_request(
    auth_header: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    send_request(TestRequest::get(), auth_header, path, configure).await
}

// Middleware rejections surface as service errors rather than responses, so both arms are
// converted into (status, body) for uniform assertions.
async fn send_request(
    req: TestRequest,
    auth_header: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = req.uri(path);
    if !auth_header.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, auth_header));
    }
    let app = App::new().app_data(web::Data::new(test_signer())).configure(configure);
    let service = test::init_service(app).await;
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            (status, body_string(res.into_body()).await)
        },
        Err(e) => {
            let res = HttpResponse::from_error(e);
            let status = res.status();
            (status, body_string(res.into_body()).await)
        },
    }
}

pub async fn body_string<B: MessageBody>(body: B) -> String {
    let bytes = match to_bytes(body).await {
        Ok(b) => b,
        Err(_) => return String::new(),
    };
    String::from_utf8_lossy(&bytes).into_owned()
}
