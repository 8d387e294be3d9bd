use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::{debug, error};
use thiserror::Error;
use trading_engine::{
    jwt::TokenError,
    traits::{DataApiError, TradeApiError},
};

use crate::{oauth::OAuthError, workflow::WorkflowError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Unauthorized")]
    Unauthenticated,
    #[error("Could not read request input: {0}")]
    InvalidRequestInput(String),
    #[error("The state parameter is missing or does not verify")]
    OAuthStateMismatch,
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Identity provider error. {0}")]
    OAuth(#[from] OAuthError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidRequestInput(_) => StatusCode::BAD_REQUEST,
            Self::OAuthStateMismatch => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Workflow(WorkflowError::TradeRejected { .. }) => StatusCode::FORBIDDEN,
            Self::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OAuth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // 401s and 5xxs get a fixed generic body. The reason a credential was rejected is an oracle
    // for probing, and upstream failure detail belongs in the log, not on the wire.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::UNAUTHORIZED {
            debug!("🔐️ Rejected request: {self}");
            "Unauthorized".to_string()
        } else if status.is_server_error() {
            error!("💥️ {self}");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

impl From<TokenError> for ServerError {
    fn from(_: TokenError) -> Self {
        // The four verification failure modes deliberately collapse into one outcome here.
        Self::Unauthenticated
    }
}

impl From<DataApiError> for ServerError {
    fn from(e: DataApiError) -> Self {
        match e {
            DataApiError::NoDataInWindow => Self::NoRecordFound("no readings in the last 24 hours".to_string()),
            DataApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<TradeApiError> for ServerError {
    fn from(e: TradeApiError) -> Self {
        match e {
            TradeApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}
