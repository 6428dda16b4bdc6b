use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use arcade_engine::{CartError, CatalogError, OrderFlowError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("{0}")]
    CatalogError(#[from] CatalogError),
    #[error("{0}")]
    CartError(#[from] CartError),
    #[error("{0}")]
    OrderFlowError(#[from] OrderFlowError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::BAD_REQUEST,
            },
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::CatalogError(e) => match e {
                CatalogError::GameNotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::InvalidGame(_) | CatalogError::UpdateNoOp => StatusCode::BAD_REQUEST,
                CatalogError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CartError(e) => cart_status_code(e),
            Self::OrderFlowError(e) => match e {
                OrderFlowError::EmptyCart
                | OrderFlowError::GameNotFound(_)
                | OrderFlowError::GameUnavailable { .. }
                | OrderFlowError::InsufficientStock { .. }
                | OrderFlowError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
                OrderFlowError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                OrderFlowError::TerminalState { .. } | OrderFlowError::CannotDeleteCompletedOrder(_) => {
                    StatusCode::CONFLICT
                },
                OrderFlowError::CartError(e) => cart_status_code(e),
                OrderFlowError::DatabaseError(_) | OrderFlowError::OrderNumberCollision(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                },
            },
            Self::InitializeError(_)
            | Self::BackendError(_)
            | Self::IOError(_)
            | Self::ConfigurationError(_)
            | Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

fn cart_status_code(e: &CartError) -> StatusCode {
    match e {
        CartError::GameNotFound(_) | CartError::ItemNotInCart(_) => StatusCode::NOT_FOUND,
        CartError::GameUnavailable { .. } | CartError::InsufficientStock { .. } | CartError::InvalidQuantity(_) => {
            StatusCode::BAD_REQUEST
        },
        CartError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Access token signature is invalid. {0}")]
    ValidationError(String),
    #[error("Access token has expired.")]
    TokenExpired,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
}
