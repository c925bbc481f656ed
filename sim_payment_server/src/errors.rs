use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use sim_payment_engine::PaymentGatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("The callback signature does not match")]
    SignatureMismatch,
    #[error("The callback amount does not match the order")]
    AmountMismatch,
    #[error("The referenced order does not exist")]
    OrderNotFound,
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::SignatureMismatch => StatusCode::BAD_REQUEST,
            Self::AmountMismatch => StatusCode::BAD_REQUEST,
            Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The payment provider polls the callback response bodies, so they are short fixed text tokens rather than
    /// JSON: anything other than the expected `OK<InvId>` makes the provider retry or alert the merchant.
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::SignatureMismatch => "bad sign",
            Self::AmountMismatch => "bad amount",
            Self::OrderNotFound => "bad order",
            Self::InvalidRequestBody(_) => "bad request",
            _ => "error",
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::plaintext()).body(body)
    }
}

impl From<PaymentGatewayError> for ServerError {
    fn from(e: PaymentGatewayError) -> Self {
        match e {
            PaymentGatewayError::OrderNotFound(_) => Self::OrderNotFound,
            PaymentGatewayError::AmountMismatch { .. } => Self::AmountMismatch,
            PaymentGatewayError::DatabaseError(e) => Self::BackendError(e),
            e => Self::Unspecified(e.to_string()),
        }
    }
}
