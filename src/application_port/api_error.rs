use crate::domain_port::TransportError;

const SERVER_ERROR_MESSAGE: &str = "The server has a temporary problem.\nPlease try again shortly.";
const NETWORK_ERROR_MESSAGE: &str = "Please check your internet connection.";
const TIMEOUT_MESSAGE: &str = "The request timed out.\nPlease try again shortly.";
const AUTH_ERROR_MESSAGE: &str = "Authentication failed.\nPlease try again shortly.";
const CONFLICT_MESSAGE: &str = "This action was already performed.";
const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.\nPlease try again shortly.";

/// Client-observable failure of one backend call.
///
/// Status, server code and server message are carried through unmodified;
/// whether a given 4xx is a business condition is decided by the call site.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized ({code}): {message}")]
    Auth { code: String, message: String },
    #[error("conflict ({code}): {message}")]
    Conflict { code: String, message: String },
    #[error("client error {status} ({code}): {message}")]
    Client {
        status: u16,
        code: String,
        message: String,
    },
    #[error("server error {status} ({code}): {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },
    /// A non-2xx status outside 4xx and 5xx, such as an unfollowed redirect.
    #[error("unexpected status {status} ({code}): {message}")]
    Unexpected {
        status: u16,
        code: String,
        message: String,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("request rejected ({code}): {message}")]
    Rejected { code: String, message: String },
}

impl ApiError {
    /// Classifies a non-2xx answer.
    pub fn from_status(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let message = message.into();
        match status {
            401 => ApiError::Auth { code, message },
            409 => ApiError::Conflict { code, message },
            400..=499 => ApiError::Client {
                status,
                code,
                message,
            },
            500..=599 => ApiError::Server {
                status,
                code,
                message,
            },
            _ => ApiError::Unexpected {
                status,
                code,
                message,
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth { .. } => Some(401),
            ApiError::Conflict { .. } => Some(409),
            ApiError::Client { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Unexpected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Auth { code, .. }
            | ApiError::Conflict { code, .. }
            | ApiError::Client { code, .. }
            | ApiError::Server { code, .. }
            | ApiError::Unexpected { code, .. }
            | ApiError::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Auth { message, .. }
            | ApiError::Conflict { message, .. }
            | ApiError::Client { message, .. }
            | ApiError::Server { message, .. }
            | ApiError::Unexpected { message, .. }
            | ApiError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Server { .. } | ApiError::Network(_) | ApiError::Timeout
        )
    }

    /// Static message for the blocking error dialog.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Auth { .. } => AUTH_ERROR_MESSAGE,
            ApiError::Conflict { .. } => CONFLICT_MESSAGE,
            ApiError::Server { .. } => SERVER_ERROR_MESSAGE,
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE,
            ApiError::Timeout => TIMEOUT_MESSAGE,
            ApiError::Client { .. }
            | ApiError::Unexpected { .. }
            | ApiError::Decode(_)
            | ApiError::Rejected { .. } => UNKNOWN_ERROR_MESSAGE,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Network(e) => ApiError::Network(e),
            TransportError::Timeout => ApiError::Timeout,
        }
    }
}
