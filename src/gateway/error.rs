//! Error types for the remote cart gateway.

use thiserror::Error;

/// Errors a gateway call can end with.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// The service answered but refused the request. `message` is the server's own
    /// explanation when it sent one.
    #[error("{}", rejection_text(.message))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The service could not be reached (connection, timeout, closed channel).
    #[error("Gateway unavailable: {0}")]
    Transport(String),

    /// The service answered with a payload that could not be decoded.
    #[error("Malformed gateway response: {0}")]
    Decode(String),
}

fn rejection_text(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("Request rejected")
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            status: None,
            message: Some(message.into()),
        }
    }

    /// The server-provided message, if any. This is what a shopper gets to see.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_server_message() {
        let e = GatewayError::rejected("Item is out of stock");
        assert_eq!(e.to_string(), "Item is out of stock");
        assert_eq!(e.user_message(), Some("Item is out of stock"));
    }

    #[test]
    fn test_rejected_without_message() {
        let e = GatewayError::Rejected {
            status: Some(500),
            message: None,
        };
        assert_eq!(e.to_string(), "Request rejected");
        assert_eq!(e.user_message(), None);
    }
}
