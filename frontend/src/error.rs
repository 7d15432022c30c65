use shared::{CustomerValidationError, LedgerFormValidation};
use thiserror::Error;

use crate::ledger::MutationId;

/// Failures talking to the backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The request never got a response
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx status
    #[error("Server error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to serialize request: {0}")]
    Encode(String),
    /// The backend answered `success: false`
    #[error("{0}")]
    Rejected(String),
}

impl GatewayError {
    /// Backend-supplied explanation, if the backend gave one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected(message) | GatewayError::Http { message, .. } => {
                Some(message.as_str()).filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("Unknown customer: {0}")]
    UnknownCustomer(String),
    #[error("{}", .0.first_message().unwrap_or_default())]
    Validation(LedgerFormValidation),
    #[error("{}", .0.message())]
    CustomerForm(CustomerValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Mutation {id} is already {state}")]
    InvalidTransition { id: MutationId, state: &'static str },
    #[error("Unknown mutation: {0}")]
    UnknownMutation(MutationId),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Failed to persist session: {0}")]
    Storage(String),
    /// Stored session data could not be read back
    #[error("Stored session is unreadable: {0}")]
    Corrupt(String),
}
