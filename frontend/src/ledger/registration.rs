use log::{info, warn};
use shared::{validate_customer_form, CustomerForm};

use super::LedgerGateway;
use crate::error::{GatewayError, LedgerError};

const LOG_TARGET: &str = "registration";

const SIGNUP_FAILURE: &str = "An error occurred while signing up. Please try again later.";

/// Validate the form and create the account. Returns the backend's confirmation.
///
/// Nothing is sent when the form is incomplete or the phone number is malformed.
pub async fn register_customer<G>(gateway: &G, form: &CustomerForm) -> Result<String, LedgerError>
where
    G: LedgerGateway + ?Sized,
{
    let request = validate_customer_form(form).map_err(LedgerError::CustomerForm)?;
    match gateway.add_customer(&request).await {
        Ok(message) => {
            info!(target: LOG_TARGET, "added customer {}", request.name);
            Ok(message)
        }
        Err(error) => {
            warn!(target: LOG_TARGET, "add customer failed: {}", error);
            Err(error.into())
        }
    }
}

/// Text shown under the add-user form for a failed attempt.
pub fn registration_error_message(error: &LedgerError) -> String {
    match error {
        LedgerError::CustomerForm(invalid) => invalid.message().to_string(),
        LedgerError::Gateway(GatewayError::Network(_) | GatewayError::Decode(_) | GatewayError::Encode(_)) => {
            SIGNUP_FAILURE.to_string()
        }
        LedgerError::Gateway(gateway) => gateway.backend_message().unwrap_or(SIGNUP_FAILURE).to_string(),
        other => other.to_string(),
    }
}
