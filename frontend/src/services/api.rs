use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use gloo::net::http::{Request, RequestBuilder};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::{
    AddCustomerRequest, AddCustomerResponse, AdminIdentity, AppendPaymentRequest, AppendPurchaseRequest, ClearDetailsRequest,
    ClearDetailsResponse, Customer, CustomerListResponse, DeleteCustomerResponse, LoginRequest,
    LoginResponse, MutationResponse, PaymentRecord, PurchaseRecord,
};

use crate::config::ClientConfig;
use crate::error::GatewayError;
use crate::ledger::LedgerGateway;
use crate::session::AdminAuth;

const LOG_TARGET: &str = "api-client";

/// API client for communicating with the grocery backend
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn build(builder: RequestBuilder) -> Result<Request, GatewayError> {
    builder
        .build()
        .map_err(|e| GatewayError::Encode(e.to_string()))
}

fn with_json<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<Request, GatewayError> {
    builder
        .json(body)
        .map_err(|e| GatewayError::Encode(e.to_string()))
}

/// Send a request and decode a 2xx JSON body. Non-2xx responses become
/// [`GatewayError::Http`] carrying the backend's `message` when it sent one.
async fn exchange<T: DeserializeOwned>(request: Request, fallback: &str) -> Result<T, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = message_from_body(&body).unwrap_or_else(|| fallback.to_string());
        warn!(target: LOG_TARGET, "{} {} -> {}: {}", response.url(), status, fallback, message);
        return Err(GatewayError::Http { status, message });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Pull a `message` string out of an error body, if it is JSON and has one.
pub(crate) fn message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn rejection(message: Option<String>, fallback: &str) -> GatewayError {
    GatewayError::Rejected(
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    )
}

/// Unwrap an append response: the echoed record on success, a rejection otherwise.
pub(crate) fn accept_mutation<T>(
    response: MutationResponse<T>,
    fallback: &str,
) -> Result<Option<T>, GatewayError> {
    if response.success {
        Ok(response.record)
    } else {
        Err(rejection(response.message, fallback))
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The purchase as stored: the backend's echo if present, else what was submitted.
pub(crate) fn effective_purchase(
    request: &AppendPurchaseRequest,
    echoed: Option<PurchaseRecord>,
    now: DateTime<Utc>,
) -> PurchaseRecord {
    echoed.unwrap_or_else(|| {
        PurchaseRecord::new(
            request.product_details.clone(),
            request.total_price,
            Some(timestamp(now)),
        )
    })
}

/// The payment as stored: the backend's echo if present, else what was submitted.
pub(crate) fn effective_payment(
    request: &AppendPaymentRequest,
    echoed: Option<PaymentRecord>,
    now: DateTime<Utc>,
) -> PaymentRecord {
    echoed.unwrap_or_else(|| PaymentRecord::new(request.amount, Some(timestamp(now))))
}

/// Search responses report "nothing matched" as `success: false`.
pub(crate) fn search_results(response: CustomerListResponse) -> Vec<Customer> {
    match response.success {
        Some(false) => {
            debug!(
                target: LOG_TARGET,
                "search matched nothing: {}",
                response.message.as_deref().unwrap_or("no message")
            );
            Vec::new()
        }
        _ => response.users,
    }
}

const ADD_CUSTOMER_FAILURE: &str = "Failed to Add User. Please try again.";
const ADD_CUSTOMER_SUCCESS: &str = "User added successfully.";

/// The backend's confirmation for a new account, or its reason for refusing one.
pub(crate) fn accept_registration(response: AddCustomerResponse) -> Result<String, GatewayError> {
    if response.success {
        Ok(response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| ADD_CUSTOMER_SUCCESS.to_string()))
    } else {
        Err(rejection(response.message, ADD_CUSTOMER_FAILURE))
    }
}

#[async_trait(?Send)]
impl LedgerGateway for ApiClient {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, GatewayError> {
        let request = build(Request::get(&self.url("/users")))?;
        let response: CustomerListResponse =
            exchange(request, "Error fetching users. Please try again later.").await?;
        debug!(target: LOG_TARGET, "fetched {} customers", response.users.len());
        Ok(response.users)
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, GatewayError> {
        let request = build(Request::get(&self.url("/search-users")).query([("query", query)]))?;
        let response: CustomerListResponse =
            exchange(request, "Error fetching users. Please try again later.").await?;
        let users = search_results(response);
        debug!(target: LOG_TARGET, "search '{}' matched {} customers", query, users.len());
        Ok(users)
    }

    async fn fetch_customer(&self, id: &str) -> Result<Customer, GatewayError> {
        let request = build(Request::get(&self.url(&format!("/user/{}", id))))?;
        exchange(request, "Failed to fetch user data").await
    }

    async fn append_purchase(
        &self,
        request: &AppendPurchaseRequest,
    ) -> Result<PurchaseRecord, GatewayError> {
        let http = with_json(Request::post(&self.url("/update-user-money")), request)?;
        let response: MutationResponse<PurchaseRecord> =
            exchange(http, "Failed to update user details.").await?;
        let echoed = accept_mutation(response, "Failed to update user details.")?;
        info!(target: LOG_TARGET, "purchase recorded for {}", request.user_id);
        Ok(effective_purchase(request, echoed, Utc::now()))
    }

    async fn append_payment(
        &self,
        request: &AppendPaymentRequest,
    ) -> Result<PaymentRecord, GatewayError> {
        let http = with_json(Request::post(&self.url("/pay-user-money")), request)?;
        let response: MutationResponse<PaymentRecord> =
            exchange(http, "Failed to record payment.").await?;
        let echoed = accept_mutation(response, "Failed to record payment.")?;
        info!(target: LOG_TARGET, "payment recorded for {}", request.user_id);
        Ok(effective_payment(request, echoed, Utc::now()))
    }

    async fn clear_purchases(&self, id: &str) -> Result<(), GatewayError> {
        let body = ClearDetailsRequest {
            customer_id: id.to_string(),
        };
        let http = with_json(Request::patch(&self.url("/clearBuyDetails")), &body)?;
        let response: ClearDetailsResponse = exchange(http, "Failed to clear buy details.").await?;
        match response.success {
            Some(false) => Err(rejection(response.message, "Failed to clear buy details.")),
            _ => Ok(()),
        }
    }

    async fn clear_payments(&self, id: &str) -> Result<(), GatewayError> {
        let body = ClearDetailsRequest {
            customer_id: id.to_string(),
        };
        let http = with_json(Request::patch(&self.url("/clearPaidDetails")), &body)?;
        let response: ClearDetailsResponse = exchange(http, "Failed to clear paid details.").await?;
        match response.success {
            Some(false) => Err(rejection(response.message, "Failed to clear paid details.")),
            _ => Ok(()),
        }
    }

    async fn delete_customer(&self, id: &str) -> Result<(), GatewayError> {
        let request = build(Request::delete(&self.url(&format!("/users/{}", id))))?;
        let response: DeleteCustomerResponse =
            exchange(request, "Failed to delete the user.").await?;
        if response.success {
            Ok(())
        } else {
            Err(rejection(response.message, "Failed to delete the user."))
        }
    }

    async fn add_customer(&self, request: &AddCustomerRequest) -> Result<String, GatewayError> {
        let http = with_json(Request::post(&self.url("/add-user")), request)?;
        let response: AddCustomerResponse = exchange(http, ADD_CUSTOMER_FAILURE).await?;
        let message = accept_registration(response)?;
        info!(target: LOG_TARGET, "customer account created for {}", request.phone);
        Ok(message)
    }
}

#[async_trait(?Send)]
impl AdminAuth for ApiClient {
    async fn admin_login(&self, request: &LoginRequest) -> Result<AdminIdentity, GatewayError> {
        let http = with_json(Request::post(&self.url("/admin-login")), request)?;
        let response: LoginResponse = exchange(http, "Login failed. Please try again.").await?;
        response
            .user
            .ok_or_else(|| rejection(response.message, "Login failed. Please try again."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 3, 9, 15, 0).unwrap()
    }

    #[test]
    fn test_client_urls() {
        let client = ApiClient::from_config(&ClientConfig::with_base_url("http://localhost:5000/"));
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/users"), "http://localhost:5000/users");
    }

    #[test]
    fn test_message_from_body() {
        assert_eq!(
            message_from_body(r#"{"success":false,"message":"User not found"}"#).as_deref(),
            Some("User not found")
        );
        assert_eq!(message_from_body(r#"{"message":"  "}"#), None);
        assert_eq!(message_from_body("Internal Server Error"), None);
    }

    #[test]
    fn test_accept_mutation() {
        let ok: MutationResponse<PaymentRecord> = MutationResponse {
            success: true,
            message: None,
            record: None,
        };
        assert_eq!(accept_mutation(ok, "fallback"), Ok(None));

        let rejected: MutationResponse<PaymentRecord> = MutationResponse {
            success: false,
            message: Some("Invalid user".to_string()),
            record: None,
        };
        assert_eq!(
            accept_mutation(rejected, "fallback"),
            Err(GatewayError::Rejected("Invalid user".to_string()))
        );

        let silent: MutationResponse<PaymentRecord> = MutationResponse {
            success: false,
            message: None,
            record: None,
        };
        assert_eq!(
            accept_mutation(silent, "Failed to record payment."),
            Err(GatewayError::Rejected("Failed to record payment.".to_string()))
        );
    }

    #[test]
    fn test_effective_purchase_prefers_backend_echo() {
        let request = AppendPurchaseRequest {
            user_id: "7".to_string(),
            product_details: "milk".to_string(),
            total_price: 5.0,
        };
        let echoed = PurchaseRecord::new("milk 1L", 5.5, Some("2024-01-01T00:00:00.000Z".to_string()));

        assert_eq!(
            effective_purchase(&request, Some(echoed.clone()), fixed_now()),
            echoed
        );

        let built = effective_purchase(&request, None, fixed_now());
        assert_eq!(built.description, "milk");
        assert_eq!(built.total_price, Some(5.0));
        assert_eq!(built.date.as_deref(), Some("2024-11-03T09:15:00.000Z"));
    }

    #[test]
    fn test_effective_payment_is_stamped() {
        let request = AppendPaymentRequest {
            user_id: "7".to_string(),
            amount: 40.0,
        };
        let built = effective_payment(&request, None, fixed_now());
        assert_eq!(built.amount, Some(40.0));
        assert_eq!(built.date.as_deref(), Some("2024-11-03T09:15:00.000Z"));
    }

    #[test]
    fn test_search_results_treats_failure_as_no_match() {
        let none = CustomerListResponse {
            success: Some(false),
            users: vec![Customer::default()],
            message: None,
        };
        assert!(search_results(none).is_empty());

        let found = CustomerListResponse {
            success: Some(true),
            users: vec![Customer::default()],
            message: None,
        };
        assert_eq!(search_results(found).len(), 1);
    }

    #[test]
    fn test_accept_registration() {
        let created = AddCustomerResponse {
            success: true,
            message: Some("User added successfully".to_string()),
        };
        assert_eq!(
            accept_registration(created).as_deref(),
            Ok("User added successfully")
        );

        let quiet = AddCustomerResponse {
            success: true,
            message: None,
        };
        assert_eq!(accept_registration(quiet).as_deref(), Ok(ADD_CUSTOMER_SUCCESS));

        let duplicate = AddCustomerResponse {
            success: false,
            message: Some("Phone number already registered".to_string()),
        };
        assert_eq!(
            accept_registration(duplicate),
            Err(GatewayError::Rejected("Phone number already registered".to_string()))
        );

        let refused = AddCustomerResponse {
            success: false,
            message: Some(" ".to_string()),
        };
        assert_eq!(
            accept_registration(refused),
            Err(GatewayError::Rejected(ADD_CUSTOMER_FAILURE.to_string()))
        );
    }
}
