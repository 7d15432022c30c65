use async_trait::async_trait;
use shared::{
    AddCustomerRequest, AppendPaymentRequest, AppendPurchaseRequest, Customer, PaymentRecord,
    PurchaseRecord,
};

use crate::error::GatewayError;

/// The remote backend that owns every customer ledger.
///
/// Futures are `!Send`: in the browser everything runs on the single UI thread.
#[async_trait(?Send)]
pub trait LedgerGateway {
    /// Every customer with embedded purchases and payments.
    async fn fetch_customers(&self) -> Result<Vec<Customer>, GatewayError>;

    /// Customers matching a non-empty free-text query. An empty vec means nothing matched.
    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, GatewayError>;

    /// One customer by document id.
    async fn fetch_customer(&self, id: &str) -> Result<Customer, GatewayError>;

    /// Record a purchase; returns the record as stored.
    async fn append_purchase(
        &self,
        request: &AppendPurchaseRequest,
    ) -> Result<PurchaseRecord, GatewayError>;

    /// Record a payment; returns the record as stored.
    async fn append_payment(
        &self,
        request: &AppendPaymentRequest,
    ) -> Result<PaymentRecord, GatewayError>;

    /// Empty a customer's purchases, by document id.
    async fn clear_purchases(&self, id: &str) -> Result<(), GatewayError>;

    /// Empty a customer's payments, by document id.
    async fn clear_payments(&self, id: &str) -> Result<(), GatewayError>;

    /// Create a customer account; returns the backend's confirmation message.
    async fn add_customer(&self, request: &AddCustomerRequest) -> Result<String, GatewayError>;

    /// Remove a customer by document id.
    async fn delete_customer(&self, id: &str) -> Result<(), GatewayError>;
}
