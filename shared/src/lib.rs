use serde::{Deserialize, Serialize};

pub mod ledger;
pub mod lenient;
pub mod validation;

pub use ledger::{
    format_amount, format_due_amount, format_record_date, outstanding_balance,
    sort_by_outstanding_balance,
};
pub use validation::{
    validate_customer_form, validate_payment_form, validate_purchase_form, CustomerForm,
    CustomerValidationError, LedgerFormValidation, LedgerValidationError, PaymentForm,
    PurchaseForm,
};

/// A customer account as returned by the backend, with its embedded ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Backend document id, used for detail lookups, clears and deletion
    #[serde(rename = "_id", default, deserialize_with = "lenient::text")]
    pub id: String,
    /// Business id, used for every ledger mutation
    #[serde(rename = "userId", default, deserialize_with = "lenient::text")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    /// Purchases in append order ("buy details")
    #[serde(rename = "buyDetail", default, deserialize_with = "lenient::records")]
    pub purchases: Vec<PurchaseRecord>,
    /// Payments in append order ("paid details")
    #[serde(rename = "payDetail", default, deserialize_with = "lenient::records")]
    pub payments: Vec<PaymentRecord>,
}

impl Customer {
    pub fn outstanding_balance(&self) -> f64 {
        ledger::outstanding_balance(&self.purchases, &self.payments)
    }

    pub fn total_purchased(&self) -> f64 {
        self.purchases.iter().map(PurchaseRecord::price).sum()
    }

    pub fn total_paid(&self) -> f64 {
        self.payments.iter().map(PaymentRecord::paid).sum()
    }
}

/// One purchase recorded against a customer. Never edited once stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    #[serde(rename = "productDetails", default, deserialize_with = "lenient::text")]
    pub description: String,
    /// `None` when the stored value was missing or not a number
    #[serde(rename = "totalPrice", default, deserialize_with = "lenient::amount")]
    pub total_price: Option<f64>,
    /// RFC 3339 timestamp, when the backend recorded one
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

impl PurchaseRecord {
    pub fn new(description: impl Into<String>, total_price: f64, date: Option<String>) -> Self {
        Self {
            description: description.into(),
            total_price: Some(total_price),
            date,
        }
    }

    /// Price contribution to the ledger; zero for unusable values.
    pub fn price(&self) -> f64 {
        self.total_price.filter(|p| p.is_finite()).unwrap_or(0.0)
    }
}

/// One payment recorded against a customer. Never edited once stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

impl PaymentRecord {
    pub fn new(amount: f64, date: Option<String>) -> Self {
        Self {
            amount: Some(amount),
            date,
        }
    }

    /// Payment contribution to the ledger; zero for unusable values.
    pub fn paid(&self) -> f64 {
        self.amount.filter(|a| a.is_finite()).unwrap_or(0.0)
    }
}

/// Response of the full list and the search endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerListResponse {
    /// Only the search endpoint reports this; `false` means nothing matched
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "identified_customers")]
    pub users: Vec<Customer>,
    #[serde(default)]
    pub message: Option<String>,
}

/// List entries without a document id cannot be opened or deleted; drop them.
fn identified_customers<'de, D>(deserializer: D) -> Result<Vec<Customer>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let mut customers: Vec<Customer> = lenient::records(deserializer)?;
    customers.retain(|customer| !customer.id.trim().is_empty());
    Ok(customers)
}

/// Request to record a purchase ("add money")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendPurchaseRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "productDetails")]
    pub product_details: String,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
}

/// Request to record a payment ("pay money")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendPaymentRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub amount: f64,
}

/// Request body for both clear endpoints. The backend calls the field `userId` but
/// looks the customer up by document id (`_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearDetailsRequest {
    #[serde(rename = "userId")]
    pub customer_id: String,
}

/// Response of the append endpoints. `record` is the stored entry when the backend
/// echoes it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub record: Option<T>,
}

/// Response of the clear endpoints; an absent `success` counts as success
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearDetailsResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// New customer account created from the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddCustomerRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddCustomerResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteCustomerResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// The signed-in administrator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminIdentity {
    #[serde(rename = "_id", default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
}

impl AdminIdentity {
    /// Name for the header: the name, else email, else phone.
    pub fn display_name(&self) -> &str {
        [&self.name, &self.email, &self.phone]
            .into_iter()
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
            .unwrap_or("Admin")
    }
}

/// Admin login form ("email or phone" plus password)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<AdminIdentity>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_customer_from_backend() {
        let customer: Customer = serde_json::from_value(json!({
            "_id": "65a1",
            "userId": 1042,
            "name": "Rahim",
            "phone": "01700000000",
            "buyDetail": [
                {"productDetails": "rice", "totalPrice": 100, "date": "2024-11-03T09:15:00.000Z"}
            ],
            "payDetail": [
                {"amount": "40", "date": "2024-11-04T10:00:00.000Z"}
            ]
        }))
        .unwrap();

        assert_eq!(customer.id, "65a1");
        assert_eq!(customer.user_id, "1042");
        assert_eq!(customer.purchases.len(), 1);
        assert_eq!(customer.payments[0].amount, Some(40.0));
        assert_eq!(customer.outstanding_balance(), 60.0);
    }

    #[test]
    fn test_missing_and_null_collections_are_empty() {
        let missing: Customer = serde_json::from_value(json!({"_id": "1", "name": "A"})).unwrap();
        assert!(missing.purchases.is_empty());
        assert!(missing.payments.is_empty());
        assert_eq!(missing.outstanding_balance(), 0.0);

        let null: Customer = serde_json::from_value(json!({
            "_id": "2", "name": null, "buyDetail": null, "payDetail": null
        }))
        .unwrap();
        assert_eq!(null.name, "");
        assert!(null.purchases.is_empty());
    }

    #[test]
    fn test_malformed_records_are_kept_but_count_zero() {
        let customer: Customer = serde_json::from_value(json!({
            "_id": "3",
            "buyDetail": [
                {"productDetails": "bad", "totalPrice": "bad"},
                42,
                {"productDetails": "oil", "totalPrice": "12.5"}
            ],
            "payDetail": [{"date": "2024-01-01"}]
        }))
        .unwrap();

        assert_eq!(customer.purchases.len(), 3);
        assert_eq!(customer.purchases[0].total_price, None);
        assert_eq!(customer.purchases[1], PurchaseRecord::default());
        assert_eq!(customer.payments.len(), 1);
        assert_eq!(customer.outstanding_balance(), 12.5);
    }

    #[test]
    fn test_encode_requests_with_backend_field_names() {
        let purchase = AppendPurchaseRequest {
            user_id: "1042".to_string(),
            product_details: "milk".to_string(),
            total_price: 5.0,
        };
        assert_eq!(
            serde_json::to_value(&purchase).unwrap(),
            json!({"userId": "1042", "productDetails": "milk", "totalPrice": 5.0})
        );

        let clear = ClearDetailsRequest {
            customer_id: "65a1".to_string(),
        };
        assert_eq!(serde_json::to_value(&clear).unwrap(), json!({"userId": "65a1"}));

        let new_customer = AddCustomerRequest {
            name: "Rahim".to_string(),
            phone: "01712345678".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&new_customer).unwrap(),
            json!({"name": "Rahim", "phone": "01712345678", "password": "secret"})
        );
    }

    #[test]
    fn test_decode_mutation_response_without_record() {
        let response: MutationResponse<PaymentRecord> =
            serde_json::from_value(json!({"success": false, "message": "User not found"})).unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("User not found"));
        assert_eq!(response.record, None);
    }

    #[test]
    fn test_search_response_without_users() {
        let response: CustomerListResponse =
            serde_json::from_value(json!({"success": false})).unwrap();
        assert_eq!(response.success, Some(false));
        assert!(response.users.is_empty());
    }

    #[test]
    fn test_list_entries_without_document_id_are_dropped() {
        let response: CustomerListResponse = serde_json::from_value(json!({
            "users": [
                {"_id": "65a1", "userId": "1042", "name": "Rahim"},
                7,
                null,
                {"userId": "1043", "name": "No id"},
                {"_id": "65a2", "userId": "1044", "name": "Karim"}
            ]
        }))
        .unwrap();

        let ids: Vec<&str> = response.users.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["65a1", "65a2"]);
    }

    #[test]
    fn test_admin_display_name_falls_back() {
        let admin = AdminIdentity {
            id: "1".to_string(),
            name: " ".to_string(),
            email: "admin@example.com".to_string(),
            phone: String::new(),
        };
        assert_eq!(admin.display_name(), "admin@example.com");
        assert_eq!(AdminIdentity::default().display_name(), "Admin");
    }
}
