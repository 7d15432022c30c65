use std::cell::RefCell;

use async_trait::async_trait;
use shared::{
    AddCustomerRequest, AppendPaymentRequest, AppendPurchaseRequest, Customer, PaymentRecord,
    PurchaseRecord,
};

use super::LedgerGateway;
use crate::error::GatewayError;

/// Customer with `doc-<user_id>` as document id and one record per amount.
pub fn customer(user_id: &str, purchases: &[f64], payments: &[f64]) -> Customer {
    Customer {
        id: format!("doc-{}", user_id),
        user_id: user_id.to_string(),
        name: format!("Customer {}", user_id),
        phone: "01700000000".to_string(),
        purchases: purchases
            .iter()
            .map(|price| PurchaseRecord::new("item", *price, None))
            .collect(),
        payments: payments
            .iter()
            .map(|amount| PaymentRecord::new(*amount, None))
            .collect(),
    }
}

/// In-memory backend. Mutations really change its store so follow-up reads agree.
#[derive(Default)]
pub struct MockGateway {
    customers: RefCell<Vec<Customer>>,
    next_failure: RefCell<Option<GatewayError>>,
    calls: RefCell<Vec<&'static str>>,
}

impl MockGateway {
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        Self {
            customers: RefCell::new(customers),
            ..Self::default()
        }
    }

    /// Make the next gateway call fail with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        *self.next_failure.borrow_mut() = Some(error);
    }

    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| **call == name).count()
    }

    fn record(&self, name: &'static str) -> Result<(), GatewayError> {
        self.calls.borrow_mut().push(name);
        match self.next_failure.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn customer_count(&self) -> usize {
        self.customers.borrow().len()
    }

    fn update<R>(
        &self,
        matches: impl Fn(&Customer) -> bool,
        f: impl FnOnce(&mut Customer) -> R,
    ) -> Result<R, GatewayError> {
        let mut customers = self.customers.borrow_mut();
        let updated = customers
            .iter_mut()
            .find(|c| matches(c))
            .map(f)
            .ok_or_else(|| GatewayError::Rejected("User not found".to_string()));
        updated
    }
}

#[async_trait(?Send)]
impl LedgerGateway for MockGateway {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, GatewayError> {
        self.record("fetch_customers")?;
        Ok(self.customers.borrow().clone())
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, GatewayError> {
        self.record("search_customers")?;
        let needle = query.to_lowercase();
        Ok(self
            .customers
            .borrow()
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.user_id.to_lowercase().contains(&needle)
                    || c.phone.contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn fetch_customer(&self, id: &str) -> Result<Customer, GatewayError> {
        self.record("fetch_customer")?;
        self.customers
            .borrow()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::Http {
                status: 404,
                message: "Failed to fetch user data".to_string(),
            })
    }

    async fn append_purchase(
        &self,
        request: &AppendPurchaseRequest,
    ) -> Result<PurchaseRecord, GatewayError> {
        self.record("append_purchase")?;
        let record = PurchaseRecord::new(
            request.product_details.clone(),
            request.total_price,
            Some("2024-11-03T09:15:00.000Z".to_string()),
        );
        self.update(|c| c.user_id == request.user_id, |c| c.purchases.push(record.clone()))?;
        Ok(record)
    }

    async fn append_payment(
        &self,
        request: &AppendPaymentRequest,
    ) -> Result<PaymentRecord, GatewayError> {
        self.record("append_payment")?;
        let record = PaymentRecord::new(request.amount, Some("2024-11-03T09:15:00.000Z".to_string()));
        self.update(|c| c.user_id == request.user_id, |c| c.payments.push(record.clone()))?;
        Ok(record)
    }

    async fn clear_purchases(&self, id: &str) -> Result<(), GatewayError> {
        self.record("clear_purchases")?;
        self.update(|c| c.id == id, |c| c.purchases.clear())
    }

    async fn clear_payments(&self, id: &str) -> Result<(), GatewayError> {
        self.record("clear_payments")?;
        self.update(|c| c.id == id, |c| c.payments.clear())
    }

    async fn add_customer(&self, request: &AddCustomerRequest) -> Result<String, GatewayError> {
        self.record("add_customer")?;
        let mut customers = self.customers.borrow_mut();
        if customers.iter().any(|c| c.phone == request.phone) {
            return Err(GatewayError::Rejected("User already exists".to_string()));
        }
        let user_id = (1000 + customers.len()).to_string();
        customers.push(Customer {
            id: format!("doc-{}", user_id),
            user_id,
            name: request.name.clone(),
            phone: request.phone.clone(),
            purchases: Vec::new(),
            payments: Vec::new(),
        });
        Ok("User added successfully".to_string())
    }

    async fn delete_customer(&self, id: &str) -> Result<(), GatewayError> {
        self.record("delete_customer")?;
        let mut customers = self.customers.borrow_mut();
        let before = customers.len();
        customers.retain(|c| c.id != id);
        if customers.len() == before {
            Err(GatewayError::Rejected("Failed to delete the user.".to_string()))
        } else {
            Ok(())
        }
    }
}
