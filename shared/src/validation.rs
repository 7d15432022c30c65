//! Input validation for the "add money" (purchase), "pay money" (payment) and
//! "add user" forms.
//!
//! Validation happens before anything is sent to the backend, so a form that fails
//! here never turns into a pending mutation.

use serde::{Deserialize, Serialize};

use crate::AddCustomerRequest;

/// Currency symbol admins sometimes type into the amount box.
pub const CURRENCY_SYMBOL: &str = "৳";

/// Raw purchase form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseForm {
    pub product_details: String,
    pub total_price: String,
}

impl PurchaseForm {
    pub fn new(product_details: impl Into<String>, total_price: impl Into<String>) -> Self {
        Self {
            product_details: product_details.into(),
            total_price: total_price.into(),
        }
    }
}

/// Raw payment form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentForm {
    pub amount: String,
}

impl PaymentForm {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
        }
    }
}

/// Outcome of validating one ledger form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerFormValidation {
    pub is_valid: bool,
    pub errors: Vec<LedgerValidationError>,
    pub cleaned_amount: Option<f64>,
}

impl LedgerFormValidation {
    /// First error rendered for display, if any.
    pub fn first_message(&self) -> Option<String> {
        self.errors.first().map(|error| error.message())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LedgerValidationError {
    EmptyDescription,
    EmptyAmount,
    InvalidAmountFormat(String),
    NegativeAmount,
}

impl LedgerValidationError {
    pub fn message(&self) -> String {
        match self {
            LedgerValidationError::EmptyDescription => "Product details are required".to_string(),
            LedgerValidationError::EmptyAmount => "Amount is required".to_string(),
            LedgerValidationError::InvalidAmountFormat(input) => {
                format!("'{}' is not a valid amount", input)
            }
            LedgerValidationError::NegativeAmount => "Amount cannot be negative".to_string(),
        }
    }
}

/// Strip currency symbol, thousands separators and spaces, then parse.
pub fn clean_and_parse_amount(amount_input: &str) -> Result<f64, String> {
    let cleaned = amount_input
        .trim()
        .replace(CURRENCY_SYMBOL, "")
        .replace(',', "")
        .replace(' ', "");

    if cleaned.is_empty() {
        return Err("Empty amount after cleaning".to_string());
    }

    cleaned
        .parse::<f64>()
        .map_err(|e| format!("Invalid number format: {}", e))
}

fn validate_amount(amount_input: &str, errors: &mut Vec<LedgerValidationError>) -> Option<f64> {
    if amount_input.trim().is_empty() {
        errors.push(LedgerValidationError::EmptyAmount);
        return None;
    }

    match clean_and_parse_amount(amount_input) {
        Ok(amount) if !amount.is_finite() => {
            errors.push(LedgerValidationError::InvalidAmountFormat(
                amount_input.trim().to_string(),
            ));
            None
        }
        Ok(amount) if amount < 0.0 => {
            errors.push(LedgerValidationError::NegativeAmount);
            None
        }
        Ok(amount) => Some(amount),
        Err(_) => {
            errors.push(LedgerValidationError::InvalidAmountFormat(
                amount_input.trim().to_string(),
            ));
            None
        }
    }
}

pub fn validate_purchase_form(form: &PurchaseForm) -> LedgerFormValidation {
    let mut errors = Vec::new();

    if form.product_details.trim().is_empty() {
        errors.push(LedgerValidationError::EmptyDescription);
    }
    let cleaned_amount = validate_amount(&form.total_price, &mut errors);

    LedgerFormValidation {
        is_valid: errors.is_empty(),
        cleaned_amount: if errors.is_empty() { cleaned_amount } else { None },
        errors,
    }
}

pub fn validate_payment_form(form: &PaymentForm) -> LedgerFormValidation {
    let mut errors = Vec::new();
    let cleaned_amount = validate_amount(&form.amount, &mut errors);

    LedgerFormValidation {
        is_valid: errors.is_empty(),
        cleaned_amount,
        errors,
    }
}

/// Raw "add user" form input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerForm {
    pub name: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CustomerValidationError {
    MissingFields,
    InvalidPhone,
}

impl CustomerValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            CustomerValidationError::MissingFields => "All fields are required.",
            CustomerValidationError::InvalidPhone => {
                "Phone number must be 11 digits long and start with 01."
            }
        }
    }
}

/// Local mobile numbers: `01` followed by nine digits.
fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 11 && phone.starts_with("01") && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Check a new-customer form and build the request the backend expects.
pub fn validate_customer_form(form: &CustomerForm) -> Result<AddCustomerRequest, CustomerValidationError> {
    let name = form.name.trim();
    let phone = form.phone.trim();
    if name.is_empty() || phone.is_empty() || form.password.is_empty() {
        return Err(CustomerValidationError::MissingFields);
    }
    if !is_valid_phone(phone) {
        return Err(CustomerValidationError::InvalidPhone);
    }

    Ok(AddCustomerRequest {
        name: name.to_string(),
        phone: phone.to_string(),
        password: form.password.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_purchase_form() {
        let result = validate_purchase_form(&PurchaseForm::new("milk", "5"));
        assert!(result.is_valid);
        assert_eq!(result.cleaned_amount, Some(5.0));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_purchase_form_cleans_currency_input() {
        let result = validate_purchase_form(&PurchaseForm::new("rice", " ৳1,250.50 "));
        assert_eq!(result.cleaned_amount, Some(1250.5));
    }

    #[test]
    fn test_purchase_form_requires_description() {
        let result = validate_purchase_form(&PurchaseForm::new("   ", "5"));
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![LedgerValidationError::EmptyDescription]);
        assert_eq!(result.cleaned_amount, None);
    }

    #[test]
    fn test_purchase_form_reports_every_problem() {
        let result = validate_purchase_form(&PurchaseForm::new("", ""));
        assert_eq!(
            result.errors,
            vec![
                LedgerValidationError::EmptyDescription,
                LedgerValidationError::EmptyAmount
            ]
        );
        assert_eq!(result.first_message().as_deref(), Some("Product details are required"));
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let result = validate_payment_form(&PaymentForm::new("0"));
        assert!(result.is_valid);
        assert_eq!(result.cleaned_amount, Some(0.0));
    }

    #[test]
    fn test_payment_form_rejects_bad_amounts() {
        let negative = validate_payment_form(&PaymentForm::new("-10"));
        assert_eq!(negative.errors, vec![LedgerValidationError::NegativeAmount]);

        let garbage = validate_payment_form(&PaymentForm::new("ten"));
        assert_eq!(
            garbage.errors,
            vec![LedgerValidationError::InvalidAmountFormat("ten".to_string())]
        );

        let infinite = validate_payment_form(&PaymentForm::new("inf"));
        assert!(!infinite.is_valid);
    }

    fn customer_form(name: &str, phone: &str, password: &str) -> CustomerForm {
        CustomerForm {
            name: name.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_customer_form_builds_request() {
        let request = validate_customer_form(&customer_form(" Rahim ", "01712345678", "secret")).unwrap();
        assert_eq!(request.name, "Rahim");
        assert_eq!(request.phone, "01712345678");
        assert_eq!(request.password, "secret");
    }

    #[test]
    fn test_customer_form_requires_every_field() {
        for form in [
            customer_form("", "01712345678", "secret"),
            customer_form("Rahim", "  ", "secret"),
            customer_form("Rahim", "01712345678", ""),
        ] {
            assert_eq!(
                validate_customer_form(&form),
                Err(CustomerValidationError::MissingFields)
            );
        }
        assert_eq!(
            CustomerValidationError::MissingFields.message(),
            "All fields are required."
        );
    }

    #[test]
    fn test_customer_form_checks_phone_pattern() {
        for phone in ["0171234567", "017123456789", "02712345678", "0171234567a", "+8801712345"] {
            assert_eq!(
                validate_customer_form(&customer_form("Rahim", phone, "secret")),
                Err(CustomerValidationError::InvalidPhone),
                "{}",
                phone
            );
        }
    }
}
