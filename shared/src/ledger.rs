//! Due-balance arithmetic for customer accounts.
//!
//! Every screen that shows what a customer owes goes through [`outstanding_balance`],
//! so the list view and the detail view can never disagree about how a missing or
//! malformed record is counted.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate};

use crate::{Customer, PaymentRecord, PurchaseRecord};

/// Currency suffix used on customer cards.
pub const CURRENCY_SUFFIX: &str = "টাকা";

/// Outstanding balance: everything bought minus everything paid.
///
/// Records without a usable amount contribute zero. A non-finite result is reported
/// as `0.0` so callers can always sort and display it.
pub fn outstanding_balance(purchases: &[PurchaseRecord], payments: &[PaymentRecord]) -> f64 {
    let bought: f64 = purchases.iter().map(PurchaseRecord::price).sum();
    let paid: f64 = payments.iter().map(PaymentRecord::paid).sum();
    let due = bought - paid;

    if due.is_finite() && due != 0.0 {
        due
    } else {
        0.0
    }
}

/// Compare two customers for display: larger balance first.
pub fn compare_by_balance_desc(a: &Customer, b: &Customer) -> Ordering {
    b.outstanding_balance()
        .partial_cmp(&a.outstanding_balance())
        .unwrap_or(Ordering::Equal)
}

/// Order customers by balance, largest first. Stable: equal balances keep their
/// relative input order.
pub fn sort_by_outstanding_balance(customers: &mut [Customer]) {
    customers.sort_by(compare_by_balance_desc);
}

/// Whole-unit due amount as shown on a customer card, e.g. `"60 টাকা"`.
pub fn format_due_amount(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    // avoid rendering "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.0} {}", rounded, CURRENCY_SUFFIX)
}

/// Two-decimal amount for the detail tables.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Render a record timestamp as `DD/MM/YYYY`.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. Anything else is shown
/// as-is; a missing date is shown as `-`.
pub fn format_record_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return "-".to_string();
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format("%d/%m/%Y").to_string();
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.format("%d/%m/%Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(price: f64) -> PurchaseRecord {
        PurchaseRecord::new("item", price, None)
    }

    fn payment(amount: f64) -> PaymentRecord {
        PaymentRecord::new(amount, None)
    }

    fn customer(user_id: &str, bought: f64) -> Customer {
        Customer {
            id: format!("doc-{}", user_id),
            user_id: user_id.to_string(),
            name: format!("Customer {}", user_id),
            phone: String::new(),
            purchases: vec![purchase(bought)],
            payments: Vec::new(),
        }
    }

    #[test]
    fn test_empty_collections_balance_is_zero() {
        assert_eq!(outstanding_balance(&[], &[]), 0.0);
    }

    #[test]
    fn test_purchases_minus_payments() {
        assert_eq!(outstanding_balance(&[purchase(100.0)], &[payment(40.0)]), 60.0);
        assert_eq!(
            outstanding_balance(&[purchase(10.0), purchase(2.5)], &[payment(2.5)]),
            10.0
        );
    }

    #[test]
    fn test_overpayment_goes_negative() {
        assert_eq!(outstanding_balance(&[purchase(10.0)], &[payment(25.0)]), -15.0);
    }

    #[test]
    fn test_records_without_amount_count_as_zero() {
        let malformed = PurchaseRecord {
            description: "bad".to_string(),
            total_price: None,
            date: None,
        };
        assert_eq!(outstanding_balance(&[malformed.clone()], &[]), 0.0);
        assert_eq!(outstanding_balance(&[malformed, purchase(5.0)], &[]), 5.0);
    }

    #[test]
    fn test_non_finite_amounts_never_leak() {
        let huge = PurchaseRecord {
            description: "overflow".to_string(),
            total_price: Some(f64::MAX),
            date: None,
        };
        let balance = outstanding_balance(&[huge.clone(), huge], &[]);
        assert_eq!(balance, 0.0);

        let nan = PaymentRecord {
            amount: Some(f64::NAN),
            date: None,
        };
        assert_eq!(outstanding_balance(&[purchase(3.0)], &[nan]), 3.0);
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut customers = vec![customer("a", 10.0), customer("b", 50.0), customer("c", 10.0)];
        sort_by_outstanding_balance(&mut customers);

        let order: Vec<&str> = customers.iter().map(|c| c.user_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_keeps_zero_balances_in_input_order() {
        let mut zero_paid = customer("paid", 20.0);
        zero_paid.payments.push(payment(20.0));
        let mut customers = vec![customer("empty", 0.0), zero_paid, customer("owes", 1.0)];
        sort_by_outstanding_balance(&mut customers);

        let order: Vec<&str> = customers.iter().map(|c| c.user_id.as_str()).collect();
        assert_eq!(order, vec!["owes", "empty", "paid"]);
    }

    #[test]
    fn test_format_due_amount() {
        assert_eq!(format_due_amount(60.0), "60 টাকা");
        assert_eq!(format_due_amount(59.6), "60 টাকা");
        assert_eq!(format_due_amount(-0.2), "0 টাকা");
        assert_eq!(format_due_amount(-15.0), "-15 টাকা");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(12.346), "12.35");
    }

    #[test]
    fn test_format_record_date() {
        assert_eq!(format_record_date(Some("2024-11-03T09:15:00.000Z")), "03/11/2024");
        assert_eq!(format_record_date(Some("2024-11-03")), "03/11/2024");
        assert_eq!(format_record_date(Some("yesterday")), "yesterday");
        assert_eq!(format_record_date(Some("  ")), "-");
        assert_eq!(format_record_date(None), "-");
    }
}
