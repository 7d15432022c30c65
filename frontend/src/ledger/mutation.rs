//! Ledger mutations in flight.
//!
//! Each admin action that changes a ledger is tracked as a [`PendingMutation`] whose
//! state only moves forward:
//!
//! ```text
//! Pending ──confirm──▶ Confirmed
//!    └─────reject────▶ Rejected { message }
//! ```
//!
//! The local customer list is only touched when a mutation is confirmed, so a rejected
//! or still-pending mutation never shows up in a balance.

use shared::{AppendPaymentRequest, AppendPurchaseRequest, PaymentRecord, PurchaseRecord};
use uuid::Uuid;

use super::LedgerGateway;
use crate::error::{GatewayError, LedgerError};

pub type MutationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    AppendPurchase,
    AppendPayment,
    ClearPurchases,
    ClearPayments,
    DeleteCustomer,
}

impl MutationKind {
    pub fn success_message(&self) -> &'static str {
        match self {
            MutationKind::AppendPurchase => "Money details updated successfully!",
            MutationKind::AppendPayment => "Payment recorded successfully.",
            MutationKind::ClearPurchases => "Buy details cleared.",
            MutationKind::ClearPayments => "Paid details cleared.",
            MutationKind::DeleteCustomer => "User deleted.",
        }
    }

    /// Shown when the backend could not be reached or gave no explanation
    pub fn failure_message(&self) -> &'static str {
        match self {
            MutationKind::AppendPurchase => "Error updating user details. Please try again.",
            MutationKind::AppendPayment => "An error occurred. Please try again.",
            MutationKind::ClearPurchases => "Failed to clear buy details.",
            MutationKind::ClearPayments => "Failed to clear paid details.",
            MutationKind::DeleteCustomer => "An error occurred while deleting the user.",
        }
    }
}

/// What to ask the backend for
#[derive(Debug, Clone, PartialEq)]
pub enum MutationRequest {
    AppendPurchase(AppendPurchaseRequest),
    AppendPayment(AppendPaymentRequest),
    ClearPurchases { id: String },
    ClearPayments { id: String },
    DeleteCustomer { id: String },
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationRequest::AppendPurchase(_) => MutationKind::AppendPurchase,
            MutationRequest::AppendPayment(_) => MutationKind::AppendPayment,
            MutationRequest::ClearPurchases { .. } => MutationKind::ClearPurchases,
            MutationRequest::ClearPayments { .. } => MutationKind::ClearPayments,
            MutationRequest::DeleteCustomer { .. } => MutationKind::DeleteCustomer,
        }
    }

    /// Customer key the request targets: `userId` for appends, the document id for
    /// clears and deletion.
    pub fn customer_key(&self) -> &str {
        match self {
            MutationRequest::AppendPurchase(request) => &request.user_id,
            MutationRequest::AppendPayment(request) => &request.user_id,
            MutationRequest::ClearPurchases { id } => id,
            MutationRequest::ClearPayments { id } => id,
            MutationRequest::DeleteCustomer { id } => id,
        }
    }

    /// Send the request through `gateway`.
    pub async fn dispatch<G>(&self, gateway: &G) -> Result<MutationOutcome, GatewayError>
    where
        G: LedgerGateway + ?Sized,
    {
        match self {
            MutationRequest::AppendPurchase(request) => gateway
                .append_purchase(request)
                .await
                .map(MutationOutcome::PurchaseAppended),
            MutationRequest::AppendPayment(request) => gateway
                .append_payment(request)
                .await
                .map(MutationOutcome::PaymentAppended),
            MutationRequest::ClearPurchases { id } => gateway
                .clear_purchases(id)
                .await
                .map(|_| MutationOutcome::PurchasesCleared),
            MutationRequest::ClearPayments { id } => gateway
                .clear_payments(id)
                .await
                .map(|_| MutationOutcome::PaymentsCleared),
            MutationRequest::DeleteCustomer { id } => gateway
                .delete_customer(id)
                .await
                .map(|_| MutationOutcome::CustomerDeleted),
        }
    }
}

/// What the backend confirmed
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    PurchaseAppended(PurchaseRecord),
    PaymentAppended(PaymentRecord),
    PurchasesCleared,
    PaymentsCleared,
    CustomerDeleted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationState {
    Pending,
    Confirmed,
    Rejected { message: String },
}

impl MutationState {
    pub fn name(&self) -> &'static str {
        match self {
            MutationState::Pending => "pending",
            MutationState::Confirmed => "confirmed",
            MutationState::Rejected { .. } => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation {
    pub id: MutationId,
    pub request: MutationRequest,
    pub state: MutationState,
}

impl PendingMutation {
    pub fn new(request: MutationRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            state: MutationState::Pending,
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.request.kind()
    }

    pub fn is_pending(&self) -> bool {
        self.state == MutationState::Pending
    }

    pub fn confirm(&mut self) -> Result<(), LedgerError> {
        self.ensure_pending()?;
        self.state = MutationState::Confirmed;
        Ok(())
    }

    pub fn reject(&mut self, message: impl Into<String>) -> Result<(), LedgerError> {
        self.ensure_pending()?;
        self.state = MutationState::Rejected {
            message: message.into(),
        };
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), LedgerError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(LedgerError::InvalidTransition {
                id: self.id,
                state: self.state.name(),
            })
        }
    }
}

/// Handle returned when a mutation is started; carries what must be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationTicket {
    pub id: MutationId,
    pub request: MutationRequest,
}
