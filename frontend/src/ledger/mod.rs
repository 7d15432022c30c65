//! Customer ledger view state: the sorted customer list, optimistic updates and the
//! mutations waiting on the backend.

mod controller;
mod gateway;
mod mutation;
mod registration;

#[cfg(test)]
pub(crate) mod test_utils;

pub use controller::{LedgerViewController, ListOutcome, ListRequest, ListTicket};
pub use gateway::LedgerGateway;
pub use mutation::{
    MutationId, MutationKind, MutationOutcome, MutationRequest, MutationState, MutationTicket,
    PendingMutation,
};
pub use registration::{register_customer, registration_error_message};
