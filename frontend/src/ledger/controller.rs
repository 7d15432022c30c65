use log::{debug, info, warn};
use shared::{
    sort_by_outstanding_balance, validate_payment_form, validate_purchase_form,
    AppendPaymentRequest, AppendPurchaseRequest, Customer, LedgerFormValidation, PaymentForm,
    PurchaseForm,
};

use super::mutation::{
    MutationId, MutationOutcome, MutationRequest, MutationTicket, PendingMutation,
};
use super::LedgerGateway;
use crate::error::{GatewayError, LedgerError};

const LOG_TARGET: &str = "ledger-view";

const LIST_FAILURE: &str = "Error fetching users. Please try again later.";
const DETAIL_FAILURE: &str = "Failed to fetch user data";

/// Which list the view asked the backend for
#[derive(Debug, Clone, PartialEq)]
pub enum ListRequest {
    All,
    Search(String),
}

/// Handle for a list fetch. Only the most recent ticket may update the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListTicket {
    generation: u64,
    pub request: ListRequest,
}

impl ListTicket {
    pub async fn dispatch<G>(&self, gateway: &G) -> Result<Vec<Customer>, GatewayError>
    where
        G: LedgerGateway + ?Sized,
    {
        match &self.request {
            ListRequest::All => gateway.fetch_customers().await,
            ListRequest::Search(query) => gateway.search_customers(query).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// Full list replaced
    Loaded(usize),
    /// Empty search box: list emptied locally, nothing was requested
    NoQuery,
    Matches(usize),
    /// The query reached the backend and matched nothing
    NoMatches,
    /// A newer list request superseded this one; result dropped
    Discarded,
}

/// In-memory customer ledgers for the admin views.
///
/// The list is always ordered by outstanding balance, largest first, with ties in the
/// order the backend returned them. Confirmed mutations are applied locally; nothing is
/// re-fetched unless the view asks for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerViewController {
    customers: Vec<Customer>,
    query: String,
    loading: bool,
    /// A single-customer fetch is in flight; independent of list loading
    detail_loading: bool,
    error: Option<String>,
    success: Option<String>,
    last_outcome: Option<ListOutcome>,
    list_generation: u64,
    mutations: Vec<PendingMutation>,
}

impl LedgerViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let mut controller = Self::default();
        controller.replace_customers(customers);
        controller
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Customer by `userId`
    pub fn customer(&self, user_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.user_id == user_id)
    }

    /// Customer by backend document id
    pub fn customer_by_id(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_detail_loading(&self) -> bool {
        self.detail_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn last_outcome(&self) -> Option<ListOutcome> {
        self.last_outcome
    }

    pub fn dismiss_messages(&mut self) {
        self.error = None;
        self.success = None;
    }

    /// Hide the success banner if it still shows `message`.
    pub fn expire_success(&mut self, message: &str) {
        if self.success.as_deref() == Some(message) {
            self.success = None;
        }
    }

    pub fn mutations(&self) -> &[PendingMutation] {
        &self.mutations
    }

    pub fn mutation(&self, id: MutationId) -> Option<&PendingMutation> {
        self.mutations.iter().find(|m| m.id == id)
    }

    /// Mutations still waiting on the backend for one customer key.
    pub fn pending_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a PendingMutation> + 'a {
        self.mutations
            .iter()
            .filter(move |m| m.is_pending() && m.request.customer_key() == key)
    }

    pub fn has_pending(&self, key: &str) -> bool {
        self.pending_for(key).next().is_some()
    }

    /// Forget confirmed and rejected mutations.
    pub fn clear_settled(&mut self) {
        self.mutations.retain(PendingMutation::is_pending);
    }

    fn replace_customers(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
        sort_by_outstanding_balance(&mut self.customers);
    }

    fn require_customer(&self, user_id: &str) -> Result<(), LedgerError> {
        if self.customer(user_id).is_some() {
            Ok(())
        } else {
            Err(LedgerError::UnknownCustomer(user_id.to_string()))
        }
    }

    fn require_document(&self, id: &str) -> Result<(), LedgerError> {
        if self.customer_by_id(id).is_some() {
            Ok(())
        } else {
            Err(LedgerError::UnknownCustomer(id.to_string()))
        }
    }

    fn next_list_ticket(&mut self, request: ListRequest) -> ListTicket {
        self.list_generation += 1;
        ListTicket {
            generation: self.list_generation,
            request,
        }
    }

    // ---- list loading -------------------------------------------------------------

    /// Start a full reload.
    pub fn begin_load(&mut self) -> ListTicket {
        self.query.clear();
        self.loading = true;
        self.error = None;
        self.next_list_ticket(ListRequest::All)
    }

    /// Start a search. Returns `None` for an empty query: the list is emptied locally
    /// and there is nothing to send.
    pub fn begin_search(&mut self, query: &str) -> Option<ListTicket> {
        let trimmed = query.trim();
        self.query = trimmed.to_string();
        self.error = None;

        if trimmed.is_empty() {
            // still bump the generation so an in-flight response cannot refill the list
            self.next_list_ticket(ListRequest::Search(String::new()));
            self.customers.clear();
            self.loading = false;
            self.last_outcome = Some(ListOutcome::NoQuery);
            return None;
        }

        self.loading = true;
        Some(self.next_list_ticket(ListRequest::Search(trimmed.to_string())))
    }

    /// Apply the result of a list fetch started with [`begin_load`](Self::begin_load)
    /// or [`begin_search`](Self::begin_search).
    pub fn finish_list(
        &mut self,
        ticket: &ListTicket,
        result: Result<Vec<Customer>, GatewayError>,
    ) -> Result<ListOutcome, LedgerError> {
        if ticket.generation != self.list_generation {
            debug!(target: LOG_TARGET, "dropping superseded list response {:?}", ticket.request);
            return Ok(ListOutcome::Discarded);
        }
        self.loading = false;

        let customers = match result {
            Ok(customers) => customers,
            Err(error) => {
                warn!(target: LOG_TARGET, "list request {:?} failed: {}", ticket.request, error);
                self.error = Some(LIST_FAILURE.to_string());
                return Err(error.into());
            }
        };

        let outcome = match &ticket.request {
            ListRequest::All => ListOutcome::Loaded(customers.len()),
            ListRequest::Search(_) if customers.is_empty() => ListOutcome::NoMatches,
            ListRequest::Search(_) => ListOutcome::Matches(customers.len()),
        };
        info!(target: LOG_TARGET, "{:?} -> {:?}", ticket.request, outcome);

        self.replace_customers(customers);
        self.last_outcome = Some(outcome);
        Ok(outcome)
    }

    pub async fn load_all<G>(&mut self, gateway: &G) -> Result<ListOutcome, LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        let ticket = self.begin_load();
        let result = ticket.dispatch(gateway).await;
        self.finish_list(&ticket, result)
    }

    pub async fn search<G>(&mut self, gateway: &G, query: &str) -> Result<ListOutcome, LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        let Some(ticket) = self.begin_search(query) else {
            return Ok(ListOutcome::NoQuery);
        };
        let result = ticket.dispatch(gateway).await;
        self.finish_list(&ticket, result)
    }

    // ---- single customer ----------------------------------------------------------

    pub fn begin_customer_load(&mut self) {
        self.detail_loading = true;
        self.error = None;
    }

    /// Insert or replace one freshly fetched customer.
    pub fn finish_customer(&mut self, result: Result<Customer, GatewayError>) -> Result<(), LedgerError> {
        self.detail_loading = false;
        let customer = match result {
            Ok(customer) => customer,
            Err(error) => {
                warn!(target: LOG_TARGET, "customer fetch failed: {}", error);
                self.error = Some(error.backend_message().unwrap_or(DETAIL_FAILURE).to_string());
                return Err(error.into());
            }
        };

        match self.customers.iter_mut().find(|c| c.id == customer.id) {
            Some(existing) => *existing = customer,
            None => self.customers.push(customer),
        }
        sort_by_outstanding_balance(&mut self.customers);
        Ok(())
    }

    pub async fn load_customer<G>(&mut self, gateway: &G, id: &str) -> Result<(), LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        self.begin_customer_load();
        let result = gateway.fetch_customer(id).await;
        self.finish_customer(result)
    }

    // ---- mutations ----------------------------------------------------------------

    fn enqueue(&mut self, request: MutationRequest) -> MutationTicket {
        let mutation = PendingMutation::new(request.clone());
        let ticket = MutationTicket {
            id: mutation.id,
            request,
        };
        debug!(target: LOG_TARGET, "mutation {} {:?} pending", ticket.id, ticket.request.kind());
        self.mutations.push(mutation);
        self.error = None;
        self.success = None;
        ticket
    }

    fn reject_form(&mut self, validation: LedgerFormValidation) -> LedgerError {
        self.error = validation.first_message();
        LedgerError::Validation(validation)
    }

    /// Validate a purchase form and record it as pending.
    pub fn begin_purchase(&mut self, user_id: &str, form: &PurchaseForm) -> Result<MutationTicket, LedgerError> {
        self.require_customer(user_id)?;
        let validation = validate_purchase_form(form);
        let total_price = match validation.cleaned_amount {
            Some(amount) if validation.is_valid => amount,
            _ => return Err(self.reject_form(validation)),
        };

        Ok(self.enqueue(MutationRequest::AppendPurchase(AppendPurchaseRequest {
            user_id: user_id.to_string(),
            product_details: form.product_details.trim().to_string(),
            total_price,
        })))
    }

    /// Validate a payment form and record it as pending.
    pub fn begin_payment(&mut self, user_id: &str, form: &PaymentForm) -> Result<MutationTicket, LedgerError> {
        self.require_customer(user_id)?;
        let validation = validate_payment_form(form);
        let amount = match validation.cleaned_amount {
            Some(amount) if validation.is_valid => amount,
            _ => return Err(self.reject_form(validation)),
        };

        Ok(self.enqueue(MutationRequest::AppendPayment(AppendPaymentRequest {
            user_id: user_id.to_string(),
            amount,
        })))
    }

    /// Start clearing purchases for the customer with document id `id`.
    pub fn begin_clear_purchases(&mut self, id: &str) -> Result<MutationTicket, LedgerError> {
        self.require_document(id)?;
        Ok(self.enqueue(MutationRequest::ClearPurchases { id: id.to_string() }))
    }

    /// Start clearing payments for the customer with document id `id`.
    pub fn begin_clear_payments(&mut self, id: &str) -> Result<MutationTicket, LedgerError> {
        self.require_document(id)?;
        Ok(self.enqueue(MutationRequest::ClearPayments { id: id.to_string() }))
    }

    /// Start deleting a customer by document id.
    pub fn begin_delete(&mut self, id: &str) -> Result<MutationTicket, LedgerError> {
        self.require_document(id)?;
        Ok(self.enqueue(MutationRequest::DeleteCustomer { id: id.to_string() }))
    }

    /// Settle a pending mutation with the backend's answer.
    ///
    /// On success the outcome is applied to the local list and the list re-sorted. On
    /// failure the mutation is rejected, the message surfaced, and the list left alone.
    pub fn resolve(
        &mut self,
        id: MutationId,
        result: Result<MutationOutcome, GatewayError>,
    ) -> Result<(), LedgerError> {
        let index = self
            .mutations
            .iter()
            .position(|m| m.id == id)
            .ok_or(LedgerError::UnknownMutation(id))?;
        let kind = self.mutations[index].kind();

        match result {
            Ok(outcome) => {
                self.mutations[index].confirm()?;
                let key = self.mutations[index].request.customer_key().to_string();
                self.apply(&key, outcome);
                self.success = Some(kind.success_message().to_string());
                info!(target: LOG_TARGET, "mutation {} {:?} confirmed for {}", id, kind, key);
                Ok(())
            }
            Err(error) => {
                let message = error
                    .backend_message()
                    .unwrap_or(kind.failure_message())
                    .to_string();
                self.mutations[index].reject(message.clone())?;
                warn!(target: LOG_TARGET, "mutation {} {:?} rejected: {}", id, kind, error);
                self.error = Some(message);
                Err(error.into())
            }
        }
    }

    fn apply(&mut self, key: &str, outcome: MutationOutcome) {
        match outcome {
            MutationOutcome::CustomerDeleted => {
                self.customers.retain(|c| c.id != key);
                return;
            }
            outcome => {
                let found = match &outcome {
                    MutationOutcome::PurchaseAppended(_) | MutationOutcome::PaymentAppended(_) => {
                        self.customers.iter_mut().find(|c| c.user_id == key)
                    }
                    _ => self.customers.iter_mut().find(|c| c.id == key),
                };
                let Some(customer) = found else {
                    debug!(target: LOG_TARGET, "customer {} no longer listed; nothing to apply", key);
                    return;
                };
                match outcome {
                    MutationOutcome::PurchaseAppended(record) => customer.purchases.push(record),
                    MutationOutcome::PaymentAppended(record) => customer.payments.push(record),
                    MutationOutcome::PurchasesCleared => customer.purchases.clear(),
                    MutationOutcome::PaymentsCleared => customer.payments.clear(),
                    MutationOutcome::CustomerDeleted => {}
                }
            }
        }
        sort_by_outstanding_balance(&mut self.customers);
    }

    /// Dispatch a started mutation and settle it.
    pub async fn submit<G>(&mut self, gateway: &G, ticket: MutationTicket) -> Result<MutationId, LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        let result = ticket.request.dispatch(gateway).await;
        self.resolve(ticket.id, result)?;
        Ok(ticket.id)
    }

    pub async fn add_purchase<G>(
        &mut self,
        gateway: &G,
        user_id: &str,
        form: &PurchaseForm,
    ) -> Result<MutationId, LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        let ticket = self.begin_purchase(user_id, form)?;
        self.submit(gateway, ticket).await
    }

    pub async fn add_payment<G>(
        &mut self,
        gateway: &G,
        user_id: &str,
        form: &PaymentForm,
    ) -> Result<MutationId, LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        let ticket = self.begin_payment(user_id, form)?;
        self.submit(gateway, ticket).await
    }

    pub async fn clear_purchases<G>(&mut self, gateway: &G, id: &str) -> Result<MutationId, LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        let ticket = self.begin_clear_purchases(id)?;
        self.submit(gateway, ticket).await
    }

    pub async fn clear_payments<G>(&mut self, gateway: &G, id: &str) -> Result<MutationId, LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        let ticket = self.begin_clear_payments(id)?;
        self.submit(gateway, ticket).await
    }

    pub async fn delete_customer<G>(&mut self, gateway: &G, id: &str) -> Result<MutationId, LedgerError>
    where
        G: LedgerGateway + ?Sized,
    {
        let ticket = self.begin_delete(id)?;
        self.submit(gateway, ticket).await
    }
}
