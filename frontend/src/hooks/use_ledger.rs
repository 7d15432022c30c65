use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use shared::{PaymentForm, PurchaseForm};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::error::LedgerError;
use crate::ledger::{LedgerGateway, LedgerViewController, MutationTicket};
use crate::services::api::ApiClient;

/// A purchase entered on the detail screen. `on_confirmed` fires once the backend
/// accepted it, so the form can reset.
#[derive(Clone, PartialEq)]
pub struct PurchaseSubmission {
    pub user_id: String,
    pub form: PurchaseForm,
    pub on_confirmed: Callback<()>,
}

#[derive(Clone, PartialEq)]
pub struct PaymentSubmission {
    pub user_id: String,
    pub form: PaymentForm,
    pub on_confirmed: Callback<()>,
}

#[derive(Clone, PartialEq)]
pub struct UseLedgerActions {
    pub refresh: Callback<()>,
    pub search: Callback<String>,
    /// Fetch one customer by document id
    pub load_customer: Callback<String>,
    pub add_purchase: Callback<PurchaseSubmission>,
    pub add_payment: Callback<PaymentSubmission>,
    /// Clears take the document id
    pub clear_purchases: Callback<String>,
    pub clear_payments: Callback<String>,
    /// Delete by document id
    pub delete_customer: Callback<String>,
    pub dismiss_messages: Callback<()>,
}

pub struct UseLedgerResult {
    /// Snapshot of the controller for this render
    pub state: LedgerViewController,
    pub actions: UseLedgerActions,
}

/// Everything the async tasks need to reach the shared controller.
#[derive(Clone)]
struct LedgerHandle {
    controller: Rc<RefCell<LedgerViewController>>,
    api_client: ApiClient,
    update: UseForceUpdateHandle,
    success_message_ms: u32,
}

impl LedgerHandle {
    fn refresh(&self) {
        let ticket = self.controller.borrow_mut().begin_load();
        self.update.force_update();

        let handle = self.clone();
        spawn_local(async move {
            let result = ticket.dispatch(&handle.api_client).await;
            let _ = handle.controller.borrow_mut().finish_list(&ticket, result);
            handle.update.force_update();
        });
    }

    fn search(&self, query: String) {
        let ticket = self.controller.borrow_mut().begin_search(&query);
        self.update.force_update();
        let Some(ticket) = ticket else {
            return;
        };

        let handle = self.clone();
        spawn_local(async move {
            let result = ticket.dispatch(&handle.api_client).await;
            let _ = handle.controller.borrow_mut().finish_list(&ticket, result);
            handle.update.force_update();
        });
    }

    fn load_customer(&self, id: String) {
        self.controller.borrow_mut().begin_customer_load();
        self.update.force_update();

        let handle = self.clone();
        spawn_local(async move {
            let result = handle.api_client.fetch_customer(&id).await;
            let _ = handle.controller.borrow_mut().finish_customer(result);
            handle.update.force_update();
        });
    }

    /// Start a mutation with `begin`, send it, and settle it when the backend answers.
    fn mutate<F>(&self, begin: F, on_confirmed: Option<Callback<()>>)
    where
        F: FnOnce(&mut LedgerViewController) -> Result<MutationTicket, LedgerError>,
    {
        let started = begin(&mut self.controller.borrow_mut());
        self.update.force_update();
        let Ok(ticket) = started else {
            return;
        };

        let handle = self.clone();
        spawn_local(async move {
            let result = ticket.request.dispatch(&handle.api_client).await;
            let settled = handle.controller.borrow_mut().resolve(ticket.id, result);
            handle.update.force_update();

            if settled.is_err() {
                return;
            }
            if let Some(on_confirmed) = on_confirmed {
                on_confirmed.emit(());
            }

            let message = ticket.request.kind().success_message();
            TimeoutFuture::new(handle.success_message_ms).await;
            {
                let mut controller = handle.controller.borrow_mut();
                controller.expire_success(message);
                controller.clear_settled();
            }
            handle.update.force_update();
        });
    }
}

#[hook]
pub fn use_ledger(api_client: &ApiClient, success_message_ms: u32) -> UseLedgerResult {
    let controller = use_mut_ref(LedgerViewController::new);
    let update = use_force_update();

    let handle = LedgerHandle {
        controller: controller.clone(),
        api_client: api_client.clone(),
        update,
        success_message_ms,
    };

    let refresh = {
        let handle = handle.clone();
        use_callback((), move |_: (), _| handle.refresh())
    };

    let search = {
        let handle = handle.clone();
        use_callback((), move |query: String, _| handle.search(query))
    };

    let load_customer = {
        let handle = handle.clone();
        use_callback((), move |id: String, _| handle.load_customer(id))
    };

    let add_purchase = {
        let handle = handle.clone();
        use_callback((), move |submission: PurchaseSubmission, _| {
            let PurchaseSubmission {
                user_id,
                form,
                on_confirmed,
            } = submission;
            handle.mutate(
                move |controller| controller.begin_purchase(&user_id, &form),
                Some(on_confirmed),
            );
        })
    };

    let add_payment = {
        let handle = handle.clone();
        use_callback((), move |submission: PaymentSubmission, _| {
            let PaymentSubmission {
                user_id,
                form,
                on_confirmed,
            } = submission;
            handle.mutate(
                move |controller| controller.begin_payment(&user_id, &form),
                Some(on_confirmed),
            );
        })
    };

    let clear_purchases = {
        let handle = handle.clone();
        use_callback((), move |id: String, _| {
            handle.mutate(move |controller| controller.begin_clear_purchases(&id), None);
        })
    };

    let clear_payments = {
        let handle = handle.clone();
        use_callback((), move |id: String, _| {
            handle.mutate(move |controller| controller.begin_clear_payments(&id), None);
        })
    };

    let delete_customer = {
        let handle = handle.clone();
        use_callback((), move |id: String, _| {
            handle.mutate(move |controller| controller.begin_delete(&id), None);
        })
    };

    let dismiss_messages = {
        let handle = handle.clone();
        use_callback((), move |_: (), _| {
            handle.controller.borrow_mut().dismiss_messages();
            handle.update.force_update();
        })
    };

    // initial load
    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let state = controller.borrow().clone();

    UseLedgerResult {
        state,
        actions: UseLedgerActions {
            refresh,
            search,
            load_customer,
            add_purchase,
            add_payment,
            clear_purchases,
            clear_payments,
            delete_customer,
            dismiss_messages,
        },
    }
}
