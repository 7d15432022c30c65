use shared::{format_due_amount, Customer};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CustomerCardProps {
    pub customer: Customer,
    /// A mutation for this customer is still waiting on the backend
    pub busy: bool,
    pub on_select: Callback<String>,
    pub on_delete: Callback<String>,
}

#[function_component(CustomerCard)]
pub fn customer_card(props: &CustomerCardProps) -> Html {
    let customer = &props.customer;
    let due = customer.outstanding_balance();

    let on_select = {
        let on_select = props.on_select.clone();
        let id = customer.id.clone();
        Callback::from(move |_: MouseEvent| on_select.emit(id.clone()))
    };

    let on_delete = {
        let on_delete = props.on_delete.clone();
        let id = customer.id.clone();
        let name = customer.name.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            if gloo::dialogs::confirm(&format!("Delete {} and their whole ledger?", name)) {
                on_delete.emit(id.clone());
            }
        })
    };

    html! {
        <div class={classes!("customer-card", props.busy.then_some("busy"))} onclick={on_select}>
            <div class="customer-info">
                <h3 class="customer-name">{&customer.name}</h3>
                <p class="customer-meta">{format!("ID: {}", customer.user_id)}</p>
                <p class="customer-meta">{format!("Phone: {}", customer.phone)}</p>
            </div>
            <div class={classes!("customer-due", (due > 0.0).then_some("has-due"))}>
                <span class="due-label">{"Due:"}</span>
                <span class="due-amount">{format_due_amount(due)}</span>
            </div>
            <button
                class="btn btn-danger delete-btn"
                onclick={on_delete}
                disabled={props.busy}
            >
                {"Delete"}
            </button>
        </div>
    }
}
