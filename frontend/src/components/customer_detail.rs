use shared::{format_amount, format_due_amount, format_record_date, Customer};
use yew::prelude::*;

use super::forms::add_purchase_form::AddPurchaseForm;
use super::forms::pay_money_form::PayMoneyForm;
use crate::hooks::use_ledger::UseLedgerActions;
use crate::ledger::LedgerViewController;

#[derive(Properties, PartialEq)]
pub struct CustomerDetailProps {
    pub ledger: LedgerViewController,
    /// Backend document id
    pub customer_id: String,
    pub actions: UseLedgerActions,
    pub on_back: Callback<()>,
}

fn purchase_rows(customer: &Customer) -> Html {
    if customer.purchases.is_empty() {
        return html! { <tr><td colspan="3" class="empty-row">{"No purchases recorded."}</td></tr> };
    }
    // newest first
    customer
        .purchases
        .iter()
        .rev()
        .map(|record| {
            html! {
                <tr>
                    <td>{format_record_date(record.date.as_deref())}</td>
                    <td>{&record.description}</td>
                    <td class="amount">{format_amount(record.price())}</td>
                </tr>
            }
        })
        .collect()
}

fn payment_rows(customer: &Customer) -> Html {
    if customer.payments.is_empty() {
        return html! { <tr><td colspan="2" class="empty-row">{"No payments recorded."}</td></tr> };
    }
    customer
        .payments
        .iter()
        .rev()
        .map(|record| {
            html! {
                <tr>
                    <td>{format_record_date(record.date.as_deref())}</td>
                    <td class="amount">{format_amount(record.paid())}</td>
                </tr>
            }
        })
        .collect()
}

#[function_component(CustomerDetail)]
pub fn customer_detail(props: &CustomerDetailProps) -> Html {
    {
        let load_customer = props.actions.load_customer.clone();
        use_effect_with(props.customer_id.clone(), move |id| {
            load_customer.emit(id.clone());
            || ()
        });
    }

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    let Some(customer) = props.ledger.customer_by_id(&props.customer_id) else {
        return html! {
            <section class="customer-detail">
                <button class="btn btn-secondary" onclick={on_back}>{"← Back"}</button>
                {if props.ledger.is_detail_loading() {
                    html! { <div class="loading">{"Loading user..."}</div> }
                } else {
                    html! { <div class="empty-state">{"User not found."}</div> }
                }}
            </section>
        };
    };

    let submitting =
        props.ledger.has_pending(&customer.user_id) || props.ledger.has_pending(&customer.id);

    let on_clear_purchases = {
        let clear = props.actions.clear_purchases.clone();
        let id = customer.id.clone();
        Callback::from(move |_: MouseEvent| {
            if gloo::dialogs::confirm("Clear all buy details for this user?") {
                clear.emit(id.clone());
            }
        })
    };

    let on_clear_payments = {
        let clear = props.actions.clear_payments.clone();
        let id = customer.id.clone();
        Callback::from(move |_: MouseEvent| {
            if gloo::dialogs::confirm("Clear all paid details for this user?") {
                clear.emit(id.clone());
            }
        })
    };

    html! {
        <section class="customer-detail">
            <button class="btn btn-secondary" onclick={on_back}>{"← Back"}</button>

            <div class="customer-summary">
                <h2>{&customer.name}</h2>
                <p>{format!("ID: {}", customer.user_id)}</p>
                <p>{format!("Phone: {}", customer.phone)}</p>
                <div class="summary-figures">
                    <span>{format!("Purchased: {}", format_amount(customer.total_purchased()))}</span>
                    <span>{format!("Paid: {}", format_amount(customer.total_paid()))}</span>
                    <span class="due-amount">
                        {format!("Due: {}", format_due_amount(customer.outstanding_balance()))}
                    </span>
                </div>
            </div>

            <div class="ledger-forms">
                <AddPurchaseForm
                    user_id={customer.user_id.clone()}
                    {submitting}
                    on_submit={props.actions.add_purchase.clone()}
                />
                <PayMoneyForm
                    user_id={customer.user_id.clone()}
                    {submitting}
                    on_submit={props.actions.add_payment.clone()}
                />
            </div>

            <div class="ledger-tables">
                <div class="ledger-table">
                    <div class="ledger-table-header">
                        <h3>{"Buy Details"}</h3>
                        <button
                            class="btn btn-danger"
                            onclick={on_clear_purchases}
                            disabled={submitting || customer.purchases.is_empty()}
                        >
                            {"Clear"}
                        </button>
                    </div>
                    <table>
                        <thead>
                            <tr><th>{"Date"}</th><th>{"Product details"}</th><th>{"Total price"}</th></tr>
                        </thead>
                        <tbody>{purchase_rows(customer)}</tbody>
                    </table>
                </div>

                <div class="ledger-table">
                    <div class="ledger-table-header">
                        <h3>{"Paid Details"}</h3>
                        <button
                            class="btn btn-danger"
                            onclick={on_clear_payments}
                            disabled={submitting || customer.payments.is_empty()}
                        >
                            {"Clear"}
                        </button>
                    </div>
                    <table>
                        <thead>
                            <tr><th>{"Date"}</th><th>{"Amount"}</th></tr>
                        </thead>
                        <tbody>{payment_rows(customer)}</tbody>
                    </table>
                </div>
            </div>
        </section>
    }
}
