use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::customer_card::CustomerCard;
use crate::ledger::{LedgerViewController, ListOutcome};

#[derive(Properties, PartialEq)]
pub struct CustomerListProps {
    pub ledger: LedgerViewController,
    pub on_search: Callback<String>,
    pub on_refresh: Callback<()>,
    pub on_select: Callback<String>,
    pub on_delete: Callback<String>,
}

#[function_component(CustomerList)]
pub fn customer_list(props: &CustomerListProps) -> Html {
    let ledger = &props.ledger;

    let on_input = {
        let on_search = props.on_search.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_search.emit(input.value());
        })
    };

    let on_refresh = {
        let on_refresh = props.on_refresh.clone();
        Callback::from(move |_: MouseEvent| on_refresh.emit(()))
    };

    let empty_message = match ledger.last_outcome() {
        Some(ListOutcome::NoQuery) => Some("Type a name, ID or phone number to search."),
        Some(ListOutcome::NoMatches) => Some("No users found."),
        Some(ListOutcome::Loaded(0)) => Some("No users yet."),
        _ => None,
    };

    html! {
        <section class="customer-list-section">
            <div class="customer-list-toolbar">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search users..."
                    value={ledger.query().to_string()}
                    oninput={on_input}
                />
                <button class="btn btn-secondary" onclick={on_refresh} disabled={ledger.is_loading()}>
                    {"Show all"}
                </button>
            </div>

            {if ledger.is_loading() {
                html! { <div class="loading">{"Loading users..."}</div> }
            } else if ledger.customers().is_empty() {
                html! { <div class="empty-state">{empty_message.unwrap_or("No users found.")}</div> }
            } else {
                html! {
                    <div class="customer-grid">
                        {for ledger.customers().iter().map(|customer| {
                            let busy = ledger.has_pending(&customer.user_id)
                                || ledger.has_pending(&customer.id);
                            html! {
                                <CustomerCard
                                    customer={customer.clone()}
                                    {busy}
                                    on_select={props.on_select.clone()}
                                    on_delete={props.on_delete.clone()}
                                />
                            }
                        })}
                    </div>
                }
            }}
        </section>
    }
}
