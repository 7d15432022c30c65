use shared::validation::CURRENCY_SYMBOL;
use shared::PurchaseForm;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_ledger::PurchaseSubmission;

#[derive(Properties, PartialEq)]
pub struct AddPurchaseFormProps {
    pub user_id: String,
    /// A mutation for this customer is in flight
    pub submitting: bool,
    pub on_submit: Callback<PurchaseSubmission>,
}

#[function_component(AddPurchaseForm)]
pub fn add_purchase_form(props: &AddPurchaseFormProps) -> Html {
    let product_details = use_state(String::new);
    let total_price = use_state(String::new);

    let on_details_change = {
        let product_details = product_details.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            product_details.set(input.value());
        })
    };

    let on_price_change = {
        let total_price = total_price.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            total_price.set(input.value());
        })
    };

    let on_submit = {
        let product_details = product_details.clone();
        let total_price = total_price.clone();
        let user_id = props.user_id.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let reset = {
                let product_details = product_details.clone();
                let total_price = total_price.clone();
                Callback::from(move |_| {
                    product_details.set(String::new());
                    total_price.set(String::new());
                })
            };

            on_submit.emit(PurchaseSubmission {
                user_id: user_id.clone(),
                form: PurchaseForm::new((*product_details).clone(), (*total_price).clone()),
                on_confirmed: reset,
            });
        })
    };

    html! {
        <section class="ledger-form purchase-form">
            <h3>{"Add Money"}</h3>
            <form onsubmit={on_submit}>
                <div class="form-group">
                    <label for="product-details">{"Product details"}</label>
                    <input
                        type="text"
                        id="product-details"
                        placeholder="Rice 5kg, oil 1L..."
                        value={(*product_details).clone()}
                        onchange={on_details_change}
                        disabled={props.submitting}
                    />
                </div>

                <div class="form-group">
                    <label for="total-price">{format!("Total price ({})", CURRENCY_SYMBOL)}</label>
                    <input
                        type="text"
                        id="total-price"
                        inputmode="decimal"
                        placeholder="250"
                        value={(*total_price).clone()}
                        onchange={on_price_change}
                        disabled={props.submitting}
                    />
                </div>

                <button type="submit" class="btn btn-primary" disabled={props.submitting}>
                    {if props.submitting { "Saving..." } else { "Add Money" }}
                </button>
            </form>
        </section>
    }
}
