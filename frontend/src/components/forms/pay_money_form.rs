use shared::validation::CURRENCY_SYMBOL;
use shared::PaymentForm;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_ledger::PaymentSubmission;

#[derive(Properties, PartialEq)]
pub struct PayMoneyFormProps {
    pub user_id: String,
    pub submitting: bool,
    pub on_submit: Callback<PaymentSubmission>,
}

#[function_component(PayMoneyForm)]
pub fn pay_money_form(props: &PayMoneyFormProps) -> Html {
    let amount = use_state(String::new);

    let on_amount_change = {
        let amount = amount.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            amount.set(input.value());
        })
    };

    let on_submit = {
        let amount = amount.clone();
        let user_id = props.user_id.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let reset = {
                let amount = amount.clone();
                Callback::from(move |_| amount.set(String::new()))
            };

            on_submit.emit(PaymentSubmission {
                user_id: user_id.clone(),
                form: PaymentForm::new((*amount).clone()),
                on_confirmed: reset,
            });
        })
    };

    html! {
        <section class="ledger-form payment-form">
            <h3>{"Pay Money"}</h3>
            <form onsubmit={on_submit}>
                <div class="form-group">
                    <label for="payment-amount">{format!("Amount ({})", CURRENCY_SYMBOL)}</label>
                    <input
                        type="text"
                        id="payment-amount"
                        inputmode="decimal"
                        placeholder="100"
                        value={(*amount).clone()}
                        onchange={on_amount_change}
                        disabled={props.submitting}
                    />
                </div>

                <button type="submit" class="btn btn-primary" disabled={props.submitting}>
                    {if props.submitting { "Saving..." } else { "Pay Money" }}
                </button>
            </form>
        </section>
    }
}
