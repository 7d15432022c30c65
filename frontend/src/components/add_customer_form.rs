use shared::CustomerForm;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::ledger::{register_customer, registration_error_message};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct AddCustomerFormProps {
    pub api_client: ApiClient,
    /// Fired after the backend created the account
    pub on_created: Callback<()>,
}

fn text_input(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

#[function_component(AddCustomerForm)]
pub fn add_customer_form(props: &AddCustomerFormProps) -> Html {
    let name = use_state(String::new);
    let phone = use_state(String::new);
    let password = use_state(String::new);
    let show_password = use_state(|| false);
    let submitting = use_state(|| false);
    let error = use_state(|| None::<String>);
    let success = use_state(|| None::<String>);

    let on_toggle_password = {
        let show_password = show_password.clone();
        Callback::from(move |_: MouseEvent| show_password.set(!*show_password))
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let on_created = props.on_created.clone();
        let name = name.clone();
        let phone = phone.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        let success = success.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let form = CustomerForm {
                name: (*name).clone(),
                phone: (*phone).clone(),
                password: (*password).clone(),
            };
            let api_client = api_client.clone();
            let on_created = on_created.clone();
            let name = name.clone();
            let phone = phone.clone();
            let password = password.clone();
            let submitting = submitting.clone();
            let error = error.clone();
            let success = success.clone();
            spawn_local(async move {
                submitting.set(true);
                error.set(None);
                success.set(None);

                match register_customer(&api_client, &form).await {
                    Ok(message) => {
                        success.set(Some(message));
                        name.set(String::new());
                        phone.set(String::new());
                        password.set(String::new());
                        on_created.emit(());
                    }
                    Err(e) => error.set(Some(registration_error_message(&e))),
                }

                submitting.set(false);
            });
        })
    };

    html! {
        <section class="add-customer-section">
            <h2>{"Add User"}</h2>

            {if let Some(error) = error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
            {if let Some(success) = success.as_ref() {
                html! { <div class="form-message success">{success}</div> }
            } else { html! {} }}

            <form class="add-customer-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="customer-name">{"Name"}</label>
                    <input
                        type="text"
                        id="customer-name"
                        value={(*name).clone()}
                        onchange={text_input(&name)}
                        disabled={*submitting}
                    />
                </div>

                <div class="form-group">
                    <label for="customer-phone">{"Phone Number"}</label>
                    <input
                        type="tel"
                        id="customer-phone"
                        placeholder="01XXXXXXXXX"
                        value={(*phone).clone()}
                        onchange={text_input(&phone)}
                        disabled={*submitting}
                    />
                </div>

                <div class="form-group">
                    <label for="customer-password">{"Password"}</label>
                    <div class="password-field">
                        <input
                            type={if *show_password { "text" } else { "password" }}
                            id="customer-password"
                            value={(*password).clone()}
                            onchange={text_input(&password)}
                            disabled={*submitting}
                        />
                        <button type="button" class="btn btn-link" onclick={on_toggle_password}>
                            {if *show_password { "Hide" } else { "Show" }}
                        </button>
                    </div>
                </div>

                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Adding user..." } else { "Add User" }}
                </button>
            </form>
        </section>
    }
}
