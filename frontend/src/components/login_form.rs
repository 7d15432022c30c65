use log::warn;
use shared::LoginRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_session::use_session;
use crate::services::api::ApiClient;
use crate::session::{validate_login, AdminAuth};

const LOGIN_FAILURE: &str = "Login failed. Please try again.";

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub api_client: ApiClient,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let session = use_session();
    let identifier = use_state(String::new);
    let password = use_state(String::new);
    let submitting = use_state(|| false);
    let form_error = use_state(|| None::<String>);

    let on_identifier_change = {
        let identifier = identifier.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            identifier.set(input.value());
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let identifier = identifier.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let request = LoginRequest {
                identifier: identifier.trim().to_string(),
                password: (*password).clone(),
            };
            if let Some(first) = validate_login(&request).first() {
                form_error.set(Some(first.to_string()));
                return;
            }
            let Some(sign_in) = session.as_ref().map(|ctx| ctx.sign_in.clone()) else {
                form_error.set(Some(LOGIN_FAILURE.to_string()));
                return;
            };

            let api_client = api_client.clone();
            let submitting = submitting.clone();
            let form_error = form_error.clone();
            spawn_local(async move {
                submitting.set(true);
                form_error.set(None);

                match api_client.admin_login(&request).await {
                    Ok(identity) => sign_in.emit(identity),
                    Err(e) => {
                        warn!(target: "session", "login failed: {}", e);
                        form_error.set(Some(e.backend_message().unwrap_or(LOGIN_FAILURE).to_string()));
                    }
                }

                submitting.set(false);
            });
        })
    };

    html! {
        <section class="login-section">
            <h2>{"Admin Login"}</h2>

            {if let Some(error) = form_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="login-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="identifier">{"Email or phone"}</label>
                    <input
                        type="text"
                        id="identifier"
                        value={(*identifier).clone()}
                        onchange={on_identifier_change}
                        disabled={*submitting}
                    />
                </div>

                <div class="form-group">
                    <label for="password">{"Password"}</label>
                    <input
                        type="password"
                        id="password"
                        value={(*password).clone()}
                        onchange={on_password_change}
                        disabled={*submitting}
                    />
                </div>

                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Signing in..." } else { "Login" }}
                </button>
            </form>
        </section>
    }
}
