use log::LevelFilter;
use yew::prelude::*;

mod components;
mod config;
mod error;
mod hooks;
mod ledger;
mod services;
mod session;

use components::add_customer_form::AddCustomerForm;
use components::customer_detail::CustomerDetail;
use components::customer_list::CustomerList;
use components::header::Header;
use components::login_form::LoginForm;
use config::ClientConfig;
use hooks::use_ledger::use_ledger;
use hooks::use_session::{use_session_manager, SessionContext};
use services::api::ApiClient;
use services::logging::ConsoleLogger;

#[derive(Clone, PartialEq)]
enum View {
    Customers,
    /// Detail screen for one customer document id
    Customer(String),
    AddCustomer,
}

#[derive(Properties, PartialEq)]
struct DashboardProps {
    api_client: ApiClient,
    success_message_ms: u32,
}

#[function_component(Dashboard)]
fn dashboard(props: &DashboardProps) -> Html {
    let ledger = use_ledger(&props.api_client, props.success_message_ms);
    let view = use_state(|| View::Customers);
    let session = use_context::<SessionContext>();

    let admin_name = session
        .as_ref()
        .and_then(|ctx| ctx.session.identity().map(|admin| admin.display_name().to_string()))
        .unwrap_or_default();
    let on_logout = session
        .map(|ctx| ctx.sign_out)
        .unwrap_or_default();

    let on_home = {
        let view = view.clone();
        let refresh = ledger.actions.refresh.clone();
        Callback::from(move |_| {
            view.set(View::Customers);
            refresh.emit(());
        })
    };
    let on_select = {
        let view = view.clone();
        Callback::from(move |id: String| view.set(View::Customer(id)))
    };
    let on_add_customer = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::AddCustomer))
    };
    let on_back = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Customers))
    };
    let on_dismiss = {
        let dismiss = ledger.actions.dismiss_messages.clone();
        Callback::from(move |_: MouseEvent| dismiss.emit(()))
    };

    html! {
        <>
            <Header {admin_name} {on_home} {on_add_customer} {on_logout} />
            <main class="main">
                <div class="container">
                    {if let Some(error) = ledger.state.error() {
                        html! {
                            <div class="form-message error" onclick={on_dismiss.clone()}>{error}</div>
                        }
                    } else { html! {} }}

                    {if let Some(success) = ledger.state.success() {
                        html! {
                            <div class="form-message success" onclick={on_dismiss}>{success}</div>
                        }
                    } else { html! {} }}

                    {match &*view {
                        View::Customers => html! {
                            <CustomerList
                                ledger={ledger.state.clone()}
                                on_search={ledger.actions.search.clone()}
                                on_refresh={ledger.actions.refresh.clone()}
                                {on_select}
                                on_delete={ledger.actions.delete_customer.clone()}
                            />
                        },
                        View::Customer(id) => html! {
                            <CustomerDetail
                                ledger={ledger.state.clone()}
                                customer_id={id.clone()}
                                actions={ledger.actions.clone()}
                                {on_back}
                            />
                        },
                        View::AddCustomer => html! {
                            <AddCustomerForm
                                api_client={props.api_client.clone()}
                                on_created={ledger.actions.refresh.clone()}
                            />
                        },
                    }}
                </div>
            </main>
        </>
    }
}

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| ClientConfig::from_build_env());
    let api_client = ApiClient::from_config(&config);
    let session = use_session_manager(&config.session_storage_key);
    let signed_in = session.session.is_signed_in();

    html! {
        <ContextProvider<SessionContext> context={session}>
            {if signed_in {
                html! {
                    <Dashboard
                        {api_client}
                        success_message_ms={config.success_message_ms}
                    />
                }
            } else {
                html! {
                    <main class="main">
                        <div class="container">
                            <LoginForm {api_client} />
                        </div>
                    </main>
                }
            }}
        </ContextProvider<SessionContext>>
    }
}

fn main() {
    if let Err(e) = ConsoleLogger::init(LevelFilter::Info) {
        gloo::console::error!(e.to_string());
    }
    yew::Renderer::<App>::new().render();
}
