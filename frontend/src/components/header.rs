use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub admin_name: String,
    pub on_home: Callback<()>,
    pub on_add_customer: Callback<()>,
    pub on_logout: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let on_home = {
        let on_home = props.on_home.clone();
        Callback::from(move |_: MouseEvent| on_home.emit(()))
    };
    let on_add_customer = {
        let on_add_customer = props.on_add_customer.clone();
        Callback::from(move |_: MouseEvent| on_add_customer.emit(()))
    };
    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    html! {
        <header class="header">
            <div class="container">
                <h1 class="header-title" onclick={on_home}>{"Grocery Admin Dashboard"}</h1>
                <div class="header-right">
                    <button class="btn btn-primary" onclick={on_add_customer}>{"Add User"}</button>
                    <span class="admin-name">{format!("Signed in as {}", props.admin_name)}</span>
                    <button class="btn btn-secondary logout-btn" onclick={on_logout}>
                        {"Logout"}
                    </button>
                </div>
            </div>
        </header>
    }
}
