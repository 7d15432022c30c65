pub mod add_customer_form;
pub mod customer_card;
pub mod customer_detail;
pub mod customer_list;
pub mod forms;
pub mod header;
pub mod login_form;
