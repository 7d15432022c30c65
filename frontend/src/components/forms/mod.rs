pub mod add_purchase_form;
pub mod pay_money_form;
