//! Sales orders - net volume and the amount still to be invoiced.

pub mod order_calculator;
mod orders_model;

pub use order_calculator::{order_net_sum, to_be_invoiced};
pub use orders_model::*;
