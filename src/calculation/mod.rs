//! Tax, rent and fee arithmetic shared by the workflows. Everything here is
//! pure; persisted amounts are always rounded to cents.

pub use self::money::{rate, round_money, split_even};

pub mod business;
pub mod market;
mod money;
pub mod rpt;
