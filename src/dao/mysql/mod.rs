pub use self::{
    path::get_path,
    types::{DataBase, PoolOption, PoolType},
};

mod business;
mod business_assessment;
mod market_application;
mod market_payment;
mod market_renter;
mod market_stall;
mod market_stall_class;
mod path;
mod quarterly;
mod receipt;
mod rpt_building;
mod rpt_land;
mod rpt_land_assessment;
mod rpt_owner;
mod rpt_tax;
mod types;
