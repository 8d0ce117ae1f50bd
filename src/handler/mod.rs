pub mod business_assessment;
pub mod market_application;
pub mod market_billing;
pub mod market_renter;
pub mod payment;
pub mod registry;
pub mod rpt_assessment;
pub mod rpt_billing;
pub mod treasury;
