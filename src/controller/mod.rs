//! API Controller modules
//!
//! Controllers organized by revenue stream.

use serde::{Deserialize, Serialize};

pub mod business;
pub mod market;
pub mod misc;
pub mod payment;
pub mod rpt;
pub mod treasury;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}
