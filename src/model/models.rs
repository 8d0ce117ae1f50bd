//! Consolidated database models
//!
//! All database entity structs organized by revenue stream.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =============================================================================
// RECEIPTS
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Receipt {
    pub id: i64,
    pub or_number: Option<String>,
    pub source: String,
    pub payor: String,
    pub payment_method: String,
    pub total: BigDecimal,
    pub paid_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Settled line of a receipt, whatever table it came from.
#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Receipt_Line {
    pub id: i64,
    pub description: String,
    pub amount: BigDecimal,
    pub penalty: BigDecimal,
    pub discount: BigDecimal,
    pub amount_paid: Option<BigDecimal>,
}

// =============================================================================
// REAL PROPERTY TAX
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct RPT_Owner {
    pub id: i64,
    pub full_name: String,
    pub address: String,
    pub contact_no: Option<String>,
    pub tin: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct RPT_Land {
    pub id: i64,
    pub owner_id: i64,
    pub tdn: String,
    pub pin: Option<String>,
    pub location: String,
    pub barangay: String,
    pub lot_area: BigDecimal,
    pub classification: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct RPT_Land_Assessment {
    pub id: i64,
    pub land_id: i64,
    pub assessment_year: i32,
    pub unit_value: BigDecimal,
    pub market_value: BigDecimal,
    pub assessment_level: BigDecimal,
    pub assessed_value: BigDecimal,
    pub total_assessed_value: BigDecimal,
    pub assessed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct RPT_Building {
    pub id: i64,
    pub assessment_id: i64,
    pub description: String,
    pub classification: String,
    pub floor_area: BigDecimal,
    pub unit_cost: BigDecimal,
    pub depreciation_rate: BigDecimal,
    pub market_value: BigDecimal,
    pub assessment_level: BigDecimal,
    pub assessed_value: BigDecimal,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct RPT_Tax {
    pub id: i64,
    pub assessment_id: i64,
    pub tax_year: i32,
    pub assessed_value: BigDecimal,
    pub basic_rate: BigDecimal,
    pub sef_rate: BigDecimal,
    pub basic_tax: BigDecimal,
    pub sef_tax: BigDecimal,
    pub annual_tax: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// Quarterly installment row; the business tax table has the same shape.
#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Quarterly {
    pub id: i64,
    pub parent_id: i64,
    pub tax_year: i32,
    pub quarter_no: i32,
    pub due_date: NaiveDate,
    pub amount: BigDecimal,
    pub penalty: BigDecimal,
    pub discount: BigDecimal,
    pub amount_paid: Option<BigDecimal>,
    pub status: String,
    pub receipt_id: Option<i64>,
    pub paid_on: Option<NaiveDate>,
}

// =============================================================================
// PUBLIC MARKET
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Market_Stall_Class {
    pub id: i64,
    pub name: String,
    pub rights_fee: BigDecimal,
    pub rate_per_sqm: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Market_Stall {
    pub id: i64,
    pub code: String,
    pub section: String,
    pub class_id: i64,
    pub area: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Market_Application {
    pub id: i64,
    pub stall_id: i64,
    pub applicant_name: String,
    pub business_name: String,
    pub contact_no: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub remarks: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Market_Renter {
    pub id: i64,
    pub application_id: i64,
    pub stall_id: i64,
    pub renter_name: String,
    pub business_name: String,
    pub contact_no: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub monthly_rent: BigDecimal,
    pub security_bond: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Market_Payment {
    pub id: i64,
    pub renter_id: i64,
    pub charge: String,
    pub period_year: i32,
    pub period_month: i32,
    pub due_date: NaiveDate,
    pub amount: BigDecimal,
    pub penalty: BigDecimal,
    pub discount: BigDecimal,
    pub amount_paid: Option<BigDecimal>,
    pub status: String,
    pub receipt_id: Option<i64>,
    pub paid_on: Option<NaiveDate>,
}

// =============================================================================
// BUSINESS TAX
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Business {
    pub id: i64,
    pub owner_name: String,
    pub business_name: String,
    pub address: String,
    pub category: String,
    pub tin: Option<String>,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Business_Assessment {
    pub id: i64,
    pub business_id: i64,
    pub tax_year: i32,
    pub gross_sales: BigDecimal,
    pub tax_rate: BigDecimal,
    pub business_tax: BigDecimal,
    pub mayors_permit: BigDecimal,
    pub sanitary_fee: BigDecimal,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// TREASURY REPORTS
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Source_Amount {
    pub source: String,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Monthly_Collection {
    pub month: i64,
    pub source: String,
    pub amount: BigDecimal,
}

// =============================================================================
// INSTALLMENT TABLES
// =============================================================================

/// Quarterly installment tables share one layout and differ only by name and
/// parent key.
pub trait Installment_Table {
    const TABLE: &'static str;
    const PARENT: &'static str;
}

#[derive(Debug)]
pub struct RPT_Quarterly;

impl Installment_Table for RPT_Quarterly {
    const TABLE: &'static str = "rpt_quarterly";
    const PARENT: &'static str = "tax_id";
}

#[derive(Debug)]
pub struct Business_Quarterly;

impl Installment_Table for Business_Quarterly {
    const TABLE: &'static str = "business_quarterly";
    const PARENT: &'static str = "assessment_id";
}
