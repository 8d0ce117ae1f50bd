use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Residential,
    Agricultural,
    Commercial,
    Industrial,
    Mineral,
    Timberland,
    Special,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Residential => "residential",
            Classification::Agricultural => "agricultural",
            Classification::Commercial => "commercial",
            Classification::Industrial => "industrial",
            Classification::Mineral => "mineral",
            Classification::Timberland => "timberland",
            Classification::Special => "special",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Classification> for String {
    fn from(value: Classification) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for Classification {
    type Err = Error;

    fn from_str(value: &str) -> Result<Classification, Self::Err> {
        match value {
            "residential" => Ok(Classification::Residential),
            "agricultural" => Ok(Classification::Agricultural),
            "commercial" => Ok(Classification::Commercial),
            "industrial" => Ok(Classification::Industrial),
            "mineral" => Ok(Classification::Mineral),
            "timberland" => Ok(Classification::Timberland),
            "special" => Ok(Classification::Special),
            _ => Err(Error::Validation(format!(
                "classification not supported: {}",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payment_Status {
    Unpaid,
    Paid,
}

impl Payment_Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Payment_Status::Unpaid => "unpaid",
            Payment_Status::Paid => "paid",
        }
    }
}

impl fmt::Display for Payment_Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Payment_Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Payment_Status, Self::Err> {
        match value {
            "unpaid" => Ok(Payment_Status::Unpaid),
            "paid" => Ok(Payment_Status::Paid),
            _ => Err(Error::Validation(format!(
                "payment status not supported: {}",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Application_Status {
    Pending,
    Approved,
    Rejected,
}

impl Application_Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Application_Status::Pending => "pending",
            Application_Status::Approved => "approved",
            Application_Status::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Application_Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Application_Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Application_Status, Self::Err> {
        match value {
            "pending" => Ok(Application_Status::Pending),
            "approved" => Ok(Application_Status::Approved),
            "rejected" => Ok(Application_Status::Rejected),
            _ => Err(Error::Validation(format!(
                "application status not supported: {}",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stall_Status {
    Available,
    Occupied,
}

impl Stall_Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stall_Status::Available => "available",
            Stall_Status::Occupied => "occupied",
        }
    }
}

impl fmt::Display for Stall_Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Renter_Status {
    Active,
    Terminated,
}

impl Renter_Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Renter_Status::Active => "active",
            Renter_Status::Terminated => "terminated",
        }
    }
}

impl fmt::Display for Renter_Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market_Charge {
    RightsFee,
    SecurityBond,
    Rent,
}

impl Market_Charge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market_Charge::RightsFee => "rights_fee",
            Market_Charge::SecurityBond => "security_bond",
            Market_Charge::Rent => "rent",
        }
    }
}

impl fmt::Display for Market_Charge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Market_Charge {
    type Err = Error;

    fn from_str(value: &str) -> Result<Market_Charge, Self::Err> {
        match value {
            "rights_fee" => Ok(Market_Charge::RightsFee),
            "security_bond" => Ok(Market_Charge::SecurityBond),
            "rent" => Ok(Market_Charge::Rent),
            _ => Err(Error::Validation(format!(
                "market charge not supported: {}",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Business_Category {
    Manufacturer,
    Wholesaler,
    Retailer,
    Contractor,
    Financial,
    Services,
}

impl Business_Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Business_Category::Manufacturer => "manufacturer",
            Business_Category::Wholesaler => "wholesaler",
            Business_Category::Retailer => "retailer",
            Business_Category::Contractor => "contractor",
            Business_Category::Financial => "financial",
            Business_Category::Services => "services",
        }
    }
}

impl fmt::Display for Business_Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Business_Category> for String {
    fn from(value: Business_Category) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for Business_Category {
    type Err = Error;

    fn from_str(value: &str) -> Result<Business_Category, Self::Err> {
        match value {
            "manufacturer" => Ok(Business_Category::Manufacturer),
            "wholesaler" => Ok(Business_Category::Wholesaler),
            "retailer" => Ok(Business_Category::Retailer),
            "contractor" => Ok(Business_Category::Contractor),
            "financial" => Ok(Business_Category::Financial),
            "services" => Ok(Business_Category::Services),
            _ => Err(Error::Validation(format!(
                "business category not supported: {}",
                value
            ))),
        }
    }
}

/// Revenue stream a receipt settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payment_Source {
    Rpt,
    Market,
    Business,
}

impl Payment_Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Payment_Source::Rpt => "rpt",
            Payment_Source::Market => "market",
            Payment_Source::Business => "business",
        }
    }

    pub fn all() -> [Payment_Source; 3] {
        [
            Payment_Source::Rpt,
            Payment_Source::Market,
            Payment_Source::Business,
        ]
    }
}

impl fmt::Display for Payment_Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Payment_Source> for String {
    fn from(value: Payment_Source) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for Payment_Source {
    type Err = Error;

    fn from_str(value: &str) -> Result<Payment_Source, Self::Err> {
        match value {
            "rpt" => Ok(Payment_Source::Rpt),
            "market" => Ok(Payment_Source::Market),
            "business" => Ok(Payment_Source::Business),
            _ => Err(Error::Validation(format!(
                "payment source not supported: {}",
                value
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_round_trip_names() {
        for value in [
            Classification::Residential,
            Classification::Agricultural,
            Classification::Commercial,
            Classification::Industrial,
            Classification::Mineral,
            Classification::Timberland,
            Classification::Special,
        ] {
            assert_eq!(Classification::from_str(value.as_str()).unwrap(), value);
        }
    }

    #[test]
    fn test_unknown_values_are_validation_errors() {
        assert!(matches!(
            Classification::from_str("swamp"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Payment_Source::from_str("water"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_serde_names_match_column_values() {
        let value = serde_json::to_string(&Market_Charge::SecurityBond).unwrap();
        assert_eq!(value, format!("\"{}\"", Market_Charge::SecurityBond));

        let source: Payment_Source = serde_json::from_str("\"business\"").unwrap();
        assert_eq!(source, Payment_Source::Business);
    }
}
