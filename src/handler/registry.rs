//! Master records: owners, parcels, stall classes, stalls and businesses.
//! Duplicate keys surface as 409 through the database's unique indexes.

use bigdecimal::{BigDecimal, Zero as _};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::{
        require_text, Business_Category, Classification, Stall_Status,
    },
    model::{Business, Market_Stall, Market_Stall_Class, RPT_Land, RPT_Owner},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Owner_Input {
    pub full_name: String,
    pub address: String,
    pub contact_no: Option<String>,
    pub tin: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Land_Input {
    pub owner_id: i64,
    pub tdn: String,
    pub pin: Option<String>,
    pub location: String,
    pub barangay: String,
    pub lot_area: BigDecimal,
    pub classification: Classification,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stall_Class_Input {
    pub name: String,
    pub rights_fee: BigDecimal,
    pub rate_per_sqm: BigDecimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stall_Input {
    pub code: String,
    pub section: String,
    pub class_id: i64,
    pub area: BigDecimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Business_Input {
    pub owner_name: String,
    pub business_name: String,
    pub address: String,
    pub category: Business_Category,
    pub tin: Option<String>,
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
}

fn require_positive(name: &str, value: &BigDecimal) -> Result<(), Error> {
    if value <= &BigDecimal::zero() {
        return Err(Error::Validation(format!("{} must be positive", name)));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: &BigDecimal) -> Result<(), Error> {
    if value < &BigDecimal::zero() {
        return Err(Error::Validation(format!("{} must not be negative", name)));
    }
    Ok(())
}

pub fn owner(input: Owner_Input) -> Result<RPT_Owner, Error> {
    Ok(RPT_Owner {
        id: 0,
        full_name: require_text("full name", &input.full_name)?,
        address: require_text("address", &input.address)?,
        contact_no: optional(input.contact_no),
        tin: optional(input.tin),
        created_at: Utc::now(),
    })
}

pub fn land(input: Land_Input) -> Result<RPT_Land, Error> {
    require_positive("lot area", &input.lot_area)?;

    Ok(RPT_Land {
        id: 0,
        owner_id: input.owner_id,
        tdn: require_text("tdn", &input.tdn)?,
        pin: optional(input.pin),
        location: require_text("location", &input.location)?,
        barangay: require_text("barangay", &input.barangay)?,
        lot_area: input.lot_area,
        classification: input.classification.to_string(),
        created_at: Utc::now(),
    })
}

pub fn stall_class(input: Stall_Class_Input) -> Result<Market_Stall_Class, Error> {
    require_non_negative("rights fee", &input.rights_fee)?;
    require_non_negative("rate per sqm", &input.rate_per_sqm)?;

    Ok(Market_Stall_Class {
        id: 0,
        name: require_text("name", &input.name)?,
        rights_fee: input.rights_fee,
        rate_per_sqm: input.rate_per_sqm,
        created_at: Utc::now(),
    })
}

pub fn stall(input: Stall_Input) -> Result<Market_Stall, Error> {
    require_positive("area", &input.area)?;

    Ok(Market_Stall {
        id: 0,
        code: require_text("code", &input.code)?,
        section: require_text("section", &input.section)?,
        class_id: input.class_id,
        area: input.area,
        status: Stall_Status::Available.to_string(),
        created_at: Utc::now(),
    })
}

pub fn business(input: Business_Input) -> Result<Business, Error> {
    Ok(Business {
        id: 0,
        owner_name: require_text("owner name", &input.owner_name)?,
        business_name: require_text("business name", &input.business_name)?,
        address: require_text("address", &input.address)?,
        category: input.category.to_string(),
        tin: optional(input.tin),
        status: String::from("active"),
        registered_at: Utc::now(),
    })
}

pub async fn register_land(
    app_state: &AppState<State>,
    input: Land_Input,
) -> Result<i64, Error> {
    let database = &app_state.database;

    if database.rpt_owner.get(input.owner_id).await?.is_none() {
        return Err(Error::NotFound(format!(
            "owner {} not found",
            input.owner_id
        )));
    }

    let data = land(input)?;
    let id = database.rpt_land.insert(&data).await?;
    tracing::info!("Registered land {} as {}", id, data.tdn);

    Ok(id)
}

pub async fn register_stall(
    app_state: &AppState<State>,
    input: Stall_Input,
) -> Result<i64, Error> {
    let database = &app_state.database;

    if database.market_stall_class.get(input.class_id).await?.is_none() {
        return Err(Error::NotFound(format!(
            "stall class {} not found",
            input.class_id
        )));
    }

    let data = stall(input)?;
    let id = database.market_stall.insert(&data).await?;
    tracing::info!("Registered stall {} as {}", id, data.code);

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_owner_trims_fields() {
        let data = owner(Owner_Input {
            full_name: String::from(" Juan Dela Cruz "),
            address: String::from("Poblacion"),
            contact_no: Some(String::from("  ")),
            tin: Some(String::from("123-456")),
        })
        .unwrap();

        assert_eq!(data.full_name, "Juan Dela Cruz");
        assert_eq!(data.contact_no, None);
        assert_eq!(data.tin.as_deref(), Some("123-456"));
    }

    #[test]
    fn test_land_requires_area() {
        let input = Land_Input {
            owner_id: 1,
            tdn: String::from("TD-1"),
            pin: None,
            location: String::from("Lot 1"),
            barangay: String::from("San Jose"),
            lot_area: dec("0"),
            classification: Classification::Agricultural,
        };
        assert!(matches!(land(input.clone()), Err(Error::Validation(_))));

        let data = land(Land_Input {
            lot_area: dec("1200.5"),
            ..input
        })
        .unwrap();
        assert_eq!(data.classification, "agricultural");
    }

    #[test]
    fn test_new_stall_is_available() {
        let data = stall(Stall_Input {
            code: String::from("FS-01"),
            section: String::from("fish"),
            class_id: 1,
            area: dec("4.5"),
        })
        .unwrap();
        assert_eq!(data.status, "available");

        assert!(stall_class(Stall_Class_Input {
            name: String::from("A"),
            rights_fee: dec("-1"),
            rate_per_sqm: dec("100"),
        })
        .is_err());
    }
}
