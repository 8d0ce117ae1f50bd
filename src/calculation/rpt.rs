//! Real property tax arithmetic.
//!
//! Market and assessed values for land and building improvements, the annual
//! basic + SEF levy, its quarterly installments and the penalty or advance
//! discount applied when an installment is settled.

use bigdecimal::{BigDecimal, Zero as _};
use chrono::{Datelike, NaiveDate};

use crate::{
    calculation::{money::split_even, round_money},
    error::Error,
    helpers::Classification,
};

pub const QUARTERS: u32 = 4;

#[derive(Debug, Clone)]
pub struct RptRates {
    pub basic_rate: BigDecimal,
    pub sef_rate: BigDecimal,
    pub penalty_rate: BigDecimal,
    pub penalty_cap: BigDecimal,
    pub advance_discount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    pub market_value: BigDecimal,
    pub assessment_level: BigDecimal,
    pub assessed_value: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Installment {
    pub quarter_no: u32,
    pub due_date: NaiveDate,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnualTax {
    pub assessed_value: BigDecimal,
    pub basic_tax: BigDecimal,
    pub sef_tax: BigDecimal,
    pub annual_tax: BigDecimal,
    pub installments: Vec<Installment>,
}

/// Penalty and discount of one installment as of a settlement date.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub penalty: BigDecimal,
    pub discount: BigDecimal,
    pub amount_due: BigDecimal,
}

fn level(value: &str) -> BigDecimal {
    value.parse().unwrap_or_default()
}

pub fn land_assessment_level(classification: Classification) -> BigDecimal {
    match classification {
        Classification::Residential => level("0.20"),
        Classification::Agricultural => level("0.40"),
        Classification::Commercial => level("0.50"),
        Classification::Industrial => level("0.50"),
        Classification::Mineral => level("0.50"),
        Classification::Timberland => level("0.20"),
        Classification::Special => level("0.15"),
    }
}

const RESIDENTIAL_BUILDING_LEVELS: [(i64, &str); 8] = [
    (175_000, "0"),
    (300_000, "0.10"),
    (500_000, "0.20"),
    (750_000, "0.25"),
    (1_000_000, "0.30"),
    (2_000_000, "0.35"),
    (5_000_000, "0.40"),
    (10_000_000, "0.50"),
];
const RESIDENTIAL_BUILDING_TOP: &str = "0.60";

const COMMERCIAL_BUILDING_LEVELS: [(i64, &str); 7] = [
    (300_000, "0.30"),
    (500_000, "0.35"),
    (750_000, "0.40"),
    (1_000_000, "0.50"),
    (2_000_000, "0.60"),
    (5_000_000, "0.70"),
    (10_000_000, "0.75"),
];
const COMMERCIAL_BUILDING_TOP: &str = "0.80";

pub fn building_assessment_level(
    classification: Classification,
    market_value: &BigDecimal,
) -> BigDecimal {
    let (schedule, top): (&[(i64, &str)], &str) = match classification {
        Classification::Commercial | Classification::Industrial => {
            (&COMMERCIAL_BUILDING_LEVELS, COMMERCIAL_BUILDING_TOP)
        },
        _ => (&RESIDENTIAL_BUILDING_LEVELS, RESIDENTIAL_BUILDING_TOP),
    };

    schedule
        .iter()
        .find(|(ceiling, _)| market_value <= &BigDecimal::from(*ceiling))
        .map(|(_, value)| level(value))
        .unwrap_or_else(|| level(top))
}

fn require_non_negative(name: &str, value: &BigDecimal) -> Result<(), Error> {
    if value < &BigDecimal::zero() {
        return Err(Error::Validation(format!("{} must not be negative", name)));
    }
    Ok(())
}

pub fn value_land(
    classification: Classification,
    lot_area: &BigDecimal,
    unit_value: &BigDecimal,
) -> Result<Valuation, Error> {
    require_non_negative("lot area", lot_area)?;
    require_non_negative("unit value", unit_value)?;

    let market_value = round_money(&(lot_area * unit_value));
    let assessment_level = land_assessment_level(classification);
    let assessed_value = round_money(&(&market_value * &assessment_level));

    Ok(Valuation {
        market_value,
        assessment_level,
        assessed_value,
    })
}

pub fn value_building(
    classification: Classification,
    floor_area: &BigDecimal,
    unit_cost: &BigDecimal,
    depreciation_rate: &BigDecimal,
) -> Result<Valuation, Error> {
    require_non_negative("floor area", floor_area)?;
    require_non_negative("unit cost", unit_cost)?;
    require_non_negative("depreciation rate", depreciation_rate)?;

    let cap = level("0.80");
    let depreciation = if depreciation_rate > &cap {
        cap
    } else {
        depreciation_rate.clone()
    };

    let replacement_cost = floor_area * unit_cost;
    let market_value =
        round_money(&(replacement_cost * (BigDecimal::from(1) - depreciation)));
    let assessment_level =
        building_assessment_level(classification, &market_value);
    let assessed_value = round_money(&(&market_value * &assessment_level));

    Ok(Valuation {
        market_value,
        assessment_level,
        assessed_value,
    })
}

pub fn quarter_due_date(year: i32, quarter_no: u32) -> Result<NaiveDate, Error> {
    let (month, day) = match quarter_no {
        1 => (3, 31),
        2 => (6, 30),
        3 => (9, 30),
        4 => (12, 31),
        _ => {
            return Err(Error::Validation(format!(
                "quarter must be between 1 and 4, got {}",
                quarter_no
            )))
        },
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::Validation(format!("invalid year {}", year)))
}

pub fn quarter_start(year: i32, quarter_no: u32) -> Result<NaiveDate, Error> {
    if !(1..=QUARTERS).contains(&quarter_no) {
        return Err(Error::Validation(format!(
            "quarter must be between 1 and 4, got {}",
            quarter_no
        )));
    }

    NaiveDate::from_ymd_opt(year, 3 * (quarter_no - 1) + 1, 1)
        .ok_or_else(|| Error::Validation(format!("invalid year {}", year)))
}

/// Splits an annual amount into the four quarterly installments of `year`.
pub fn quarterly_installments(
    year: i32,
    annual: &BigDecimal,
) -> Result<Vec<Installment>, Error> {
    let amounts = split_even(annual, QUARTERS)?;
    let mut data = Vec::with_capacity(QUARTERS as usize);

    for (index, amount) in amounts.into_iter().enumerate() {
        let quarter_no = index as u32 + 1;
        data.push(Installment {
            quarter_no,
            due_date: quarter_due_date(year, quarter_no)?,
            amount,
        });
    }

    Ok(data)
}

pub fn annual_tax(
    year: i32,
    assessed_value: &BigDecimal,
    rates: &RptRates,
) -> Result<AnnualTax, Error> {
    let basic_tax = round_money(&(assessed_value * &rates.basic_rate));
    let sef_tax = round_money(&(assessed_value * &rates.sef_rate));
    let annual_tax = &basic_tax + &sef_tax;
    let installments = quarterly_installments(year, &annual_tax)?;

    Ok(AnnualTax {
        assessed_value: assessed_value.clone(),
        basic_tax,
        sef_tax,
        annual_tax,
        installments,
    })
}

/// Calendar months an installment is overdue; any day past the due date
/// counts as at least one month.
pub fn months_late(due_date: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of <= due_date {
        return 0;
    }

    let due = due_date.year() * 12 + due_date.month() as i32;
    let now = as_of.year() * 12 + as_of.month() as i32;
    (now - due).max(1) as u32
}

pub fn settle_installment(
    amount: &BigDecimal,
    year: i32,
    quarter_no: u32,
    due_date: NaiveDate,
    as_of: NaiveDate,
    rates: &RptRates,
) -> Result<Settlement, Error> {
    let late = months_late(due_date, as_of);

    let penalty = if late > 0 {
        let accrued = &rates.penalty_rate * BigDecimal::from(late);
        let factor = if accrued > rates.penalty_cap {
            rates.penalty_cap.clone()
        } else {
            accrued
        };
        round_money(&(amount * factor))
    } else {
        BigDecimal::zero()
    };

    let discount = if late == 0 && as_of < quarter_start(year, quarter_no)? {
        round_money(&(amount * &rates.advance_discount))
    } else {
        BigDecimal::zero()
    };

    let amount_due = round_money(&(amount + &penalty - &discount));

    Ok(Settlement {
        penalty,
        discount,
        amount_due,
    })
}
