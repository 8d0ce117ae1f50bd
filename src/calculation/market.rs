use bigdecimal::{BigDecimal, Zero as _};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{calculation::round_money, error::Error};

#[derive(Debug, Clone)]
pub struct MarketTerms {
    pub security_bond_months: u32,
    pub due_day: u32,
    pub surcharge_rate: BigDecimal,
}

/// What approving an application charges the new renter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaseCharges {
    pub monthly_rent: BigDecimal,
    pub security_bond: BigDecimal,
    pub rights_fee: BigDecimal,
    pub first_rent: BigDecimal,
    pub first_rent_due: NaiveDate,
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, Error> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        Error::Validation(format!("invalid period {}-{:02}", year, month))
    })
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, Error> {
    let start = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };

    Ok((next - start).num_days() as u32)
}

pub fn monthly_rent(
    area: &BigDecimal,
    rate_per_sqm: &BigDecimal,
) -> Result<BigDecimal, Error> {
    if area <= &BigDecimal::zero() {
        return Err(Error::Validation(String::from(
            "stall area must be positive",
        )));
    }
    if rate_per_sqm < &BigDecimal::zero() {
        return Err(Error::Validation(String::from(
            "rate per sqm must not be negative",
        )));
    }

    Ok(round_money(&(area * rate_per_sqm)))
}

/// Rent for the part of the start month the renter occupies, start day
/// included.
pub fn prorated_rent(
    monthly_rent: &BigDecimal,
    start_date: NaiveDate,
) -> Result<BigDecimal, Error> {
    let total_days = days_in_month(start_date.year(), start_date.month())?;
    let occupied = total_days - start_date.day() + 1;

    if occupied == total_days {
        return Ok(round_money(monthly_rent));
    }

    Ok(round_money(
        &(monthly_rent * BigDecimal::from(occupied) / BigDecimal::from(total_days)),
    ))
}

pub fn security_bond(
    monthly_rent: &BigDecimal,
    terms: &MarketTerms,
) -> BigDecimal {
    round_money(&(monthly_rent * BigDecimal::from(terms.security_bond_months)))
}

pub fn rent_due_date(
    year: i32,
    month: u32,
    terms: &MarketTerms,
) -> Result<NaiveDate, Error> {
    let last = days_in_month(year, month)?;
    let day = terms.due_day.clamp(1, last);

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::Validation(format!("invalid period {}-{:02}", year, month))
    })
}

pub fn surcharge(
    amount: &BigDecimal,
    due_date: NaiveDate,
    as_of: NaiveDate,
    terms: &MarketTerms,
) -> BigDecimal {
    if as_of <= due_date {
        return BigDecimal::zero();
    }

    round_money(&(amount * &terms.surcharge_rate))
}

pub fn lease_charges(
    area: &BigDecimal,
    rate_per_sqm: &BigDecimal,
    rights_fee: &BigDecimal,
    start_date: NaiveDate,
    terms: &MarketTerms,
) -> Result<LeaseCharges, Error> {
    let monthly_rent = monthly_rent(area, rate_per_sqm)?;
    let first_rent = prorated_rent(&monthly_rent, start_date)?;
    let first_rent_due =
        rent_due_date(start_date.year(), start_date.month(), terms)?;
    let first_rent_due = first_rent_due.max(start_date);

    Ok(LeaseCharges {
        security_bond: security_bond(&monthly_rent, terms),
        rights_fee: round_money(rights_fee),
        monthly_rent,
        first_rent,
        first_rent_due,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms() -> MarketTerms {
        MarketTerms {
            security_bond_months: 3,
            due_day: 20,
            surcharge_rate: dec("0.25"),
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2026, 2).unwrap(), 28);
        assert_eq!(days_in_month(2026, 12).unwrap(), 31);
        assert!(days_in_month(2026, 13).is_err());
    }

    #[test]
    fn test_prorated_rent() {
        let rent = dec("3000");
        assert_eq!(prorated_rent(&rent, date(2026, 6, 1)).unwrap(), dec("3000"));
        // 15 of 30 days
        assert_eq!(prorated_rent(&rent, date(2026, 6, 16)).unwrap(), dec("1500"));
        assert_eq!(prorated_rent(&rent, date(2026, 6, 30)).unwrap(), dec("100"));
        // 10 of 31 days
        assert_eq!(
            prorated_rent(&rent, date(2026, 7, 22)).unwrap(),
            dec("967.74")
        );
    }

    #[test]
    fn test_monthly_rent_requires_area() {
        assert_eq!(monthly_rent(&dec("4.5"), &dec("650")).unwrap(), dec("2925"));
        assert!(monthly_rent(&dec("0"), &dec("650")).is_err());
    }

    #[test]
    fn test_rent_due_date_clamped() {
        let mut terms = terms();
        assert_eq!(rent_due_date(2026, 2, &terms).unwrap(), date(2026, 2, 20));
        terms.due_day = 31;
        assert_eq!(rent_due_date(2026, 2, &terms).unwrap(), date(2026, 2, 28));
    }

    #[test]
    fn test_surcharge_only_after_due() {
        let due = date(2026, 3, 20);
        assert_eq!(surcharge(&dec("2000"), due, due, &terms()), dec("0"));
        assert_eq!(
            surcharge(&dec("2000"), due, date(2026, 3, 21), &terms()),
            dec("500")
        );
    }

    #[test]
    fn test_lease_charges() {
        let charges = lease_charges(
            &dec("6"),
            &dec("500"),
            &dec("15000"),
            date(2026, 6, 25),
            &terms(),
        )
        .unwrap();

        assert_eq!(charges.monthly_rent, dec("3000"));
        assert_eq!(charges.security_bond, dec("9000"));
        assert_eq!(charges.rights_fee, dec("15000"));
        assert_eq!(charges.first_rent, dec("600"));
        // due day already passed in the start month
        assert_eq!(charges.first_rent_due, date(2026, 6, 25));
    }
}
