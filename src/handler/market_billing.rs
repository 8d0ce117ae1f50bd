use bigdecimal::{BigDecimal, Zero as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    calculation::market::{rent_due_date, MarketTerms},
    configuration::{AppState, State},
    error::Error,
    helpers::{validate_year, Market_Charge, Payment_Status},
    model::{Market_Payment, Market_Renter},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Billing_Input {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Billing_Summary {
    pub year: i32,
    pub month: u32,
    pub renters: usize,
    pub billed: u64,
}

pub fn period_start(year: i32, month: u32) -> Result<NaiveDate, Error> {
    validate_year(year)?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        Error::Validation(format!("invalid billing month {}-{:02}", year, month))
    })
}

/// One unpaid rent row per renter that occupied its stall before the month
/// and has not left before it began.
pub fn plan_month(
    renters: &[Market_Renter],
    year: i32,
    month: u32,
    terms: &MarketTerms,
) -> Result<Vec<Market_Payment>, Error> {
    let start = period_start(year, month)?;
    let due_date = rent_due_date(year, month, terms)?;

    let data = renters
        .iter()
        .filter(|renter| renter.start_date < start)
        .filter(|renter| renter.end_date.map_or(true, |end| end >= start))
        .map(|renter| Market_Payment {
            id: 0,
            renter_id: renter.id,
            charge: Market_Charge::Rent.to_string(),
            period_year: year,
            period_month: month as i32,
            due_date,
            amount: renter.monthly_rent.clone(),
            penalty: BigDecimal::zero(),
            discount: BigDecimal::zero(),
            amount_paid: None,
            status: Payment_Status::Unpaid.to_string(),
            receipt_id: None,
            paid_on: None,
        })
        .collect();

    Ok(data)
}

/// Bills the month's rent. Rows that already exist for a renter and period
/// are left as they are, so running this twice bills nothing new.
pub async fn generate(
    app_state: &AppState<State>,
    year: i32,
    month: u32,
) -> Result<Billing_Summary, Error> {
    let start = period_start(year, month)?;
    let renters = app_state.database.market_renter.get_billable(start).await?;
    let bills =
        plan_month(&renters, year, month, &app_state.config.market_terms)?;
    let billed = app_state
        .database
        .market_payment
        .insert_missing(&bills)
        .await?;

    tracing::info!(
        "Generated market bills for {}-{:02}: {} new of {} renter(s)",
        year,
        month,
        billed,
        bills.len()
    );

    Ok(Billing_Summary {
        year,
        month,
        renters: bills.len(),
        billed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn renter(id: i64, start: NaiveDate, end: Option<NaiveDate>) -> Market_Renter {
        Market_Renter {
            id,
            application_id: id,
            stall_id: id,
            renter_name: format!("renter {}", id),
            business_name: String::from("stall"),
            contact_no: None,
            start_date: start,
            end_date: end,
            monthly_rent: dec("1200"),
            security_bond: dec("3600"),
            status: String::from("active"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_month() {
        let terms = MarketTerms {
            security_bond_months: 3,
            due_day: 31,
            surcharge_rate: dec("0.25"),
        };
        let renters = vec![
            renter(1, date(2026, 1, 10), None),
            renter(2, date(2026, 2, 1), None),
            renter(3, date(2025, 6, 1), Some(date(2026, 1, 31))),
        ];

        let bills = plan_month(&renters, 2026, 2, &terms).unwrap();

        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].renter_id, 1);
        assert_eq!(bills[0].charge, "rent");
        assert_eq!(bills[0].period_month, 2);
        assert_eq!(bills[0].amount, dec("1200"));
        // due day clamps to the end of February
        assert_eq!(bills[0].due_date, date(2026, 2, 28));
    }

    #[test]
    fn test_plan_month_bills_terminated_renter_for_months_occupied() {
        let terms = MarketTerms {
            security_bond_months: 3,
            due_day: 20,
            surcharge_rate: dec("0.25"),
        };
        let mut left = renter(4, date(2025, 11, 3), Some(date(2026, 3, 15)));
        left.status = String::from("terminated");

        let march = plan_month(&[left.clone()], 2026, 3, &terms).unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].renter_id, 4);

        let april = plan_month(&[left], 2026, 4, &terms).unwrap();
        assert!(april.is_empty());
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(period_start(2026, 13), Err(Error::Validation(_))));
        assert!(matches!(period_start(20, 1), Err(Error::Validation(_))));
    }
}
