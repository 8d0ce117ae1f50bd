use bigdecimal::{BigDecimal, Zero as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    calculation::{market::MarketTerms, round_money},
    configuration::{AppState, State},
    error::Error,
    handler::payment::settle_charge,
    helpers::{today, Payment_Status, Renter_Status, Stall_Status},
    model::{Market_Payment, Market_Renter},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Termination_Input {
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct Ledger_Line {
    #[serde(flatten)]
    pub payment: Market_Payment,
    pub amount_due: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct Renter_Ledger {
    pub renter: Market_Renter,
    pub as_of: NaiveDate,
    pub payments: Vec<Ledger_Line>,
    pub total_due: BigDecimal,
}

/// Unpaid rows show the surcharge they would carry if paid on `as_of`; paid
/// rows keep what was settled.
pub fn ledger_lines(
    payments: Vec<Market_Payment>,
    as_of: NaiveDate,
    terms: &MarketTerms,
) -> Result<(Vec<Ledger_Line>, BigDecimal), Error> {
    let mut total_due = BigDecimal::zero();
    let mut lines = Vec::with_capacity(payments.len());

    for mut payment in payments {
        let amount_due = if payment.status == Payment_Status::Unpaid.as_str() {
            let settlement = settle_charge(&payment, as_of, terms)?;
            payment.penalty = settlement.penalty;
            payment.discount = settlement.discount;
            settlement.amount_due
        } else {
            BigDecimal::zero()
        };

        total_due += &amount_due;
        lines.push(Ledger_Line {
            payment,
            amount_due,
        });
    }

    Ok((lines, round_money(&total_due)))
}

pub async fn get_ledger(
    app_state: &AppState<State>,
    renter_id: i64,
    as_of: Option<NaiveDate>,
) -> Result<Renter_Ledger, Error> {
    let database = &app_state.database;
    let as_of = as_of.unwrap_or_else(today);

    let renter = database
        .market_renter
        .get(renter_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("renter {} not found", renter_id))
        })?;
    let payments = database.market_payment.get_by_renter(renter_id).await?;
    let (payments, total_due) =
        ledger_lines(payments, as_of, &app_state.config.market_terms)?;

    Ok(Renter_Ledger {
        renter,
        as_of,
        payments,
        total_due,
    })
}

/// A lease ends on or after its start and never later than `today`; the stall
/// is released as soon as the renter is terminated.
pub fn check_end_date(
    renter: &Market_Renter,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), Error> {
    if renter.status != Renter_Status::Active.as_str() {
        return Err(Error::InvalidState(format!(
            "renter {} is {}",
            renter.id, renter.status
        )));
    }

    if end_date < renter.start_date {
        return Err(Error::Validation(format!(
            "end date {} is before the lease start {}",
            end_date, renter.start_date
        )));
    }

    if end_date > today {
        return Err(Error::Validation(format!(
            "end date {} is in the future",
            end_date
        )));
    }

    Ok(())
}

pub async fn terminate(
    app_state: &AppState<State>,
    renter_id: i64,
    input: Termination_Input,
) -> Result<NaiveDate, Error> {
    let database = &app_state.database;
    let end_date = input.end_date.unwrap_or_else(today);
    let mut transaction = database.pool.begin().await?;

    let renter = database
        .market_renter
        .lock(renter_id, &mut transaction)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("renter {} not found", renter_id))
        })?;

    check_end_date(&renter, end_date, today())?;

    database
        .market_renter
        .terminate(renter.id, end_date, &mut transaction)
        .await?;
    database
        .market_stall
        .set_status(
            renter.stall_id,
            Stall_Status::Available.as_str(),
            &mut transaction,
        )
        .await?;

    transaction.commit().await?;

    tracing::info!(
        "Terminated renter {} on {}, stall {} released",
        renter.id,
        end_date,
        renter.stall_id
    );

    Ok(end_date)
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

    fn payment(id: i64, status: Payment_Status, month: i32) -> Market_Payment {
        Market_Payment {
            id,
            renter_id: 1,
            charge: String::from("rent"),
            period_year: 2026,
            period_month: month,
            due_date: date(2026, month as u32, 20),
            amount: dec("1500"),
            penalty: BigDecimal::from(0),
            discount: BigDecimal::from(0),
            amount_paid: None,
            status: status.to_string(),
            receipt_id: None,
            paid_on: None,
        }
    }

    #[test]
    fn test_ledger_lines() {
        let terms = MarketTerms {
            security_bond_months: 3,
            due_day: 20,
            surcharge_rate: dec("0.25"),
        };
        let payments = vec![
            payment(1, Payment_Status::Paid, 4),
            payment(2, Payment_Status::Unpaid, 5),
            payment(3, Payment_Status::Unpaid, 6),
        ];

        let (lines, total) =
            ledger_lines(payments, date(2026, 6, 1), &terms).unwrap();

        assert_eq!(lines[0].amount_due, dec("0"));
        assert_eq!(lines[1].payment.penalty, dec("375"));
        assert_eq!(lines[1].amount_due, dec("1875"));
        assert_eq!(lines[2].amount_due, dec("1500"));
        assert_eq!(total, dec("3375"));
    }

    fn lease(status: Renter_Status) -> Market_Renter {
        Market_Renter {
            id: 7,
            application_id: 3,
            stall_id: 4,
            renter_name: String::from("Maria Santos"),
            business_name: String::from("Santos Dry Goods"),
            contact_no: None,
            start_date: date(2026, 2, 1),
            end_date: None,
            monthly_rent: dec("1500"),
            security_bond: dec("4500"),
            status: status.to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_check_end_date() {
        let today = date(2026, 6, 10);
        let renter = lease(Renter_Status::Active);

        assert!(check_end_date(&renter, date(2026, 6, 10), today).is_ok());
        assert!(check_end_date(&renter, date(2026, 2, 1), today).is_ok());
        assert!(matches!(
            check_end_date(&renter, date(2026, 1, 31), today),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            check_end_date(&renter, date(2026, 7, 1), today),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            check_end_date(
                &lease(Renter_Status::Terminated),
                date(2026, 6, 1),
                today
            ),
            Err(Error::InvalidState(_))
        ));
    }
}
