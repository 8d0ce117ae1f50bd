use std::{collections::BTreeSet, str::FromStr as _};

use bigdecimal::{BigDecimal, Zero as _};
use chrono::{Datelike as _, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Transaction;

use crate::{
    calculation::{
        market::{surcharge, MarketTerms},
        round_money,
        rpt::{settle_installment, RptRates, Settlement},
    },
    configuration::{AppState, State},
    dao::DataBase,
    error::Error,
    helpers::{require_text, today, Market_Charge, Payment_Source, Payment_Status},
    model::{Market_Payment, Quarterly, Receipt, Receipt_Line},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Payment_Input {
    pub source: Payment_Source,
    pub items: Vec<i64>,
    pub payor: String,
    pub payment_method: Option<String>,
    pub paid_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settled_Item {
    pub id: i64,
    pub settlement: Settlement,
}

#[derive(Debug, Serialize)]
pub struct Receipt_Detail {
    pub receipt: Receipt,
    pub lines: Vec<Receipt_Line>,
}

pub fn or_number(year: i32, id: i64) -> String {
    format!("OR-{}-{:06}", year, id)
}

/// Payable ids of a request in ascending order. Duplicates are rejected
/// rather than collapsed.
pub fn validate(input: &Payment_Input) -> Result<Vec<i64>, Error> {
    if input.items.is_empty() {
        return Err(Error::Validation(String::from(
            "at least one item is required",
        )));
    }

    let ids: BTreeSet<i64> = input.items.iter().copied().collect();
    if ids.len() != input.items.len() {
        return Err(Error::Validation(String::from(
            "items must not repeat",
        )));
    }

    require_text("payor", &input.payor)?;

    Ok(ids.into_iter().collect())
}

pub fn ensure_all_found(
    requested: &[i64],
    found: impl IntoIterator<Item = i64>,
) -> Result<(), Error> {
    let found: BTreeSet<i64> = found.into_iter().collect();
    let missing: Vec<String> = requested
        .iter()
        .filter(|id| !found.contains(id))
        .map(|id| id.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(Error::NotFound(format!(
            "items not found: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

fn ensure_unpaid(id: i64, status: &str) -> Result<(), Error> {
    if status != Payment_Status::Unpaid.as_str() {
        return Err(Error::InvalidState(format!("item {} is already paid", id)));
    }
    Ok(())
}

pub fn settle_quarterly(
    quarter: &Quarterly,
    as_of: NaiveDate,
    rates: &RptRates,
) -> Result<Settlement, Error> {
    settle_installment(
        &quarter.amount,
        quarter.tax_year,
        u32::try_from(quarter.quarter_no)?,
        quarter.due_date,
        as_of,
        rates,
    )
}

/// Rent past due carries the flat surcharge; fees never do.
pub fn settle_charge(
    charge: &Market_Payment,
    as_of: NaiveDate,
    terms: &MarketTerms,
) -> Result<Settlement, Error> {
    let penalty = match Market_Charge::from_str(&charge.charge)? {
        Market_Charge::Rent => {
            surcharge(&charge.amount, charge.due_date, as_of, terms)
        },
        Market_Charge::RightsFee | Market_Charge::SecurityBond => {
            BigDecimal::zero()
        },
    };
    let amount_due = round_money(&(&charge.amount + &penalty));

    Ok(Settlement {
        penalty,
        discount: BigDecimal::zero(),
        amount_due,
    })
}

/// Business tax quarters accrue the same monthly penalty but earn no
/// advance discount.
pub fn business_rates(rates: &RptRates) -> RptRates {
    RptRates {
        advance_discount: BigDecimal::zero(),
        ..rates.clone()
    }
}

pub fn settle_quarterlies(
    rows: &[Quarterly],
    as_of: NaiveDate,
    rates: &RptRates,
) -> Result<Vec<Settled_Item>, Error> {
    rows.iter()
        .map(|row| {
            ensure_unpaid(row.id, &row.status)?;
            Ok(Settled_Item {
                id: row.id,
                settlement: settle_quarterly(row, as_of, rates)?,
            })
        })
        .collect()
}

pub fn settle_charges(
    rows: &[Market_Payment],
    as_of: NaiveDate,
    terms: &MarketTerms,
) -> Result<Vec<Settled_Item>, Error> {
    rows.iter()
        .map(|row| {
            ensure_unpaid(row.id, &row.status)?;
            Ok(Settled_Item {
                id: row.id,
                settlement: settle_charge(row, as_of, terms)?,
            })
        })
        .collect()
}

pub fn receipt_total(items: &[Settled_Item]) -> BigDecimal {
    let total = items
        .iter()
        .fold(BigDecimal::zero(), |acc, item| acc + &item.settlement.amount_due);
    round_money(&total)
}

/// Inserts the receipt and stamps its official receipt number. Returns the
/// receipt id and number.
pub async fn issue_receipt(
    app_state: &AppState<State>,
    source: Payment_Source,
    payor: &str,
    payment_method: &str,
    total: &BigDecimal,
    paid_on: NaiveDate,
    transaction: &mut Transaction<'_, DataBase>,
) -> Result<(i64, String), Error> {
    let receipt = Receipt {
        id: 0,
        or_number: None,
        source: source.to_string(),
        payor: payor.to_owned(),
        payment_method: payment_method.to_owned(),
        total: total.clone(),
        paid_on,
        created_at: Utc::now(),
    };

    let receipts = &app_state.database.receipt;
    let id = receipts.insert(&receipt, transaction).await?;
    let number = or_number(paid_on.year(), id);
    receipts.set_or_number(id, &number, transaction).await?;

    Ok((id, number))
}

pub async fn proceed(
    app_state: &AppState<State>,
    input: Payment_Input,
) -> Result<i64, Error> {
    let ids = validate(&input)?;
    let payor = require_text("payor", &input.payor)?;
    let payment_method = input
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .unwrap_or("cash")
        .to_owned();
    let paid_on = input.paid_on.unwrap_or_else(today);

    if paid_on > today() {
        return Err(Error::Validation(format!(
            "payment date {} is in the future",
            paid_on
        )));
    }

    let database = &app_state.database;
    let config = &app_state.config;
    let mut transaction = database.pool.begin().await?;

    let settled = match input.source {
        Payment_Source::Rpt => {
            let rows = database
                .rpt_quarterly
                .lock_installments(&ids, &mut transaction)
                .await?;
            ensure_all_found(&ids, rows.iter().map(|row| row.id))?;
            settle_quarterlies(&rows, paid_on, &config.rpt_rates)?
        },
        Payment_Source::Business => {
            let rows = database
                .business_quarterly
                .lock_installments(&ids, &mut transaction)
                .await?;
            ensure_all_found(&ids, rows.iter().map(|row| row.id))?;
            settle_quarterlies(
                &rows,
                paid_on,
                &business_rates(&config.rpt_rates),
            )?
        },
        Payment_Source::Market => {
            let rows = database
                .market_payment
                .lock_charges(&ids, &mut transaction)
                .await?;
            ensure_all_found(&ids, rows.iter().map(|row| row.id))?;
            settle_charges(&rows, paid_on, &config.market_terms)?
        },
    };

    let total = receipt_total(&settled);
    let (receipt_id, number) = issue_receipt(
        app_state,
        input.source,
        &payor,
        &payment_method,
        &total,
        paid_on,
        &mut transaction,
    )
    .await?;

    for item in &settled {
        let Settlement {
            penalty,
            discount,
            amount_due,
        } = &item.settlement;

        let updated = match input.source {
            Payment_Source::Rpt => {
                database
                    .rpt_quarterly
                    .mark_paid(
                        item.id,
                        penalty,
                        discount,
                        amount_due,
                        receipt_id,
                        paid_on,
                        &mut transaction,
                    )
                    .await?
            },
            Payment_Source::Business => {
                database
                    .business_quarterly
                    .mark_paid(
                        item.id,
                        penalty,
                        discount,
                        amount_due,
                        receipt_id,
                        paid_on,
                        &mut transaction,
                    )
                    .await?
            },
            Payment_Source::Market => {
                database
                    .market_payment
                    .mark_paid_charge(
                        item.id,
                        penalty,
                        discount,
                        amount_due,
                        receipt_id,
                        paid_on,
                        &mut transaction,
                    )
                    .await?
            },
        };

        if updated == 0 {
            return Err(Error::InvalidState(format!(
                "item {} is already paid",
                item.id
            )));
        }
    }

    transaction.commit().await?;

    tracing::info!(
        "Issued {} to {} for {} {} item(s), total {}",
        number,
        payor,
        settled.len(),
        input.source,
        total
    );

    Ok(receipt_id)
}

pub async fn get_receipt(
    app_state: &AppState<State>,
    id: i64,
) -> Result<Receipt_Detail, Error> {
    let database = &app_state.database;
    let receipt = database
        .receipt
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("receipt {} not found", id)))?;
    let source = Payment_Source::from_str(&receipt.source)?;
    let lines = database.receipt.get_lines(id, source).await?;

    Ok(Receipt_Detail { receipt, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::Zero;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rates() -> RptRates {
        RptRates {
            basic_rate: dec("0.01"),
            sef_rate: dec("0.01"),
            penalty_rate: dec("0.02"),
            penalty_cap: dec("0.72"),
            advance_discount: dec("0.10"),
        }
    }

    fn terms() -> MarketTerms {
        MarketTerms {
            security_bond_months: 3,
            due_day: 20,
            surcharge_rate: dec("0.25"),
        }
    }

    fn quarter(id: i64, quarter_no: i32, due: NaiveDate, status: &str) -> Quarterly {
        Quarterly {
            id,
            parent_id: 1,
            tax_year: 2026,
            quarter_no,
            due_date: due,
            amount: dec("300"),
            penalty: BigDecimal::zero(),
            discount: BigDecimal::zero(),
            amount_paid: None,
            status: status.to_owned(),
            receipt_id: None,
            paid_on: None,
        }
    }

    fn charge(id: i64, kind: Market_Charge, amount: &str) -> Market_Payment {
        Market_Payment {
            id,
            renter_id: 3,
            charge: kind.to_string(),
            period_year: 2026,
            period_month: 5,
            due_date: date(2026, 5, 20),
            amount: dec(amount),
            penalty: BigDecimal::zero(),
            discount: BigDecimal::zero(),
            amount_paid: None,
            status: String::from("unpaid"),
            receipt_id: None,
            paid_on: None,
        }
    }

    fn input(items: Vec<i64>, payor: &str) -> Payment_Input {
        Payment_Input {
            source: Payment_Source::Rpt,
            items,
            payor: payor.to_owned(),
            payment_method: None,
            paid_on: None,
        }
    }

    #[test]
    fn test_or_number_format() {
        assert_eq!(or_number(2026, 42), "OR-2026-000042");
        assert_eq!(or_number(2026, 1234567), "OR-2026-1234567");
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(&input(vec![9, 3, 5], "Ana")).unwrap(), vec![3, 5, 9]);
        assert!(matches!(
            validate(&input(vec![], "Ana")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate(&input(vec![1, 1], "Ana")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate(&input(vec![1], " ")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_ensure_all_found() {
        assert!(ensure_all_found(&[1, 2], vec![2, 1]).is_ok());
        match ensure_all_found(&[1, 2, 3], vec![2]) {
            Err(Error::NotFound(message)) => assert_eq!(message, "items not found: 1, 3"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_settle_quarterlies() {
        let rows = vec![
            quarter(1, 1, date(2026, 3, 31), "unpaid"),
            quarter(2, 3, date(2026, 9, 30), "unpaid"),
        ];
        let settled = settle_quarterlies(&rows, date(2026, 5, 15), &rates()).unwrap();

        // two months late on Q1, Q3 not started yet
        assert_eq!(settled[0].settlement.penalty, dec("12"));
        assert_eq!(settled[0].settlement.amount_due, dec("312"));
        assert_eq!(settled[1].settlement.discount, dec("30"));
        assert_eq!(settled[1].settlement.amount_due, dec("270"));
        assert_eq!(receipt_total(&settled), dec("582"));
    }

    #[test]
    fn test_paid_item_is_rejected() {
        let rows = vec![quarter(1, 1, date(2026, 3, 31), "paid")];
        assert!(matches!(
            settle_quarterlies(&rows, date(2026, 3, 1), &rates()),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_business_rates_drop_discount() {
        let rows = vec![quarter(1, 4, date(2026, 12, 31), "unpaid")];
        let settled =
            settle_quarterlies(&rows, date(2026, 1, 10), &business_rates(&rates()))
                .unwrap();
        assert!(settled[0].settlement.discount.is_zero());
        assert_eq!(settled[0].settlement.amount_due, dec("300"));
    }

    #[test]
    fn test_settle_charges() {
        let rows = vec![
            charge(1, Market_Charge::Rent, "1000"),
            charge(2, Market_Charge::SecurityBond, "3000"),
        ];

        let on_time = settle_charges(&rows, date(2026, 5, 20), &terms()).unwrap();
        assert!(on_time[0].settlement.penalty.is_zero());

        let late = settle_charges(&rows, date(2026, 5, 21), &terms()).unwrap();
        assert_eq!(late[0].settlement.penalty, dec("250"));
        assert_eq!(late[0].settlement.amount_due, dec("1250"));
        assert!(late[1].settlement.penalty.is_zero());
        assert_eq!(receipt_total(&late), dec("4250"));
    }
}
