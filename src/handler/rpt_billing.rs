use bigdecimal::{BigDecimal, Zero as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    calculation::{round_money, rpt::RptRates},
    configuration::{AppState, State},
    error::Error,
    handler::payment::settle_quarterly,
    helpers::{today, validate_year, Payment_Status},
    model::{Quarterly, RPT_Land_Assessment, RPT_Tax},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Billing_Query {
    pub land_id: i64,
    pub year: i32,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct Billing_Line {
    #[serde(flatten)]
    pub quarter: Quarterly,
    pub amount_due: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct Billing_Statement {
    pub as_of: NaiveDate,
    pub assessment: RPT_Land_Assessment,
    pub tax: RPT_Tax,
    pub quarters: Vec<Billing_Line>,
    pub total_due: BigDecimal,
}

/// Unpaid quarters carry their penalty or discount as of `as_of`.
pub fn statement_lines(
    quarters: Vec<Quarterly>,
    as_of: NaiveDate,
    rates: &RptRates,
) -> Result<(Vec<Billing_Line>, BigDecimal), Error> {
    let mut total_due = BigDecimal::zero();
    let mut lines = Vec::with_capacity(quarters.len());

    for mut quarter in quarters {
        let amount_due = if quarter.status == Payment_Status::Unpaid.as_str() {
            let settlement = settle_quarterly(&quarter, as_of, rates)?;
            quarter.penalty = settlement.penalty;
            quarter.discount = settlement.discount;
            settlement.amount_due
        } else {
            BigDecimal::zero()
        };

        total_due += &amount_due;
        lines.push(Billing_Line {
            quarter,
            amount_due,
        });
    }

    Ok((lines, round_money(&total_due)))
}

pub async fn statement(
    app_state: &AppState<State>,
    query: Billing_Query,
) -> Result<Billing_Statement, Error> {
    let year = validate_year(query.year)?;
    let as_of = query.as_of.unwrap_or_else(today);
    let database = &app_state.database;

    let assessment = database
        .rpt_land_assessment
        .get_by_land_year(query.land_id, year)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "land {} has no assessment for {}",
                query.land_id, year
            ))
        })?;
    let tax = database
        .rpt_tax
        .get_by_assessment(assessment.id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "assessment {} has no tax record",
                assessment.id
            ))
        })?;

    let quarters = database.rpt_quarterly.get_by_parent(tax.id).await?;
    let (quarters, total_due) =
        statement_lines(quarters, as_of, &app_state.config.rpt_rates)?;

    Ok(Billing_Statement {
        as_of,
        assessment,
        tax,
        quarters,
        total_due,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::rpt::quarterly_installments;
    use bigdecimal::Zero;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_statement_lines() {
        let rates = RptRates {
            basic_rate: dec("0.01"),
            sef_rate: dec("0.01"),
            penalty_rate: dec("0.02"),
            penalty_cap: dec("0.72"),
            advance_discount: dec("0.10"),
        };

        let quarters: Vec<Quarterly> = quarterly_installments(2026, &dec("1200"))
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(index, installment)| Quarterly {
                id: index as i64 + 1,
                parent_id: 1,
                tax_year: 2026,
                quarter_no: installment.quarter_no as i32,
                due_date: installment.due_date,
                amount: installment.amount,
                penalty: BigDecimal::zero(),
                discount: BigDecimal::zero(),
                amount_paid: None,
                status: String::from(if index == 0 { "paid" } else { "unpaid" }),
                receipt_id: None,
                paid_on: None,
            })
            .collect();

        let (lines, total) =
            statement_lines(quarters, date(2026, 8, 1), &rates).unwrap();

        assert!(lines[0].amount_due.is_zero());
        // Q2 due June 30, two calendar months late
        assert_eq!(lines[1].quarter.penalty, dec("12"));
        assert_eq!(lines[1].amount_due, dec("312"));
        // Q3 started in July: neither late nor early
        assert_eq!(lines[2].amount_due, dec("300"));
        // Q4 starts in October
        assert_eq!(lines[3].quarter.discount, dec("30"));
        assert_eq!(lines[3].amount_due, dec("270"));
        assert_eq!(total, dec("882"));
    }
}
