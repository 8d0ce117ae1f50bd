use bigdecimal::{BigDecimal, Zero as _};
use serde::Serialize;

use crate::{
    calculation::round_money,
    configuration::{AppState, State},
    error::Error,
    helpers::{validate_year, Payment_Source},
    model::{Monthly_Collection, Source_Amount},
};

#[derive(Debug, Clone, Serialize)]
pub struct Source_Total {
    pub source: Payment_Source,
    pub collected: BigDecimal,
    pub outstanding: BigDecimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Treasury_Summary {
    pub year: i32,
    pub sources: Vec<Source_Total>,
    pub total_collected: BigDecimal,
    pub total_outstanding: BigDecimal,
    pub active_renters: i64,
    pub assessed_parcels: i64,
    pub registered_businesses: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Register_Counts {
    pub active_renters: i64,
    pub assessed_parcels: i64,
    pub registered_businesses: i64,
}

fn collected_for(rows: &[Source_Amount], source: Payment_Source) -> BigDecimal {
    rows.iter()
        .filter(|row| row.source == source.as_str())
        .fold(BigDecimal::zero(), |acc, row| acc + &row.amount)
}

/// Every source appears once, collected or not.
pub fn summarize(
    year: i32,
    collected: &[Source_Amount],
    outstanding: &[(Payment_Source, BigDecimal)],
    counts: Register_Counts,
) -> Treasury_Summary {
    let sources: Vec<Source_Total> = Payment_Source::all()
        .into_iter()
        .map(|source| Source_Total {
            source,
            collected: round_money(&collected_for(collected, source)),
            outstanding: round_money(
                &outstanding
                    .iter()
                    .filter(|(item, _)| *item == source)
                    .fold(BigDecimal::zero(), |acc, (_, amount)| acc + amount),
            ),
        })
        .collect();

    let total_collected = sources
        .iter()
        .fold(BigDecimal::zero(), |acc, item| acc + &item.collected);
    let total_outstanding = sources
        .iter()
        .fold(BigDecimal::zero(), |acc, item| acc + &item.outstanding);

    Treasury_Summary {
        year,
        sources,
        total_collected,
        total_outstanding,
        active_renters: counts.active_renters,
        assessed_parcels: counts.assessed_parcels,
        registered_businesses: counts.registered_businesses,
    }
}

/// Twelve months per source with zero-filled gaps, ordered by month then
/// source.
pub fn collections_grid(rows: &[Monthly_Collection]) -> Vec<Monthly_Collection> {
    let mut data = Vec::with_capacity(12 * Payment_Source::all().len());

    for month in 1..=12_i64 {
        for source in Payment_Source::all() {
            let amount = rows
                .iter()
                .filter(|row| row.month == month && row.source == source.as_str())
                .fold(BigDecimal::zero(), |acc, row| acc + &row.amount);
            data.push(Monthly_Collection {
                month,
                source: source.to_string(),
                amount: round_money(&amount),
            });
        }
    }

    data
}

pub async fn summary(
    app_state: &AppState<State>,
    year: i32,
) -> Result<Treasury_Summary, Error> {
    let year = validate_year(year)?;
    let database = &app_state.database;

    let (
        collected,
        rpt_outstanding,
        market_outstanding,
        business_outstanding,
        active_renters,
        assessed_parcels,
        registered_businesses,
    ) = tokio::try_join!(
        database.receipt.get_collected_by_source(year),
        database.rpt_quarterly.outstanding(year),
        database.market_payment.outstanding_by_year(year),
        database.business_quarterly.outstanding(year),
        database.market_renter.count_active(),
        database.rpt_land_assessment.count_by_year(year),
        database.business.count_active(),
    )?;

    let outstanding = [
        (Payment_Source::Rpt, rpt_outstanding),
        (Payment_Source::Market, market_outstanding),
        (Payment_Source::Business, business_outstanding),
    ];

    Ok(summarize(
        year,
        &collected,
        &outstanding,
        Register_Counts {
            active_renters,
            assessed_parcels,
            registered_businesses,
        },
    ))
}

pub async fn monthly_collections(
    app_state: &AppState<State>,
    year: i32,
) -> Result<Vec<Monthly_Collection>, Error> {
    let year = validate_year(year)?;
    let rows = app_state
        .database
        .receipt
        .get_monthly_collections(year)
        .await?;

    Ok(collections_grid(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_summarize() {
        let collected = vec![
            Source_Amount {
                source: String::from("market"),
                amount: dec("4500.50"),
            },
            Source_Amount {
                source: String::from("rpt"),
                amount: dec("1200"),
            },
        ];
        let outstanding = [
            (Payment_Source::Rpt, dec("300")),
            (Payment_Source::Market, dec("0")),
            (Payment_Source::Business, dec("2800")),
        ];
        let counts = Register_Counts {
            active_renters: 3,
            assessed_parcels: 10,
            registered_businesses: 4,
        };

        let summary = summarize(2026, &collected, &outstanding, counts);

        assert_eq!(summary.sources.len(), 3);
        assert_eq!(summary.sources[0].source, Payment_Source::Rpt);
        assert_eq!(summary.sources[0].collected, dec("1200"));
        assert_eq!(summary.sources[2].collected, dec("0"));
        assert_eq!(summary.total_collected, dec("5700.50"));
        assert_eq!(summary.total_outstanding, dec("3100"));
        assert_eq!(summary.assessed_parcels, 10);
    }

    #[test]
    fn test_collections_grid() {
        let rows = vec![Monthly_Collection {
            month: 3,
            source: String::from("business"),
            amount: dec("2800"),
        }];

        let grid = collections_grid(&rows);

        assert_eq!(grid.len(), 36);
        assert_eq!(grid[0].month, 1);
        assert_eq!(grid[0].source, "rpt");
        let march = &grid[(3 - 1) * 3 + 2];
        assert_eq!(march.month, 3);
        assert_eq!(march.source, "business");
        assert_eq!(march.amount, dec("2800"));
        assert_eq!(grid[35].month, 12);
    }
}
