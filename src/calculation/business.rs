use bigdecimal::{BigDecimal, Zero as _};

use crate::{
    calculation::{
        round_money,
        rpt::{quarterly_installments, Installment},
    },
    error::Error,
    helpers::Business_Category,
};

/// One row of a graduated tax schedule: gross sales from `min` up to and
/// including `max` pay `base` plus `rate` on the excess over `min`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    pub min: BigDecimal,
    pub max: Option<BigDecimal>,
    pub rate: BigDecimal,
    pub base: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessTax {
    pub gross_sales: BigDecimal,
    pub tax_rate: BigDecimal,
    pub business_tax: BigDecimal,
    pub mayors_permit: BigDecimal,
    pub sanitary_fee: BigDecimal,
    pub total: BigDecimal,
    pub installments: Vec<Installment>,
}

fn bracket(min: i64, max: Option<i64>, rate: &str, base: i64) -> Bracket {
    Bracket {
        min: BigDecimal::from(min),
        max: max.map(BigDecimal::from),
        rate: rate.parse().unwrap_or_default(),
        base: BigDecimal::from(base),
    }
}

pub fn schedule(category: Business_Category) -> Vec<Bracket> {
    match category {
        Business_Category::Manufacturer => vec![
            bracket(0, Some(1_000_000), "0.005", 0),
            bracket(1_000_000, Some(6_500_000), "0.004", 5_000),
            bracket(6_500_000, None, "0.003", 27_000),
        ],
        Business_Category::Wholesaler => vec![
            bracket(0, Some(1_000_000), "0.0075", 0),
            bracket(1_000_000, None, "0.005", 7_500),
        ],
        Business_Category::Retailer => vec![
            bracket(0, Some(400_000), "0.02", 0),
            bracket(400_000, None, "0.01", 8_000),
        ],
        Business_Category::Contractor => vec![
            bracket(0, Some(2_000_000), "0.0075", 0),
            bracket(2_000_000, None, "0.005", 15_000),
        ],
        Business_Category::Financial => vec![bracket(0, None, "0.005", 0)],
        Business_Category::Services => vec![
            bracket(0, Some(500_000), "0.01", 0),
            bracket(500_000, None, "0.0075", 5_000),
        ],
    }
}

/// Flat mayor's permit and sanitary fees.
pub fn regulatory_fees(category: Business_Category) -> (BigDecimal, BigDecimal) {
    let (permit, sanitary) = match category {
        Business_Category::Manufacturer => (2_000, 500),
        Business_Category::Wholesaler => (1_500, 400),
        Business_Category::Retailer => (500, 200),
        Business_Category::Contractor => (1_500, 300),
        Business_Category::Financial => (3_000, 500),
        Business_Category::Services => (800, 200),
    };

    (BigDecimal::from(permit), BigDecimal::from(sanitary))
}

pub fn find_bracket<'a>(
    brackets: &'a [Bracket],
    gross_sales: &BigDecimal,
) -> Option<&'a Bracket> {
    brackets.iter().find(|b| {
        gross_sales >= &b.min
            && b.max.as_ref().map_or(true, |max| gross_sales <= max)
    })
}

pub fn assess(
    category: Business_Category,
    year: i32,
    gross_sales: &BigDecimal,
) -> Result<BusinessTax, Error> {
    if gross_sales < &BigDecimal::zero() {
        return Err(Error::Validation(String::from(
            "gross sales must not be negative",
        )));
    }

    let brackets = schedule(category);
    let bracket = find_bracket(&brackets, gross_sales).ok_or_else(|| {
        Error::Validation(format!(
            "no {} bracket for gross sales {}",
            category, gross_sales
        ))
    })?;

    let business_tax = round_money(
        &(&bracket.base + (gross_sales - &bracket.min) * &bracket.rate),
    );
    let (mayors_permit, sanitary_fee) = regulatory_fees(category);
    let total = &business_tax + &mayors_permit + &sanitary_fee;
    let installments = quarterly_installments(year, &total)?;

    Ok(BusinessTax {
        gross_sales: round_money(gross_sales),
        tax_rate: bracket.rate.clone(),
        business_tax,
        mayors_permit,
        sanitary_fee,
        total,
        installments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_schedules_are_continuous() {
        for category in [
            Business_Category::Manufacturer,
            Business_Category::Wholesaler,
            Business_Category::Retailer,
            Business_Category::Contractor,
            Business_Category::Financial,
            Business_Category::Services,
        ] {
            let brackets = schedule(category);
            for pair in brackets.windows(2) {
                let max = pair[0].max.clone().unwrap();
                assert_eq!(max, pair[1].min, "{} gap", category);
                let at_max =
                    &pair[0].base + (&max - &pair[0].min) * &pair[0].rate;
                assert_eq!(at_max, pair[1].base, "{} jump", category);
            }
            assert!(brackets.last().unwrap().max.is_none());
        }
    }

    #[test]
    fn test_retailer_brackets() {
        let tax =
            assess(Business_Category::Retailer, 2026, &dec("400000")).unwrap();
        assert_eq!(tax.business_tax, dec("8000"));
        assert_eq!(tax.tax_rate, dec("0.02"));

        let tax =
            assess(Business_Category::Retailer, 2026, &dec("650000")).unwrap();
        assert_eq!(tax.business_tax, dec("10500"));
        assert_eq!(tax.total, dec("11200"));
        assert_eq!(tax.installments.len(), 4);
        assert_eq!(tax.installments[0].amount, dec("2800"));
    }

    #[test]
    fn test_installments_sum_to_total() {
        let tax = assess(Business_Category::Manufacturer, 2026, &dec("7333333.33"))
            .unwrap();
        let sum = tax
            .installments
            .iter()
            .fold(BigDecimal::zero(), |acc, i| acc + &i.amount);
        assert_eq!(sum, tax.total);
    }

    #[test]
    fn test_negative_sales_rejected() {
        assert!(matches!(
            assess(Business_Category::Services, 2026, &dec("-1")),
            Err(Error::Validation(_))
        ));
    }
}
