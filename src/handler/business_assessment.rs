use std::str::FromStr as _;

use bigdecimal::BigDecimal;
use chrono::Utc;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::{
    calculation::business::{assess, BusinessTax},
    configuration::{AppState, State},
    error::Error,
    helpers::{validate_year, Business_Category},
    model::{Business, Business_Assessment, Quarterly},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Business_Assessment_Input {
    pub tax_year: i32,
    pub gross_sales: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct Assessment_With_Quarters {
    #[serde(flatten)]
    pub assessment: Business_Assessment,
    pub quarters: Vec<Quarterly>,
}

pub fn plan(
    business: &Business,
    input: &Business_Assessment_Input,
) -> Result<BusinessTax, Error> {
    let year = validate_year(input.tax_year)?;
    let category = Business_Category::from_str(&business.category)?;
    assess(category, year, &input.gross_sales)
}

pub async fn save(
    app_state: &AppState<State>,
    business_id: i64,
    input: Business_Assessment_Input,
) -> Result<i64, Error> {
    let database = &app_state.database;
    let year = validate_year(input.tax_year)?;
    let mut transaction = database.pool.begin().await?;

    let business = database
        .business
        .lock(business_id, &mut transaction)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("business {} not found", business_id))
        })?;

    if database
        .business_assessment
        .is_exists(business.id, year, &mut transaction)
        .await?
    {
        return Err(Error::InvalidState(format!(
            "business {} is already assessed for {}",
            business.business_name, year
        )));
    }

    let tax = plan(&business, &input)?;

    let assessment = Business_Assessment {
        id: 0,
        business_id: business.id,
        tax_year: year,
        gross_sales: tax.gross_sales.clone(),
        tax_rate: tax.tax_rate.clone(),
        business_tax: tax.business_tax.clone(),
        mayors_permit: tax.mayors_permit.clone(),
        sanitary_fee: tax.sanitary_fee.clone(),
        total: tax.total.clone(),
        created_at: Utc::now(),
    };
    let assessment_id = database
        .business_assessment
        .insert(&assessment, &mut transaction)
        .await?;

    database
        .business_quarterly
        .insert_installments(assessment_id, year, &tax.installments, &mut transaction)
        .await?;

    transaction.commit().await?;

    tracing::info!(
        "Assessed business {} for {}: total {}",
        business.business_name,
        year,
        tax.total
    );

    Ok(assessment_id)
}

pub async fn get_by_business(
    app_state: &AppState<State>,
    business_id: i64,
) -> Result<Vec<Assessment_With_Quarters>, Error> {
    let database = &app_state.database;

    if database.business.get(business_id).await?.is_none() {
        return Err(Error::NotFound(format!(
            "business {} not found",
            business_id
        )));
    }

    let assessments = database
        .business_assessment
        .get_by_business(business_id)
        .await?;

    let quarters = try_join_all(
        assessments
            .iter()
            .map(|item| database.business_quarterly.get_by_parent(item.id)),
    )
    .await?;

    let data = assessments
        .into_iter()
        .zip(quarters)
        .map(|(assessment, quarters)| Assessment_With_Quarters {
            assessment,
            quarters,
        })
        .collect();

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn business(category: &str) -> Business {
        Business {
            id: 5,
            owner_name: String::from("Jose Rizal"),
            business_name: String::from("Rizal Sari-Sari"),
            address: String::from("Mabini St."),
            category: category.to_owned(),
            tin: None,
            status: String::from("active"),
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_uses_business_category() {
        let input = Business_Assessment_Input {
            tax_year: 2026,
            gross_sales: BigDecimal::from_str("650000").unwrap(),
        };
        let tax = plan(&business("retailer"), &input).unwrap();

        assert_eq!(tax.business_tax, BigDecimal::from(10500));
        assert_eq!(tax.total, BigDecimal::from(11200));
        assert_eq!(tax.installments.len(), 4);
    }

    #[test]
    fn test_plan_rejects_bad_input() {
        let input = Business_Assessment_Input {
            tax_year: 2026,
            gross_sales: BigDecimal::from(1000),
        };
        assert!(plan(&business("bakery"), &input).is_err());

        let input = Business_Assessment_Input {
            tax_year: 99,
            gross_sales: BigDecimal::from(1000),
        };
        assert!(matches!(
            plan(&business("retailer"), &input),
            Err(Error::Validation(_))
        ));
    }
}
