use std::str::FromStr as _;

use bigdecimal::{BigDecimal, Zero as _};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    calculation::{
        round_money,
        rpt::{annual_tax, value_building, value_land, AnnualTax, RptRates, Valuation},
    },
    configuration::{AppState, State},
    error::Error,
    helpers::{validate_year, Classification},
    model::{
        Quarterly, RPT_Building, RPT_Land, RPT_Land_Assessment, RPT_Tax,
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct Building_Input {
    pub description: String,
    pub classification: Classification,
    pub floor_area: BigDecimal,
    pub unit_cost: BigDecimal,
    pub depreciation_rate: Option<BigDecimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assessment_Input {
    pub land_id: i64,
    pub assessment_year: i32,
    pub unit_value: BigDecimal,
    pub assessed_by: Option<String>,
    #[serde(default)]
    pub buildings: Vec<Building_Input>,
}

#[derive(Debug, Clone)]
pub struct Assessment_Plan {
    pub land: Valuation,
    pub buildings: Vec<(Building_Input, Valuation)>,
    pub total_assessed_value: BigDecimal,
    pub tax: AnnualTax,
}

#[derive(Debug, Serialize)]
pub struct Assessment_Detail {
    pub assessment: RPT_Land_Assessment,
    pub buildings: Vec<RPT_Building>,
    pub tax: Option<RPT_Tax>,
    pub quarters: Vec<Quarterly>,
}

/// Values the parcel and its improvements and derives the year's tax. Nothing
/// is written here.
pub fn plan(
    land: &RPT_Land,
    input: &Assessment_Input,
    rates: &RptRates,
) -> Result<Assessment_Plan, Error> {
    let year = validate_year(input.assessment_year)?;
    let classification = Classification::from_str(&land.classification)?;

    let land_value =
        value_land(classification, &land.lot_area, &input.unit_value)?;

    let mut total_assessed_value = land_value.assessed_value.clone();
    let mut buildings = Vec::with_capacity(input.buildings.len());

    for building in &input.buildings {
        if building.description.trim().is_empty() {
            return Err(Error::Validation(String::from(
                "building description is required",
            )));
        }

        let depreciation = building
            .depreciation_rate
            .clone()
            .unwrap_or_else(BigDecimal::zero);
        let valuation = value_building(
            building.classification,
            &building.floor_area,
            &building.unit_cost,
            &depreciation,
        )?;
        total_assessed_value += &valuation.assessed_value;
        buildings.push((building.clone(), valuation));
    }

    let total_assessed_value = round_money(&total_assessed_value);
    let tax = annual_tax(year, &total_assessed_value, rates)?;

    Ok(Assessment_Plan {
        land: land_value,
        buildings,
        total_assessed_value,
        tax,
    })
}

pub async fn save(
    app_state: &AppState<State>,
    input: Assessment_Input,
) -> Result<i64, Error> {
    let year = validate_year(input.assessment_year)?;
    let database = &app_state.database;
    let mut transaction = database.pool.begin().await?;

    let land = database
        .rpt_land
        .lock(input.land_id, &mut transaction)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("land {} not found", input.land_id))
        })?;

    if database
        .rpt_land_assessment
        .is_exists(land.id, year, &mut transaction)
        .await?
    {
        return Err(Error::InvalidState(format!(
            "land {} is already assessed for {}",
            land.tdn, year
        )));
    }

    let plan = plan(&land, &input, &app_state.config.rpt_rates)?;
    let now = Utc::now();

    let assessment = RPT_Land_Assessment {
        id: 0,
        land_id: land.id,
        assessment_year: year,
        unit_value: input.unit_value.clone(),
        market_value: plan.land.market_value.clone(),
        assessment_level: plan.land.assessment_level.clone(),
        assessed_value: plan.land.assessed_value.clone(),
        total_assessed_value: plan.total_assessed_value.clone(),
        assessed_by: input.assessed_by.clone(),
        created_at: now,
    };
    let assessment_id = database
        .rpt_land_assessment
        .insert(&assessment, &mut transaction)
        .await?;

    let buildings: Vec<RPT_Building> = plan
        .buildings
        .iter()
        .map(|(building, valuation)| RPT_Building {
            id: 0,
            assessment_id,
            description: building.description.trim().to_owned(),
            classification: building.classification.to_string(),
            floor_area: building.floor_area.clone(),
            unit_cost: building.unit_cost.clone(),
            depreciation_rate: building
                .depreciation_rate
                .clone()
                .unwrap_or_else(BigDecimal::zero),
            market_value: valuation.market_value.clone(),
            assessment_level: valuation.assessment_level.clone(),
            assessed_value: valuation.assessed_value.clone(),
        })
        .collect();
    database
        .rpt_building
        .insert_many(&buildings, &mut transaction)
        .await?;

    let rates = &app_state.config.rpt_rates;
    let tax = RPT_Tax {
        id: 0,
        assessment_id,
        tax_year: year,
        assessed_value: plan.tax.assessed_value.clone(),
        basic_rate: rates.basic_rate.clone(),
        sef_rate: rates.sef_rate.clone(),
        basic_tax: plan.tax.basic_tax.clone(),
        sef_tax: plan.tax.sef_tax.clone(),
        annual_tax: plan.tax.annual_tax.clone(),
        created_at: now,
    };
    let tax_id = database.rpt_tax.insert(&tax, &mut transaction).await?;

    database
        .rpt_quarterly
        .insert_installments(tax_id, year, &plan.tax.installments, &mut transaction)
        .await?;

    transaction.commit().await?;

    tracing::info!(
        "Saved assessment {} of land {} for {}: annual tax {}",
        assessment_id,
        land.tdn,
        year,
        plan.tax.annual_tax
    );

    Ok(assessment_id)
}

pub async fn get_detail(
    app_state: &AppState<State>,
    id: i64,
) -> Result<Assessment_Detail, Error> {
    let database = &app_state.database;
    let assessment = database
        .rpt_land_assessment
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("assessment {} not found", id)))?;

    let (buildings, tax) = tokio::try_join!(
        database.rpt_building.get_by_assessment(id),
        database.rpt_tax.get_by_assessment(id),
    )?;

    let quarters = match &tax {
        Some(tax) => database.rpt_quarterly.get_by_parent(tax.id).await?,
        None => vec![],
    };

    Ok(Assessment_Detail {
        assessment,
        buildings,
        tax,
        quarters,
    })
}
