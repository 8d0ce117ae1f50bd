//! Treasury dashboard endpoints
//!
//! Collection summary, monthly collections and the receipts register.

use actix_web::{get, web, HttpResponse};
use chrono::{Datelike as _, NaiveDate};
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::treasury,
    helpers::{page, to_csv_response, today},
};

// =============================================================================
// Summary
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    year: Option<i32>,
}

#[get("/treasury/summary")]
pub async fn summary(
    state: web::Data<AppState<State>>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, Error> {
    let year = query.year.unwrap_or_else(|| today().year());
    let data = treasury::summary(&state, year).await?;

    Ok(HttpResponse::Ok().json(data))
}

// =============================================================================
// Collections
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CollectionsQuery {
    year: Option<i32>,
    format: Option<String>,
}

#[get("/treasury/collections")]
pub async fn collections(
    state: web::Data<AppState<State>>,
    query: web::Query<CollectionsQuery>,
) -> Result<HttpResponse, Error> {
    let year = query.year.unwrap_or_else(|| today().year());
    let data = treasury::monthly_collections(&state, year).await?;

    match query.format.as_deref() {
        Some("csv") => {
            to_csv_response(&data, &format!("collections-{}.csv", year))
        },
        _ => Ok(HttpResponse::Ok().json(data)),
    }
}

// =============================================================================
// Receipts
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ReceiptsQuery {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    skip: Option<i64>,
    limit: Option<i64>,
    format: Option<String>,
}

#[get("/treasury/receipts")]
pub async fn receipts(
    state: web::Data<AppState<State>>,
    query: web::Query<ReceiptsQuery>,
) -> Result<HttpResponse, Error> {
    let to = query.to.unwrap_or_else(today);
    let from = query
        .from
        .or_else(|| NaiveDate::from_ymd_opt(to.year(), 1, 1))
        .unwrap_or(to);

    if from > to {
        return Err(Error::Validation(format!(
            "from {} is after to {}",
            from, to
        )));
    }

    let (skip, limit) = page(query.skip, query.limit);
    let data = state
        .database
        .receipt
        .get_between(from, to, skip, limit)
        .await?;

    match query.format.as_deref() {
        Some("csv") => to_csv_response(&data, "receipts.csv"),
        _ => Ok(HttpResponse::Ok().json(data)),
    }
}
