//! Public market endpoints
//!
//! Stall classes, stalls, applications, renters and monthly billing.

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    controller::CreatedResponse,
    error::Error,
    handler::{
        market_application::{
            self, Application_Input, Approval_Input, Rejection_Input,
        },
        market_billing::{self, Billing_Input},
        market_renter::{self, Termination_Input},
        registry::{self, Stall_Class_Input, Stall_Input},
    },
    helpers::{
        authorize, optional_json, page, Application_Status, Renter_Status,
        Stall_Status,
    },
};

// =============================================================================
// Stall classes
// =============================================================================

#[get("/market/classes")]
pub async fn classes(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let data = state.database.market_stall_class.get_all().await?;
    Ok(web::Json(data))
}

#[post("/market/classes")]
pub async fn create_class(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Stall_Class_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let data = registry::stall_class(body.into_inner())?;
    let id = state.database.market_stall_class.insert(&data).await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

// =============================================================================
// Stalls
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct StallsQuery {
    status: Option<Stall_Status>,
    section: Option<String>,
}

#[get("/market/stalls")]
pub async fn stalls(
    state: web::Data<AppState<State>>,
    query: web::Query<StallsQuery>,
) -> Result<impl Responder, Error> {
    let query = query.into_inner();
    let data = state
        .database
        .market_stall
        .get_all(query.status.map(|status| status.to_string()), query.section)
        .await?;

    Ok(web::Json(data))
}

#[post("/market/stalls")]
pub async fn create_stall(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Stall_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let id = registry::register_stall(&state, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

// =============================================================================
// Applications
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ApplicationsQuery {
    status: Option<Application_Status>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[get("/market/applications")]
pub async fn applications(
    state: web::Data<AppState<State>>,
    query: web::Query<ApplicationsQuery>,
) -> Result<impl Responder, Error> {
    let (skip, limit) = page(query.skip, query.limit);
    let data = state
        .database
        .market_application
        .get_all(query.status.map(|status| status.to_string()), skip, limit)
        .await?;

    Ok(web::Json(data))
}

#[post("/market/applications")]
pub async fn create_application(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Application_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let id = market_application::submit(&state, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

#[post("/market/applications/{id}/approve")]
pub async fn approve_application(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let input: Approval_Input = optional_json(&body)?;
    let data =
        market_application::approve(&state, path.into_inner(), input).await?;

    Ok(web::Json(data))
}

#[post("/market/applications/{id}/reject")]
pub async fn reject_application(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let id = path.into_inner();
    let input: Rejection_Input = optional_json(&body)?;
    market_application::reject(&state, id, input).await?;

    Ok(web::Json(StatusResponse {
        id,
        status: Application_Status::Rejected.to_string(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub id: i64,
    pub status: String,
}

// =============================================================================
// Renters
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RentersQuery {
    status: Option<Renter_Status>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[get("/market/renters")]
pub async fn renters(
    state: web::Data<AppState<State>>,
    query: web::Query<RentersQuery>,
) -> Result<impl Responder, Error> {
    let (skip, limit) = page(query.skip, query.limit);
    let data = state
        .database
        .market_renter
        .get_all(query.status.map(|status| status.to_string()), skip, limit)
        .await?;

    Ok(web::Json(data))
}

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    as_of: Option<NaiveDate>,
}

#[get("/market/renters/{id}/payments")]
pub async fn renter_payments(
    state: web::Data<AppState<State>>,
    path: web::Path<i64>,
    query: web::Query<LedgerQuery>,
) -> Result<impl Responder, Error> {
    let data =
        market_renter::get_ledger(&state, path.into_inner(), query.as_of)
            .await?;

    Ok(web::Json(data))
}

#[post("/market/renters/{id}/terminate")]
pub async fn terminate_renter(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let id = path.into_inner();
    let input: Termination_Input = optional_json(&body)?;
    market_renter::terminate(&state, id, input).await?;

    Ok(web::Json(StatusResponse {
        id,
        status: Renter_Status::Terminated.to_string(),
    }))
}

// =============================================================================
// Billing
// =============================================================================

#[post("/market/billing")]
pub async fn billing(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Billing_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let Billing_Input { year, month } = body.into_inner();
    let data = market_billing::generate(&state, year, month).await?;

    Ok(web::Json(data))
}
