//! Real property tax endpoints
//!
//! Owners, parcels, assessments and billing statements.

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    controller::CreatedResponse,
    error::Error,
    handler::{
        registry::{self, Land_Input, Owner_Input},
        rpt_assessment::{self, Assessment_Input},
        rpt_billing::{self, Billing_Query},
    },
    helpers::{authorize, page},
};

// =============================================================================
// Owners
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OwnersQuery {
    search: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[get("/rpt/owners")]
pub async fn owners(
    state: web::Data<AppState<State>>,
    query: web::Query<OwnersQuery>,
) -> Result<impl Responder, Error> {
    let (skip, limit) = page(query.skip, query.limit);
    let search = query
        .search
        .as_ref()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty());
    let data = state.database.rpt_owner.get_all(search, skip, limit).await?;

    Ok(web::Json(data))
}

#[post("/rpt/owners")]
pub async fn create_owner(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Owner_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let data = registry::owner(body.into_inner())?;
    let id = state.database.rpt_owner.insert(&data).await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

// =============================================================================
// Lands
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LandsQuery {
    owner_id: Option<i64>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[get("/rpt/lands")]
pub async fn lands(
    state: web::Data<AppState<State>>,
    query: web::Query<LandsQuery>,
) -> Result<impl Responder, Error> {
    let (skip, limit) = page(query.skip, query.limit);
    let data = state
        .database
        .rpt_land
        .get_by_owner(query.owner_id, skip, limit)
        .await?;

    Ok(web::Json(data))
}

#[post("/rpt/lands")]
pub async fn create_land(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Land_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let id = registry::register_land(&state, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

// =============================================================================
// Assessments
// =============================================================================

#[post("/rpt/assessments")]
pub async fn create_assessment(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Assessment_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let id = rpt_assessment::save(&state, body.into_inner()).await?;
    let data = rpt_assessment::get_detail(&state, id).await?;

    Ok(HttpResponse::Created().json(data))
}

#[get("/rpt/assessments/{id}")]
pub async fn assessment(
    state: web::Data<AppState<State>>,
    path: web::Path<i64>,
) -> Result<impl Responder, Error> {
    let data = rpt_assessment::get_detail(&state, path.into_inner()).await?;

    Ok(web::Json(data))
}

// =============================================================================
// Billing
// =============================================================================

#[get("/rpt/billing")]
pub async fn billing(
    state: web::Data<AppState<State>>,
    query: web::Query<Billing_Query>,
) -> Result<impl Responder, Error> {
    let data = rpt_billing::statement(&state, query.into_inner()).await?;

    Ok(web::Json(data))
}
