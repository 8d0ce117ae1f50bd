//! Business tax endpoints

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    controller::CreatedResponse,
    error::Error,
    handler::{
        business_assessment::{self, Business_Assessment_Input},
        registry::{self, Business_Input},
    },
    helpers::{authorize, page},
};

#[derive(Debug, Deserialize)]
pub struct BusinessesQuery {
    search: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[get("/business")]
pub async fn businesses(
    state: web::Data<AppState<State>>,
    query: web::Query<BusinessesQuery>,
) -> Result<impl Responder, Error> {
    let (skip, limit) = page(query.skip, query.limit);
    let search = query
        .search
        .as_ref()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty());
    let data = state.database.business.get_all(search, skip, limit).await?;

    Ok(web::Json(data))
}

#[post("/business")]
pub async fn create_business(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Business_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let data = registry::business(body.into_inner())?;
    let id = state.database.business.insert(&data).await?;
    tracing::info!("Registered business {} as {}", id, data.business_name);

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

#[get("/business/{id}/assessments")]
pub async fn assessments(
    state: web::Data<AppState<State>>,
    path: web::Path<i64>,
) -> Result<impl Responder, Error> {
    let data =
        business_assessment::get_by_business(&state, path.into_inner()).await?;

    Ok(web::Json(data))
}

#[post("/business/{id}/assessments")]
pub async fn create_assessment(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    path: web::Path<i64>,
    body: web::Json<Business_Assessment_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let business_id = path.into_inner();
    let id =
        business_assessment::save(&state, business_id, body.into_inner())
            .await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}
