//! Payment endpoints

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::payment::{self, Payment_Input},
    helpers::authorize,
};

#[post("/payments")]
pub async fn pay(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<Payment_Input>,
) -> Result<impl Responder, Error> {
    authorize(&req, &state.config.auth)?;

    let receipt_id = payment::proceed(&state, body.into_inner()).await?;
    let data = payment::get_receipt(&state, receipt_id).await?;

    Ok(HttpResponse::Created().json(data))
}

#[get("/payments/receipts/{id}")]
pub async fn receipt(
    state: web::Data<AppState<State>>,
    path: web::Path<i64>,
) -> Result<impl Responder, Error> {
    let data = payment::get_receipt(&state, path.into_inner()).await?;

    Ok(web::Json(data))
}
