use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use csv::Error as CSV_ERROR;
use serde_json::Error as JSON_ERROR;
use sqlx::error::Error as SQL_ERROR;
use std::num::TryFromIntError as TRY_FROM_INT_ERROR;
use std::string::FromUtf8Error as FROM_UTF8_ERROR;
use std::{env::VarError, io::Error as IO_ERROR, num::ParseIntError};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("{0}")]
    TryFromIntError(#[from] TRY_FROM_INT_ERROR),

    #[error("{0}")]
    FromUtf8Error(#[from] FROM_UTF8_ERROR),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("CSV error: {0}")]
    CsvError(#[from] CSV_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Server end with error: {0}")]
    ServerError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized(),
}

impl Error {
    fn is_duplicate_entry(&self) -> bool {
        match self {
            Error::SQL(SQL_ERROR::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        if self.is_duplicate_entry() {
            return StatusCode::CONFLICT;
        }

        match self {
            Error::Validation(_)
            | Error::INT(_)
            | Error::BigDecimalError(_) => StatusCode::BAD_REQUEST,

            Error::Unauthorized() => StatusCode::UNAUTHORIZED,

            Error::NotFound(_) | Error::SQL(SQL_ERROR::RowNotFound) => {
                StatusCode::NOT_FOUND
            },

            Error::InvalidState(_) => StatusCode::CONFLICT,

            Error::Io(_)
            | Error::SQL(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::TryFromIntError(_)
            | Error::FromUtf8Error(_)
            | Error::JsonError(_)
            | Error::CsvError(_)
            | Error::SetGlobalDefaultError(_)
            | Error::ConfigurationError(_)
            | Error::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound("land 4".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::InvalidState("already paid".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(Error::Unauthorized().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::SQL(SQL_ERROR::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::ServerError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_errors_are_bad_requests() {
        let decimal = "12.3.4".parse::<bigdecimal::BigDecimal>().unwrap_err();
        assert_eq!(
            Error::from(decimal).status_code(),
            StatusCode::BAD_REQUEST
        );

        let int = "x".parse::<u16>().unwrap_err();
        assert_eq!(Error::from(int).status_code(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let response =
            Error::NotFound("renter 12".into()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], 404);
        assert_eq!(value["error"], "Not Found");
        assert_eq!(value["message"], "Not found: renter 12");
    }
}
