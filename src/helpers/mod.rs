pub use self::enums::{
    Application_Status, Business_Category, Classification, Market_Charge,
    Payment_Source, Payment_Status, Renter_Status, Stall_Status,
};

mod enums;

use actix_web::{http::header, HttpRequest, HttpResponse};
use chrono::{Local, NaiveDate};

use crate::error::Error;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Checks the `Authorization: Bearer <token>` header against the configured
/// token.
pub fn authorize(request: &HttpRequest, token: &str) -> Result<(), Error> {
    let value = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => value,
        None => return Err(Error::Unauthorized()),
    };

    let value = value.to_str().map_err(|_| Error::Unauthorized())?;

    match value.strip_prefix("Bearer ") {
        Some(given) if !token.is_empty() && given == token => Ok(()),
        _ => Err(Error::Unauthorized()),
    }
}

pub fn page(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(20).clamp(1, MAX_PAGE_SIZE);
    (skip, limit)
}

pub fn validate_year(year: i32) -> Result<i32, Error> {
    if !(1900..=2200).contains(&year) {
        return Err(Error::Validation(format!("year out of range: {}", year)));
    }
    Ok(year)
}

pub fn require_text(name: &str, value: &str) -> Result<String, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", name)));
    }
    Ok(value.to_owned())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Reads an optional JSON body. An empty body gives `T::default()`; anything
/// else must parse as `T`.
pub fn optional_json<T>(body: &[u8]) -> Result<T, Error>
where
    T: serde::de::DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| Error::Validation(format!("invalid request body: {}", e)))
}

/// Generate a CSV response from serializable data
pub fn to_csv_response<T: serde::Serialize>(
    data: &[T],
    filename: &str,
) -> Result<HttpResponse, Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)?;
    }
    let csv_data = wtr
        .into_inner()
        .map_err(|e| Error::ServerError(format!("CSV writer error: {}", e)))?;
    let csv_string = String::from_utf8(csv_data)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(csv_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test::TestRequest};
    use serde::Serialize;

    #[test]
    fn test_authorize() {
        let request = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer s3cret"))
            .to_http_request();
        assert!(authorize(&request, "s3cret").is_ok());
        assert!(matches!(
            authorize(&request, "other"),
            Err(Error::Unauthorized())
        ));

        let missing = TestRequest::default().to_http_request();
        assert!(authorize(&missing, "s3cret").is_err());

        let basic = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic s3cret"))
            .to_http_request();
        assert!(authorize(&basic, "s3cret").is_err());
    }

    #[test]
    fn test_empty_token_never_authorizes() {
        let request = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert!(authorize(&request, "").is_err());
    }

    #[test]
    fn test_validate_year() {
        assert_eq!(validate_year(2026).unwrap(), 2026);
        assert!(matches!(validate_year(26), Err(Error::Validation(_))));
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("payor", "  Juan Dela Cruz ").unwrap(), "Juan Dela Cruz");
        assert!(require_text("payor", "   ").is_err());
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page(None, None), (0, 20));
        assert_eq!(page(Some(-5), Some(1000)), (0, MAX_PAGE_SIZE));
        assert_eq!(page(Some(40), Some(0)), (40, 1));
    }

    #[derive(Serialize)]
    struct Row {
        month: u32,
        source: &'static str,
        amount: String,
    }

    #[actix_web::test]
    async fn test_csv_response() {
        let rows = vec![
            Row {
                month: 1,
                source: "rpt",
                amount: "1500.00".into(),
            },
            Row {
                month: 1,
                source: "market",
                amount: "820.50".into(),
            },
        ];

        let response = to_csv_response(&rows, "collections.csv").unwrap();
        assert_eq!(
            response.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"collections.csv\""
        );

        let body = to_bytes(response.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(
            text,
            "month,source,amount\n1,rpt,1500.00\n1,market,820.50\n"
        );
    }

    #[derive(Debug, Default, serde::Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Window {
        start_date: Option<NaiveDate>,
    }

    #[test]
    fn test_optional_json() {
        let empty: Window = optional_json(b"").unwrap();
        assert_eq!(empty, Window::default());

        let blank: Window = optional_json(b" \n").unwrap();
        assert_eq!(blank, Window::default());

        let given: Window =
            optional_json(br#"{"start_date":"2026-05-01"}"#).unwrap();
        assert_eq!(given.start_date, NaiveDate::from_ymd_opt(2026, 5, 1));

        assert!(matches!(
            optional_json::<Window>(br#"{"start_dat":"2026-05-01"}"#),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            optional_json::<Window>(b"{\"start_date\":"),
            Err(Error::Validation(_))
        ));
    }
}
