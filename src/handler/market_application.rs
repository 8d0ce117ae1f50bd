use bigdecimal::{BigDecimal, Zero as _};
use chrono::{Datelike as _, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    calculation::market::{lease_charges, LeaseCharges, MarketTerms},
    configuration::{AppState, State},
    error::Error,
    handler::payment::issue_receipt,
    helpers::{
        require_text, today, Application_Status, Market_Charge,
        Payment_Source, Payment_Status, Renter_Status, Stall_Status,
    },
    model::{
        Market_Application, Market_Payment, Market_Renter, Market_Stall,
        Market_Stall_Class,
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct Application_Input {
    pub stall_id: i64,
    pub applicant_name: String,
    pub business_name: String,
    pub contact_no: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Approval_Input {
    pub start_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rejection_Input {
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Approval_Outcome {
    pub application_id: i64,
    pub renter_id: i64,
    pub stall_id: i64,
    pub receipt_id: i64,
    pub or_number: String,
    pub charges: LeaseCharges,
    pub rejected_applications: u64,
}

fn ensure_status(
    application: &Market_Application,
    expected: Application_Status,
) -> Result<(), Error> {
    if application.status != expected.as_str() {
        return Err(Error::InvalidState(format!(
            "application {} is {}",
            application.id, application.status
        )));
    }
    Ok(())
}

fn ensure_available(stall: &Market_Stall) -> Result<(), Error> {
    if stall.status != Stall_Status::Available.as_str() {
        return Err(Error::InvalidState(format!(
            "stall {} is {}",
            stall.code, stall.status
        )));
    }
    Ok(())
}

/// Checks that the pending application can take the stall and prices the
/// lease starting on `start_date`.
pub fn plan_approval(
    application: &Market_Application,
    stall: &Market_Stall,
    class: &Market_Stall_Class,
    start_date: NaiveDate,
    terms: &MarketTerms,
) -> Result<(Market_Renter, LeaseCharges), Error> {
    ensure_status(application, Application_Status::Pending)?;
    ensure_available(stall)?;

    if application.stall_id != stall.id {
        return Err(Error::InvalidState(format!(
            "application {} is not for stall {}",
            application.id, stall.code
        )));
    }

    let charges = lease_charges(
        &stall.area,
        &class.rate_per_sqm,
        &class.rights_fee,
        start_date,
        terms,
    )?;

    let renter = Market_Renter {
        id: 0,
        application_id: application.id,
        stall_id: stall.id,
        renter_name: application.applicant_name.clone(),
        business_name: application.business_name.clone(),
        contact_no: application.contact_no.clone(),
        start_date,
        end_date: None,
        monthly_rent: charges.monthly_rent.clone(),
        security_bond: charges.security_bond.clone(),
        status: Renter_Status::Active.to_string(),
        created_at: Utc::now(),
    };

    Ok((renter, charges))
}

/// Ledger rows created on approval: the rights fee and security bond settled
/// on `paid_on` under `receipt_id`, and the first month's rent left unpaid.
/// `start_date` only sets the charge period.
pub fn opening_charges(
    renter_id: i64,
    receipt_id: i64,
    start_date: NaiveDate,
    paid_on: NaiveDate,
    charges: &LeaseCharges,
) -> Vec<Market_Payment> {
    let settled = |charge: Market_Charge, amount: &BigDecimal| Market_Payment {
        id: 0,
        renter_id,
        charge: charge.to_string(),
        period_year: start_date.year(),
        period_month: start_date.month() as i32,
        due_date: start_date,
        amount: amount.clone(),
        penalty: BigDecimal::zero(),
        discount: BigDecimal::zero(),
        amount_paid: Some(amount.clone()),
        status: Payment_Status::Paid.to_string(),
        receipt_id: Some(receipt_id),
        paid_on: Some(paid_on),
    };

    vec![
        settled(Market_Charge::RightsFee, &charges.rights_fee),
        settled(Market_Charge::SecurityBond, &charges.security_bond),
        Market_Payment {
            id: 0,
            renter_id,
            charge: Market_Charge::Rent.to_string(),
            period_year: start_date.year(),
            period_month: start_date.month() as i32,
            due_date: charges.first_rent_due,
            amount: charges.first_rent.clone(),
            penalty: BigDecimal::zero(),
            discount: BigDecimal::zero(),
            amount_paid: None,
            status: Payment_Status::Unpaid.to_string(),
            receipt_id: None,
            paid_on: None,
        },
    ]
}

pub async fn submit(
    app_state: &AppState<State>,
    input: Application_Input,
) -> Result<i64, Error> {
    let applicant_name = require_text("applicant name", &input.applicant_name)?;
    let business_name = require_text("business name", &input.business_name)?;

    let stall = app_state
        .database
        .market_stall
        .get(input.stall_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("stall {} not found", input.stall_id))
        })?;
    ensure_available(&stall)?;

    let application = Market_Application {
        id: 0,
        stall_id: stall.id,
        applicant_name,
        business_name,
        contact_no: input.contact_no,
        address: input.address,
        status: Application_Status::Pending.to_string(),
        remarks: None,
        applied_at: Utc::now(),
        decided_at: None,
    };

    let id = app_state
        .database
        .market_application
        .insert(&application)
        .await?;

    tracing::info!("Application {} filed for stall {}", id, stall.code);

    Ok(id)
}

pub async fn approve(
    app_state: &AppState<State>,
    id: i64,
    input: Approval_Input,
) -> Result<Approval_Outcome, Error> {
    let database = &app_state.database;
    let start_date = input.start_date.unwrap_or_else(today);
    let payment_method = input
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .unwrap_or("cash")
        .to_owned();

    let paid_on = today();

    let stall_id = database
        .market_application
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("application {} not found", id)))?
        .stall_id;

    let mut transaction = database.pool.begin().await?;

    // stall row first, then the application; approvals of one stall
    // serialize on the stall lock
    let (stall, class) = database
        .market_stall
        .lock_with_class(stall_id, &mut transaction)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("stall {} not found", stall_id))
        })?;

    let application = database
        .market_application
        .lock(id, &mut transaction)
        .await?
        .ok_or_else(|| Error::NotFound(format!("application {} not found", id)))?;
    ensure_status(&application, Application_Status::Pending)?;

    let (renter, charges) = plan_approval(
        &application,
        &stall,
        &class,
        start_date,
        &app_state.config.market_terms,
    )?;

    let renter_id = database
        .market_renter
        .insert(&renter, &mut transaction)
        .await?;

    database
        .market_stall
        .set_status(stall.id, Stall_Status::Occupied.as_str(), &mut transaction)
        .await?;

    let decided_at = Utc::now();
    database
        .market_application
        .decide(
            application.id,
            Application_Status::Approved,
            None,
            decided_at,
            &mut transaction,
        )
        .await?;

    let rejected_applications = database
        .market_application
        .reject_competing(stall.id, application.id, decided_at, &mut transaction)
        .await?;

    let upfront = &charges.rights_fee + &charges.security_bond;
    let (receipt_id, or_number) = issue_receipt(
        app_state,
        Payment_Source::Market,
        &application.applicant_name,
        &payment_method,
        &upfront,
        paid_on,
        &mut transaction,
    )
    .await?;

    let ledger =
        opening_charges(renter_id, receipt_id, start_date, paid_on, &charges);
    database
        .market_payment
        .insert_many(&ledger, &mut transaction)
        .await?;

    transaction.commit().await?;

    tracing::info!(
        "Approved application {}: renter {} on stall {}, {} issued",
        application.id,
        renter_id,
        stall.code,
        or_number
    );

    Ok(Approval_Outcome {
        application_id: application.id,
        renter_id,
        stall_id: stall.id,
        receipt_id,
        or_number,
        charges,
        rejected_applications,
    })
}

pub async fn reject(
    app_state: &AppState<State>,
    id: i64,
    input: Rejection_Input,
) -> Result<(), Error> {
    let database = &app_state.database;
    let mut transaction = database.pool.begin().await?;

    let application = database
        .market_application
        .lock(id, &mut transaction)
        .await?
        .ok_or_else(|| Error::NotFound(format!("application {} not found", id)))?;
    ensure_status(&application, Application_Status::Pending)?;

    database
        .market_application
        .decide(
            application.id,
            Application_Status::Rejected,
            input.remarks.as_deref(),
            Utc::now(),
            &mut transaction,
        )
        .await?;

    transaction.commit().await?;

    tracing::info!("Rejected application {}", application.id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms() -> MarketTerms {
        MarketTerms {
            security_bond_months: 3,
            due_day: 20,
            surcharge_rate: dec("0.25"),
        }
    }

    fn application(status: Application_Status) -> Market_Application {
        Market_Application {
            id: 11,
            stall_id: 4,
            applicant_name: String::from("Maria Santos"),
            business_name: String::from("Santos Dry Goods"),
            contact_no: Some(String::from("0917")),
            address: None,
            status: status.to_string(),
            remarks: None,
            applied_at: Utc::now(),
            decided_at: None,
        }
    }

    fn stall(status: Stall_Status) -> Market_Stall {
        Market_Stall {
            id: 4,
            code: String::from("DG-04"),
            section: String::from("dry goods"),
            class_id: 2,
            area: dec("6"),
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    fn class() -> Market_Stall_Class {
        Market_Stall_Class {
            id: 2,
            name: String::from("B"),
            rights_fee: dec("5000"),
            rate_per_sqm: dec("250"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_approval() {
        let (renter, charges) = plan_approval(
            &application(Application_Status::Pending),
            &stall(Stall_Status::Available),
            &class(),
            date(2026, 4, 16),
            &terms(),
        )
        .unwrap();

        assert_eq!(renter.application_id, 11);
        assert_eq!(renter.renter_name, "Maria Santos");
        assert_eq!(renter.status, "active");
        assert_eq!(renter.monthly_rent, dec("1500"));
        assert_eq!(renter.security_bond, dec("4500"));
        assert_eq!(charges.rights_fee, dec("5000"));
        assert_eq!(charges.first_rent, dec("750"));
        assert_eq!(charges.first_rent_due, date(2026, 4, 20));
    }

    #[test]
    fn test_approval_requires_pending_and_available() {
        assert!(matches!(
            plan_approval(
                &application(Application_Status::Rejected),
                &stall(Stall_Status::Available),
                &class(),
                date(2026, 4, 1),
                &terms(),
            ),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(
            plan_approval(
                &application(Application_Status::Pending),
                &stall(Stall_Status::Occupied),
                &class(),
                date(2026, 4, 1),
                &terms(),
            ),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_opening_charges() {
        let (_, charges) = plan_approval(
            &application(Application_Status::Pending),
            &stall(Stall_Status::Available),
            &class(),
            date(2026, 4, 25),
            &terms(),
        )
        .unwrap();
        let ledger =
            opening_charges(8, 31, date(2026, 4, 25), date(2026, 4, 20), &charges);

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger[0].charge, "rights_fee");
        assert_eq!(ledger[0].receipt_id, Some(31));
        assert_eq!(ledger[0].status, "paid");
        assert_eq!(ledger[1].amount_paid, Some(dec("4500")));

        let rent = &ledger[2];
        assert_eq!(rent.charge, "rent");
        assert_eq!(rent.status, "unpaid");
        assert_eq!(rent.receipt_id, None);
        // started after the due day
        assert_eq!(rent.due_date, date(2026, 4, 25));
        assert_eq!(rent.amount, dec("300"));
    }

    #[test]
    fn test_opening_charges_paid_before_future_start() {
        let start = today() + chrono::Months::new(36);
        let (_, charges) = plan_approval(
            &application(Application_Status::Pending),
            &stall(Stall_Status::Available),
            &class(),
            start,
            &terms(),
        )
        .unwrap();
        let ledger = opening_charges(8, 31, start, today(), &charges);

        for row in &ledger[..2] {
            assert_eq!(row.paid_on, Some(today()));
            assert_eq!(row.period_year, start.year());
            assert_eq!(row.due_date, start);
        }
        assert_eq!(ledger[2].paid_on, None);
        assert!(ledger[2].due_date >= start);
    }

    #[test]
    fn test_approval_rechecks_stall_of_locked_application() {
        let mut moved = application(Application_Status::Pending);
        moved.stall_id = 9;

        assert!(matches!(
            plan_approval(
                &moved,
                &stall(Stall_Status::Available),
                &class(),
                date(2026, 4, 1),
                &terms(),
            ),
            Err(Error::InvalidState(_))
        ));
    }
}
