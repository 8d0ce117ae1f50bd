use chrono::{DateTime, Utc};
use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::{
    helpers::Application_Status,
    model::{Market_Application, Table},
};

impl Table<Market_Application> {
    pub async fn insert(
        &self,
        data: &Market_Application,
    ) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `market_application` (
                `stall_id`,
                `applicant_name`,
                `business_name`,
                `contact_no`,
                `address`,
                `status`,
                `applied_at`
            )
            VALUES(?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.stall_id)
        .bind(&data.applicant_name)
        .bind(&data.business_name)
        .bind(&data.contact_no)
        .bind(&data.address)
        .bind(&data.status)
        .bind(data.applied_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn get(
        &self,
        id: i64,
    ) -> Result<Option<Market_Application>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `stall_id`,
                `applicant_name`,
                `business_name`,
                `contact_no`,
                `address`,
                `status`,
                `remarks`,
                `applied_at`,
                `decided_at`
            FROM `market_application`
            WHERE `id` = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_all(
        &self,
        status: Option<String>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Market_Application>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `stall_id`,
                `applicant_name`,
                `business_name`,
                `contact_no`,
                `address`,
                `status`,
                `remarks`,
                `applied_at`,
                `decided_at`
            FROM `market_application`
            WHERE ? IS NULL OR `status` = ?
            ORDER BY `applied_at` DESC, `id` DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&status)
        .bind(&status)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn lock(
        &self,
        id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Option<Market_Application>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `stall_id`,
                `applicant_name`,
                `business_name`,
                `contact_no`,
                `address`,
                `status`,
                `remarks`,
                `applied_at`,
                `decided_at`
            FROM `market_application`
            WHERE `id` = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await
    }

    pub async fn decide(
        &self,
        id: i64,
        status: Application_Status,
        remarks: Option<&str>,
        decided_at: DateTime<Utc>,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE `market_application` SET
                `status` = ?,
                `remarks` = ?,
                `decided_at` = ?
            WHERE `id` = ?
            "#,
        )
        .bind(status.as_str())
        .bind(remarks)
        .bind(decided_at)
        .bind(id)
        .execute(&mut **transaction)
        .await
        .map(drop)
    }

    /// Rejects every other pending application for a stall that was just
    /// awarded.
    pub async fn reject_competing(
        &self,
        stall_id: i64,
        approved_id: i64,
        decided_at: DateTime<Utc>,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE `market_application` SET
                `status` = ?,
                `remarks` = ?,
                `decided_at` = ?
            WHERE `stall_id` = ? AND `id` <> ? AND `status` = ?
            "#,
        )
        .bind(Application_Status::Rejected.as_str())
        .bind("stall awarded to another applicant")
        .bind(decided_at)
        .bind(stall_id)
        .bind(approved_id)
        .bind(Application_Status::Pending.as_str())
        .execute(&mut **transaction)
        .await?;

        Ok(result.rows_affected())
    }
}
