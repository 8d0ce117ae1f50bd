use chrono::NaiveDate;
use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::{
    helpers::Renter_Status,
    model::{Market_Renter, Table},
};

impl Table<Market_Renter> {
    pub async fn insert(
        &self,
        data: &Market_Renter,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `market_renter` (
                `application_id`,
                `stall_id`,
                `renter_name`,
                `business_name`,
                `contact_no`,
                `start_date`,
                `monthly_rent`,
                `security_bond`,
                `status`,
                `created_at`
            )
            VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.application_id)
        .bind(data.stall_id)
        .bind(&data.renter_name)
        .bind(&data.business_name)
        .bind(&data.contact_no)
        .bind(data.start_date)
        .bind(&data.monthly_rent)
        .bind(&data.security_bond)
        .bind(&data.status)
        .bind(data.created_at)
        .execute(&mut **transaction)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Market_Renter>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `application_id`,
                `stall_id`,
                `renter_name`,
                `business_name`,
                `contact_no`,
                `start_date`,
                `end_date`,
                `monthly_rent`,
                `security_bond`,
                `status`,
                `created_at`
            FROM `market_renter`
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
    ) -> Result<Vec<Market_Renter>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `application_id`,
                `stall_id`,
                `renter_name`,
                `business_name`,
                `contact_no`,
                `start_date`,
                `end_date`,
                `monthly_rent`,
                `security_bond`,
                `status`,
                `created_at`
            FROM `market_renter`
            WHERE ? IS NULL OR `status` = ?
            ORDER BY `renter_name`
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

    /// Renters whose lease started before `period_start` and had not ended
    /// before it, whatever their current status.
    pub async fn get_billable(
        &self,
        period_start: NaiveDate,
    ) -> Result<Vec<Market_Renter>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `application_id`,
                `stall_id`,
                `renter_name`,
                `business_name`,
                `contact_no`,
                `start_date`,
                `end_date`,
                `monthly_rent`,
                `security_bond`,
                `status`,
                `created_at`
            FROM `market_renter`
            WHERE `start_date` < ?
                AND (`end_date` IS NULL OR `end_date` >= ?)
            ORDER BY `id`
            "#,
        )
        .bind(period_start)
        .bind(period_start)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn lock(
        &self,
        id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Option<Market_Renter>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `application_id`,
                `stall_id`,
                `renter_name`,
                `business_name`,
                `contact_no`,
                `start_date`,
                `end_date`,
                `monthly_rent`,
                `security_bond`,
                `status`,
                `created_at`
            FROM `market_renter`
            WHERE `id` = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await
    }

    pub async fn terminate(
        &self,
        id: i64,
        end_date: NaiveDate,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE `market_renter` SET
                `status` = ?,
                `end_date` = ?
            WHERE `id` = ?
            "#,
        )
        .bind(Renter_Status::Terminated.as_str())
        .bind(end_date)
        .bind(id)
        .execute(&mut **transaction)
        .await
        .map(drop)
    }

    pub async fn count_active(&self) -> Result<i64, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*)
            FROM `market_renter`
            WHERE `status` = ?
            "#,
        )
        .bind(Renter_Status::Active.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}
