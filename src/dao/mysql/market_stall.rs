use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::model::{Market_Stall, Market_Stall_Class, Table};

impl Table<Market_Stall> {
    pub async fn insert(&self, data: &Market_Stall) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `market_stall` (
                `code`,
                `section`,
                `class_id`,
                `area`,
                `status`,
                `created_at`
            )
            VALUES(?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.code)
        .bind(&data.section)
        .bind(data.class_id)
        .bind(&data.area)
        .bind(&data.status)
        .bind(data.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Market_Stall>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `code`,
                `section`,
                `class_id`,
                `area`,
                `status`,
                `created_at`
            FROM `market_stall`
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
        section: Option<String>,
    ) -> Result<Vec<Market_Stall>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `code`,
                `section`,
                `class_id`,
                `area`,
                `status`,
                `created_at`
            FROM `market_stall`
            WHERE
                (? IS NULL OR `status` = ?) AND
                (? IS NULL OR `section` = ?)
            ORDER BY `section`, `code`
            "#,
        )
        .bind(&status)
        .bind(&status)
        .bind(&section)
        .bind(&section)
        .fetch_all(&self.pool)
        .await
    }

    /// Locks the stall together with its class for the approval transaction.
    pub async fn lock_with_class(
        &self,
        id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Option<(Market_Stall, Market_Stall_Class)>, Error> {
        let stall: Option<Market_Stall> = sqlx::query_as(
            r#"
            SELECT
                `id`,
                `code`,
                `section`,
                `class_id`,
                `area`,
                `status`,
                `created_at`
            FROM `market_stall`
            WHERE `id` = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await?;

        let stall = match stall {
            Some(stall) => stall,
            None => return Ok(None),
        };

        let class: Market_Stall_Class = sqlx::query_as(
            r#"
            SELECT
                `id`,
                `name`,
                `rights_fee`,
                `rate_per_sqm`,
                `created_at`
            FROM `market_stall_class`
            WHERE `id` = ?
            "#,
        )
        .bind(stall.class_id)
        .fetch_one(&mut **transaction)
        .await?;

        Ok(Some((stall, class)))
    }

    pub async fn set_status(
        &self,
        id: i64,
        status: &str,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE `market_stall` SET `status` = ? WHERE `id` = ?
            "#,
        )
        .bind(status)
        .bind(id)
        .execute(&mut **transaction)
        .await
        .map(drop)
    }
}
