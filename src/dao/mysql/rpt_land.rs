use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::model::{RPT_Land, Table};

impl Table<RPT_Land> {
    pub async fn insert(&self, data: &RPT_Land) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `rpt_land` (
                `owner_id`,
                `tdn`,
                `pin`,
                `location`,
                `barangay`,
                `lot_area`,
                `classification`,
                `created_at`
            )
            VALUES(?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.owner_id)
        .bind(&data.tdn)
        .bind(&data.pin)
        .bind(&data.location)
        .bind(&data.barangay)
        .bind(&data.lot_area)
        .bind(&data.classification)
        .bind(data.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn get_by_owner(
        &self,
        owner_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<RPT_Land>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `owner_id`,
                `tdn`,
                `pin`,
                `location`,
                `barangay`,
                `lot_area`,
                `classification`,
                `created_at`
            FROM `rpt_land`
            WHERE ? IS NULL OR `owner_id` = ?
            ORDER BY `tdn`
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner_id)
        .bind(owner_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
    }

    /// Locks the parcel for the rest of the assessment transaction.
    pub async fn lock(
        &self,
        id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Option<RPT_Land>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `owner_id`,
                `tdn`,
                `pin`,
                `location`,
                `barangay`,
                `lot_area`,
                `classification`,
                `created_at`
            FROM `rpt_land`
            WHERE `id` = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await
    }
}
