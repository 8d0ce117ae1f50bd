use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::model::{RPT_Land_Assessment, Table};

impl Table<RPT_Land_Assessment> {
    pub async fn insert(
        &self,
        data: &RPT_Land_Assessment,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `rpt_land_assessment` (
                `land_id`,
                `assessment_year`,
                `unit_value`,
                `market_value`,
                `assessment_level`,
                `assessed_value`,
                `total_assessed_value`,
                `assessed_by`,
                `created_at`
            )
            VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.land_id)
        .bind(data.assessment_year)
        .bind(&data.unit_value)
        .bind(&data.market_value)
        .bind(&data.assessment_level)
        .bind(&data.assessed_value)
        .bind(&data.total_assessed_value)
        .bind(&data.assessed_by)
        .bind(data.created_at)
        .execute(&mut **transaction)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn is_exists(
        &self,
        land_id: i64,
        year: i32,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<bool, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*)
            FROM `rpt_land_assessment`
            WHERE `land_id` = ? AND `assessment_year` = ?
            "#,
        )
        .bind(land_id)
        .bind(year)
        .fetch_one(&mut **transaction)
        .await?;

        Ok(value > 0)
    }

    pub async fn get(
        &self,
        id: i64,
    ) -> Result<Option<RPT_Land_Assessment>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `land_id`,
                `assessment_year`,
                `unit_value`,
                `market_value`,
                `assessment_level`,
                `assessed_value`,
                `total_assessed_value`,
                `assessed_by`,
                `created_at`
            FROM `rpt_land_assessment`
            WHERE `id` = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_by_land_year(
        &self,
        land_id: i64,
        year: i32,
    ) -> Result<Option<RPT_Land_Assessment>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `land_id`,
                `assessment_year`,
                `unit_value`,
                `market_value`,
                `assessment_level`,
                `assessed_value`,
                `total_assessed_value`,
                `assessed_by`,
                `created_at`
            FROM `rpt_land_assessment`
            WHERE `land_id` = ? AND `assessment_year` = ?
            "#,
        )
        .bind(land_id)
        .bind(year)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count_by_year(&self, year: i32) -> Result<i64, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT
                COUNT(DISTINCT `land_id`)
            FROM `rpt_land_assessment`
            WHERE `assessment_year` = ?
            "#,
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}
