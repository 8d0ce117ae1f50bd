use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::model::{RPT_Tax, Table};

impl Table<RPT_Tax> {
    pub async fn insert(
        &self,
        data: &RPT_Tax,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `rpt_tax` (
                `assessment_id`,
                `tax_year`,
                `assessed_value`,
                `basic_rate`,
                `sef_rate`,
                `basic_tax`,
                `sef_tax`,
                `annual_tax`,
                `created_at`
            )
            VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.assessment_id)
        .bind(data.tax_year)
        .bind(&data.assessed_value)
        .bind(&data.basic_rate)
        .bind(&data.sef_rate)
        .bind(&data.basic_tax)
        .bind(&data.sef_tax)
        .bind(&data.annual_tax)
        .bind(data.created_at)
        .execute(&mut **transaction)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn get_by_assessment(
        &self,
        assessment_id: i64,
    ) -> Result<Option<RPT_Tax>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `assessment_id`,
                `tax_year`,
                `assessed_value`,
                `basic_rate`,
                `sef_rate`,
                `basic_tax`,
                `sef_tax`,
                `annual_tax`,
                `created_at`
            FROM `rpt_tax`
            WHERE `assessment_id` = ?
            "#,
        )
        .bind(assessment_id)
        .fetch_optional(&self.pool)
        .await
    }
}
