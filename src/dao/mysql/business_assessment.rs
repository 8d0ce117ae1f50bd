use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::model::{Business_Assessment, Table};

impl Table<Business_Assessment> {
    pub async fn insert(
        &self,
        data: &Business_Assessment,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `business_assessment` (
                `business_id`,
                `tax_year`,
                `gross_sales`,
                `tax_rate`,
                `business_tax`,
                `mayors_permit`,
                `sanitary_fee`,
                `total`,
                `created_at`
            )
            VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.business_id)
        .bind(data.tax_year)
        .bind(&data.gross_sales)
        .bind(&data.tax_rate)
        .bind(&data.business_tax)
        .bind(&data.mayors_permit)
        .bind(&data.sanitary_fee)
        .bind(&data.total)
        .bind(data.created_at)
        .execute(&mut **transaction)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn is_exists(
        &self,
        business_id: i64,
        tax_year: i32,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<bool, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*)
            FROM `business_assessment`
            WHERE `business_id` = ? AND `tax_year` = ?
            "#,
        )
        .bind(business_id)
        .bind(tax_year)
        .fetch_one(&mut **transaction)
        .await?;

        Ok(value > 0)
    }

    pub async fn get_by_business(
        &self,
        business_id: i64,
    ) -> Result<Vec<Business_Assessment>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `business_id`,
                `tax_year`,
                `gross_sales`,
                `tax_rate`,
                `business_tax`,
                `mayors_permit`,
                `sanitary_fee`,
                `total`,
                `created_at`
            FROM `business_assessment`
            WHERE `business_id` = ?
            ORDER BY `tax_year` DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
    }
}
