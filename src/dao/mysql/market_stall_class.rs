use sqlx::error::Error;

use crate::model::{Market_Stall_Class, Table};

impl Table<Market_Stall_Class> {
    pub async fn insert(
        &self,
        data: &Market_Stall_Class,
    ) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `market_stall_class` (
                `name`,
                `rights_fee`,
                `rate_per_sqm`,
                `created_at`
            )
            VALUES(?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.rights_fee)
        .bind(&data.rate_per_sqm)
        .bind(data.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn get(
        &self,
        id: i64,
    ) -> Result<Option<Market_Stall_Class>, Error> {
        sqlx::query_as(
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
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_all(&self) -> Result<Vec<Market_Stall_Class>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `name`,
                `rights_fee`,
                `rate_per_sqm`,
                `created_at`
            FROM `market_stall_class`
            ORDER BY `name`
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
