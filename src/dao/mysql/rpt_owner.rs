use sqlx::error::Error;

use crate::model::{RPT_Owner, Table};

impl Table<RPT_Owner> {
    pub async fn insert(&self, data: &RPT_Owner) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `rpt_owner` (
                `full_name`,
                `address`,
                `contact_no`,
                `tin`,
                `created_at`
            )
            VALUES(?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.full_name)
        .bind(&data.address)
        .bind(&data.contact_no)
        .bind(&data.tin)
        .bind(data.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn get(&self, id: i64) -> Result<Option<RPT_Owner>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `full_name`,
                `address`,
                `contact_no`,
                `tin`,
                `created_at`
            FROM `rpt_owner`
            WHERE `id` = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_all(
        &self,
        search: Option<String>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<RPT_Owner>, Error> {
        let pattern = search.map(|s| format!("%{}%", s));

        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `full_name`,
                `address`,
                `contact_no`,
                `tin`,
                `created_at`
            FROM `rpt_owner`
            WHERE ? IS NULL OR `full_name` LIKE ?
            ORDER BY `full_name`
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
    }
}
