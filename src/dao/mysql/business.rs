use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::model::{Business, Table};

impl Table<Business> {
    pub async fn insert(&self, data: &Business) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `business` (
                `owner_name`,
                `business_name`,
                `address`,
                `category`,
                `tin`,
                `status`,
                `registered_at`
            )
            VALUES(?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.owner_name)
        .bind(&data.business_name)
        .bind(&data.address)
        .bind(&data.category)
        .bind(&data.tin)
        .bind(&data.status)
        .bind(data.registered_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Business>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `owner_name`,
                `business_name`,
                `address`,
                `category`,
                `tin`,
                `status`,
                `registered_at`
            FROM `business`
            WHERE `id` = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn lock(
        &self,
        id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Option<Business>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `owner_name`,
                `business_name`,
                `address`,
                `category`,
                `tin`,
                `status`,
                `registered_at`
            FROM `business`
            WHERE `id` = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await
    }

    pub async fn get_all(
        &self,
        search: Option<String>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Business>, Error> {
        let pattern = search.map(|s| format!("%{}%", s));

        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `owner_name`,
                `business_name`,
                `address`,
                `category`,
                `tin`,
                `status`,
                `registered_at`
            FROM `business`
            WHERE ? IS NULL OR `business_name` LIKE ? OR `owner_name` LIKE ?
            ORDER BY `business_name`
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn count_active(&self) -> Result<i64, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*)
            FROM `business`
            WHERE `status` = 'active'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}
