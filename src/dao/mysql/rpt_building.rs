use sqlx::{error::Error, QueryBuilder, Transaction};

use super::DataBase;
use crate::model::{RPT_Building, Table};

impl Table<RPT_Building> {
    pub async fn insert_many(
        &self,
        data: &[RPT_Building],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            INSERT INTO `rpt_building` (
                `assessment_id`,
                `description`,
                `classification`,
                `floor_area`,
                `unit_cost`,
                `depreciation_rate`,
                `market_value`,
                `assessment_level`,
                `assessed_value`
            )"#,
        );

        query_builder.push_values(data, |mut b, data| {
            b.push_bind(data.assessment_id)
                .push_bind(&data.description)
                .push_bind(&data.classification)
                .push_bind(&data.floor_area)
                .push_bind(&data.unit_cost)
                .push_bind(&data.depreciation_rate)
                .push_bind(&data.market_value)
                .push_bind(&data.assessment_level)
                .push_bind(&data.assessed_value);
        });

        query_builder
            .build()
            .execute(&mut **transaction)
            .await
            .map(drop)
    }

    pub async fn get_by_assessment(
        &self,
        assessment_id: i64,
    ) -> Result<Vec<RPT_Building>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `assessment_id`,
                `description`,
                `classification`,
                `floor_area`,
                `unit_cost`,
                `depreciation_rate`,
                `market_value`,
                `assessment_level`,
                `assessed_value`
            FROM `rpt_building`
            WHERE `assessment_id` = ?
            ORDER BY `id`
            "#,
        )
        .bind(assessment_id)
        .fetch_all(&self.pool)
        .await
    }
}
