use chrono::NaiveDate;
use sqlx::{error::Error, Transaction};

use super::DataBase;
use crate::{
    helpers::Payment_Source,
    model::{Monthly_Collection, Receipt, Receipt_Line, Source_Amount, Table},
};

impl Table<Receipt> {
    pub async fn insert(
        &self,
        data: &Receipt,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<i64, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO `receipt` (
                `source`,
                `payor`,
                `payment_method`,
                `total`,
                `paid_on`,
                `created_at`
            )
            VALUES(?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.source)
        .bind(&data.payor)
        .bind(&data.payment_method)
        .bind(&data.total)
        .bind(data.paid_on)
        .bind(data.created_at)
        .execute(&mut **transaction)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn set_or_number(
        &self,
        id: i64,
        or_number: &str,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE `receipt` SET `or_number` = ? WHERE `id` = ?
            "#,
        )
        .bind(or_number)
        .bind(id)
        .execute(&mut **transaction)
        .await
        .map(drop)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Receipt>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `or_number`,
                `source`,
                `payor`,
                `payment_method`,
                `total`,
                `paid_on`,
                `created_at`
            FROM `receipt`
            WHERE `id` = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_lines(
        &self,
        receipt_id: i64,
        source: Payment_Source,
    ) -> Result<Vec<Receipt_Line>, Error> {
        let sql = match source {
            Payment_Source::Rpt => {
                r#"
                SELECT
                    q.`id`,
                    CONCAT('RPT ', l.`tdn`, ' Q', q.`quarter_no`, ' ', q.`tax_year`) AS `description`,
                    q.`amount`,
                    q.`penalty`,
                    q.`discount`,
                    q.`amount_paid`
                FROM `rpt_quarterly` AS q
                INNER JOIN `rpt_tax` AS t ON t.`id` = q.`tax_id`
                INNER JOIN `rpt_land_assessment` AS a ON a.`id` = t.`assessment_id`
                INNER JOIN `rpt_land` AS l ON l.`id` = a.`land_id`
                WHERE q.`receipt_id` = ?
                ORDER BY q.`id`
                "#
            },
            Payment_Source::Market => {
                r#"
                SELECT
                    p.`id`,
                    CONCAT(s.`code`, ' ', p.`charge`, ' ', p.`period_year`, '-', LPAD(p.`period_month`, 2, '0')) AS `description`,
                    p.`amount`,
                    p.`penalty`,
                    p.`discount`,
                    p.`amount_paid`
                FROM `market_payment` AS p
                INNER JOIN `market_renter` AS r ON r.`id` = p.`renter_id`
                INNER JOIN `market_stall` AS s ON s.`id` = r.`stall_id`
                WHERE p.`receipt_id` = ?
                ORDER BY p.`id`
                "#
            },
            Payment_Source::Business => {
                r#"
                SELECT
                    q.`id`,
                    CONCAT(b.`business_name`, ' Q', q.`quarter_no`, ' ', q.`tax_year`) AS `description`,
                    q.`amount`,
                    q.`penalty`,
                    q.`discount`,
                    q.`amount_paid`
                FROM `business_quarterly` AS q
                INNER JOIN `business_assessment` AS a ON a.`id` = q.`assessment_id`
                INNER JOIN `business` AS b ON b.`id` = a.`business_id`
                WHERE q.`receipt_id` = ?
                ORDER BY q.`id`
                "#
            },
        };

        sqlx::query_as(sql)
            .bind(receipt_id)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Receipt>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `id`,
                `or_number`,
                `source`,
                `payor`,
                `payment_method`,
                `total`,
                `paid_on`,
                `created_at`
            FROM `receipt`
            WHERE `paid_on` BETWEEN ? AND ?
            ORDER BY `paid_on` DESC, `id` DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_collected_by_source(
        &self,
        year: i32,
    ) -> Result<Vec<Source_Amount>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                `source`,
                SUM(`total`) AS `amount`
            FROM `receipt`
            WHERE YEAR(`paid_on`) = ?
            GROUP BY `source`
            ORDER BY `source`
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_monthly_collections(
        &self,
        year: i32,
    ) -> Result<Vec<Monthly_Collection>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                CAST(MONTH(`paid_on`) AS SIGNED) AS `month`,
                `source`,
                SUM(`total`) AS `amount`
            FROM `receipt`
            WHERE YEAR(`paid_on`) = ?
            GROUP BY `month`, `source`
            ORDER BY `month`, `source`
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }
}
