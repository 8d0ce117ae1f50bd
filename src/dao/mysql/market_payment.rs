use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::{error::Error, Executor, QueryBuilder, Transaction};

use super::DataBase;
use crate::{
    helpers::Payment_Status,
    model::{Market_Payment, Table},
};

const INSERT_COLUMNS: &str = r#"
    (
        `renter_id`,
        `charge`,
        `period_year`,
        `period_month`,
        `due_date`,
        `amount`,
        `penalty`,
        `discount`,
        `amount_paid`,
        `status`,
        `receipt_id`,
        `paid_on`
    )"#;

const SELECT_COLUMNS: &str = r#"
    SELECT
        `id`,
        `renter_id`,
        `charge`,
        `period_year`,
        `period_month`,
        `due_date`,
        `amount`,
        `penalty`,
        `discount`,
        `amount_paid`,
        `status`,
        `receipt_id`,
        `paid_on`
    FROM `market_payment`
    "#;

impl Table<Market_Payment> {
    async fn push_many<'c, E>(
        &self,
        ignore_duplicates: bool,
        data: &[Market_Payment],
        executor: E,
    ) -> Result<u64, Error>
    where
        E: Executor<'c, Database = DataBase>,
    {
        if data.is_empty() {
            return Ok(0);
        }

        let verb = if ignore_duplicates {
            "INSERT IGNORE INTO"
        } else {
            "INSERT INTO"
        };

        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            format!("{} `market_payment` {}", verb, INSERT_COLUMNS),
        );

        query_builder.push_values(data, |mut b, data| {
            b.push_bind(data.renter_id)
                .push_bind(&data.charge)
                .push_bind(data.period_year)
                .push_bind(data.period_month)
                .push_bind(data.due_date)
                .push_bind(&data.amount)
                .push_bind(&data.penalty)
                .push_bind(&data.discount)
                .push_bind(&data.amount_paid)
                .push_bind(&data.status)
                .push_bind(data.receipt_id)
                .push_bind(data.paid_on);
        });

        let result = query_builder.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_many(
        &self,
        data: &[Market_Payment],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<u64, Error> {
        self.push_many(false, data, &mut **transaction).await
    }

    /// Inserts charges that are not billed yet; existing periods are kept as
    /// they are. Returns the number of new rows.
    pub async fn insert_missing(
        &self,
        data: &[Market_Payment],
    ) -> Result<u64, Error> {
        self.push_many(true, data, &self.pool).await
    }

    pub async fn get_by_renter(
        &self,
        renter_id: i64,
    ) -> Result<Vec<Market_Payment>, Error> {
        let sql = format!(
            "{} WHERE `renter_id` = ? ORDER BY `period_year`, `period_month`, `id`",
            SELECT_COLUMNS
        );

        sqlx::query_as(&sql)
            .bind(renter_id)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn lock_charges(
        &self,
        ids: &[i64],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Vec<Market_Payment>, Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut query_builder: QueryBuilder<DataBase> =
            QueryBuilder::new(format!("{} WHERE `id` IN (", SELECT_COLUMNS));

        let mut separated = query_builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY `id` FOR UPDATE");

        query_builder
            .build_query_as()
            .fetch_all(&mut **transaction)
            .await
    }

    pub async fn mark_paid_charge(
        &self,
        id: i64,
        penalty: &BigDecimal,
        discount: &BigDecimal,
        amount_paid: &BigDecimal,
        receipt_id: i64,
        paid_on: NaiveDate,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE `market_payment` SET
                `penalty` = ?,
                `discount` = ?,
                `amount_paid` = ?,
                `status` = ?,
                `receipt_id` = ?,
                `paid_on` = ?
            WHERE `id` = ? AND `status` = ?
            "#,
        )
        .bind(penalty)
        .bind(discount)
        .bind(amount_paid)
        .bind(Payment_Status::Paid.as_str())
        .bind(receipt_id)
        .bind(paid_on)
        .bind(id)
        .bind(Payment_Status::Unpaid.as_str())
        .execute(&mut **transaction)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn outstanding_by_year(
        &self,
        period_year: i32,
    ) -> Result<BigDecimal, Error> {
        let (value,): (BigDecimal,) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(`amount`), 0)
            FROM `market_payment`
            WHERE `period_year` = ? AND `status` = ?
            "#,
        )
        .bind(period_year)
        .bind(Payment_Status::Unpaid.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}
