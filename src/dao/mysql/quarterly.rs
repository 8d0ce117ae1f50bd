use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::{error::Error, QueryBuilder, Transaction};

use super::DataBase;
use crate::{
    calculation::rpt::Installment,
    helpers::Payment_Status,
    model::{Installment_Table, Quarterly, Table},
};

fn select_columns<T: Installment_Table>() -> String {
    format!(
        r#"
        SELECT
            `id`,
            `{}` AS `parent_id`,
            `tax_year`,
            `quarter_no`,
            `due_date`,
            `amount`,
            `penalty`,
            `discount`,
            `amount_paid`,
            `status`,
            `receipt_id`,
            `paid_on`
        FROM `{}`
        "#,
        T::PARENT,
        T::TABLE
    )
}

impl<T: Installment_Table> Table<T> {
    pub async fn insert_installments(
        &self,
        parent_id: i64,
        tax_year: i32,
        data: &[Installment],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            format!(
                r#"
                INSERT INTO `{}` (
                    `{}`,
                    `tax_year`,
                    `quarter_no`,
                    `due_date`,
                    `amount`,
                    `status`
                )"#,
                T::TABLE,
                T::PARENT
            ),
        );

        query_builder.push_values(data, |mut b, item| {
            b.push_bind(parent_id)
                .push_bind(tax_year)
                .push_bind(item.quarter_no as i32)
                .push_bind(item.due_date)
                .push_bind(&item.amount)
                .push_bind(Payment_Status::Unpaid.as_str());
        });

        query_builder
            .build()
            .execute(&mut **transaction)
            .await
            .map(drop)
    }

    pub async fn get_by_parent(
        &self,
        parent_id: i64,
    ) -> Result<Vec<Quarterly>, Error> {
        let sql = format!(
            "{} WHERE `{}` = ? ORDER BY `quarter_no`",
            select_columns::<T>(),
            T::PARENT
        );

        sqlx::query_as(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Row-locks the given installments until the transaction ends.
    pub async fn lock_installments(
        &self,
        ids: &[i64],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Vec<Quarterly>, Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            format!("{} WHERE `id` IN (", select_columns::<T>()),
        );

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

    pub async fn mark_paid(
        &self,
        id: i64,
        penalty: &BigDecimal,
        discount: &BigDecimal,
        amount_paid: &BigDecimal,
        receipt_id: i64,
        paid_on: NaiveDate,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<u64, Error> {
        let sql = format!(
            r#"
            UPDATE `{}` SET
                `penalty` = ?,
                `discount` = ?,
                `amount_paid` = ?,
                `status` = ?,
                `receipt_id` = ?,
                `paid_on` = ?
            WHERE `id` = ? AND `status` = ?
            "#,
            T::TABLE
        );

        let result = sqlx::query(&sql)
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

    pub async fn outstanding(&self, tax_year: i32) -> Result<BigDecimal, Error> {
        let sql = format!(
            r#"
            SELECT
                COALESCE(SUM(`amount`), 0)
            FROM `{}`
            WHERE `tax_year` = ? AND `status` = ?
            "#,
            T::TABLE
        );

        let (value,): (BigDecimal,) = sqlx::query_as(&sql)
            .bind(tax_year)
            .bind(Payment_Status::Unpaid.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(value)
    }
}
