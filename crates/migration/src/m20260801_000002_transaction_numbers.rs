//! One-time backfill of sequential display numbers.
//!
//! Rows written before numbering existed get `A0001`-style numbers in visit
//! date order, continuing after the highest number already assigned. New
//! rows are numbered by the engine at creation, so this only ever touches
//! pre-existing data.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let max_stmt = Statement::from_string(
            backend,
            "SELECT COALESCE(MAX(CAST(SUBSTR(transaction_number, 2) AS INTEGER)), 0) AS max_num \
             FROM transactions WHERE transaction_number IS NOT NULL"
                .to_string(),
        );
        let mut next: i64 = db
            .query_one(max_stmt)
            .await?
            .and_then(|row| row.try_get("", "max_num").ok())
            .unwrap_or(0)
            + 1;

        let unnumbered = db
            .query_all(Statement::from_string(
                backend,
                "SELECT id FROM transactions WHERE transaction_number IS NULL \
                 ORDER BY date ASC, id ASC"
                    .to_string(),
            ))
            .await?;

        for row in unnumbered {
            let id: String = row.try_get("", "id")?;
            db.execute(Statement::from_sql_and_values(
                backend,
                "UPDATE transactions SET transaction_number = ? WHERE id = ?",
                vec![format!("A{next:04}").into(), id.into()],
            ))
            .await?;
            next += 1;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // Numbers assigned by the backfill are indistinguishable from ones
        // assigned at creation; reverting would drop both.
        Ok(())
    }
}
