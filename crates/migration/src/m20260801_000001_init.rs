//! Initial schema migration - creates all tables from scratch.
//!
//! Two tables back the whole ledger:
//!
//! - `customers`: contact details plus the server-maintained running
//!   aggregates (money and per-size cylinder balances)
//! - `transactions`: one row per visit, carrying the raw breakdown JSON the
//!   client submitted and the authoritative derived fields the engine
//!   computed when the row was written
//!
//! Money columns are big-integer KES cents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    Phone,
    Email,
    Location,
    County,
    Address,
    Category,
    CreatedAt,
    LastTransactionDate,
    TotalBilledCents,
    TotalPaidCents,
    FinancialBalanceCents,
    #[iden = "cylinder_balance_6kg"]
    CylinderBalance6kg,
    #[iden = "cylinder_balance_13kg"]
    CylinderBalance13kg,
    #[iden = "cylinder_balance_50kg"]
    CylinderBalance50kg,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    CustomerId,
    Date,
    LoadBreakdown,
    ReturnsBreakdown,
    OutrightBreakdown,
    TotalLoad,
    TotalReturns,
    TotalBillCents,
    AmountPaidCents,
    FinancialBalanceCents,
    #[iden = "cylinder_balance_6kg"]
    CylinderBalance6kg,
    #[iden = "cylinder_balance_13kg"]
    CylinderBalance13kg,
    #[iden = "cylinder_balance_50kg"]
    CylinderBalance50kg,
    CylinderBalance,
    PaymentMethod,
    Notes,
    TransactionNumber,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string())
                    .col(ColumnDef::new(Customers::Location).string().not_null())
                    .col(ColumnDef::new(Customers::County).string().not_null())
                    .col(ColumnDef::new(Customers::Address).string().not_null())
                    .col(
                        ColumnDef::new(Customers::Category)
                            .string()
                            .not_null()
                            .default("regular"),
                    )
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Customers::LastTransactionDate).timestamp())
                    .col(
                        ColumnDef::new(Customers::TotalBilledCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Customers::TotalPaidCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Customers::FinancialBalanceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Customers::CylinderBalance6kg)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Customers::CylinderBalance13kg)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Customers::CylinderBalance50kg)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-customers-name")
                    .table(Customers::Table)
                    .col(Customers::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::CustomerId).string().not_null())
                    .col(ColumnDef::new(Transactions::Date).timestamp().not_null())
                    .col(ColumnDef::new(Transactions::LoadBreakdown).json())
                    .col(ColumnDef::new(Transactions::ReturnsBreakdown).json())
                    .col(ColumnDef::new(Transactions::OutrightBreakdown).json())
                    .col(
                        ColumnDef::new(Transactions::TotalLoad)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::TotalReturns)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::TotalBillCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::AmountPaidCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::FinancialBalanceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::CylinderBalance6kg)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::CylinderBalance13kg)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::CylinderBalance50kg)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::CylinderBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::PaymentMethod)
                            .string()
                            .not_null()
                            .default("credit"),
                    )
                    .col(ColumnDef::new(Transactions::Notes).string())
                    .col(ColumnDef::new(Transactions::TransactionNumber).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-customer_id")
                            .from(Transactions::Table, Transactions::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-customer_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::CustomerId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-transaction_number-unique")
                    .table(Transactions::Table)
                    .col(Transactions::TransactionNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        Ok(())
    }
}
