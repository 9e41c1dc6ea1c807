use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Month windows filter on date_of_sale
        manager
            .create_index(
                Index::create()
                    .name("idx_sale_records_date_of_sale")
                    .table(SaleRecords::Table)
                    .col(SaleRecords::DateOfSale)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sale_records_category")
                    .table(SaleRecords::Table)
                    .col(SaleRecords::Category)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_sale_records_category")
                    .table(SaleRecords::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_sale_records_date_of_sale")
                    .table(SaleRecords::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum SaleRecords {
    Table,
    DateOfSale,
    Category,
}
