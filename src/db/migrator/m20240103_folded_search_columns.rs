use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut added = false;

        if !manager.has_column("sale_records", "title_folded").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(SaleRecords::Table)
                        .add_column(
                            ColumnDef::new(SaleRecords::TitleFolded)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .to_owned(),
                )
                .await?;
            added = true;
        }

        if !manager.has_column("sale_records", "description_folded").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(SaleRecords::Table)
                        .add_column(
                            ColumnDef::new(SaleRecords::DescriptionFolded)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .to_owned(),
                )
                .await?;
            added = true;
        }

        if added {
            backfill(manager).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(SaleRecords::Table)
                    .drop_column(SaleRecords::TitleFolded)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(SaleRecords::Table)
                    .drop_column(SaleRecords::DescriptionFolded)
                    .to_owned(),
            )
            .await
    }
}

/// SQLite `LOWER` folds ASCII only, so existing rows are folded here.
async fn backfill(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let conn = manager.get_connection();
    let backend = manager.get_database_backend();

    let rows = conn
        .query_all(Statement::from_string(
            backend,
            "SELECT seq, title, description FROM sale_records",
        ))
        .await?;

    for row in rows {
        let seq: i64 = row.try_get("", "seq")?;
        let title: String = row.try_get("", "title")?;
        let description: String = row.try_get("", "description")?;

        conn.execute(Statement::from_sql_and_values(
            backend,
            "UPDATE sale_records SET title_folded = ?, description_folded = ? WHERE seq = ?",
            [
                title.to_lowercase().into(),
                description.to_lowercase().into(),
                seq.into(),
            ],
        ))
        .await?;
    }

    Ok(())
}

#[derive(DeriveIden)]
enum SaleRecords {
    Table,
    TitleFolded,
    DescriptionFolded,
}
